//! plugaxes — virtual-axis input binding.
//!
//! Providers expose physical devices and typed controls. A [`ProviderManager`] polls them
//! once per tick and fans their events out as one stream. A [`VirtualAxisBinder`] maps
//! named application axes onto controls, re-projects physical events onto the bound axes,
//! and persists the binding table.
//!
//! Controls are addressed durably by their fully-qualified name
//! `provider.device.control`, e.g. `HOST.ButtonDevice0.Jump`.

pub mod backends;
pub mod binder;
pub mod binding;
pub mod config;
pub mod control;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod logger;
pub mod manager;
pub mod provider;
pub mod registry;
pub mod router;
pub mod store;

pub use binder::*;
pub use binding::*;
pub use config::*;
pub use control::*;
pub use device::*;
pub use error::*;
pub use event::*;
pub use eventbus::*;
pub use filtered_listener::*;
pub use logger::*;
pub use manager::*;
pub use provider::*;
pub use registry::*;
pub use router::*;
pub use store::*;
