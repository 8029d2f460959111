//! Controls: typed, addressable physical input signals.
//!
//! Providers describe controls with [`ControlDesc`]; the registry materializes them as
//! shared, immutable [`Control`] records once the owning provider has an id.
//!
//! ## Identity
//! - [`ControlId`] `(provider, device, control)` is unique among live controls but is only
//!   stable for the current run.
//! - The fully-qualified name `provider.device.control` is the durable identity and the key
//!   stored in the binding table.
//! - Equality (and hashing) follow `(name, device, provider)`, so a device that is
//!   re-announced with renumbered controls still matches existing bindings by name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Separator between FQ name segments.
pub const FQ_SEPARATOR: char = '.';

/// Kind of value a control (or virtual axis) produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlType {
    /// Two-state button: emits down/up edges.
    Digital,
    /// Unbounded floating point value (mouse position, touch pressure).
    Analog,
    /// Floating point value in `[0.0, 1.0]`.
    Normalized,
    /// Character input.
    Ascii,
    /// Reserved grouping kind. Never produced by the bundled providers and never bindable.
    #[serde(rename = "Control")]
    Group,
}

impl ControlType {
    /// Types a virtual axis can be declared with.
    pub const BINDABLE: [ControlType; 4] = [
        ControlType::Digital,
        ControlType::Analog,
        ControlType::Normalized,
        ControlType::Ascii,
    ];

    pub fn is_bindable(self) -> bool {
        self != ControlType::Group
    }
}

/// Run-scoped address of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId {
    pub provider: u32,
    pub device: u32,
    pub control: u32,
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.provider, self.device, self.control)
    }
}

/// Provider-side description of a control, before registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDesc {
    /// Unique within the device.
    pub id: u32,
    /// Unique within the device; must not contain `.`.
    pub name: String,
    pub description: String,
    pub control_type: ControlType,
}

impl ControlDesc {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        control_type: ControlType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            control_type,
        }
    }
}

/// A registered control.
#[derive(Debug, Clone)]
pub struct Control {
    id: ControlId,
    name: String,
    description: String,
    control_type: ControlType,
    fq_name: String,
}

impl Control {
    pub(crate) fn from_desc(
        desc: &ControlDesc,
        provider_id: u32,
        provider_name: &str,
        device_id: u32,
        device_name: &str,
    ) -> Self {
        Self {
            id: ControlId {
                provider: provider_id,
                device: device_id,
                control: desc.id,
            },
            name: desc.name.clone(),
            description: desc.description.clone(),
            control_type: desc.control_type,
            fq_name: join_fq_name(provider_name, device_name, &desc.name),
        }
    }

    #[inline]
    pub fn id(&self) -> ControlId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn control_type(&self) -> ControlType {
        self.control_type
    }

    /// `provider.device.control`
    #[inline]
    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    /// Key used by the binder's reverse map. Matches [`PartialEq`] for `Control`.
    pub fn key(&self) -> ControlKey {
        ControlKey {
            provider: self.id.provider,
            device: self.id.device,
            name: self.name.clone(),
        }
    }
}

impl PartialEq for Control {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.id.device == other.id.device
            && self.id.provider == other.id.provider
    }
}

impl Eq for Control {}

impl Hash for Control {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.id.device.hash(state);
        self.id.provider.hash(state);
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fq_name)
    }
}

/// Owned equality key of a [`Control`]: `(provider, device, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlKey {
    pub provider: u32,
    pub device: u32,
    pub name: String,
}

/// Builds `provider.device.control`.
pub fn join_fq_name(provider: &str, device: &str, control: &str) -> String {
    let mut s = String::with_capacity(provider.len() + device.len() + control.len() + 2);
    s.push_str(provider);
    s.push(FQ_SEPARATOR);
    s.push_str(device);
    s.push(FQ_SEPARATOR);
    s.push_str(control);
    s
}

/// Splits an FQ name into its three segments. Any other segment count is a miss.
pub fn split_fq_name(fq: &str) -> Option<(&str, &str, &str)> {
    let mut parts = fq.split(FQ_SEPARATOR);
    let provider = parts.next()?;
    let device = parts.next()?;
    let control = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((provider, device, control))
}

/// A name segment is usable in an FQ name.
pub(crate) fn is_valid_segment(name: &str) -> bool {
    !name.is_empty() && !name.contains(FQ_SEPARATOR)
}
