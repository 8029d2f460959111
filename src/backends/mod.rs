//! Input providers shipped with `plugaxes`.
//!
//! - [`host`]: the always-available provider over the host application's input state
//!   (keyboard, mouse, touch, declared joystick and button axes).
//! - [`scripted`]: a provider driven entirely through a handle; useful for tests and for
//!   hosts that run their own input pump.
//!
//! Anything else (HID, platform gamepad APIs) plugs in by implementing
//! [`Provider`](crate::provider::Provider) and registering a
//! [`ProviderFactory`](crate::provider::ProviderFactory).

pub mod host;
pub mod scripted;

use crate::provider::ProviderFactory;

/// Factories for the providers that need no outside wiring beyond a host feed.
pub fn default_factories(layout: host::HostLayout, feed: host::HostFeed) -> Vec<ProviderFactory> {
    vec![host::HostInputProvider::factory(layout, feed)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ProviderManager;

    #[test]
    fn default_factories_register_the_host_provider() {
        let manager = ProviderManager::discover(default_factories(host::HostLayout::default(), host::HostFeed::new()));
        assert_eq!(manager.provider_ids(), vec![1]);
        assert_eq!(manager.provider_name(1).as_deref(), Some(host::DEFAULT_PROVIDER_NAME));
    }
}
