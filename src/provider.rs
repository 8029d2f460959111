//! Provider interface.
//!
//! A [`Provider`] is a driver that talks to some low-level input source and exposes it as
//! devices and controls. Providers never see the registry or listeners; they report what
//! happened into a [`ProviderEvents`] buffer using provider-local device/control ids, and
//! the [`ProviderManager`](crate::manager::ProviderManager) does the rest.
//!
//! All control events for a tick must be written from inside
//! [`Provider::update_input`], so every listener sees a consistent frame.

use crate::device::DeviceDesc;
use crate::error::ProviderError;
use crate::event::InputKind;

/// Event reported by a provider, addressed with provider-local ids.
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderEvent {
    Control { device: u32, control: u32, kind: InputKind },
    DeviceAdded(DeviceDesc),
    DeviceRemoved(u32),
}

/// Per-call event buffer handed to a provider.
#[derive(Debug, Default)]
pub struct ProviderEvents {
    events: Vec<ProviderEvent>,
}

impl ProviderEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ProviderEvent) {
        self.events.push(event);
    }

    pub fn send(&mut self, device: u32, control: u32, kind: InputKind) {
        self.push(ProviderEvent::Control { device, control, kind });
    }

    pub fn send_ascii(&mut self, device: u32, control: u32, c: char) {
        self.send(device, control, InputKind::Ascii(c));
    }

    pub fn send_axis(&mut self, device: u32, control: u32, value: f32) {
        self.send(device, control, InputKind::AxisChanged(value));
    }

    pub fn send_normalized(&mut self, device: u32, control: u32, value: f32) {
        self.send(device, control, InputKind::NormalizedChanged(value));
    }

    /// `true` is ButtonDown, `false` ButtonUp.
    pub fn send_button(&mut self, device: u32, control: u32, down: bool) {
        let kind = if down { InputKind::ButtonDown } else { InputKind::ButtonUp };
        self.send(device, control, kind);
    }

    pub fn send_state_change(&mut self, device: u32, control: u32) {
        self.send(device, control, InputKind::StateChanged);
    }

    pub fn send_device_added(&mut self, device: DeviceDesc) {
        self.push(ProviderEvent::DeviceAdded(device));
    }

    pub fn send_device_removed(&mut self, device: u32) {
        self.push(ProviderEvent::DeviceRemoved(device));
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, ProviderEvent> {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// A source of devices.
pub trait Provider: Send {
    /// Unique across providers; first FQ name segment.
    fn name(&self) -> &str;

    /// Whether the provider can currently provide input.
    fn is_enabled(&self) -> bool;

    /// Devices currently connected.
    fn devices(&self) -> Vec<DeviceDesc>;

    /// Called once after registration. The default announces every current device.
    fn begin_callbacks(&mut self, out: &mut ProviderEvents) -> Result<(), ProviderError> {
        for device in self.devices() {
            out.send_device_added(device);
        }
        Ok(())
    }

    /// Called once per tick.
    fn update_input(&mut self, out: &mut ProviderEvents) -> Result<(), ProviderError>;
}

type BuildFn = dyn Fn() -> Result<Box<dyn Provider>, ProviderError> + Send + Sync;

/// Explicit registration entry: a provider kind plus its constructor.
///
/// The manager instantiates each kind at most once for as long as it stays enabled.
pub struct ProviderFactory {
    kind: String,
    build: Box<BuildFn>,
}

impl ProviderFactory {
    pub fn new<F>(kind: impl Into<String>, build: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Provider>, ProviderError> + Send + Sync + 'static,
    {
        Self {
            kind: kind.into(),
            build: Box::new(build),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub(crate) fn build(&self) -> Result<Box<dyn Provider>, ProviderError> {
        (self.build)()
    }
}

impl std::fmt::Debug for ProviderFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderFactory").field("kind", &self.kind).finish()
    }
}
