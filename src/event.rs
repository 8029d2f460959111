//! Events and channels.
//!
//! Physical input is reported as [`InputEvent`]s (control or device scoped) by the
//! [`ProviderManager`](crate::manager::ProviderManager). The
//! [`VirtualAxisBinder`](crate::binder::VirtualAxisBinder) re-projects control events onto
//! virtual axes as [`AxisEvent`]s and passes device events through unchanged.
//!
//! ## Value conventions
//! - **Analog:** provider-defined units (mouse pixels, touch pressure, touch count).
//! - **Normalized:** `[0.0, 1.0]`. Joystick axes in `[-1, 1]` are mapped as `(v + 1) / 2`.
//! - **Digital:** press/release edges.
//! - **Ascii:** one event per typed character.
//!
//! Every typed change is preceded by a [`InputKind::StateChanged`] for the same control,
//! which is what "press something to bind it" UIs listen for.

use crate::binding::VirtualAxis;
use crate::control::Control;
use crate::device::Device;
use std::sync::Arc;
use std::time::Instant;

/// Per-control input change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputKind {
    /// A character was typed on an Ascii control.
    Ascii(char),
    /// An Analog control changed value.
    AxisChanged(f32),
    /// A Normalized control changed value.
    NormalizedChanged(f32),
    /// A Digital control transitioned to pressed.
    ButtonDown,
    /// A Digital control transitioned to released.
    ButtonUp,
    /// Any change on the control, in addition to the typed event.
    StateChanged,
}

impl InputKind {
    pub fn channel(&self) -> Channel {
        match self {
            InputKind::Ascii(_) => Channel::Ascii,
            InputKind::AxisChanged(_) => Channel::AxisChanged,
            InputKind::NormalizedChanged(_) => Channel::NormalizedChanged,
            InputKind::ButtonDown => Channel::ButtonDown,
            InputKind::ButtonUp => Channel::ButtonUp,
            InputKind::StateChanged => Channel::StateChanged,
        }
    }
}

/// The event channels a listener can filter on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Ascii,
    AxisChanged,
    NormalizedChanged,
    ButtonDown,
    ButtonUp,
    DeviceAdded,
    DeviceRemoved,
    StateChanged,
}

/// Physical event captured by the manager.
#[derive(Clone, Debug)]
pub struct InputEvent {
    /// Capture time (monotonic).
    pub at: Instant,
    pub source: InputSource,
}

/// What an [`InputEvent`] is about.
#[derive(Clone, Debug)]
pub enum InputSource {
    Control { control: Arc<Control>, kind: InputKind },
    DeviceAdded(Arc<Device>),
    DeviceRemoved(Arc<Device>),
}

impl InputEvent {
    pub fn control(control: Arc<Control>, kind: InputKind) -> Self {
        Self {
            at: Instant::now(),
            source: InputSource::Control { control, kind },
        }
    }

    pub fn device_added(device: Arc<Device>) -> Self {
        Self {
            at: Instant::now(),
            source: InputSource::DeviceAdded(device),
        }
    }

    pub fn device_removed(device: Arc<Device>) -> Self {
        Self {
            at: Instant::now(),
            source: InputSource::DeviceRemoved(device),
        }
    }

    pub fn channel(&self) -> Channel {
        match &self.source {
            InputSource::Control { kind, .. } => kind.channel(),
            InputSource::DeviceAdded(_) => Channel::DeviceAdded,
            InputSource::DeviceRemoved(_) => Channel::DeviceRemoved,
        }
    }
}

/// Virtual event emitted by the binder.
///
/// `Axis` carries a snapshot of the virtual axis as it was when the event was delivered.
#[derive(Clone, Debug)]
pub enum AxisEvent {
    Axis { axis: VirtualAxis, kind: InputKind },
    DeviceAdded(Arc<Device>),
    DeviceRemoved(Arc<Device>),
}

impl AxisEvent {
    pub fn channel(&self) -> Channel {
        match self {
            AxisEvent::Axis { kind, .. } => kind.channel(),
            AxisEvent::DeviceAdded(_) => Channel::DeviceAdded,
            AxisEvent::DeviceRemoved(_) => Channel::DeviceRemoved,
        }
    }

    /// Name of the axis for axis events.
    pub fn axis_name(&self) -> Option<&str> {
        match self {
            AxisEvent::Axis { axis, .. } => Some(axis.name()),
            _ => None,
        }
    }
}
