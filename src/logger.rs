//! Listeners that log every event through `tracing`.

use crate::binding::AxisBindings;
use crate::event::{AxisEvent, InputEvent, InputSource};
use crate::eventbus::{AxisListener, InputListener};
use tracing::debug;

/// Logs physical and virtual events at `debug` level under the given label.
pub struct Logger {
    label: String,
}

impl Logger {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("input")
    }
}

impl InputListener for Logger {
    fn on_input(&mut self, event: &InputEvent) {
        match &event.source {
            InputSource::Control { control, kind } => {
                debug!(label = %self.label, control = control.fq_name(), ?kind, "input")
            }
            InputSource::DeviceAdded(d) => debug!(label = %self.label, device = d.fq_name(), "device added"),
            InputSource::DeviceRemoved(d) => debug!(label = %self.label, device = d.fq_name(), "device removed"),
        }
    }
}

impl AxisListener for Logger {
    fn on_axis_event(&mut self, event: &AxisEvent, _: &mut AxisBindings) {
        match event {
            AxisEvent::Axis { axis, kind } => {
                debug!(label = %self.label, axis = axis.name(), bound = ?axis.bound_control(), ?kind, "axis")
            }
            AxisEvent::DeviceAdded(d) => debug!(label = %self.label, device = d.fq_name(), "device added"),
            AxisEvent::DeviceRemoved(d) => debug!(label = %self.label, device = d.fq_name(), "device removed"),
        }
    }
}
