use crate::control::{Control, ControlDesc, ControlType, FQ_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Provider-side description of a device and its controls.
///
/// Providers announce devices with this type; announcing the same `id` again replaces the
/// control set (e.g. a joystick that gained axes after a reconnect).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDesc {
    /// Unique within the provider. Not stable across runs.
    pub id: u32,
    /// Unique within the provider; must not contain `.`.
    pub name: String,
    pub description: String,
    pub controls: Vec<ControlDesc>,
}

impl DeviceDesc {
    pub fn new(id: u32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            controls: Vec::new(),
        }
    }

    /// Builder-style control append.
    pub fn with_control(mut self, control: ControlDesc) -> Self {
        self.controls.push(control);
        self
    }
}

/// A registered device: a named, provider-scoped group of controls.
#[derive(Debug)]
pub struct Device {
    provider: u32,
    id: u32,
    name: String,
    description: String,
    fq_name: String,
    controls: Vec<Arc<Control>>,
}

impl Device {
    pub(crate) fn from_desc(desc: &DeviceDesc, provider_id: u32, provider_name: &str) -> Self {
        let controls = desc
            .controls
            .iter()
            .map(|c| Arc::new(Control::from_desc(c, provider_id, provider_name, desc.id, &desc.name)))
            .collect();

        let mut fq_name = String::with_capacity(provider_name.len() + desc.name.len() + 1);
        fq_name.push_str(provider_name);
        fq_name.push(FQ_SEPARATOR);
        fq_name.push_str(&desc.name);

        Self {
            provider: provider_id,
            id: desc.id,
            name: desc.name.clone(),
            description: desc.description.clone(),
            fq_name,
            controls,
        }
    }

    #[inline]
    pub fn provider_id(&self) -> u32 {
        self.provider
    }

    #[inline]
    pub fn id(&self) -> u32 {
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

    /// `provider.device`
    #[inline]
    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    /// Controls in declaration order.
    #[inline]
    pub fn controls(&self) -> &[Arc<Control>] {
        &self.controls
    }

    pub fn control_by_id(&self, control: u32) -> Option<&Arc<Control>> {
        self.controls.iter().find(|c| c.id().control == control)
    }

    pub fn control_by_name(&self, name: &str) -> Option<&Arc<Control>> {
        self.controls.iter().find(|c| c.name() == name)
    }

    /// FQ names of controls of the given type, in declaration order.
    pub fn control_names_of_type(&self, ty: ControlType) -> impl Iterator<Item = &str> {
        self.controls
            .iter()
            .filter(move |c| c.control_type() == ty)
            .map(|c| c.fq_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad() -> DeviceDesc {
        DeviceDesc::new(4, "Joy4", "Unity Joystick4")
            .with_control(ControlDesc::new(10, "Horizontal", "", ControlType::Normalized))
            .with_control(ControlDesc::new(11, "Vertical", "", ControlType::Normalized))
            .with_control(ControlDesc::new(12, "Fire1", "", ControlType::Digital))
    }

    #[test]
    fn registered_device_qualifies_controls() {
        let dev = Device::from_desc(&pad(), 2, "HOST");
        assert_eq!(dev.fq_name(), "HOST.Joy4");
        assert_eq!(dev.controls().len(), 3);
        assert_eq!(dev.controls()[0].fq_name(), "HOST.Joy4.Horizontal");
        assert_eq!(dev.controls()[2].id().provider, 2);
        assert_eq!(dev.controls()[2].id().device, 4);
    }

    #[test]
    fn lookup_by_id_and_name() {
        let dev = Device::from_desc(&pad(), 1, "HOST");
        assert_eq!(dev.control_by_id(11).map(|c| c.name()), Some("Vertical"));
        assert!(dev.control_by_id(99).is_none());
        assert_eq!(dev.control_by_name("Fire1").map(|c| c.id().control), Some(12));
    }

    #[test]
    fn names_of_type_preserve_order() {
        let dev = Device::from_desc(&pad(), 1, "HOST");
        let names: Vec<_> = dev.control_names_of_type(ControlType::Normalized).collect();
        assert_eq!(names, ["HOST.Joy4.Horizontal", "HOST.Joy4.Vertical"]);
    }
}
