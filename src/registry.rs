//! Index of known providers, devices and controls.
//!
//! The registry is owned by the [`ProviderManager`](crate::manager::ProviderManager) and is
//! updated from provider device announcements. Callers only ever see it through read-only
//! queries, which hand out shared `Arc` records.

use crate::control::{is_valid_segment, split_fq_name, Control, ControlId, ControlType};
use crate::device::{Device, DeviceDesc};
use crate::error::RegistryError;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

#[derive(Debug)]
struct ProviderEntry {
    name: String,
    devices: BTreeMap<u32, Arc<Device>>,
}

/// Queryable index of all currently known controls.
///
/// Iteration order is provider id, then device id, then control declaration order.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    providers: BTreeMap<u32, ProviderEntry>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register_provider(&mut self, id: u32, name: &str) {
        self.providers.entry(id).or_insert_with(|| ProviderEntry {
            name: name.to_string(),
            devices: BTreeMap::new(),
        });
    }

    pub(crate) fn unregister_provider(&mut self, id: u32) {
        self.providers.remove(&id);
    }

    pub fn has_provider_named(&self, name: &str) -> bool {
        self.providers.values().any(|p| p.name == name)
    }

    /// Inserts or replaces a device. Returns the registered record.
    pub(crate) fn upsert_device(
        &mut self,
        provider: u32,
        desc: &DeviceDesc,
    ) -> Result<Arc<Device>, RegistryError> {
        let entry = self
            .providers
            .get_mut(&provider)
            .ok_or(RegistryError::UnknownProvider(provider))?;

        validate(desc)?;
        if let Some(other) = entry
            .devices
            .values()
            .find(|d| d.name() == desc.name && d.id() != desc.id)
        {
            return Err(RegistryError::DuplicateDeviceName {
                name: desc.name.clone(),
                existing: other.id(),
            });
        }

        let device = Arc::new(Device::from_desc(desc, provider, &entry.name));
        entry.devices.insert(desc.id, Arc::clone(&device));
        Ok(device)
    }

    pub(crate) fn remove_device(&mut self, provider: u32, device: u32) -> Option<Arc<Device>> {
        self.providers.get_mut(&provider)?.devices.remove(&device)
    }

    pub fn provider_ids(&self) -> Vec<u32> {
        self.providers.keys().copied().collect()
    }

    pub fn provider_name(&self, provider: u32) -> Option<&str> {
        self.providers.get(&provider).map(|p| p.name.as_str())
    }

    pub fn device(&self, provider: u32, device: u32) -> Option<Arc<Device>> {
        self.providers.get(&provider)?.devices.get(&device).cloned()
    }

    /// Every registered device.
    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.providers
            .values()
            .flat_map(|p| p.devices.values().cloned())
            .collect()
    }

    pub fn control(&self, id: ControlId) -> Option<Arc<Control>> {
        self.providers
            .get(&id.provider)?
            .devices
            .get(&id.device)?
            .control_by_id(id.control)
            .cloned()
    }

    /// Resolves `provider.device.control` segment by segment (exact, case-sensitive).
    pub fn find_control(&self, fq: &str) -> Option<Arc<Control>> {
        let (provider, device, control) = split_fq_name(fq)?;
        let entry = self.providers.values().find(|p| p.name == provider)?;
        entry
            .devices
            .values()
            .filter(|d| d.name() == device)
            .find_map(|d| d.control_by_name(control).cloned())
    }

    /// FQ names of every control of type `ty`.
    pub fn controls_of_type(&self, ty: ControlType) -> Vec<String> {
        self.providers
            .values()
            .flat_map(|p| p.devices.values())
            .flat_map(|d| d.control_names_of_type(ty).map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    /// FQ names of every control.
    pub fn control_names(&self) -> Vec<String> {
        self.providers
            .values()
            .flat_map(|p| p.devices.values())
            .flat_map(|d| d.controls().iter().map(|c| c.fq_name().to_string()).collect::<Vec<_>>())
            .collect()
    }
}

fn validate(desc: &DeviceDesc) -> Result<(), RegistryError> {
    if !is_valid_segment(&desc.name) {
        return Err(RegistryError::InvalidName(desc.name.clone()));
    }
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for c in &desc.controls {
        if !is_valid_segment(&c.name) {
            return Err(RegistryError::InvalidName(c.name.clone()));
        }
        if !ids.insert(c.id) {
            return Err(RegistryError::DuplicateControl {
                device: desc.name.clone(),
                what: "id",
                value: c.id.to_string(),
            });
        }
        if !names.insert(c.name.as_str()) {
            return Err(RegistryError::DuplicateControl {
                device: desc.name.clone(),
                what: "name",
                value: c.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlDesc;

    fn registry() -> ControlRegistry {
        let mut reg = ControlRegistry::new();
        reg.register_provider(1, "HOST");
        reg.register_provider(2, "PAD");
        reg.upsert_device(
            1,
            &DeviceDesc::new(0, "Keyboard", "The Keyboard device").with_control(ControlDesc::new(
                0,
                "Keyboard Input",
                "Returns keys pressed on keyboard",
                ControlType::Ascii,
            )),
        )
        .unwrap();
        reg.upsert_device(
            1,
            &DeviceDesc::new(1, "Mouse", "The mouse device")
                .with_control(ControlDesc::new(1, "X", "", ControlType::Analog))
                .with_control(ControlDesc::new(2, "Y", "", ControlType::Analog)),
        )
        .unwrap();
        reg.upsert_device(
            2,
            &DeviceDesc::new(0, "Pad0", "")
                .with_control(ControlDesc::new(0, "A", "", ControlType::Digital))
                .with_control(ControlDesc::new(1, "X", "", ControlType::Analog)),
        )
        .unwrap();
        reg
    }

    #[test]
    fn listing_by_type_is_ordered() {
        let reg = registry();
        assert_eq!(
            reg.controls_of_type(ControlType::Analog),
            ["HOST.Mouse.X", "HOST.Mouse.Y", "PAD.Pad0.X"]
        );
        assert_eq!(reg.controls_of_type(ControlType::Ascii), ["HOST.Keyboard.Keyboard Input"]);
        assert!(reg.controls_of_type(ControlType::Group).is_empty());
        assert_eq!(reg.control_names().len(), 5);
    }

    #[test]
    fn find_by_fq_name() {
        let reg = registry();
        let c = reg.find_control("HOST.Mouse.Y").unwrap();
        assert_eq!(c.id(), ControlId { provider: 1, device: 1, control: 2 });
        assert!(reg.find_control("host.Mouse.Y").is_none());
        assert!(reg.find_control("HOST.Mouse").is_none());
        assert!(reg.find_control("HOST.Mouse.Y.Z").is_none());
        assert!(reg.find_control("HOST.Nope.Y").is_none());
        assert_eq!(reg.control(c.id()).as_deref(), Some(&*c));
    }

    #[test]
    fn ids_are_unique_across_registry() {
        let reg = registry();
        let ids: Vec<ControlId> = reg
            .devices()
            .iter()
            .flat_map(|d| d.controls().iter().map(|c| c.id()).collect::<Vec<_>>())
            .collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn upsert_replaces_and_validates() {
        let mut reg = registry();
        let replaced = reg
            .upsert_device(
                2,
                &DeviceDesc::new(0, "Pad0", "")
                    .with_control(ControlDesc::new(0, "A", "", ControlType::Digital)),
            )
            .unwrap();
        assert_eq!(replaced.controls().len(), 1);
        assert!(reg.find_control("PAD.Pad0.X").is_none());

        let dup_name = DeviceDesc::new(5, "Pad0", "");
        assert!(matches!(
            reg.upsert_device(2, &dup_name),
            Err(RegistryError::DuplicateDeviceName { existing: 0, .. })
        ));

        let dotted = DeviceDesc::new(6, "Pad.1", "");
        assert_eq!(
            reg.upsert_device(2, &dotted).unwrap_err(),
            RegistryError::InvalidName("Pad.1".into())
        );

        let dup_ctrl = DeviceDesc::new(7, "Pad7", "")
            .with_control(ControlDesc::new(0, "A", "", ControlType::Digital))
            .with_control(ControlDesc::new(0, "B", "", ControlType::Digital));
        assert!(matches!(
            reg.upsert_device(2, &dup_ctrl),
            Err(RegistryError::DuplicateControl { what: "id", .. })
        ));

        assert_eq!(
            reg.upsert_device(9, &DeviceDesc::new(0, "X", "")).unwrap_err(),
            RegistryError::UnknownProvider(9)
        );
    }

    #[test]
    fn remove_device_drops_controls() {
        let mut reg = registry();
        let gone = reg.remove_device(1, 1).unwrap();
        assert_eq!(gone.name(), "Mouse");
        assert!(reg.find_control("HOST.Mouse.X").is_none());
        assert!(reg.remove_device(1, 1).is_none());
        assert!(reg.device(1, 0).is_some());
    }
}
