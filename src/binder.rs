//! Virtual-axis binder.
//!
//! [`VirtualAxisBinder`] owns the binding table, re-projects physical events onto the
//! virtual axes bound to their control, and persists the table through a
//! [`BindingStore`].
//!
//! ```no_run
//! use plugaxes::backends::host::{HostFeed, HostInputProvider, HostLayout};
//! use plugaxes::{BindingStore, EventFilter, ProviderManager, VirtualAxisBinder, AxisEvent};
//!
//! let feed = HostFeed::new();
//! let manager = ProviderManager::discover(vec![HostInputProvider::factory(HostLayout::default(), feed.clone())]);
//! let mut binder = VirtualAxisBinder::open(manager, BindingStore::new("virtual_axes.json"));
//!
//! binder.add_listener(
//!     |e: &AxisEvent, _: &mut plugaxes::AxisBindings| println!("{:?} {:?}", e.axis_name(), e.channel()),
//!     EventFilter::ButtonsOnly,
//! );
//!
//! feed.set_button("Jump", true);
//! binder.update_input();
//! ```

use crate::binding::{AxisBindings, AxisId, VirtualAxis};
use crate::control::{Control, ControlType};
use crate::error::{BindError, StoreError};
use crate::event::{AxisEvent, Channel, InputEvent, InputSource};
use crate::eventbus::{AxisEventBus, AxisListener, EventFilter, ListenerId};
use crate::manager::{ProviderManager, ScanReport};
use crate::store::{BindingStore, LoadSource};
use std::sync::Arc;
use tracing::{debug, info};

pub struct VirtualAxisBinder {
    manager: Arc<ProviderManager>,
    store: BindingStore,
    bindings: AxisBindings,
    bus: AxisEventBus,
}

impl VirtualAxisBinder {
    /// Loads the stored table and binds every stored control that currently resolves.
    ///
    /// Scan announcements queued on the manager before this point are dropped; the load
    /// already resolves against every registered device.
    pub fn open(manager: Arc<ProviderManager>, store: BindingStore) -> Self {
        manager.take_scan_events();
        let mut binder = Self {
            manager,
            store,
            bindings: AxisBindings::new(),
            bus: AxisEventBus::new(),
        };
        binder.reload();
        binder
    }

    /// Discards the live table and re-runs the load/resolve sequence.
    pub fn reload(&mut self) -> LoadSource {
        let (doc, source) = self.store.load();
        let mut bindings = AxisBindings::from_document(&doc);
        let manager = &self.manager;
        let live = bindings.resolve_stored(|fq| manager.control_by_fq_name(fq));
        info!(?source, axes = bindings.len(), live, "virtual axis table loaded");
        self.bindings = bindings;
        source
    }

    /// Writes the table through the store.
    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.bindings.to_document())?;
        debug!(path = %self.store.path().display(), "virtual axis table saved");
        Ok(())
    }

    pub fn manager(&self) -> &Arc<ProviderManager> {
        &self.manager
    }

    pub fn store(&self) -> &BindingStore {
        &self.store
    }

    pub fn bindings(&self) -> &AxisBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut AxisBindings {
        &mut self.bindings
    }

    // --- table edits -----------------------------------------------------

    /// See [`AxisBindings::map_virtual_axis`].
    pub fn map_virtual_axis(&mut self, axis: AxisId, control: Option<&Control>) -> Result<(), BindError> {
        self.bindings.map_virtual_axis(axis, control)
    }

    /// Binds by FQ name, or unbinds with `None`.
    pub fn map_virtual_axis_by_name(&mut self, axis: AxisId, fq: Option<&str>) -> Result<(), BindError> {
        match fq {
            None => self.bindings.map_virtual_axis(axis, None),
            Some(fq) => {
                let control = self
                    .manager
                    .control_by_fq_name(fq)
                    .ok_or_else(|| BindError::ControlNotFound(fq.to_string()))?;
                self.bindings.map_virtual_axis(axis, Some(&control))
            }
        }
    }

    pub fn add_axis(&mut self) -> AxisId {
        self.bindings.add_axis()
    }

    pub fn add_axis_named(&mut self, name: &str, control_type: ControlType) -> Result<AxisId, BindError> {
        self.bindings.add_axis_named(name, control_type)
    }

    pub fn rename_axis(&mut self, axis: AxisId, name: &str) -> Result<(), BindError> {
        self.bindings.rename_axis(axis, name)
    }

    pub fn remove_virtual_axis(&mut self, axis: AxisId) -> Option<VirtualAxis> {
        self.bindings.remove_virtual_axis(axis)
    }

    // --- queries ---------------------------------------------------------

    pub fn virtual_axis(&self, name: &str) -> Option<&VirtualAxis> {
        self.bindings.virtual_axis(name)
    }

    pub fn axis(&self, axis: AxisId) -> Option<&VirtualAxis> {
        self.bindings.axis(axis)
    }

    pub fn axes(&self) -> &[VirtualAxis] {
        self.bindings.axes()
    }

    /// The live control behind an axis, if it is currently registered.
    pub fn bound_control(&self, axis: AxisId) -> Option<Arc<Control>> {
        let key = self.bindings.bound_key(axis)?;
        self.manager
            .device_by_id(key.provider, key.device)?
            .control_by_name(&key.name)
            .cloned()
    }

    pub fn axes_bound_to(&self, control: &Control) -> Vec<AxisId> {
        self.bindings.axes_bound_to(control)
    }

    // --- tick ------------------------------------------------------------

    /// Polls the providers and re-projects this tick's events, preceded by the device
    /// announcements of any scan run on the manager since the last tick.
    pub fn update_input(&mut self) -> Vec<AxisEvent> {
        let events = self.manager.update_input();
        self.dispatch(&events)
    }

    /// Runs a provider scan and forwards the resulting device announcements.
    pub fn scan_providers(&mut self) -> ScanReport {
        let report = self.manager.scan_providers();
        let queued = self.manager.take_scan_events();
        self.dispatch(&queued);
        report
    }

    /// Re-projects physical events onto virtual axes and delivers them.
    ///
    /// A control event fans out to every axis bound to its control at the moment the event
    /// is reached. Device events pass through; a device that appears re-binds stored names
    /// that now resolve, and one that disappears detaches its live bindings.
    pub fn dispatch(&mut self, events: &[InputEvent]) -> Vec<AxisEvent> {
        let targets = self.bus.snapshot();
        let mut emitted = Vec::new();

        for event in events {
            match &event.source {
                InputSource::Control { control, kind } => {
                    for id in self.bindings.axes_bound_to_key(&control.key()) {
                        // Removed by an earlier listener this tick.
                        let Some(axis) = self.bindings.axis(id).cloned() else {
                            continue;
                        };
                        let out = AxisEvent::Axis { axis, kind: *kind };
                        #[cfg(feature = "debug-log")]
                        tracing::trace!(event = ?out, "axis dispatch");
                        let bindings = &mut self.bindings;
                        self.bus
                            .deliver(&targets, out.channel(), |l| l.on_axis_event(&out, bindings));
                        emitted.push(out);
                    }
                }
                InputSource::DeviceAdded(device) => {
                    let manager = &self.manager;
                    let bound = self.bindings.resolve_stored(|fq| manager.control_by_fq_name(fq));
                    if bound > 0 {
                        info!(device = device.fq_name(), bound, "stored bindings restored");
                    }
                    let out = AxisEvent::DeviceAdded(Arc::clone(device));
                    let bindings = &mut self.bindings;
                    self.bus
                        .deliver(&targets, Channel::DeviceAdded, |l| l.on_axis_event(&out, bindings));
                    emitted.push(out);
                }
                InputSource::DeviceRemoved(device) => {
                    self.bindings.detach_device(device);
                    let out = AxisEvent::DeviceRemoved(Arc::clone(device));
                    let bindings = &mut self.bindings;
                    self.bus
                        .deliver(&targets, Channel::DeviceRemoved, |l| l.on_axis_event(&out, bindings));
                    emitted.push(out);
                }
            }
        }
        emitted
    }

    // --- listeners -------------------------------------------------------

    /// Registers a virtual-axis listener. A filter that accepts `DeviceAdded` gets one
    /// synthetic `DeviceAdded` per existing device first.
    pub fn add_listener(&mut self, listener: impl AxisListener + 'static, filter: EventFilter) -> ListenerId {
        // Existing listeners see pending scan announcements before the new one is replayed.
        let queued = self.manager.take_scan_events();
        if !queued.is_empty() {
            self.dispatch(&queued);
        }
        let id = self.bus.add_listener(Box::new(listener), filter);
        if filter.accepts(Channel::DeviceAdded) {
            let existing = self.manager.devices();
            let bindings = &mut self.bindings;
            self.bus.with_listener(id, |l| {
                for device in existing {
                    l.on_axis_event(&AxisEvent::DeviceAdded(device), bindings);
                }
            });
        }
        id
    }

    pub fn enable_listener(&self, id: ListenerId) {
        self.bus.enable(id);
    }

    pub fn disable_listener(&self, id: ListenerId) {
        self.bus.disable(id);
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.bus.remove_listener(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::scripted::{ScriptedHandle, ScriptedProvider};
    use crate::control::ControlDesc;
    use crate::device::DeviceDesc;
    use crate::event::InputKind;
    use parking_lot::Mutex;
    use tempfile::tempdir;

    fn buttons(id: u32) -> DeviceDesc {
        DeviceDesc::new(id, "ButtonDevice0", "")
            .with_control(ControlDesc::new(0, "Jump", "", ControlType::Digital))
            .with_control(ControlDesc::new(1, "Fire1", "", ControlType::Digital))
    }

    fn setup(dir: &std::path::Path) -> (VirtualAxisBinder, ScriptedHandle) {
        let handle = ScriptedHandle::new("UNITY");
        handle.connect(buttons(3));
        let manager = ProviderManager::discover(vec![ScriptedProvider::factory(&handle)]);
        let store = BindingStore::new(dir.join("axes.json")).with_default_document(None);
        (VirtualAxisBinder::open(manager, store), handle)
    }

    fn recorder(binder: &mut VirtualAxisBinder, filter: EventFilter) -> Arc<Mutex<Vec<(String, Channel)>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        binder.add_listener(
            move |e: &AxisEvent, _: &mut AxisBindings| {
                let name = match e {
                    AxisEvent::Axis { axis, .. } => axis.name().to_string(),
                    AxisEvent::DeviceAdded(d) | AxisEvent::DeviceRemoved(d) => d.name().to_string(),
                };
                sink.lock().push((name, e.channel()));
            },
            filter,
        );
        log
    }

    #[test]
    fn by_name_binding_reports_misses() {
        let dir = tempdir().unwrap();
        let (mut binder, _h) = setup(dir.path());
        let jump = binder.add_axis_named("Jump", ControlType::Digital).unwrap();

        assert_eq!(
            binder.map_virtual_axis_by_name(jump, Some("UNITY.ButtonDevice0.Nope")),
            Err(BindError::ControlNotFound("UNITY.ButtonDevice0.Nope".into()))
        );
        binder.map_virtual_axis_by_name(jump, Some("UNITY.ButtonDevice0.Jump")).unwrap();
        assert_eq!(binder.bound_control(jump).unwrap().fq_name(), "UNITY.ButtonDevice0.Jump");

        binder.map_virtual_axis_by_name(jump, None).unwrap();
        assert!(binder.bound_control(jump).is_none());
    }

    #[test]
    fn listener_can_rebind_mid_tick() {
        let dir = tempdir().unwrap();
        let (mut binder, handle) = setup(dir.path());
        let jump = binder.add_axis_named("Jump", ControlType::Digital).unwrap();
        binder.map_virtual_axis_by_name(jump, Some("UNITY.ButtonDevice0.Jump")).unwrap();
        let fire = binder.manager().control_by_fq_name("UNITY.ButtonDevice0.Fire1").unwrap();

        binder.add_listener(
            move |e: &AxisEvent, table: &mut AxisBindings| {
                if let AxisEvent::Axis { axis, kind: InputKind::ButtonDown } = e {
                    table.map_virtual_axis(axis.id(), Some(&fire)).unwrap();
                }
            },
            EventFilter::ButtonsOnly,
        );
        let log = recorder(&mut binder, EventFilter::ButtonsOnly);

        handle.press(3, 0, true);
        handle.press(3, 0, false);
        handle.press(3, 1, true);
        binder.update_input();

        // The release of the old control already misses the rebound axis.
        assert_eq!(
            *log.lock(),
            [("Jump".to_string(), Channel::ButtonDown), ("Jump".to_string(), Channel::ButtonDown)]
        );
        assert_eq!(binder.axis(jump).unwrap().bound_control(), Some("UNITY.ButtonDevice0.Fire1"));
    }

    #[test]
    fn device_events_pass_through_and_replay() {
        let dir = tempdir().unwrap();
        let (mut binder, handle) = setup(dir.path());
        let log = recorder(&mut binder, EventFilter::DevicesOnly);
        assert_eq!(*log.lock(), [("ButtonDevice0".to_string(), Channel::DeviceAdded)]);

        handle.disconnect(3);
        binder.update_input();
        assert_eq!(log.lock()[1], ("ButtonDevice0".to_string(), Channel::DeviceRemoved));
    }

    #[test]
    fn shutdown_events_reach_axis_listeners() {
        let dir = tempdir().unwrap();
        let (mut binder, _h) = setup(dir.path());
        let jump = binder.add_axis_named("Jump", ControlType::Digital).unwrap();
        binder.map_virtual_axis_by_name(jump, Some("UNITY.ButtonDevice0.Jump")).unwrap();
        let log = recorder(&mut binder, EventFilter::Only(Channel::DeviceRemoved));

        let removed = binder.manager().shutdown();
        binder.dispatch(&removed);

        assert_eq!(*log.lock(), [("ButtonDevice0".to_string(), Channel::DeviceRemoved)]);
        assert!(!binder.bindings().is_live(jump));
        assert_eq!(binder.axis(jump).unwrap().bound_control(), Some("UNITY.ButtonDevice0.Jump"));
    }

    #[test]
    fn replugged_device_restores_binding() {
        let dir = tempdir().unwrap();
        let (mut binder, handle) = setup(dir.path());
        let jump = binder.add_axis_named("Jump", ControlType::Digital).unwrap();
        binder.map_virtual_axis_by_name(jump, Some("UNITY.ButtonDevice0.Jump")).unwrap();

        handle.disconnect(3);
        binder.update_input();
        assert!(!binder.bindings().is_live(jump));

        // Same name, new device id.
        handle.connect(buttons(8));
        binder.update_input();
        assert!(binder.bindings().is_live(jump));

        let log = recorder(&mut binder, EventFilter::ButtonsOnly);
        handle.press(8, 0, true);
        binder.update_input();
        assert_eq!(*log.lock(), [("Jump".to_string(), Channel::ButtonDown)]);
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let (mut binder, _h) = setup(dir.path());
        assert!(binder.axes().is_empty());

        let jump = binder.add_axis_named("Jump", ControlType::Digital).unwrap();
        binder.map_virtual_axis_by_name(jump, Some("UNITY.ButtonDevice0.Jump")).unwrap();
        let text = binder.add_axis_named("Text", ControlType::Ascii).unwrap();
        binder.bindings_mut().map_virtual_axis(text, None).unwrap();
        binder.save().unwrap();

        assert_eq!(binder.reload(), LoadSource::File);
        let jump = binder.virtual_axis("Jump").unwrap();
        assert_eq!(jump.bound_control(), Some("UNITY.ButtonDevice0.Jump"));
        assert!(binder.bindings().is_live(jump.id()));
        assert_eq!(binder.virtual_axis("Text").unwrap().bound_control(), None);
    }
}
