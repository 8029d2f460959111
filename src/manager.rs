//! Provider ownership, per-tick polling and the merged physical event stream.
//!
//! The [`ProviderManager`] is built from an explicit list of [`ProviderFactory`] entries and
//! is meant to be shared (`Arc`) between the tick loop and whatever notices hardware
//! changes. [`scan_providers`](ProviderManager::scan_providers) and
//! [`update_input`](ProviderManager::update_input) serialize on one lock over the provider
//! set, so discovery never interleaves with polling.
//!
//! A scan delivers its device announcements to physical listeners right away and also
//! queues them. The next `update_input` returns the queued announcements ahead of the
//! tick's own events, so a binder polling from another context still re-projects them.
//!
//! ## Fault isolation
//! Every call into a provider is guarded. A provider that returns an error or panics is
//! logged, its control events for that call are discarded, and it is treated as disabled
//! for the tick. Device arrivals and removals it reported before failing are still applied,
//! since providers report each hot-plug transition once. Other providers are unaffected;
//! nothing propagates to the caller.
//!
//! ## Listener semantics
//! Events are dispatched after the provider lock is released, from a snapshot of the
//! listener list taken under the lock. Listeners may therefore query the manager and add
//! or remove listeners from inside a callback. A listener whose filter accepts
//! `DeviceAdded` is replayed one synthetic `DeviceAdded` per existing device when it
//! subscribes.

use crate::control::{is_valid_segment, Control, ControlId, ControlType};
use crate::device::Device;
use crate::error::ProviderError;
use crate::event::{Channel, InputEvent};
use crate::eventbus::{EventFilter, InputEventBus, InputListener, ListenerId, Targets};
use crate::provider::{Provider, ProviderEvent, ProviderEvents, ProviderFactory};
use crate::registry::ControlRegistry;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct ProviderSlot {
    id: u32,
    kind: String,
    provider: Box<dyn Provider>,
    faulted: bool,
}

struct ProviderSet {
    slots: Vec<ProviderSlot>,
    registry: ControlRegistry,
    next_id: u32,
    /// Scan announcements not yet returned by `update_input`.
    scanned: Vec<InputEvent>,
}

/// Result of [`ProviderManager::scan_providers`].
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Ids of providers registered by this scan.
    pub registered: Vec<u32>,
    /// Device announcements made by the new providers' `begin_callbacks`.
    pub events: Vec<InputEvent>,
}

pub struct ProviderManager {
    factories: Vec<ProviderFactory>,
    set: Mutex<ProviderSet>,
    bus: InputEventBus,
}

impl ProviderManager {
    /// Creates a manager without scanning. Call [`scan_providers`](Self::scan_providers)
    /// to instantiate providers.
    pub fn new(factories: Vec<ProviderFactory>) -> Self {
        Self {
            factories,
            set: Mutex::new(ProviderSet {
                slots: Vec::new(),
                registry: ControlRegistry::new(),
                next_id: 1,
                scanned: Vec::new(),
            }),
            bus: InputEventBus::new(),
        }
    }

    /// Creates a manager and runs the first scan.
    ///
    /// The first scan's announcements are not queued: nothing can have subscribed yet, and
    /// later subscribers get them through replay.
    pub fn discover(factories: Vec<ProviderFactory>) -> Arc<Self> {
        let mgr = Arc::new(Self::new(factories));
        let report = mgr.scan_providers();
        mgr.take_scan_events();
        info!(providers = report.registered.len(), "input providers discovered");
        mgr
    }

    /// Instantiates every provider kind not yet instantiated and registers the enabled ones.
    ///
    /// Disabled providers and providers that fail to construct are dropped and retried on
    /// the next scan. A provider whose name is already taken or is not a valid name segment
    /// is refused. Idempotent once every kind is registered.
    pub fn scan_providers(&self) -> ScanReport {
        let (report, targets) = {
            let mut set = self.set.lock();
            let mut report = ScanReport::default();

            for factory in &self.factories {
                if set.slots.iter().any(|s| s.kind == factory.kind()) {
                    continue;
                }

                let mut provider = match guarded(|| factory.build()) {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(kind = factory.kind(), "provider fault during scan: {e}");
                        continue;
                    }
                };

                match guarded(|| Ok(provider.is_enabled())) {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!(kind = factory.kind(), "provider not enabled; skipped");
                        continue;
                    }
                    Err(e) => {
                        warn!(kind = factory.kind(), "provider fault during scan: {e}");
                        continue;
                    }
                }

                let name = provider.name().to_string();
                if !is_valid_segment(&name) {
                    warn!(kind = factory.kind(), name = %name, "invalid provider name; skipped");
                    continue;
                }
                if set.registry.has_provider_named(&name) {
                    warn!(kind = factory.kind(), name = %name, "provider name already registered; skipped");
                    continue;
                }

                let id = set.next_id;
                set.next_id += 1;
                set.registry.register_provider(id, &name);

                let mut buf = ProviderEvents::new();
                if let Err(e) = guarded(|| provider.begin_callbacks(&mut buf)) {
                    warn!(provider = %name, "provider fault in begin_callbacks: {e}");
                    set.registry.unregister_provider(id);
                    continue;
                }

                info!(provider = %name, id, "input provider registered");
                report.events.extend(set.apply(id, buf.drain().collect()));
                report.registered.push(id);
                set.slots.push(ProviderSlot {
                    id,
                    kind: factory.kind().to_string(),
                    provider,
                    faulted: false,
                });
            }

            set.scanned.extend(report.events.iter().cloned());
            (report, self.bus.snapshot())
        };

        self.dispatch(&targets, &report.events);
        report
    }

    /// Takes the scan announcements queued since the last `update_input`.
    ///
    /// They have already been delivered to physical listeners.
    pub fn take_scan_events(&self) -> Vec<InputEvent> {
        std::mem::take(&mut self.set.lock().scanned)
    }

    /// Polls every enabled provider once, then dispatches the tick's events.
    ///
    /// Returns queued scan announcements followed by the dispatched events, in order, so a
    /// binder can re-project them. Scan announcements are not dispatched a second time.
    pub fn update_input(&self) -> Vec<InputEvent> {
        let (scanned, events, targets) = {
            let mut set = self.set.lock();
            let scanned = std::mem::take(&mut set.scanned);
            let mut events = Vec::new();
            let mut buf = ProviderEvents::new();

            for i in 0..set.slots.len() {
                let slot = &mut set.slots[i];
                slot.faulted = false;
                buf.clear();

                let polled = guarded(|| {
                    if slot.provider.is_enabled() {
                        slot.provider.update_input(&mut buf).map(|_| true)
                    } else {
                        Ok(false)
                    }
                });
                match polled {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        warn!(provider = slot.provider_name(), "provider fault during poll: {e}");
                        slot.faulted = true;
                        let id = slot.id;
                        let lifecycle: Vec<ProviderEvent> = buf
                            .drain()
                            .filter(|e| !matches!(e, ProviderEvent::Control { .. }))
                            .collect();
                        events.extend(set.apply(id, lifecycle));
                        continue;
                    }
                }

                let id = slot.id;
                let raw: Vec<ProviderEvent> = buf.drain().collect();
                events.extend(set.apply(id, raw));
            }

            (scanned, events, self.bus.snapshot())
        };

        self.dispatch(&targets, &events);
        let mut all = scanned;
        all.extend(events);
        all
    }

    /// Drops every provider, reporting each registered device as removed.
    pub fn shutdown(&self) -> Vec<InputEvent> {
        let (events, targets) = {
            let mut set = self.set.lock();
            let mut events = Vec::new();
            for slot in std::mem::take(&mut set.slots) {
                for device in set.registry.devices().into_iter().filter(|d| d.provider_id() == slot.id) {
                    set.registry.remove_device(slot.id, device.id());
                    events.push(InputEvent::device_removed(device));
                }
                set.registry.unregister_provider(slot.id);
                debug!(provider = slot.provider_name(), "input provider dropped");
            }
            (events, self.bus.snapshot())
        };
        self.dispatch(&targets, &events);
        events
    }

    /// Registers a physical-event listener.
    ///
    /// If `filter` accepts `DeviceAdded`, the listener immediately receives one synthetic
    /// `DeviceAdded` per device that already exists.
    pub fn add_listener(&self, listener: impl InputListener + 'static, filter: EventFilter) -> ListenerId {
        let (id, existing) = {
            let set = self.set.lock();
            let id = self.bus.add_listener(Box::new(listener), filter);
            (id, set.registry.devices())
        };
        if filter.accepts(Channel::DeviceAdded) && !existing.is_empty() {
            self.bus.with_listener(id, |l| {
                for device in existing {
                    l.on_input(&InputEvent::device_added(device));
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

    pub fn control_by_fq_name(&self, fq: &str) -> Option<Arc<Control>> {
        self.set.lock().registry.find_control(fq)
    }

    pub fn control(&self, id: ControlId) -> Option<Arc<Control>> {
        self.set.lock().registry.control(id)
    }

    pub fn control_names_of_type(&self, ty: ControlType) -> Vec<String> {
        self.set.lock().registry.controls_of_type(ty)
    }

    pub fn all_control_names(&self) -> Vec<String> {
        self.set.lock().registry.control_names()
    }

    pub fn device_by_id(&self, provider: u32, device: u32) -> Option<Arc<Device>> {
        self.set.lock().registry.device(provider, device)
    }

    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.set.lock().registry.devices()
    }

    pub fn provider_ids(&self) -> Vec<u32> {
        self.set.lock().registry.provider_ids()
    }

    pub fn provider_name(&self, id: u32) -> Option<String> {
        self.set.lock().registry.provider_name(id).map(str::to_string)
    }

    /// Providers whose last poll faulted.
    pub fn faulted_providers(&self) -> Vec<u32> {
        self.set.lock().slots.iter().filter(|s| s.faulted).map(|s| s.id).collect()
    }

    /// Read access to the registry while holding the provider lock.
    pub fn with_registry<R>(&self, f: impl FnOnce(&ControlRegistry) -> R) -> R {
        f(&self.set.lock().registry)
    }

    fn dispatch(&self, targets: &Targets<dyn InputListener>, events: &[InputEvent]) {
        for event in events {
            #[cfg(feature = "debug-log")]
            tracing::trace!(?event, "dispatch");
            self.bus.deliver(targets, event.channel(), |l| l.on_input(event));
        }
    }
}

impl ProviderSet {
    /// Applies provider-local events to the registry and resolves them to [`InputEvent`]s.
    fn apply(&mut self, provider: u32, raw: Vec<ProviderEvent>) -> Vec<InputEvent> {
        let mut out = Vec::with_capacity(raw.len());
        for event in raw {
            match event {
                ProviderEvent::Control { device, control, kind } => {
                    let id = ControlId { provider, device, control };
                    match self.registry.control(id) {
                        Some(c) => out.push(InputEvent::control(c, kind)),
                        None => debug!(%id, "event for unknown control dropped"),
                    }
                }
                ProviderEvent::DeviceAdded(desc) => match self.registry.upsert_device(provider, &desc) {
                    Ok(device) => out.push(InputEvent::device_added(device)),
                    Err(e) => warn!(provider, device = %desc.name, "device announcement rejected: {e}"),
                },
                ProviderEvent::DeviceRemoved(device) => match self.registry.remove_device(provider, device) {
                    Some(device) => out.push(InputEvent::device_removed(device)),
                    None => debug!(provider, device, "removal of unknown device ignored"),
                },
            }
        }
        out
    }
}

impl ProviderSlot {
    fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

/// Runs a provider call, turning a panic into [`ProviderError::Panicked`].
fn guarded<T>(f: impl FnOnce() -> Result<T, ProviderError>) -> Result<T, ProviderError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ProviderError::Panicked(msg))
        }
    }
}
