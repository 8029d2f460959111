use crate::device::DeviceDesc;
use crate::error::ProviderError;
use crate::event::InputKind;
use crate::provider::{Provider, ProviderEvent, ProviderEvents, ProviderFactory};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Script {
    name: String,
    enabled: bool,
    started: bool,
    devices: Vec<DeviceDesc>,
    pending: Vec<ProviderEvent>,
    fail_next: Option<String>,
    panic_next: bool,
}

/// Shareable handle used to drive a [`ScriptedProvider`] from outside the manager.
///
/// Devices connected before the provider starts are announced by `begin_callbacks`;
/// later connects and disconnects are reported on the next poll.
#[derive(Clone)]
pub struct ScriptedHandle {
    script: Arc<Mutex<Script>>,
}

impl ScriptedHandle {
    pub fn new(name: &str) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                name: name.to_string(),
                enabled: true,
                ..Default::default()
            })),
        }
    }

    /// Adds (or replaces, by id) a device.
    pub fn connect(&self, device: DeviceDesc) {
        let mut s = self.script.lock();
        s.devices.retain(|d| d.id != device.id);
        s.devices.push(device.clone());
        if s.started {
            s.pending.push(ProviderEvent::DeviceAdded(device));
        }
    }

    pub fn disconnect(&self, device: u32) {
        let mut s = self.script.lock();
        s.devices.retain(|d| d.id != device);
        if s.started {
            s.pending.push(ProviderEvent::DeviceRemoved(device));
        }
    }

    /// Queues a control event for the next poll.
    pub fn send(&self, device: u32, control: u32, kind: InputKind) {
        self.script
            .lock()
            .pending
            .push(ProviderEvent::Control { device, control, kind });
    }

    /// Queues ButtonDown (or ButtonUp).
    pub fn press(&self, device: u32, control: u32, down: bool) {
        let kind = if down { InputKind::ButtonDown } else { InputKind::ButtonUp };
        self.send(device, control, kind);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.script.lock().enabled = enabled;
    }

    /// The next poll drains its queue and then fails.
    pub fn fail_next_poll(&self, reason: &str) {
        self.script.lock().fail_next = Some(reason.to_string());
    }

    /// The next poll drains its queue and then panics.
    pub fn panic_next_poll(&self) {
        self.script.lock().panic_next = true;
    }
}

/// Provider fed entirely through a [`ScriptedHandle`].
pub struct ScriptedProvider {
    name: String,
    script: Arc<Mutex<Script>>,
}

impl ScriptedProvider {
    pub fn new(handle: &ScriptedHandle) -> Self {
        Self {
            name: handle.script.lock().name.clone(),
            script: Arc::clone(&handle.script),
        }
    }

    /// Factory bound to this handle. Each handle is its own provider kind.
    pub fn factory(handle: &ScriptedHandle) -> ProviderFactory {
        let handle = handle.clone();
        let kind = format!("scripted:{}@{:p}", handle.script.lock().name, Arc::as_ptr(&handle.script));
        ProviderFactory::new(kind, move || Ok(Box::new(ScriptedProvider::new(&handle)) as Box<dyn Provider>))
    }
}

impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.script.lock().enabled
    }

    fn devices(&self) -> Vec<DeviceDesc> {
        self.script.lock().devices.clone()
    }

    fn begin_callbacks(&mut self, out: &mut ProviderEvents) -> Result<(), ProviderError> {
        let mut s = self.script.lock();
        s.started = true;
        for device in &s.devices {
            out.send_device_added(device.clone());
        }
        Ok(())
    }

    fn update_input(&mut self, out: &mut ProviderEvents) -> Result<(), ProviderError> {
        let (fail, panic_now) = {
            let mut s = self.script.lock();
            for event in s.pending.drain(..) {
                out.push(event);
            }
            (s.fail_next.take(), std::mem::take(&mut s.panic_next))
        };
        if panic_now {
            panic!("scripted provider {} panicked", self.name);
        }
        match fail {
            Some(reason) => Err(ProviderError::Poll(reason)),
            None => Ok(()),
        }
    }
}
