use crate::binding::AxisBindings;
use crate::event::{AxisEvent, Channel, InputEvent};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trait for reacting to physical input events from any provider.
pub trait InputListener: Send {
    fn on_input(&mut self, event: &InputEvent);
}

impl<F> InputListener for F
where
    F: FnMut(&InputEvent) + Send,
{
    fn on_input(&mut self, event: &InputEvent) {
        self(event)
    }
}

/// Trait for reacting to virtual-axis events.
///
/// Listeners get mutable access to the binding table so they can rebind from inside a
/// callback; the change applies to the rest of the tick.
pub trait AxisListener: Send {
    fn on_axis_event(&mut self, event: &AxisEvent, bindings: &mut AxisBindings);
}

impl<F> AxisListener for F
where
    F: FnMut(&AxisEvent, &mut AxisBindings) + Send,
{
    fn on_axis_event(&mut self, event: &AxisEvent, bindings: &mut AxisBindings) {
        self(event, bindings)
    }
}

/// Determines which channels a listener wants to receive.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    /// A single channel.
    Only(Channel),
    /// `ButtonDown` and `ButtonUp`.
    ButtonsOnly,
    /// `AxisChanged` and `NormalizedChanged`.
    ValuesOnly,
    /// `DeviceAdded` and `DeviceRemoved`.
    DevicesOnly,
    Custom(fn(Channel) -> bool),
}

impl EventFilter {
    pub fn accepts(&self, channel: Channel) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Only(c) => *c == channel,
            EventFilter::ButtonsOnly => {
                matches!(channel, Channel::ButtonDown | Channel::ButtonUp)
            }
            EventFilter::ValuesOnly => {
                matches!(channel, Channel::AxisChanged | Channel::NormalizedChanged)
            }
            EventFilter::DevicesOnly => {
                matches!(channel, Channel::DeviceAdded | Channel::DeviceRemoved)
            }
            EventFilter::Custom(f) => f(channel),
        }
    }
}

/// Handle returned by `add_listener`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Listener with filter and control flags.
struct ListenerEntry<L: ?Sized> {
    enabled: AtomicBool,
    filter: EventFilter,
    listener: Mutex<Box<L>>,
}

type SharedEntry<L> = Arc<ListenerEntry<L>>;

struct Registrations<L: ?Sized> {
    next_id: u64,
    entries: Vec<(ListenerId, SharedEntry<L>)>,
}

/// Copy of the listener list taken at the start of a dispatch.
pub(crate) struct Targets<L: ?Sized>(Vec<SharedEntry<L>>);

/// Observer list for one listener kind.
///
/// Dispatch works on a snapshot of the list, so listeners may add or remove listeners from
/// inside a callback. A listener that is removed or disabled mid-dispatch receives nothing
/// further, including the rest of the current batch.
pub struct EventBus<L: ?Sized> {
    inner: Mutex<Registrations<L>>,
}

impl<L: ?Sized> Default for EventBus<L> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Registrations {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }
}

impl<L: ?Sized> EventBus<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener with a channel filter.
    pub fn add_listener(&self, listener: Box<L>, filter: EventFilter) -> ListenerId {
        let mut inner = self.inner.lock();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push((
            id,
            Arc::new(ListenerEntry {
                enabled: AtomicBool::new(true),
                filter,
                listener: Mutex::new(listener),
            }),
        ));
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&self, id: ListenerId) {
        if let Some(entry) = self.entry(id) {
            entry.enabled.store(true, Ordering::Release);
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&self, id: ListenerId) {
        if let Some(entry) = self.entry(id) {
            entry.enabled.store(false, Ordering::Release);
        }
    }

    /// Unregisters a listener entirely. Returns `false` if the id was unknown.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        match inner.entries.iter().position(|(eid, _)| *eid == id) {
            Some(pos) => {
                let (_, entry) = inner.entries.remove(pos);
                // An in-flight snapshot may still hold the entry.
                entry.enabled.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filter of a registered listener.
    pub fn filter(&self, id: ListenerId) -> Option<EventFilter> {
        self.entry(id).map(|e| e.filter)
    }

    pub(crate) fn snapshot(&self) -> Targets<L> {
        Targets(
            self.inner
                .lock()
                .entries
                .iter()
                .map(|(_, e)| Arc::clone(e))
                .collect(),
        )
    }

    /// Delivers one event on `channel` to every enabled, matching listener in `targets`.
    pub(crate) fn deliver(&self, targets: &Targets<L>, channel: Channel, mut f: impl FnMut(&mut L)) {
        for entry in &targets.0 {
            if !entry.enabled.load(Ordering::Acquire) || !entry.filter.accepts(channel) {
                continue;
            }
            // A listener re-entering dispatch of itself would deadlock; skip it instead.
            if let Some(mut listener) = entry.listener.try_lock() {
                f(&mut **listener);
            }
        }
    }

    /// Runs `f` against one listener, regardless of its filter.
    pub(crate) fn with_listener(&self, id: ListenerId, f: impl FnOnce(&mut L)) {
        if let Some(entry) = self.entry(id) {
            let mut listener = entry.listener.lock();
            f(&mut **listener);
        }
    }

    fn entry(&self, id: ListenerId) -> Option<SharedEntry<L>> {
        self.inner
            .lock()
            .entries
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, e)| Arc::clone(e))
    }
}

/// Bus for physical events.
pub type InputEventBus = EventBus<dyn InputListener>;

/// Bus for virtual-axis events.
pub type AxisEventBus = EventBus<dyn AxisListener>;
