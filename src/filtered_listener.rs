use crate::binding::AxisBindings;
use crate::event::{AxisEvent, InputEvent};
use crate::eventbus::{AxisListener, InputListener};

/// Wraps a listener and forwards only events accepted by a predicate.
///
/// Use this where a channel [`EventFilter`](crate::eventbus::EventFilter) is too coarse,
/// e.g. to follow a single device or a single axis.
pub struct FilteredListener<E: ?Sized, L: ?Sized> {
    predicate: Box<dyn Fn(&E) -> bool + Send + Sync>,
    inner: Box<L>,
}

impl<E: ?Sized, L: ?Sized> FilteredListener<E, L> {
    pub fn new(predicate: impl Fn(&E) -> bool + Send + Sync + 'static, inner: Box<L>) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner,
        }
    }
}

impl InputListener for FilteredListener<InputEvent, dyn InputListener> {
    fn on_input(&mut self, event: &InputEvent) {
        if (self.predicate)(event) {
            self.inner.on_input(event);
        }
    }
}

impl AxisListener for FilteredListener<AxisEvent, dyn AxisListener> {
    fn on_axis_event(&mut self, event: &AxisEvent, bindings: &mut AxisBindings) {
        if (self.predicate)(event) {
            self.inner.on_axis_event(event, bindings);
        }
    }
}
