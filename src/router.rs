//! Routes virtual-axis events to typed callbacks by axis name.
//!
//! ```
//! use plugaxes::{AxisBindings, AxisRouter, ControlType};
//!
//! let mut table = AxisBindings::new();
//! table.add_axis_named("Jump", ControlType::Digital).unwrap();
//!
//! let mut router = AxisRouter::new();
//! router.sync_axes(&table);
//! router.on_button("Jump", |down| println!("jump {down}"));
//! ```

use crate::binding::AxisBindings;
use crate::control::ControlType;
use crate::event::{AxisEvent, InputKind};
use crate::eventbus::AxisListener;

type Callback<T> = Box<dyn FnMut(T) + Send>;

struct Route<T> {
    axis: String,
    callbacks: Vec<Callback<T>>,
}

impl<T: Copy> Route<T> {
    fn fire(&mut self, value: T) {
        for cb in &mut self.callbacks {
            cb(value);
        }
    }
}

fn route_mut<'a, T>(routes: &'a mut Vec<Route<T>>, axis: &str) -> &'a mut Route<T> {
    match routes.iter().position(|r| r.axis == axis) {
        Some(pos) => &mut routes[pos],
        None => {
            routes.push(Route {
                axis: axis.to_string(),
                callbacks: Vec::new(),
            });
            let last = routes.len() - 1;
            &mut routes[last]
        }
    }
}

/// Listener that dispatches by axis name.
///
/// Digital axes deliver `true` on press and `false` on release, Analog and Normalized
/// deliver the value, Ascii delivers the character.
#[derive(Default)]
pub struct AxisRouter {
    digital: Vec<Route<bool>>,
    analog: Vec<Route<f32>>,
    normalized: Vec<Route<f32>>,
    ascii: Vec<Route<char>>,
}

impl AxisRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_button(&mut self, axis: &str, f: impl FnMut(bool) + Send + 'static) -> &mut Self {
        route_mut(&mut self.digital, axis).callbacks.push(Box::new(f));
        self
    }

    pub fn on_analog(&mut self, axis: &str, f: impl FnMut(f32) + Send + 'static) -> &mut Self {
        route_mut(&mut self.analog, axis).callbacks.push(Box::new(f));
        self
    }

    pub fn on_normalized(&mut self, axis: &str, f: impl FnMut(f32) + Send + 'static) -> &mut Self {
        route_mut(&mut self.normalized, axis).callbacks.push(Box::new(f));
        self
    }

    pub fn on_ascii(&mut self, axis: &str, f: impl FnMut(char) + Send + 'static) -> &mut Self {
        route_mut(&mut self.ascii, axis).callbacks.push(Box::new(f));
        self
    }

    /// Adds an empty route for every declared axis that has none yet. Existing routes and
    /// their callbacks are kept, including routes for axes no longer declared.
    pub fn sync_axes(&mut self, table: &AxisBindings) {
        for axis in table.axes() {
            let name = axis.name();
            match axis.control_type() {
                ControlType::Digital => {
                    route_mut(&mut self.digital, name);
                }
                ControlType::Analog => {
                    route_mut(&mut self.analog, name);
                }
                ControlType::Normalized => {
                    route_mut(&mut self.normalized, name);
                }
                ControlType::Ascii => {
                    route_mut(&mut self.ascii, name);
                }
                ControlType::Group => {}
            }
        }
    }

    /// Axis names with a route of the given type, in route order.
    pub fn routes(&self, ty: ControlType) -> Vec<&str> {
        fn names<T>(routes: &[Route<T>]) -> Vec<&str> {
            routes.iter().map(|r| r.axis.as_str()).collect()
        }
        match ty {
            ControlType::Digital => names(&self.digital),
            ControlType::Analog => names(&self.analog),
            ControlType::Normalized => names(&self.normalized),
            ControlType::Ascii => names(&self.ascii),
            ControlType::Group => Vec::new(),
        }
    }
}

impl AxisListener for AxisRouter {
    fn on_axis_event(&mut self, event: &AxisEvent, _: &mut AxisBindings) {
        let AxisEvent::Axis { axis, kind } = event else {
            return;
        };
        let name = axis.name();
        match *kind {
            InputKind::ButtonDown => fire(&mut self.digital, name, true),
            InputKind::ButtonUp => fire(&mut self.digital, name, false),
            InputKind::AxisChanged(v) => fire(&mut self.analog, name, v),
            InputKind::NormalizedChanged(v) => fire(&mut self.normalized, name, v),
            InputKind::Ascii(c) => fire(&mut self.ascii, name, c),
            InputKind::StateChanged => {}
        }
    }
}

fn fire<T: Copy>(routes: &mut [Route<T>], axis: &str, value: T) {
    for route in routes.iter_mut().filter(|r| r.axis == axis) {
        route.fire(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn table() -> AxisBindings {
        let mut t = AxisBindings::new();
        t.add_axis_named("Jump", ControlType::Digital).unwrap();
        t.add_axis_named("Steer", ControlType::Normalized).unwrap();
        t.add_axis_named("Text", ControlType::Ascii).unwrap();
        t
    }

    fn event(t: &AxisBindings, name: &str, kind: InputKind) -> AxisEvent {
        AxisEvent::Axis {
            axis: t.virtual_axis(name).unwrap().clone(),
            kind,
        }
    }

    #[test]
    fn sync_adds_missing_routes_only() {
        let mut t = table();
        let mut router = AxisRouter::new();
        router.on_button("Jump", |_| {});
        router.sync_axes(&t);
        assert_eq!(router.routes(ControlType::Digital), ["Jump"]);
        assert_eq!(router.routes(ControlType::Normalized), ["Steer"]);

        t.add_axis_named("Fire", ControlType::Digital).unwrap();
        router.sync_axes(&t);
        assert_eq!(router.routes(ControlType::Digital), ["Jump", "Fire"]);
    }

    #[test]
    fn events_reach_typed_callbacks_by_name() {
        let mut t = table();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut router = AxisRouter::new();
        let (a, b, c) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&log));
        router
            .on_button("Jump", move |down| a.lock().push(format!("jump {down}")))
            .on_normalized("Steer", move |v| b.lock().push(format!("steer {v}")))
            .on_ascii("Text", move |ch| c.lock().push(format!("text {ch}")));

        for (name, kind) in [
            ("Jump", InputKind::StateChanged),
            ("Jump", InputKind::ButtonDown),
            ("Jump", InputKind::ButtonUp),
            ("Steer", InputKind::NormalizedChanged(0.25)),
            ("Text", InputKind::Ascii('x')),
        ] {
            let e = event(&t, name, kind);
            router.on_axis_event(&e, &mut t);
        }

        assert_eq!(
            *log.lock(),
            ["jump true", "jump false", "steer 0.25", "text x"]
        );
    }
}
