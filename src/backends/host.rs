//! Host input provider.
//!
//! Bridges whatever input API the host application polls (an engine's input manager, a
//! windowing library) into the registry. The host writes the current frame into a
//! [`HostFeed`]; [`HostInputProvider`] turns it into device announcements and change events
//! once per tick.
//!
//! # Devices
//! | id | name | controls |
//! |----|------|----------|
//! | 0 | `Keyboard` | `Keyboard Input` (Ascii) |
//! | 1 | `Mouse` | `X`, `Y` (Analog). Absent when the layout disables the mouse |
//! | 2.. | `Touch0`..`Touch{n-1}` | `X`, `Y`, `Touched`, `Pressure` |
//! | next | `TouchCount` | `TouchCount` (Analog) |
//! | next.. | `Joy<n>` / `ButtonDevice<n>` | declared axes, grouped by joystick number |
//!
//! Touch devices exist only when the layout enables touch. Device id 1 stays reserved for
//! the mouse either way.
//!
//! # Change detection
//! Every control remembers its last reported value and only reports changes. Each change
//! is a `StateChanged` followed by the typed event. Joystick axes report raw `[-1, 1]`
//! values mapped to `(raw + 1) / 2`; their initial "last" value is `-1`, so the first poll
//! always reports. The mouse starts at the impossible position `(-1, -1)`.

use crate::control::{ControlDesc, ControlType};
use crate::device::DeviceDesc;
use crate::error::ProviderError;
use crate::provider::{Provider, ProviderEvents, ProviderFactory};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Provider name used when the layout does not set one.
pub const DEFAULT_PROVIDER_NAME: &str = "HOST";

const KEYBOARD_DEVICE: u32 = 0;
const KEYBOARD_CONTROL: u32 = 0;
const MOUSE_DEVICE: u32 = 1;

/// Kind of a declared host axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    /// Analog stick axis, reported as Normalized on `Joy<n>`.
    Joystick,
    /// Key or button, reported as Digital on `ButtonDevice<n>`.
    Button,
}

/// One entry of the host's input axis list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisDecl {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: AxisKind,
    /// Joystick number the axis belongs to.
    #[serde(default)]
    pub joy: u32,
}

impl AxisDecl {
    pub fn new(name: &str, kind: AxisKind, joy: u32) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            kind,
            joy,
        }
    }
}

/// Which host devices exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostLayout {
    pub name: String,
    pub mouse: bool,
    pub touch: bool,
    pub touch_slots: usize,
    pub axes: Vec<AxisDecl>,
}

impl Default for HostLayout {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROVIDER_NAME.to_string(),
            mouse: true,
            touch: false,
            touch_slots: 5,
            axes: vec![
                AxisDecl::new("Horizontal", AxisKind::Joystick, 0),
                AxisDecl::new("Vertical", AxisKind::Joystick, 0),
                AxisDecl::new("Fire1", AxisKind::Button, 0),
                AxisDecl::new("Fire2", AxisKind::Button, 0),
                AxisDecl::new("Fire3", AxisKind::Button, 0),
                AxisDecl::new("Jump", AxisKind::Button, 0),
            ],
        }
    }
}

/// Touch lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

impl TouchPhase {
    fn is_touching(self) -> bool {
        matches!(self, TouchPhase::Began | TouchPhase::Moved | TouchPhase::Stationary)
    }
}

/// One touch as reported by the host for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub finger_id: i32,
    pub position: (f32, f32),
    pub phase: TouchPhase,
    pub pressure: f32,
}

#[derive(Debug, Default)]
struct FeedState {
    typed: Vec<char>,
    mouse: Option<(f32, f32)>,
    axes: HashMap<String, f32>,
    buttons: HashMap<String, bool>,
    touches: Vec<Touch>,
    unplugged: HashSet<u32>,
}

/// Handle the host writes its input state into.
///
/// Axis values, button states and the mouse position persist until changed. Typed text and
/// touches are per frame: they are consumed by the next poll.
#[derive(Clone, Default)]
pub struct HostFeed {
    state: Arc<Mutex<FeedState>>,
}

impl HostFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_text(&self, text: &str) {
        self.state.lock().typed.extend(text.chars());
    }

    pub fn set_mouse(&self, x: f32, y: f32) {
        self.state.lock().mouse = Some((x, y));
    }

    /// Raw joystick axis value in `[-1, 1]`.
    pub fn set_axis(&self, name: &str, raw: f32) {
        self.state.lock().axes.insert(name.to_string(), raw);
    }

    pub fn set_button(&self, name: &str, down: bool) {
        self.state.lock().buttons.insert(name.to_string(), down);
    }

    /// Touches for the next frame, replacing any not yet consumed.
    pub fn set_touches(&self, touches: Vec<Touch>) {
        self.state.lock().touches = touches;
    }

    /// Joysticks start connected.
    pub fn set_joystick_connected(&self, joy: u32, connected: bool) {
        let mut state = self.state.lock();
        if connected {
            state.unplugged.remove(&joy);
        } else {
            state.unplugged.insert(joy);
        }
    }

    fn is_connected(&self, joy: u32) -> bool {
        !self.state.lock().unplugged.contains(&joy)
    }
}

struct TouchSlot {
    desc: DeviceDesc,
    finger: Option<i32>,
    x: Option<f32>,
    y: Option<f32>,
    touched: bool,
    pressure: Option<f32>,
}

struct TouchCounter {
    device: u32,
    control: u32,
    last: usize,
}

enum Tracked {
    Normalized(f32),
    Button(bool),
}

struct AxisControl {
    id: u32,
    name: String,
    last: Tracked,
}

struct AxisDevice {
    desc: DeviceDesc,
    joy: u32,
    kind: AxisKind,
    connected: bool,
    controls: Vec<AxisControl>,
}

impl AxisDevice {
    fn reset(&mut self) {
        for c in &mut self.controls {
            c.last = match c.last {
                Tracked::Normalized(_) => Tracked::Normalized(-1.0),
                Tracked::Button(_) => Tracked::Button(false),
            };
        }
    }
}

/// Provider over the host application's input state.
pub struct HostInputProvider {
    name: String,
    feed: HostFeed,
    keyboard: DeviceDesc,
    mouse: Option<(DeviceDesc, (f32, f32))>,
    touch_slots: Vec<TouchSlot>,
    touch_count: Option<(DeviceDesc, TouchCounter)>,
    axis_devices: Vec<AxisDevice>,
}

impl HostInputProvider {
    pub fn new(layout: &HostLayout, feed: HostFeed) -> Self {
        let mut control_id = KEYBOARD_CONTROL;
        let keyboard = DeviceDesc::new(KEYBOARD_DEVICE, "Keyboard", "The Keyboard device").with_control(
            ControlDesc::new(
                control_id,
                "Keyboard Input",
                "Returns keys pressed on keyboard",
                ControlType::Ascii,
            ),
        );
        control_id += 1;

        let mouse = layout.mouse.then(|| {
            let desc = DeviceDesc::new(MOUSE_DEVICE, "Mouse", "The mouse device")
                .with_control(ControlDesc::new(control_id, "X", "Returns mouse X position", ControlType::Analog))
                .with_control(ControlDesc::new(control_id + 1, "Y", "Returns mouse Y position", ControlType::Analog));
            control_id += 2;
            (desc, (-1.0, -1.0))
        });

        let mut device_id = MOUSE_DEVICE + 1;
        let mut touch_slots = Vec::new();
        let mut touch_count = None;
        if layout.touch {
            for i in 0..layout.touch_slots {
                let desc = DeviceDesc::new(device_id, format!("Touch{i}"), "The touch input device")
                    .with_control(ControlDesc::new(control_id, "X", "Returns touch X position", ControlType::Analog))
                    .with_control(ControlDesc::new(control_id + 1, "Y", "Returns touch Y position", ControlType::Analog))
                    .with_control(ControlDesc::new(control_id + 2, "Touched", "Returns touch state", ControlType::Digital))
                    .with_control(ControlDesc::new(control_id + 3, "Pressure", "Returns touch pressure", ControlType::Analog));
                control_id += 4;
                device_id += 1;
                touch_slots.push(TouchSlot {
                    desc,
                    finger: None,
                    x: None,
                    y: None,
                    touched: false,
                    pressure: None,
                });
            }
            let desc = DeviceDesc::new(device_id, "TouchCount", "Number of touches, reported when it changes")
                .with_control(ControlDesc::new(
                    control_id,
                    "TouchCount",
                    "Returns change in number of touches",
                    ControlType::Analog,
                ));
            touch_count = Some((
                desc,
                TouchCounter {
                    device: device_id,
                    control: control_id,
                    last: 0,
                },
            ));
            control_id += 1;
            device_id += 1;
        }

        let mut axis_devices: Vec<AxisDevice> = Vec::new();
        for decl in &layout.axes {
            let pos = match axis_devices.iter().position(|d| d.joy == decl.joy && d.kind == decl.kind) {
                Some(pos) => pos,
                None => {
                    let desc = match decl.kind {
                        AxisKind::Joystick => DeviceDesc::new(
                            device_id,
                            format!("Joy{}", decl.joy),
                            format!("Host joystick {}", decl.joy),
                        ),
                        AxisKind::Button => DeviceDesc::new(
                            device_id,
                            format!("ButtonDevice{}", decl.joy),
                            format!("Host buttons {}", decl.joy),
                        ),
                    };
                    device_id += 1;
                    axis_devices.push(AxisDevice {
                        desc,
                        joy: decl.joy,
                        kind: decl.kind,
                        connected: decl.kind == AxisKind::Button || feed.is_connected(decl.joy),
                        controls: Vec::new(),
                    });
                    axis_devices.len() - 1
                }
            };

            let dev = &mut axis_devices[pos];
            // Host axes are read by name, so one control serves every declaration of it.
            if dev.controls.iter().any(|c| c.name == decl.name) {
                debug!(axis = %decl.name, device = %dev.desc.name, "repeated axis declaration merged");
                continue;
            }
            let (control_type, last) = match decl.kind {
                AxisKind::Joystick => (ControlType::Normalized, Tracked::Normalized(-1.0)),
                AxisKind::Button => (ControlType::Digital, Tracked::Button(false)),
            };
            dev.desc
                .controls
                .push(ControlDesc::new(control_id, decl.name.clone(), decl.description.clone(), control_type));
            dev.controls.push(AxisControl {
                id: control_id,
                name: decl.name.clone(),
                last,
            });
            control_id += 1;
        }

        let devices = 1 + usize::from(mouse.is_some()) + touch_slots.len() + usize::from(touch_count.is_some()) + axis_devices.len();
        debug!(provider = %layout.name, devices, "host layout built");

        Self {
            name: layout.name.clone(),
            feed,
            keyboard,
            mouse,
            touch_slots,
            touch_count,
            axis_devices,
        }
    }

    /// Factory for the manager. The feed handle stays with the host.
    pub fn factory(layout: HostLayout, feed: HostFeed) -> ProviderFactory {
        ProviderFactory::new("host", move || {
            Ok(Box::new(HostInputProvider::new(&layout, feed.clone())) as Box<dyn Provider>)
        })
    }

    fn poll_touches(&mut self, touches: &[Touch], out: &mut ProviderEvents) {
        for touch in touches {
            let slot = match touch.phase {
                TouchPhase::Began => self.touch_slots.iter_mut().find(|s| s.finger.is_none()),
                _ => self.touch_slots.iter_mut().find(|s| s.finger == Some(touch.finger_id)),
            };
            let Some(slot) = slot else {
                debug!(finger = touch.finger_id, "touch without a slot ignored");
                continue;
            };
            slot.apply(touch, out);
        }

        if let Some((_, counter)) = &mut self.touch_count {
            if touches.len() != counter.last {
                counter.last = touches.len();
                out.send_state_change(counter.device, counter.control);
                out.send_axis(counter.device, counter.control, counter.last as f32);
            }
        }
    }
}

impl TouchSlot {
    fn apply(&mut self, touch: &Touch, out: &mut ProviderEvents) {
        let dev = self.desc.id;
        let [x, y, touched, pressure] = [0usize, 1, 2, 3].map(|i| self.desc.controls[i].id);

        if self.x != Some(touch.position.0) {
            self.x = Some(touch.position.0);
            out.send_state_change(dev, x);
            out.send_axis(dev, x, touch.position.0);
        }
        if self.y != Some(touch.position.1) {
            self.y = Some(touch.position.1);
            out.send_state_change(dev, y);
            out.send_axis(dev, y, touch.position.1);
        }
        if self.touched != touch.phase.is_touching() {
            self.touched = touch.phase.is_touching();
            out.send_state_change(dev, touched);
            out.send_button(dev, touched, self.touched);
        }
        if self.pressure != Some(touch.pressure) {
            self.pressure = Some(touch.pressure);
            out.send_state_change(dev, pressure);
            out.send_axis(dev, pressure, touch.pressure);
        }

        self.finger = self.touched.then_some(touch.finger_id);
    }
}

impl Provider for HostInputProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn devices(&self) -> Vec<DeviceDesc> {
        let mut out = vec![self.keyboard.clone()];
        out.extend(self.mouse.iter().map(|(d, _)| d.clone()));
        out.extend(self.touch_slots.iter().map(|s| s.desc.clone()));
        out.extend(self.touch_count.iter().map(|(d, _)| d.clone()));
        out.extend(self.axis_devices.iter().filter(|d| d.connected).map(|d| d.desc.clone()));
        out
    }

    fn update_input(&mut self, out: &mut ProviderEvents) -> Result<(), ProviderError> {
        let (typed, mouse, axes, buttons, touches, unplugged) = {
            let mut state = self.feed.state.lock();
            (
                std::mem::take(&mut state.typed),
                state.mouse,
                state.axes.clone(),
                state.buttons.clone(),
                std::mem::take(&mut state.touches),
                state.unplugged.clone(),
            )
        };

        for c in typed {
            out.send_state_change(KEYBOARD_DEVICE, KEYBOARD_CONTROL);
            out.send_ascii(KEYBOARD_DEVICE, KEYBOARD_CONTROL, c);
        }

        if let (Some((desc, last)), Some(pos)) = (&mut self.mouse, mouse) {
            let (x, y) = (desc.controls[0].id, desc.controls[1].id);
            if pos.0 != last.0 {
                last.0 = pos.0;
                out.send_state_change(MOUSE_DEVICE, x);
                out.send_axis(MOUSE_DEVICE, x, pos.0);
            }
            if pos.1 != last.1 {
                last.1 = pos.1;
                out.send_state_change(MOUSE_DEVICE, y);
                out.send_axis(MOUSE_DEVICE, y, pos.1);
            }
        }

        if !self.touch_slots.is_empty() {
            self.poll_touches(&touches, out);
        }

        for dev in &mut self.axis_devices {
            if dev.kind == AxisKind::Joystick {
                let connected = !unplugged.contains(&dev.joy);
                if connected != dev.connected {
                    dev.connected = connected;
                    if connected {
                        debug!(device = %dev.desc.name, "joystick connected");
                        out.send_device_added(dev.desc.clone());
                    } else {
                        debug!(device = %dev.desc.name, "joystick disconnected");
                        dev.reset();
                        out.send_device_removed(dev.desc.id);
                    }
                }
                if !dev.connected {
                    continue;
                }
            }

            let device = dev.desc.id;
            for control in &mut dev.controls {
                match &mut control.last {
                    Tracked::Normalized(last) => {
                        let v = (axes.get(&control.name).copied().unwrap_or(0.0) + 1.0) / 2.0;
                        if v != *last {
                            *last = v;
                            out.send_state_change(device, control.id);
                            out.send_normalized(device, control.id, v);
                        }
                    }
                    Tracked::Button(last) => {
                        let down = buttons.get(&control.name).copied().unwrap_or(false);
                        if down != *last {
                            *last = down;
                            out.send_state_change(device, control.id);
                            out.send_button(device, control.id, down);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputKind;
    use crate::provider::ProviderEvent;

    fn poll(p: &mut HostInputProvider) -> Vec<ProviderEvent> {
        let mut out = ProviderEvents::new();
        p.update_input(&mut out).unwrap();
        out.drain().collect()
    }

    fn typed(events: &[ProviderEvent]) -> Vec<InputKind> {
        events
            .iter()
            .filter_map(|e| match e {
                ProviderEvent::Control { kind, .. } if *kind != InputKind::StateChanged => Some(*kind),
                _ => None,
            })
            .collect()
    }

    fn buttons_only() -> HostLayout {
        HostLayout {
            axes: vec![AxisDecl::new("Jump", AxisKind::Button, 0)],
            ..Default::default()
        }
    }

    #[test]
    fn default_layout_devices() {
        let p = HostInputProvider::new(&HostLayout::default(), HostFeed::new());
        let names: Vec<_> = p.devices().into_iter().map(|d| (d.id, d.name)).collect();
        assert_eq!(
            names,
            [
                (0, "Keyboard".to_string()),
                (1, "Mouse".to_string()),
                (2, "Joy0".to_string()),
                (3, "ButtonDevice0".to_string()),
            ]
        );
        assert_eq!(p.name(), DEFAULT_PROVIDER_NAME);
    }

    #[test]
    fn touch_layout_numbers_devices_after_mouse() {
        let layout = HostLayout {
            mouse: false,
            touch: true,
            touch_slots: 2,
            axes: vec![],
            ..Default::default()
        };
        let p = HostInputProvider::new(&layout, HostFeed::new());
        let names: Vec<_> = p.devices().into_iter().map(|d| (d.id, d.name)).collect();
        assert_eq!(
            names,
            [
                (0, "Keyboard".to_string()),
                (2, "Touch0".to_string()),
                (3, "Touch1".to_string()),
                (4, "TouchCount".to_string()),
            ]
        );
    }

    #[test]
    fn keyboard_reports_each_char_with_state_change() {
        let feed = HostFeed::new();
        let mut p = HostInputProvider::new(&buttons_only(), feed.clone());
        feed.type_text("hi");
        let events = poll(&mut p);
        assert_eq!(events.len(), 4);
        assert_eq!(typed(&events), [InputKind::Ascii('h'), InputKind::Ascii('i')]);
        assert!(poll(&mut p).is_empty());
    }

    #[test]
    fn buttons_report_edges_only() {
        let feed = HostFeed::new();
        let mut p = HostInputProvider::new(&buttons_only(), feed.clone());
        assert!(poll(&mut p).is_empty());

        feed.set_button("Jump", true);
        assert_eq!(typed(&poll(&mut p)), [InputKind::ButtonDown]);
        assert!(poll(&mut p).is_empty());

        feed.set_button("Jump", false);
        assert_eq!(typed(&poll(&mut p)), [InputKind::ButtonUp]);
    }

    #[test]
    fn joystick_axes_are_normalized_and_change_detected() {
        let feed = HostFeed::new();
        let layout = HostLayout {
            mouse: false,
            axes: vec![AxisDecl::new("Horizontal", AxisKind::Joystick, 1)],
            ..Default::default()
        };
        let mut p = HostInputProvider::new(&layout, feed.clone());

        assert_eq!(typed(&poll(&mut p)), [InputKind::NormalizedChanged(0.5)]);
        assert!(poll(&mut p).is_empty());

        feed.set_axis("Horizontal", 1.0);
        assert_eq!(typed(&poll(&mut p)), [InputKind::NormalizedChanged(1.0)]);
    }

    #[test]
    fn repeated_declarations_share_one_control() {
        let feed = HostFeed::new();
        let layout = HostLayout {
            mouse: false,
            axes: vec![
                AxisDecl::new("Fire1", AxisKind::Button, 0),
                AxisDecl::new("Jump", AxisKind::Button, 0),
                AxisDecl::new("Fire1", AxisKind::Button, 0),
            ],
            ..Default::default()
        };
        let mut p = HostInputProvider::new(&layout, feed.clone());

        let buttons = p.devices().into_iter().find(|d| d.name == "ButtonDevice0").unwrap();
        let names: Vec<_> = buttons.controls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Fire1", "Jump"]);

        let mut registry = crate::registry::ControlRegistry::new();
        registry.register_provider(1, p.name());
        assert!(registry.upsert_device(1, &buttons).is_ok());

        feed.set_button("Fire1", true);
        assert_eq!(typed(&poll(&mut p)), [InputKind::ButtonDown]);
    }

    #[test]
    fn joystick_hot_plug() {
        let feed = HostFeed::new();
        let layout = HostLayout {
            mouse: false,
            axes: vec![AxisDecl::new("Horizontal", AxisKind::Joystick, 0)],
            ..Default::default()
        };
        let mut p = HostInputProvider::new(&layout, feed.clone());
        poll(&mut p);

        feed.set_joystick_connected(0, false);
        let events = poll(&mut p);
        assert_eq!(events, [ProviderEvent::DeviceRemoved(2)]);
        assert_eq!(p.devices().len(), 1);

        feed.set_joystick_connected(0, true);
        let events = poll(&mut p);
        assert!(matches!(&events[0], ProviderEvent::DeviceAdded(d) if d.name == "Joy0"));
        assert_eq!(typed(&events), [InputKind::NormalizedChanged(0.5)]);
    }

    #[test]
    fn mouse_reports_changed_coordinates() {
        let feed = HostFeed::new();
        let mut p = HostInputProvider::new(&HostLayout { axes: vec![], ..Default::default() }, feed.clone());
        assert!(poll(&mut p).is_empty());

        feed.set_mouse(10.0, 20.0);
        assert_eq!(typed(&poll(&mut p)), [InputKind::AxisChanged(10.0), InputKind::AxisChanged(20.0)]);

        feed.set_mouse(10.0, 25.0);
        assert_eq!(typed(&poll(&mut p)), [InputKind::AxisChanged(25.0)]);
    }

    #[test]
    fn touches_take_free_slots_and_follow_fingers() {
        let feed = HostFeed::new();
        let layout = HostLayout {
            mouse: false,
            touch: true,
            touch_slots: 2,
            axes: vec![],
            ..Default::default()
        };
        let mut p = HostInputProvider::new(&layout, feed.clone());
        let touch = |finger_id, phase, x| Touch {
            finger_id,
            position: (x, 0.0),
            phase,
            pressure: 1.0,
        };

        feed.set_touches(vec![touch(7, TouchPhase::Began, 5.0), touch(9, TouchPhase::Began, 8.0)]);
        let events = poll(&mut p);
        let downs: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                ProviderEvent::Control { device, kind: InputKind::ButtonDown, .. } => Some(*device),
                _ => None,
            })
            .collect();
        assert_eq!(downs, [2, 3]);
        assert!(events.iter().any(|e| matches!(
            e,
            ProviderEvent::Control { device: 4, kind: InputKind::AxisChanged(n), .. } if *n == 2.0
        )));

        feed.set_touches(vec![touch(9, TouchPhase::Ended, 8.0)]);
        let events = poll(&mut p);
        assert!(events.iter().any(|e| matches!(e, ProviderEvent::Control { device: 3, kind: InputKind::ButtonUp, .. })));
        assert!(events.iter().any(|e| matches!(
            e,
            ProviderEvent::Control { device: 4, kind: InputKind::AxisChanged(n), .. } if *n == 1.0
        )));

        // Slot 1 is free again and is reused by the next new finger.
        feed.set_touches(vec![touch(7, TouchPhase::Stationary, 5.0), touch(3, TouchPhase::Began, 1.0)]);
        let events = poll(&mut p);
        assert!(events.iter().any(|e| matches!(e, ProviderEvent::Control { device: 3, kind: InputKind::ButtonDown, .. })));
    }

    #[test]
    fn layout_reads_from_toml() {
        let layout: HostLayout = toml::from_str(
            r#"
            name = "UNITY"
            touch = true
            [[axes]]
            name = "Jump"
            kind = "button"
            "#,
        )
        .unwrap();
        assert_eq!(layout.name, "UNITY");
        assert!(layout.mouse);
        assert_eq!(layout.touch_slots, 5);
        assert_eq!(layout.axes, [AxisDecl::new("Jump", AxisKind::Button, 0)]);
    }
}
