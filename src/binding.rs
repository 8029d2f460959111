//! Virtual axes and the live binding table.
//!
//! A [`VirtualAxis`] is an application-facing name with a declared [`ControlType`]. It is
//! bound to at most one physical control at a time; a control may fan out to any number of
//! axes. [`AxisBindings`] keeps both directions of that mapping:
//!
//! - axis → control (`AxisId` → [`ControlKey`]), at most one entry per axis;
//! - control → axes ([`ControlKey`] → `Vec<AxisId>`), the fan-out used during dispatch.
//!
//! The bound control's FQ name is also recorded on the axis itself; it is what gets
//! persisted, and it survives when the control is absent so the binding can be restored
//! once the device shows up again.

use crate::control::{Control, ControlKey, ControlType};
use crate::device::Device;
use crate::error::BindError;
use crate::store::{AxisRecord, BindingDocument};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Run-stable handle of a virtual axis. Renaming and rebinding keep the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisId(pub u64);

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axis#{}", self.0)
    }
}

/// Application-facing named indirection over a control.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualAxis {
    id: AxisId,
    name: String,
    control_type: ControlType,
    bound_control: Option<String>,
}

impl VirtualAxis {
    #[inline]
    pub fn id(&self) -> AxisId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn control_type(&self) -> ControlType {
        self.control_type
    }

    /// FQ name of the control this axis is (or was last) bound to.
    ///
    /// May name a control that does not currently exist; see [`AxisBindings::is_live`].
    #[inline]
    pub fn bound_control(&self) -> Option<&str> {
        self.bound_control.as_deref()
    }
}

/// Live binding table: the virtual axes plus both mapping directions.
#[derive(Debug, Default)]
pub struct AxisBindings {
    next_id: u64,
    axes: Vec<VirtualAxis>,
    axis_to_control: HashMap<AxisId, ControlKey>,
    control_to_axes: HashMap<ControlKey, Vec<AxisId>>,
}

impl AxisBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axes in creation (or document) order.
    pub fn axes(&self) -> &[VirtualAxis] {
        &self.axes
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn axis(&self, id: AxisId) -> Option<&VirtualAxis> {
        self.axes.iter().find(|a| a.id == id)
    }

    /// First axis with a matching name.
    pub fn virtual_axis(&self, name: &str) -> Option<&VirtualAxis> {
        self.axes.iter().find(|a| a.name == name)
    }

    /// Creates an unbound Digital axis with a generated unique name.
    pub fn add_axis(&mut self) -> AxisId {
        let name = self.generate_name();
        self.push_axis(name, ControlType::Digital, None)
    }

    /// Creates an unbound axis with the given name and type.
    pub fn add_axis_named(
        &mut self,
        name: impl Into<String>,
        control_type: ControlType,
    ) -> Result<AxisId, BindError> {
        let name = name.into();
        if self.virtual_axis(&name).is_some() {
            return Err(BindError::DuplicateAxisName(name));
        }
        Ok(self.push_axis(name, control_type, None))
    }

    pub fn rename_axis(&mut self, id: AxisId, name: impl Into<String>) -> Result<(), BindError> {
        let name = name.into();
        if self.axes.iter().any(|a| a.name == name && a.id != id) {
            return Err(BindError::DuplicateAxisName(name));
        }
        let axis = self.axis_mut(id)?;
        axis.name = name;
        Ok(())
    }

    /// Deregisters an axis and drops it from both mapping directions.
    pub fn remove_virtual_axis(&mut self, id: AxisId) -> Option<VirtualAxis> {
        let pos = self.axes.iter().position(|a| a.id == id)?;
        self.unlink(id);
        Some(self.axes.remove(pos))
    }

    /// Binds `id` to `control`, or unbinds it when `control` is `None`.
    ///
    /// Any prior binding of the axis is removed first, so an axis never has more than one
    /// control and repeating the same bind is a no-op. Binding a control whose type differs
    /// from the axis type is rejected and leaves the existing binding untouched.
    pub fn map_virtual_axis(&mut self, id: AxisId, control: Option<&Control>) -> Result<(), BindError> {
        let axis = self.axis(id).ok_or(BindError::AxisNotFound(id.0))?;

        let Some(control) = control else {
            self.unlink(id);
            self.axis_mut(id)?.bound_control = None;
            debug!(axis = %axis_name(self, id), "virtual axis unbound");
            return Ok(());
        };

        if control.control_type() != axis.control_type {
            return Err(BindError::TypeMismatch {
                axis: axis.name.clone(),
                control: control.fq_name().to_string(),
                expected: axis.control_type,
                found: control.control_type(),
            });
        }

        self.unlink(id);
        let key = control.key();
        self.control_to_axes.entry(key.clone()).or_default().push(id);
        self.axis_to_control.insert(id, key);
        self.axis_mut(id)?.bound_control = Some(control.fq_name().to_string());
        debug!(axis = %axis_name(self, id), control = control.fq_name(), "virtual axis bound");
        Ok(())
    }

    /// The axis currently has a live control mapping (not just a stored FQ name).
    pub fn is_live(&self, id: AxisId) -> bool {
        self.axis_to_control.contains_key(&id)
    }

    /// Key of the control the axis is live-bound to.
    pub fn bound_key(&self, id: AxisId) -> Option<&ControlKey> {
        self.axis_to_control.get(&id)
    }

    /// Axes currently bound to `control`, in bind order. Returned by value so callers can
    /// iterate while the table changes.
    pub fn axes_bound_to(&self, control: &Control) -> Vec<AxisId> {
        self.axes_bound_to_key(&control.key())
    }

    pub(crate) fn axes_bound_to_key(&self, key: &ControlKey) -> Vec<AxisId> {
        self.control_to_axes.get(key).cloned().unwrap_or_default()
    }

    /// Re-establishes live mappings for axes whose stored FQ name resolves and which are not
    /// already live. Misses and type mismatches leave the axis unbound; the stored name is
    /// kept either way. Returns how many axes were bound.
    pub fn resolve_stored<F>(&mut self, mut lookup: F) -> usize
    where
        F: FnMut(&str) -> Option<Arc<Control>>,
    {
        let pending: Vec<(AxisId, String)> = self
            .axes
            .iter()
            .filter(|a| !self.axis_to_control.contains_key(&a.id))
            .filter_map(|a| a.bound_control.clone().map(|fq| (a.id, fq)))
            .collect();

        let mut bound = 0;
        for (id, fq) in pending {
            let Some(control) = lookup(&fq) else {
                debug!(axis = %axis_name(self, id), control = %fq, "stored binding does not resolve");
                continue;
            };
            match self.map_virtual_axis(id, Some(&control)) {
                Ok(()) => bound += 1,
                Err(e) => warn!("stored binding not restored: {e}"),
            }
        }
        bound
    }

    /// Drops live mappings onto controls of a removed device. Stored FQ names stay, so the
    /// axes rebind when the device is announced again. Returns the detached axes.
    pub fn detach_device(&mut self, device: &Device) -> Vec<AxisId> {
        let mut detached = Vec::new();
        for control in device.controls() {
            if let Some(axes) = self.control_to_axes.remove(&control.key()) {
                for id in &axes {
                    self.axis_to_control.remove(id);
                }
                detached.extend(axes);
            }
        }
        if !detached.is_empty() {
            debug!(device = device.fq_name(), axes = detached.len(), "bindings detached from removed device");
        }
        detached
    }

    /// Snapshot of the table in persisted form.
    pub fn to_document(&self) -> BindingDocument {
        BindingDocument {
            axes: self
                .axes
                .iter()
                .map(|a| AxisRecord {
                    name: a.name.clone(),
                    control_type: a.control_type,
                    bound_control: a.bound_control.clone(),
                })
                .collect(),
        }
    }

    /// Builds a table from a document. Nothing is live until [`resolve_stored`](Self::resolve_stored).
    ///
    /// Duplicate names keep the first record.
    pub fn from_document(doc: &BindingDocument) -> Self {
        let mut table = Self::new();
        for rec in &doc.axes {
            if table.virtual_axis(&rec.name).is_some() {
                warn!(name = %rec.name, "duplicate virtual axis in binding document; skipped");
                continue;
            }
            table.push_axis(rec.name.clone(), rec.control_type, rec.bound_control.clone());
        }
        table
    }

    fn push_axis(&mut self, name: String, control_type: ControlType, bound: Option<String>) -> AxisId {
        let id = AxisId(self.next_id);
        self.next_id += 1;
        self.axes.push(VirtualAxis {
            id,
            name,
            control_type,
            bound_control: bound,
        });
        id
    }

    fn generate_name(&self) -> String {
        (self.axes.len()..)
            .map(|n| format!("VirtualAxis{n}"))
            .find(|name| self.virtual_axis(name).is_none())
            .unwrap_or_default()
    }

    fn axis_mut(&mut self, id: AxisId) -> Result<&mut VirtualAxis, BindError> {
        self.axes
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(BindError::AxisNotFound(id.0))
    }

    fn unlink(&mut self, id: AxisId) {
        if let Some(old) = self.axis_to_control.remove(&id) {
            if let Some(list) = self.control_to_axes.get_mut(&old) {
                list.retain(|a| *a != id);
                if list.is_empty() {
                    self.control_to_axes.remove(&old);
                }
            }
        }
    }
}

fn axis_name(table: &AxisBindings, id: AxisId) -> &str {
    table.axis(id).map(|a| a.name.as_str()).unwrap_or("?")
}
