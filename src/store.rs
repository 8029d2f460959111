//! Binding-table persistence.
//!
//! The table is stored as pretty JSON:
//!
//! ```json
//! {
//!   "axes": [
//!     { "name": "Jump", "control_type": "Digital", "bound_control": "HOST.ButtonDevice3.Jump" }
//!   ]
//! }
//! ```
//!
//! Loading never fails. A missing file seeds from the bundled default document; a corrupt
//! file falls back to the default; an unusable default yields an empty table.

use crate::control::ControlType;
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default document compiled into the crate.
pub const BUNDLED_DEFAULT: &str = include_str!("../assets/default_bindings.json");

/// File name used under an application data directory.
pub const DEFAULT_FILE_NAME: &str = "virtual_axes.json";

/// One persisted virtual axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRecord {
    pub name: String,
    pub control_type: ControlType,
    #[serde(default)]
    pub bound_control: Option<String>,
}

/// The persisted binding table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingDocument {
    #[serde(default)]
    pub axes: Vec<AxisRecord>,
}

impl BindingDocument {
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Where the table came from on the last load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    File,
    Default,
    Empty,
}

/// Reads and writes the binding table at a fixed path.
#[derive(Debug, Clone)]
pub struct BindingStore {
    path: PathBuf,
    default_document: Option<String>,
    seed_on_first_load: bool,
}

impl BindingStore {
    /// Store at `path` seeded from [`BUNDLED_DEFAULT`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_document: Some(BUNDLED_DEFAULT.to_string()),
            seed_on_first_load: true,
        }
    }

    /// Replaces (or removes) the default document.
    pub fn with_default_document(mut self, doc: Option<String>) -> Self {
        self.default_document = doc;
        self
    }

    /// Whether a missing file gets the default written to it on load.
    pub fn with_seeding(mut self, seed: bool) -> Self {
        self.seed_on_first_load = seed;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the table, falling back as described in the module docs.
    pub fn load(&self) -> (BindingDocument, LoadSource) {
        match fs::read_to_string(&self.path) {
            Ok(text) => match BindingDocument::from_json(&text) {
                Ok(doc) => {
                    info!(path = %self.path.display(), axes = doc.axes.len(), "loaded virtual axes");
                    return (doc, LoadSource::File);
                }
                Err(e) => warn!(path = %self.path.display(), "binding table unreadable, using default: {e}"),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(doc) = self.default_doc() {
                    if self.seed_on_first_load {
                        if let Err(e) = self.save(&doc) {
                            warn!("could not seed binding table: {e}");
                        }
                    }
                    info!(path = %self.path.display(), "no binding table, seeded from default");
                    return (doc, LoadSource::Default);
                }
                return (BindingDocument::default(), LoadSource::Empty);
            }
            Err(e) => warn!(path = %self.path.display(), "binding table unreadable, using default: {e}"),
        }

        match self.default_doc() {
            Some(doc) => (doc, LoadSource::Default),
            None => (BindingDocument::default(), LoadSource::Empty),
        }
    }

    /// Writes the table (temp file, then rename).
    pub fn save(&self, doc: &BindingDocument) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = doc.to_json()?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }

    fn default_doc(&self) -> Option<BindingDocument> {
        let text = self.default_document.as_deref()?;
        match BindingDocument::from_json(text) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("default binding table unusable, starting empty: {e}");
                None
            }
        }
    }
}
