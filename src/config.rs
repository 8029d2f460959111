//! TOML configuration.
//!
//! ```toml
//! [store]
//! path = "config/virtual_axes.json"
//! seed = true
//!
//! [host]
//! name = "HOST"
//! mouse = true
//! touch = false
//! touch_slots = 5
//!
//! [[host.axes]]
//! name = "Jump"
//! kind = "button"
//! joy = 0
//! ```
//!
//! Every field is optional.

use crate::backends::host::HostLayout;
use crate::error::ConfigError;
use crate::store::{BindingStore, DEFAULT_FILE_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Binding table location.
    pub path: PathBuf,
    /// Write the bundled default to `path` when the file is missing.
    pub seed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FILE_NAME),
            seed: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlugConfig {
    pub store: StoreConfig,
    pub host: HostLayout,
}

impl PlugConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Store described by the `[store]` section.
    pub fn binding_store(&self) -> BindingStore {
        BindingStore::new(&self.store.path).with_seeding(self.store.seed)
    }

    pub fn host_layout(&self) -> &HostLayout {
        &self.host
    }
}
