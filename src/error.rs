//! Error types.
//!
//! Lookups that can miss (FQ names, axis names) return `Option` and are not
//! errors. Everything here is contained by the caller that owns the tick loop:
//! provider faults are logged and isolated, store faults fall back to defaults.

use crate::control::ControlType;
use std::path::PathBuf;
use thiserror::Error;

/// Failure raised by a [`Provider`](crate::provider::Provider) implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider could not be constructed.
    #[error("provider construction failed: {0}")]
    Construct(String),

    /// Polling failed for this tick.
    #[error("provider poll failed: {0}")]
    Poll(String),

    /// The provider panicked inside a call; the payload message if one was available.
    #[error("provider panicked: {0}")]
    Panicked(String),
}

/// A device announcement the registry refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown provider id {0}")]
    UnknownProvider(u32),

    #[error("invalid name segment {0:?}: names must be non-empty and contain no '.'")]
    InvalidName(String),

    #[error("device name {name:?} already used by device {existing} on this provider")]
    DuplicateDeviceName { name: String, existing: u32 },

    #[error("duplicate control {what} {value:?} on device {device:?}")]
    DuplicateControl {
        device: String,
        what: &'static str,
        value: String,
    },
}

/// A rejected binding-table edit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("no virtual axis with id {0}")]
    AxisNotFound(u64),

    #[error("no control named {0:?}")]
    ControlNotFound(String),

    #[error("virtual axis name {0:?} is already in use")]
    DuplicateAxisName(String),

    #[error("cannot bind {axis:?} ({expected:?}) to {control:?} ({found:?})")]
    TypeMismatch {
        axis: String,
        control: String,
        expected: ControlType,
        found: ControlType,
    },
}

/// Binding-table persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("binding table I/O at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("binding table encoding: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration load failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse: {0}")]
    Toml(#[from] toml::de::Error),
}
