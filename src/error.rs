//! Error types.
//!
//! Errors are split by *when* they happen:
//! - **Configuration time** (`initialize`, `reconfigure`, profile loading): returned as
//!   [`InputError`] so the host can reject a bad profile.
//! - **Tick time**: never returned. Unresolvable channels and missing backends are
//!   logged with `log::warn!` (once) and read as neutral (`0.0` / `false`).

use crate::device::SourceKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    /// A channel has no identifier assigned (or one its backend cannot resolve).
    #[error("channel `{channel}` is not configured: {reason}")]
    UnconfiguredChannel { channel: String, reason: String },

    /// The backend a channel is bound to is not present or gave up probing.
    #[error("backend {kind:?} is unavailable")]
    BackendUnavailable { kind: SourceKind },

    /// A numeric setting is outside its legal range.
    #[error("channel `{channel}`: {field} = {value} is out of range ({expected})")]
    InvalidRange {
        channel: String,
        field: &'static str,
        value: f32,
        expected: &'static str,
    },

    /// A raw identifier does not belong to the backend selected for the channel.
    #[error("channel `{channel}`: identifier belongs to {found:?}, binding selects {expected:?}")]
    SourceMismatch {
        channel: String,
        expected: SourceKind,
        found: SourceKind,
    },

    #[error("failed to read profile {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML profile")]
    Toml(#[from] toml::de::Error),

    #[error("failed to serialize profile as TOML")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("invalid JSON profile")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InputError>;

impl InputError {
    pub(crate) fn range(
        channel: impl Into<String>,
        field: &'static str,
        value: f32,
        expected: &'static str,
    ) -> Self {
        Self::InvalidRange {
            channel: channel.into(),
            field,
            value,
            expected,
        }
    }
}
