//! Sidecar record encoding and path derivation
//!
//! A sidecar is a small JSON object stored next to the file it describes:
//!
//! ```text
//! photo.jpg       <- original
//! photo.jpg.meta  <- {"c":"2021-06-01T10:00:00Z","w":"...","a":"..."}
//! ```
//!
//! Field names are single characters to keep the files small.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Suffix appended to an original path to name its sidecar
pub const SIDECAR_SUFFIX: &str = ".meta";

/// The three timestamps carried by a sidecar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampTriple {
    /// Creation (birth) time
    #[serde(rename = "c")]
    pub creation: DateTime<Utc>,

    /// Last modification time
    #[serde(rename = "w")]
    pub last_write: DateTime<Utc>,

    /// Last access time
    #[serde(rename = "a")]
    pub last_access: DateTime<Utc>,
}

impl TimestampTriple {
    /// Serialize to the compact sidecar representation
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse sidecar content
    pub fn decode(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

/// Path of the sidecar for `original`: the full path with `.meta` appended
pub fn sidecar_path(original: &Path) -> PathBuf {
    let mut name: OsString = original.as_os_str().to_owned();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Whether `path` names a sidecar file (its name ends in `.meta`, case-sensitive)
pub fn is_sidecar(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(SIDECAR_SUFFIX.as_bytes()))
}

/// Path of the file a sidecar describes: the sidecar path with its trailing
/// `.meta` removed and nothing else changed
///
/// Returns `None` when `path` does not end in `.meta`, or when the file name
/// is `.meta` alone, since stripping it would name the parent directory.
pub fn target_path(sidecar: &Path) -> Option<PathBuf> {
    if sidecar.file_name()? == SIDECAR_SUFFIX {
        return None;
    }

    let bytes = sidecar.as_os_str().as_encoded_bytes();
    let target = bytes.strip_suffix(SIDECAR_SUFFIX.as_bytes())?;

    // SAFETY: `target` is a prefix of a valid OsStr that ends right before
    // the ASCII '.', which is a valid split point for encoded bytes.
    let target = unsafe { OsStr::from_encoded_bytes_unchecked(target) };
    Some(PathBuf::from(target))
}
