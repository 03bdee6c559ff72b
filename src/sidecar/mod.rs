//! Per-file units of work
//!
//! - `create_sidecar`: original file -> `<file>.meta`
//! - `restore_from_sidecar`: `<file>.meta` -> timestamps on `<file>`
//!
//! Both are pure functions of the filesystem; the worker pool decides how
//! their results are counted.

pub mod codec;
pub mod times;

pub use codec::{is_sidecar, sidecar_path, target_path, TimestampTriple, SIDECAR_SUFFIX};
pub use times::{apply_times, read_times};

use crate::error::{FileError, FileResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Write the sidecar for `original`, overwriting any existing one
///
/// Returns the sidecar path.
pub fn create_sidecar(original: &Path) -> FileResult<PathBuf> {
    let times = read_times(original)?;

    let content = times.encode().map_err(|source| FileError::Encode {
        path: original.to_path_buf(),
        source,
    })?;

    let sidecar = sidecar_path(original);
    fs::write(&sidecar, content).map_err(|source| FileError::WriteSidecar {
        path: sidecar.clone(),
        source,
    })?;

    Ok(sidecar)
}

/// Apply the timestamps stored in `sidecar` to the file it describes
///
/// With `delete` set the sidecar is removed, but only once every timestamp
/// was applied. Any failure leaves the sidecar in place. Returns the target path.
pub fn restore_from_sidecar(sidecar: &Path, delete: bool) -> FileResult<PathBuf> {
    let target = target_path(sidecar).ok_or_else(|| FileError::NotASidecar {
        path: sidecar.to_path_buf(),
    })?;

    let content = fs::read_to_string(sidecar).map_err(|source| FileError::ReadSidecar {
        path: sidecar.to_path_buf(),
        source,
    })?;

    let times = TimestampTriple::decode(&content).map_err(|source| FileError::Decode {
        path: sidecar.to_path_buf(),
        source,
    })?;

    apply_times(&target, &times)?;

    if delete {
        fs::remove_file(sidecar).map_err(|source| FileError::DeleteSidecar {
            path: sidecar.to_path_buf(),
            source,
        })?;
    }

    Ok(target)
}
