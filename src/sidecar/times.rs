//! Reading and applying filesystem timestamps
//!
//! Last-write and last-access times go through `filetime`. Creation time is
//! read from the birth time where the filesystem records one and falls back to
//! the last-write time otherwise. Setting a creation time is only possible on
//! Windows and macOS; elsewhere it is left untouched.

use crate::error::{FileError, FileResult};
use crate::sidecar::codec::TimestampTriple;
use chrono::{DateTime, Utc};
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::Path;

/// Read the three timestamps of `path`, in UTC
pub fn read_times(path: &Path) -> FileResult<TimestampTriple> {
    let stat_err = |source: io::Error| FileError::Stat {
        path: path.to_path_buf(),
        source,
    };

    let meta = fs::metadata(path).map_err(stat_err)?;

    let last_write = to_utc(FileTime::from_last_modification_time(&meta)).map_err(stat_err)?;
    let last_access = to_utc(FileTime::from_last_access_time(&meta)).map_err(stat_err)?;
    let creation = match FileTime::from_creation_time(&meta) {
        Some(created) => to_utc(created).map_err(stat_err)?,
        None => last_write,
    };

    Ok(TimestampTriple {
        creation,
        last_write,
        last_access,
    })
}

/// Apply `times` to the file at `path`
///
/// Fails with `TargetMissing` if the file does not exist.
pub fn apply_times(path: &Path, times: &TimestampTriple) -> FileResult<()> {
    let apply_err = |source: io::Error| FileError::ApplyTimes {
        path: path.to_path_buf(),
        source,
    };

    match fs::metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FileError::TargetMissing {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(apply_err(e)),
    }

    set_creation_time(path, times.creation).map_err(apply_err)?;

    filetime::set_file_times(
        path,
        to_filetime(times.last_access),
        to_filetime(times.last_write),
    )
    .map_err(apply_err)
}

fn to_utc(time: FileTime) -> io::Result<DateTime<Utc>> {
    DateTime::from_timestamp(time.unix_seconds(), time.nanoseconds()).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("timestamp out of range: {}s", time.unix_seconds()),
        )
    })
}

fn to_filetime(time: DateTime<Utc>) -> FileTime {
    FileTime::from_unix_time(time.timestamp(), time.timestamp_subsec_nanos())
}

#[cfg(windows)]
fn set_creation_time(path: &Path, created: DateTime<Utc>) -> io::Result<()> {
    use std::os::windows::fs::{FileTimesExt, OpenOptionsExt};

    // FILE_WRITE_ATTRIBUTES, so read-only files can still be stamped
    const FILE_WRITE_ATTRIBUTES: u32 = 0x0100;

    let file = fs::OpenOptions::new()
        .access_mode(FILE_WRITE_ATTRIBUTES)
        .open(path)?;
    file.set_times(fs::FileTimes::new().set_created(created.into()))
}

#[cfg(target_os = "macos")]
fn set_creation_time(path: &Path, created: DateTime<Utc>) -> io::Result<()> {
    use std::os::macos::fs::FileTimesExt;

    let file = fs::OpenOptions::new().write(true).open(path)?;
    file.set_times(fs::FileTimes::new().set_created(created.into()))
}

#[cfg(not(any(windows, target_os = "macos")))]
fn set_creation_time(path: &Path, _created: DateTime<Utc>) -> io::Result<()> {
    tracing::trace!(path = %path.display(), "Creation time not settable on this platform");
    Ok(())
}
