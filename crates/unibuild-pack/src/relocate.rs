use std::fs;
use std::io;
use std::path::Path;

use unibuild_core::platform::OutputLayout;
use walkdir::WalkDir;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelocateError {
    MissingSource { path: String },
    Io { message: String },
}

impl std::fmt::Display for RelocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelocateError::MissingSource { path } => {
                write!(f, "no artifact to relocate at '{}'", path)
            }
            RelocateError::Io { message } => write!(f, "relocation failed: {}", message),
        }
    }
}

impl std::error::Error for RelocateError {}

impl From<io::Error> for RelocateError {
    fn from(error: io::Error) -> Self {
        RelocateError::Io {
            message: error.to_string(),
        }
    }
}

pub fn size_in_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Total size in bytes: a file reports its own length, a directory the sum
/// of all regular files beneath it.
pub fn path_size(path: &Path) -> Result<u64, RelocateError> {
    let metadata = fs::metadata(path)?;
    if metadata.is_file() {
        return Ok(metadata.len());
    }
    let mut total = 0;
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry.map_err(|err| RelocateError::Io {
            message: err.to_string(),
        })?;
        if entry.file_type().is_file() {
            total += entry
                .metadata()
                .map_err(|err| RelocateError::Io {
                    message: err.to_string(),
                })?
                .len();
        }
    }
    Ok(total)
}

/// Move a self-contained artifact (file or directory bundle) to its final
/// destination and return its size in bytes.
///
/// A stale destination from a prior run is removed first. Re-running after a
/// completed relocation (source gone, destination present) succeeds and
/// leaves the destination untouched.
pub fn relocate_artifact(intermediate: &Path, destination: &Path) -> Result<u64, RelocateError> {
    if !intermediate.exists() {
        if destination.exists() {
            return path_size(destination);
        }
        return Err(RelocateError::MissingSource {
            path: intermediate.display().to_string(),
        });
    }
    if intermediate == destination {
        return path_size(destination);
    }
    clear_path(destination)?;
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    move_path(intermediate, destination)?;
    remove_dir_if_empty(intermediate.parent())?;
    path_size(destination)
}

/// Remove an intermediate folder the move emptied out. A folder still
/// holding entries (the engine's self-report, say) is left alone.
fn remove_dir_if_empty(dir: Option<&Path>) -> Result<(), RelocateError> {
    if let Some(dir) = dir {
        if dir.exists() && fs::read_dir(dir)?.next().is_none() {
            fs::remove_dir(dir)?;
        }
    }
    Ok(())
}

/// Relocate the output of a platform that scatters loose siblings under the
/// version folder instead of producing one bundle.
///
/// Every entry is moved individually into the stamped folder, colliding
/// destination entries cleared first. The version folder itself is removed
/// only when the move actually emptied it.
pub fn relocate_scattered(version_dir: &Path, stamped_dir: &Path) -> Result<u64, RelocateError> {
    if !version_dir.exists() {
        if stamped_dir.exists() {
            return path_size(stamped_dir);
        }
        return Err(RelocateError::MissingSource {
            path: version_dir.display().to_string(),
        });
    }
    fs::create_dir_all(stamped_dir)?;
    for entry in fs::read_dir(version_dir)? {
        let entry = entry?;
        let target = stamped_dir.join(entry.file_name());
        clear_path(&target)?;
        move_path(&entry.path(), &target)?;
    }
    if fs::read_dir(version_dir)?.next().is_none() {
        fs::remove_dir(version_dir)?;
    }
    path_size(stamped_dir)
}

/// Relocate according to the platform's declared output layout.
///
/// Scattered output relocates the whole version folder entry by entry into
/// the stamped folder; bundled output moves the single artifact to its final
/// path.
pub fn relocate_layout(
    layout: OutputLayout,
    intermediate: &Path,
    stamped_dir: &Path,
    final_path: &Path,
) -> Result<u64, RelocateError> {
    match layout {
        OutputLayout::Scattered => {
            let version_dir = intermediate.parent().unwrap_or(intermediate);
            relocate_scattered(version_dir, stamped_dir)
        }
        OutputLayout::Bundled => relocate_artifact(intermediate, final_path),
    }
}

fn clear_path(path: &Path) -> Result<(), RelocateError> {
    if !path.exists() {
        return Ok(());
    }
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Rename where the filesystem allows it, falling back to copy-and-delete
/// across devices.
fn move_path(source: &Path, destination: &Path) -> Result<(), RelocateError> {
    if fs::rename(source, destination).is_ok() {
        return Ok(());
    }
    if source.is_dir() {
        copy_dir(source, destination)?;
        fs::remove_dir_all(source)?;
    } else {
        fs::copy(source, destination)?;
        fs::remove_file(source)?;
    }
    Ok(())
}

fn copy_dir(source: &Path, destination: &Path) -> Result<(), RelocateError> {
    fs::create_dir_all(destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
