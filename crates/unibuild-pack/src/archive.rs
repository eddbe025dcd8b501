use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::PackError;

/// Engine debug output that must never ship with a build.
const EXCLUDED_SUFFIXES: &[&str] = &[
    "_BackUpThisFolder_ButDontShipItWithYourGame",
    "_DoNotShip",
    "_BurstDebugInformation_DoNotShip",
];

/// Zip a build directory for distribution, with entries relative to the
/// build root and debug folders excluded.
///
/// Returns the number of files written into the archive.
pub fn zip_artifact(build_dir: &Path, zip_path: &Path) -> Result<usize, PackError> {
    if !build_dir.is_dir() {
        return Err(PackError::InvalidRequest {
            message: format!("'{}' is not a build directory", build_dir.display()),
        });
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(build_dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry.path()))
    {
        let entry = entry.map_err(|err| PackError::Io {
            message: err.to_string(),
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(build_dir)
            .map_err(|err| PackError::Io {
                message: err.to_string(),
            })?;
        sources.push((entry.path().to_path_buf(), archive_path(relative)));
    }
    sources.sort_by(|left, right| left.1.cmp(&right.1));

    let file = fs::File::create(zip_path).map_err(|err| PackError::Io {
        message: err.to_string(),
    })?;
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::<()>::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);
    for (source, name) in &sources {
        writer
            .start_file(name.as_str(), options)
            .map_err(|err| PackError::Io {
                message: err.to_string(),
            })?;
        let mut input = fs::File::open(source).map_err(|err| PackError::Io {
            message: err.to_string(),
        })?;
        io::copy(&mut input, &mut writer).map_err(|err| PackError::Io {
            message: err.to_string(),
        })?;
    }
    writer.finish().map_err(|err| PackError::Io {
        message: err.to_string(),
    })?;
    Ok(sources.len())
}

fn is_excluded(path: &Path) -> bool {
    let name = match path.file_name().and_then(|value| value.to_str()) {
        Some(name) => name,
        None => return false,
    };
    EXCLUDED_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

fn archive_path(path: &Path) -> String {
    let mut components = Vec::new();
    for component in path.components() {
        components.push(component.as_os_str().to_string_lossy().into_owned());
    }
    components.join("/")
}
