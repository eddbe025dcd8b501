use std::fs;
use std::path::{Path, PathBuf};

use unibuild_core::platform::OutputLayout;
use unibuild_pack::archive::zip_artifact;

use crate::distribute::{DistributeRequest, DistributeResult, Distributor};

/// Ships builds into a directory on this machine.
///
/// Stands in for the remote backends at the same interface: scattered
/// desktop builds are zipped whole (the loose siblings belong together),
/// directory bundles are copied as trees, single-file artifacts are copied
/// as-is.
pub struct LocalDistributor {
    out_dir: PathBuf,
}

impl LocalDistributor {
    pub fn new(out_dir: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&out_dir)?;
        Ok(Self { out_dir })
    }

    fn target_stem(request: &DistributeRequest) -> String {
        format!(
            "{}_{}_v{}",
            request.product_name,
            request.platform.build_dir_name(),
            request.product_version
        )
    }
}

impl Distributor for LocalDistributor {
    fn distribute(&self, request: &DistributeRequest) -> DistributeResult {
        let stem = Self::target_stem(request);
        let outcome = match request.platform.output_layout() {
            OutputLayout::Scattered => {
                let build_dir = match request.artifact_path.parent() {
                    Some(parent) => parent,
                    None => {
                        return DistributeResult::failed(format!(
                            "artifact '{}' has no parent directory",
                            request.artifact_path.display()
                        ))
                    }
                };
                let zip_path = self.out_dir.join(format!("{}.zip", stem));
                zip_artifact(build_dir, &zip_path)
                    .map(|count| (zip_path, format!("zipped {} files", count)))
                    .map_err(|error| error.to_string())
            }
            OutputLayout::Bundled if request.artifact_path.is_dir() => {
                let target = self.out_dir.join(&stem);
                copy_tree(&request.artifact_path, &target)
                    .map(|count| (target, format!("copied {} files", count)))
                    .map_err(|error| error.to_string())
            }
            OutputLayout::Bundled => {
                let file_name = artifact_file_name(request);
                let target = self.out_dir.join(format!("{}{}", stem, file_name));
                fs::copy(&request.artifact_path, &target)
                    .map(|_| (target, "copied 1 file".to_string()))
                    .map_err(|error| error.to_string())
            }
        };
        match outcome {
            Ok((target, detail)) => {
                DistributeResult::ok(format!("{} to 'file://{}'", detail, target.display()))
            }
            Err(message) => DistributeResult::failed(message),
        }
    }
}

fn artifact_file_name(request: &DistributeRequest) -> String {
    request
        .platform
        .artifact_ext()
        .map(str::to_string)
        .unwrap_or_default()
}

fn copy_tree(source: &Path, destination: &Path) -> std::io::Result<usize> {
    if destination.exists() {
        if destination.is_dir() {
            fs::remove_dir_all(destination)?;
        } else {
            fs::remove_file(destination)?;
        }
    }
    fs::create_dir_all(destination)?;
    let mut copied = 0;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
