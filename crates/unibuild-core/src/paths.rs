use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::BuildConfig;
use crate::platform::PlatformKey;

pub const BUILDS_DIR_NAME: &str = "Builds";
pub const LOGS_DIR_NAME: &str = "BuildAutomation";

/// Timestamp component of the final output folder, `ddMMyyyy_HHmm`.
///
/// Sampled once per platform attempt and threaded through every path
/// computation for that attempt, so the engine path and the final destination
/// can never drift apart within one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildStamp(String);

impl BuildStamp {
    pub fn now() -> Self {
        Self::from_datetime(Local::now())
    }

    pub fn from_datetime(moment: DateTime<Local>) -> Self {
        BuildStamp(moment.format("%d%m%Y_%H%M").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BuildStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// File or directory name of the artifact for `product` on `platform`.
pub fn artifact_file_name(platform: PlatformKey, product: &str) -> String {
    match platform.artifact_ext() {
        Some(ext) => format!("{}{}", product, ext),
        None => product.to_string(),
    }
}

/// Root of all version folders for one platform.
pub fn platform_builds_dir(config: &BuildConfig, platform: PlatformKey) -> PathBuf {
    config
        .project_root
        .join(BUILDS_DIR_NAME)
        .join(platform.build_dir_name())
}

/// Where the engine is expected to place its output, by convention:
/// `<root>/Builds/<Platform>/<version>/<product><ext>`.
pub fn engine_output_path(config: &BuildConfig, platform: PlatformKey, product: &str) -> PathBuf {
    platform_builds_dir(config, platform)
        .join(&config.product_version)
        .join(artifact_file_name(platform, product))
}

/// Durable destination folder: `<root>/Builds/<Platform>/<version>_<stamp>`.
pub fn stamped_output_dir(
    config: &BuildConfig,
    platform: PlatformKey,
    stamp: &BuildStamp,
) -> PathBuf {
    platform_builds_dir(config, platform).join(format!("{}_{}", config.product_version, stamp))
}

/// Durable destination of the artifact itself.
pub fn stamped_output_path(
    config: &BuildConfig,
    platform: PlatformKey,
    product: &str,
    stamp: &BuildStamp,
) -> PathBuf {
    stamped_output_dir(config, platform, stamp).join(artifact_file_name(platform, product))
}

/// Create the destination folder ahead of dispatch. Idempotent.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}

pub fn build_log_path(config: &BuildConfig, platform: PlatformKey) -> PathBuf {
    config
        .project_root
        .join(LOGS_DIR_NAME)
        .join(format!("build_{}.log", platform.as_str()))
}

pub fn hook_log_path(config: &BuildConfig) -> PathBuf {
    config.project_root.join(LOGS_DIR_NAME).join("hook.log")
}

/// Most recently modified version folder under a platform's `Builds/` root.
///
/// Separate from the orchestration pipeline; distribution flows use it to
/// pick up the build a finished run left behind.
pub fn latest_build_dir(platform_root: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(platform_root).ok()?;
    let mut latest: Option<(std::time::SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let modified = match entry.metadata().and_then(|meta| meta.modified()) {
            Ok(modified) => modified,
            Err(_) => continue,
        };
        match &latest {
            Some((current, _)) if *current >= modified => {}
            _ => latest = Some((modified, path)),
        }
    }
    latest.map(|(_, path)| path)
}
