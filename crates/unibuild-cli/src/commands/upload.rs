use std::path::PathBuf;

use unibuild_core::config;
use unibuild_core::paths;
use unibuild_core::platform::PlatformKey;
use unibuild_publish::{distribute_artifact, DistributeRequest, DistributeResult, LocalDistributor};

pub struct UploadArgs {
    pub project_root: PathBuf,
    pub platform: String,
    pub path: Option<PathBuf>,
    pub out_dir: PathBuf,
}

/// Ship an already-built artifact. Without an explicit path, the most
/// recently modified build folder for the platform is used.
pub fn run(args: UploadArgs) -> Result<DistributeResult, String> {
    let config = config::load(&args.project_root).map_err(|error| error.to_string())?;
    let platform = args
        .platform
        .parse::<PlatformKey>()
        .map_err(|error| error.to_string())?;

    let build_dir = match args.path {
        Some(path) => path,
        None => {
            let platform_root = paths::platform_builds_dir(&config, platform);
            paths::latest_build_dir(&platform_root).ok_or_else(|| {
                format!(
                    "no builds found for {} under '{}'",
                    platform.display_name(),
                    platform_root.display()
                )
            })?
        }
    };
    let artifact_path = build_dir.join(paths::artifact_file_name(platform, &config.product_name));

    let distributor = LocalDistributor::new(args.out_dir)
        .map_err(|error| format!("failed to prepare distribution dir: {}", error))?;
    let request = DistributeRequest {
        platform,
        artifact_path,
        product_name: config.product_name.clone(),
        product_version: config.product_version.clone(),
    };
    Ok(distribute_artifact(&distributor, &request))
}
