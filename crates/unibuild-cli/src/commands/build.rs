use std::path::PathBuf;

use unibuild_build::{BatchRunner, ProcessEngineRunner};
use unibuild_core::config;
use unibuild_core::events::BuildEvents;
use unibuild_core::paths::{self, LOGS_DIR_NAME};
use unibuild_core::platform::{all_platform_keys, PlatformKey};
use unibuild_core::result::BatchOutcome;

pub const RESULTS_FILE_NAME: &str = "build_results.json";

pub struct BuildArgs {
    pub project_root: PathBuf,
    pub platforms: Vec<String>,
    pub all: bool,
    pub hook: Option<String>,
    pub no_hook: bool,
    pub results_out: Option<PathBuf>,
}

#[derive(Debug)]
pub struct BuildCommandOutcome {
    pub batch: BatchOutcome,
    pub results_path: PathBuf,
}

pub fn run(args: BuildArgs, events: &dyn BuildEvents) -> Result<BuildCommandOutcome, String> {
    let config = config::load(&args.project_root).map_err(|error| error.to_string())?;
    let platforms = resolve_platforms(&args)?;

    let runner = ProcessEngineRunner::new();
    let batch = BatchRunner::new(&config, &runner, events);
    let outcome = batch.run(&platforms, args.hook.as_deref(), args.no_hook);

    let results_path = args
        .results_out
        .unwrap_or_else(|| args.project_root.join(LOGS_DIR_NAME).join(RESULTS_FILE_NAME));
    if let Some(parent) = results_path.parent() {
        paths::ensure_dir(parent).map_err(|error| {
            format!(
                "failed to create results dir '{}': {}",
                parent.display(),
                error
            )
        })?;
    }
    let records = outcome
        .to_json()
        .map_err(|error| format!("failed to serialize results: {}", error))?;
    std::fs::write(&results_path, records).map_err(|error| {
        format!(
            "failed to write results to '{}': {}",
            results_path.display(),
            error
        )
    })?;

    Ok(BuildCommandOutcome {
        batch: outcome,
        results_path,
    })
}

fn resolve_platforms(args: &BuildArgs) -> Result<Vec<PlatformKey>, String> {
    if args.all {
        return Ok(all_platform_keys());
    }
    if args.platforms.is_empty() {
        return Err("no platforms specified; list platform keys or pass --all".to_string());
    }
    let mut platforms = Vec::with_capacity(args.platforms.len());
    for raw in &args.platforms {
        let platform = raw
            .parse::<PlatformKey>()
            .map_err(|error| error.to_string())?;
        platforms.push(platform);
    }
    Ok(platforms)
}
