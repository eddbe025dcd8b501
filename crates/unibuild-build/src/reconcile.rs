use std::path::{Path, PathBuf};

use unibuild_core::config::BuildConfig;
use unibuild_core::paths;
use unibuild_core::platform::PlatformKey;
use unibuild_core::report::{read_summary, SummaryLookup};

use crate::engine::EngineExit;

const LOG_TAIL_LINES: usize = 20;
const SURFACED_ERROR_LINES: usize = 5;
const ERROR_KEYWORDS: &[&str] = &["error", "exception", "failed"];

/// A build the reconciler judged successful, with everything relocation
/// needs. `product_name` is the name the artifact actually carries on disk,
/// which differs from the configured one when the engine renamed the product
/// mid-run.
#[derive(Clone, Debug, PartialEq)]
pub struct ProducedArtifact {
    pub product_name: String,
    pub renamed: bool,
    pub intermediate_path: PathBuf,
    pub reported_size_mb: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Reconciliation {
    Produced(ProducedArtifact),
    Failed { reason: String, errors: Vec<String> },
}

/// Decide success or failure from the signals available, self-report first.
///
/// Tier 1: a parseable `build_summary.json` in the expected output folder is
/// authoritative regardless of exit code. Tier 2 (no usable summary):
/// success only when the exit code is zero **and** the expected output
/// exists; the engine has been seen exiting zero with nothing produced.
pub fn reconcile(config: &BuildConfig, platform: PlatformKey, exit: &EngineExit) -> Reconciliation {
    let expected = paths::engine_output_path(config, platform, &config.product_name);
    let version_dir = expected
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.project_root.clone());

    match read_summary(&version_dir) {
        SummaryLookup::Found(summary) => {
            let (product_name, renamed) = match summary.renamed_product(&config.product_name) {
                Some(reported) => (reported.to_string(), true),
                None => (config.product_name.clone(), false),
            };
            if summary.is_success() {
                let intermediate_path = if renamed {
                    paths::engine_output_path(config, platform, &product_name)
                } else {
                    expected
                };
                Reconciliation::Produced(ProducedArtifact {
                    product_name,
                    renamed,
                    intermediate_path,
                    reported_size_mb: summary.build_size_mb,
                })
            } else {
                Reconciliation::Failed {
                    reason: "engine reported build failure".to_string(),
                    errors: summary.errors,
                }
            }
        }
        SummaryLookup::Unusable(detail) => {
            tracing::warn!(
                platform = platform.as_str(),
                detail,
                "build summary unreadable, falling back to exit-code detection"
            );
            reconcile_without_summary(config, platform, exit, &expected)
        }
        SummaryLookup::Absent => reconcile_without_summary(config, platform, exit, &expected),
    }
}

fn reconcile_without_summary(
    config: &BuildConfig,
    platform: PlatformKey,
    exit: &EngineExit,
    expected: &Path,
) -> Reconciliation {
    if exit.success() && expected.exists() {
        return Reconciliation::Produced(ProducedArtifact {
            product_name: config.product_name.clone(),
            renamed: false,
            intermediate_path: expected.to_path_buf(),
            reported_size_mb: None,
        });
    }
    let reason = if !exit.success() {
        match exit.code {
            Some(code) => format!("engine exited with code {}", code),
            None => "engine terminated by signal".to_string(),
        }
    } else {
        format!("expected output not found at '{}'", expected.display())
    };
    Reconciliation::Failed {
        reason,
        errors: scrape_log_errors(&paths::build_log_path(config, platform)),
    }
}

/// Last resort diagnostics: the tail of the engine log, filtered to lines
/// that look like errors.
pub fn scrape_log_errors(log_path: &Path) -> Vec<String> {
    let contents = match std::fs::read_to_string(log_path) {
        Ok(contents) => contents,
        Err(_) => return Vec::new(),
    };
    let lines: Vec<&str> = contents.lines().collect();
    let tail_start = lines.len().saturating_sub(LOG_TAIL_LINES);
    let matches: Vec<String> = lines[tail_start..]
        .iter()
        .filter(|line| {
            let lowered = line.to_lowercase();
            ERROR_KEYWORDS
                .iter()
                .any(|keyword| lowered.contains(keyword))
        })
        .map(|line| line.trim().to_string())
        .collect();
    let keep_from = matches.len().saturating_sub(SURFACED_ERROR_LINES);
    matches[keep_from..].to_vec()
}
