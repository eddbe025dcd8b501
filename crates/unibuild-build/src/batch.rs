use std::time::Instant;

use unibuild_core::config::BuildConfig;
use unibuild_core::events::{BuildEvent, BuildEvents};
use unibuild_core::paths::{self, BuildStamp};
use unibuild_core::platform::PlatformKey;
use unibuild_core::result::{BatchOutcome, BuildResult};
use unibuild_pack::relocate::{relocate_layout, size_in_mb, RelocateError};

use crate::availability::{check_platform, Availability, HostEnvironment};
use crate::engine::{EngineInvocation, EngineRunner};
use crate::hook::{resolve_hook, run_pre_build_hook, HookOutcome};
use crate::reconcile::{reconcile, Reconciliation};

const SURFACED_ERRORS: usize = 5;

/// Drives the whole per-platform pipeline over an ordered batch:
/// availability, optional pre-build hook, dispatch, reconciliation,
/// relocation. Strictly sequential; one platform's failure never stops the
/// platforms after it.
pub struct BatchRunner<'a> {
    config: &'a BuildConfig,
    runner: &'a dyn EngineRunner,
    events: &'a dyn BuildEvents,
    host: HostEnvironment,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        config: &'a BuildConfig,
        runner: &'a dyn EngineRunner,
        events: &'a dyn BuildEvents,
    ) -> Self {
        BatchRunner {
            config,
            runner,
            events,
            host: HostEnvironment::detect(),
        }
    }

    pub fn with_host(mut self, host: HostEnvironment) -> Self {
        self.host = host;
        self
    }

    pub fn run(
        &self,
        platforms: &[PlatformKey],
        hook_override: Option<&str>,
        skip_hook: bool,
    ) -> BatchOutcome {
        let batch_start = Instant::now();
        let mut results = Vec::with_capacity(platforms.len());
        for &platform in platforms {
            results.push(self.build_platform(platform, hook_override, skip_hook));
        }
        let success_count = results.iter().filter(|result| result.is_success()).count();
        BatchOutcome {
            results,
            success_count,
            total_elapsed: batch_start.elapsed(),
        }
    }

    fn build_platform(
        &self,
        platform: PlatformKey,
        hook_override: Option<&str>,
        skip_hook: bool,
    ) -> BuildResult {
        match check_platform(platform, &self.host) {
            Availability::Unavailable { reason } => {
                self.events.notify(BuildEvent::PlatformSkipped {
                    platform,
                    reason: reason.clone(),
                });
                return BuildResult::skipped(platform, reason);
            }
            Availability::Ready { advisory } => {
                if let Some(note) = advisory {
                    self.events.notify(BuildEvent::Advisory { platform, note });
                }
            }
        }

        let started = Instant::now();
        // One clock sample per attempt; every path for this platform derives
        // from it.
        let stamp = BuildStamp::now();

        let destination = paths::stamped_output_path(
            self.config,
            platform,
            &self.config.product_name,
            &stamp,
        );
        if let Err(error) = self.prepare_directories(platform, &stamp) {
            return BuildResult::error(platform, started.elapsed(), error);
        }
        self.events.notify(BuildEvent::PlatformStarted {
            platform,
            destination,
        });

        if let Some(hook_name) = resolve_hook(self.config, hook_override, skip_hook) {
            if let HookOutcome::Failed(failure) =
                run_pre_build_hook(self.runner, self.config, hook_name, self.events)
            {
                let result =
                    BuildResult::failed(platform, started.elapsed(), "pre-build hook failed")
                        .with_errors(vec![failure.to_string()]);
                self.notify_failure(&result);
                return result;
            }
        }

        let invocation = EngineInvocation::for_build(self.config, platform);
        let exit = match self.runner.run(&invocation) {
            Ok(exit) => exit,
            Err(error) => {
                let result = BuildResult::error(platform, started.elapsed(), error.message);
                self.notify_failure(&result);
                return result;
            }
        };
        self.events.notify(BuildEvent::EngineExited {
            platform,
            exit_code: exit.code,
        });

        let produced = match reconcile(self.config, platform, &exit) {
            Reconciliation::Produced(produced) => produced,
            Reconciliation::Failed { reason, errors } => {
                let result =
                    BuildResult::failed(platform, started.elapsed(), reason).with_errors(errors);
                self.notify_failure(&result);
                return result;
            }
        };
        if produced.renamed {
            self.events.notify(BuildEvent::ProductRenamed {
                platform,
                reported_name: produced.product_name.clone(),
            });
        }

        let final_path =
            paths::stamped_output_path(self.config, platform, &produced.product_name, &stamp);
        let moved = relocate_layout(
            platform.output_layout(),
            &produced.intermediate_path,
            &paths::stamped_output_dir(self.config, platform, &stamp),
            &final_path,
        );
        let bytes = match moved {
            Ok(bytes) => bytes,
            Err(RelocateError::MissingSource { path }) => {
                let result = BuildResult::failed(
                    platform,
                    started.elapsed(),
                    format!("expected output not found at '{}'", path),
                );
                self.notify_failure(&result);
                return result;
            }
            Err(error) => {
                let result = BuildResult::error(platform, started.elapsed(), error.to_string());
                self.notify_failure(&result);
                return result;
            }
        };
        if !final_path.exists() {
            // A success record must point at an artifact that exists.
            let result = BuildResult::failed(
                platform,
                started.elapsed(),
                format!("artifact missing at '{}' after relocation", final_path.display()),
            );
            self.notify_failure(&result);
            return result;
        }

        let size_mb = produced.reported_size_mb.unwrap_or_else(|| size_in_mb(bytes));
        let elapsed = started.elapsed();
        self.events.notify(BuildEvent::BuildSucceeded {
            platform,
            elapsed,
            size_mb,
        });
        BuildResult::success(platform, elapsed, size_mb, final_path)
    }

    fn prepare_directories(&self, platform: PlatformKey, stamp: &BuildStamp) -> Result<(), String> {
        let stamped_dir = paths::stamped_output_dir(self.config, platform, stamp);
        paths::ensure_dir(&stamped_dir).map_err(|error| {
            format!(
                "failed to create output dir '{}': {}",
                stamped_dir.display(),
                error
            )
        })?;
        let log_path = paths::build_log_path(self.config, platform);
        if let Some(log_dir) = log_path.parent() {
            paths::ensure_dir(log_dir).map_err(|error| {
                format!("failed to create log dir '{}': {}", log_dir.display(), error)
            })?;
        }
        Ok(())
    }

    fn notify_failure(&self, result: &BuildResult) {
        self.events.notify(BuildEvent::BuildFailed {
            platform: result.platform,
            reason: result.reason.clone().unwrap_or_default(),
            errors: result.errors.iter().take(SURFACED_ERRORS).cloned().collect(),
        });
    }
}
