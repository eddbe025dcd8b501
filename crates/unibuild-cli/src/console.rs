use unibuild_core::events::{BuildEvent, BuildEvents};
use unibuild_core::result::{BatchOutcome, BuildStatus};

/// Console sink for pipeline progress. The orchestration crates never print
/// on their own; everything user-visible flows through here.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleEvents;

impl BuildEvents for ConsoleEvents {
    fn notify(&self, event: BuildEvent) {
        match event {
            BuildEvent::PlatformStarted {
                platform,
                destination,
            } => {
                println!("\nBuilding for {}...", platform.display_name());
                println!("  output: {}", destination.display());
            }
            BuildEvent::PlatformSkipped { platform, reason } => {
                println!("Skipping {}: {}", platform.display_name(), reason);
            }
            BuildEvent::Advisory { note, .. } => {
                println!("Note: {}", note);
            }
            BuildEvent::HookStarted { hook } => {
                println!("  running pre-build hook {}...", hook);
            }
            BuildEvent::HookFinished { hook, ok } => {
                if ok {
                    println!("  hook {} completed", hook);
                } else {
                    println!("  hook {} failed", hook);
                }
            }
            BuildEvent::EngineExited {
                platform: _,
                exit_code,
            } => match exit_code {
                Some(code) => println!("  engine exit code: {}", code),
                None => println!("  engine terminated by signal"),
            },
            BuildEvent::ProductRenamed {
                reported_name, ..
            } => {
                println!("  engine renamed the product to '{}'", reported_name);
            }
            BuildEvent::BuildSucceeded {
                platform,
                elapsed,
                size_mb,
            } => {
                println!("{} build completed!", platform.display_name());
                println!("  time: {:.1} seconds", elapsed.as_secs_f64());
                println!("  size: {:.1} MB", size_mb);
            }
            BuildEvent::BuildFailed {
                platform,
                reason,
                errors,
            } => {
                println!("{} build failed: {}", platform.display_name(), reason);
                for error in errors {
                    println!("    {}", error);
                }
            }
        }
    }
}

pub fn print_batch_summary(outcome: &BatchOutcome) {
    println!("\nBuild Summary");
    println!("-------------");
    for result in &outcome.results {
        let status = match result.status {
            BuildStatus::Success => "success",
            BuildStatus::Failed => "failed",
            BuildStatus::Skipped => "skipped",
            BuildStatus::Error => "error",
        };
        let detail = match result.status {
            BuildStatus::Success => format!(
                "{:.1}s, {:.1} MB",
                result.elapsed.as_secs_f64(),
                result.size_mb.unwrap_or(0.0)
            ),
            _ => result.reason.clone().unwrap_or_default(),
        };
        println!(
            "  {:<10} {:<8} {}",
            result.platform.display_name(),
            status,
            detail
        );
    }
    println!("\nTotal platforms: {}", outcome.results.len());
    println!("Successful: {}", outcome.success_count);
    let total = outcome.total_elapsed.as_secs_f64();
    println!("Total time: {:.1} seconds ({:.1} minutes)", total, total / 60.0);
}
