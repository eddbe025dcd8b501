use std::time::Duration;

use unibuild_core::config::BuildConfig;
use unibuild_core::events::{BuildEvent, BuildEvents};

use crate::engine::{EngineInvocation, EngineRunner, TimedExit};

/// Hard ceiling on pre-build hook execution. Hooks are expected to be quick
/// setup routines; anything still running after this is stuck.
pub const HOOK_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookOutcome {
    Succeeded,
    Failed(HookFailure),
}

/// Distinct diagnostics for the ways a hook can fail. All of them abort the
/// platform build the same way; only the message differs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookFailure {
    NonZeroExit(Option<i32>),
    TimedOut,
    SpawnFailed(String),
}

impl std::fmt::Display for HookFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookFailure::NonZeroExit(Some(code)) => {
                write!(f, "hook exited with code {}", code)
            }
            HookFailure::NonZeroExit(None) => write!(f, "hook terminated by signal"),
            HookFailure::TimedOut => {
                write!(f, "hook exceeded {} second timeout", HOOK_TIMEOUT.as_secs())
            }
            HookFailure::SpawnFailed(message) => write!(f, "hook failed to start: {}", message),
        }
    }
}

/// Pick the hook to run, if any: an explicit override beats the configured
/// hook, and `skip_hook` suppresses both.
pub fn resolve_hook<'a>(
    config: &'a BuildConfig,
    hook_override: Option<&'a str>,
    skip_hook: bool,
) -> Option<&'a str> {
    if skip_hook {
        return None;
    }
    hook_override.or(config.pre_build_hook.as_deref())
}

/// Run a named routine in the engine ahead of the main build, bounded by
/// [`HOOK_TIMEOUT`]. Any failure here must abort the platform build without
/// the main dispatch ever happening.
pub fn run_pre_build_hook(
    runner: &dyn EngineRunner,
    config: &BuildConfig,
    hook_name: &str,
    events: &dyn BuildEvents,
) -> HookOutcome {
    events.notify(BuildEvent::HookStarted {
        hook: hook_name.to_string(),
    });
    let invocation = EngineInvocation::for_hook(config, hook_name);
    let outcome = match runner.run_with_timeout(&invocation, HOOK_TIMEOUT) {
        Ok(TimedExit::Completed(exit)) if exit.success() => HookOutcome::Succeeded,
        Ok(TimedExit::Completed(exit)) => HookOutcome::Failed(HookFailure::NonZeroExit(exit.code)),
        Ok(TimedExit::TimedOut) => {
            tracing::warn!(hook = hook_name, "pre-build hook timed out, process killed");
            HookOutcome::Failed(HookFailure::TimedOut)
        }
        Err(error) => HookOutcome::Failed(HookFailure::SpawnFailed(error.message)),
    };
    events.notify(BuildEvent::HookFinished {
        hook: hook_name.to_string(),
        ok: outcome == HookOutcome::Succeeded,
    });
    outcome
}
