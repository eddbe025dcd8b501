use std::path::PathBuf;
use std::time::Duration;

use crate::platform::PlatformKey;

/// Progress notifications emitted by the orchestration pipeline.
///
/// Components receive a `&dyn BuildEvents` explicitly instead of writing to
/// a process-wide console.
#[derive(Clone, Debug)]
pub enum BuildEvent {
    PlatformStarted {
        platform: PlatformKey,
        destination: PathBuf,
    },
    PlatformSkipped {
        platform: PlatformKey,
        reason: String,
    },
    Advisory {
        platform: PlatformKey,
        note: String,
    },
    HookStarted {
        hook: String,
    },
    HookFinished {
        hook: String,
        ok: bool,
    },
    EngineExited {
        platform: PlatformKey,
        exit_code: Option<i32>,
    },
    ProductRenamed {
        platform: PlatformKey,
        reported_name: String,
    },
    BuildSucceeded {
        platform: PlatformKey,
        elapsed: Duration,
        size_mb: f64,
    },
    BuildFailed {
        platform: PlatformKey,
        reason: String,
        errors: Vec<String>,
    },
}

pub trait BuildEvents {
    fn notify(&self, event: BuildEvent);
}

/// Discards every event. Handy default for tests and embedders that only
/// care about the result records.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentEvents;

impl BuildEvents for SilentEvents {
    fn notify(&self, _event: BuildEvent) {}
}
