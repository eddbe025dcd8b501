use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::platform::PlatformKey;

/// Terminal classification of one platform attempt.
///
/// `Skipped`: unavailable, never attempted. `Failed`: attempted but no
/// usable artifact (hook failure, bad exit with missing output, self-reported
/// failure, relocation failure). `Error`: orchestration itself misbehaved
/// (spawn failure, unanticipated filesystem error).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Success,
    Failed,
    Skipped,
    Error,
}

/// One record per platform per run, appended in request order and immutable
/// afterwards. This list is the sole artifact exposed to reporting and
/// distribution collaborators.
#[derive(Clone, Debug, Serialize)]
pub struct BuildResult {
    pub platform: PlatformKey,
    pub status: BuildStatus,
    #[serde(rename = "time", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_mb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl BuildResult {
    pub fn success(
        platform: PlatformKey,
        elapsed: Duration,
        size_mb: f64,
        output_path: PathBuf,
    ) -> Self {
        BuildResult {
            platform,
            status: BuildStatus::Success,
            elapsed,
            size_mb: Some(size_mb),
            output_path: Some(output_path),
            reason: None,
            errors: Vec::new(),
        }
    }

    pub fn failed(platform: PlatformKey, elapsed: Duration, reason: impl Into<String>) -> Self {
        BuildResult {
            platform,
            status: BuildStatus::Failed,
            elapsed,
            size_mb: None,
            output_path: None,
            reason: Some(reason.into()),
            errors: Vec::new(),
        }
    }

    pub fn skipped(platform: PlatformKey, reason: impl Into<String>) -> Self {
        BuildResult {
            platform,
            status: BuildStatus::Skipped,
            elapsed: Duration::ZERO,
            size_mb: None,
            output_path: None,
            reason: Some(reason.into()),
            errors: Vec::new(),
        }
    }

    pub fn error(platform: PlatformKey, elapsed: Duration, reason: impl Into<String>) -> Self {
        BuildResult {
            platform,
            status: BuildStatus::Error,
            elapsed,
            size_mb: None,
            output_path: None,
            reason: Some(reason.into()),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == BuildStatus::Success
    }
}

impl Serialize for PlatformKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

fn serialize_secs<S>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// Aggregate of a whole batch run.
#[derive(Clone, Debug, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<BuildResult>,
    pub success_count: usize,
    #[serde(rename = "total_time", serialize_with = "serialize_secs")]
    pub total_elapsed: Duration,
}

impl BatchOutcome {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
