use std::path::Path;

use serde::Deserialize;

pub const SUMMARY_FILE_NAME: &str = "build_summary.json";

const SUCCESS_STATUS: &str = "success";

/// Structured self-report the engine may drop beside its output.
///
/// Untrusted input: the file is optional and so is every field in it.
/// Absence of the file, or of any field, falls back to exit-code and
/// filesystem inference. The fallback path is the primary design, not an
/// afterthought.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BuildSummary {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub build_size_mb: Option<f64>,
    #[serde(default, rename = "unity_version")]
    pub engine_version: Option<String>,
    #[serde(default)]
    pub scene_count: Option<u32>,
    #[serde(default)]
    pub warnings_count: Option<u32>,
}

impl BuildSummary {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }

    /// The product name the engine says it used, when it differs from what
    /// the run was configured with: the artifact was renamed mid-run.
    pub fn renamed_product(&self, configured_name: &str) -> Option<&str> {
        match self.product_name.as_deref() {
            Some(reported) if reported != configured_name => Some(reported),
            _ => None,
        }
    }
}

/// Outcome of looking for a self-report next to the expected artifact.
#[derive(Debug)]
pub enum SummaryLookup {
    /// No file at the expected location.
    Absent,
    /// File exists and parsed.
    Found(BuildSummary),
    /// File exists but could not be read or parsed; detection must degrade
    /// to the fallback tier, never crash.
    Unusable(String),
}

pub fn read_summary(dir: &Path) -> SummaryLookup {
    let path = dir.join(SUMMARY_FILE_NAME);
    if !path.exists() {
        return SummaryLookup::Absent;
    }
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) => return SummaryLookup::Unusable(error.to_string()),
    };
    match serde_json::from_str::<BuildSummary>(&contents) {
        Ok(summary) => SummaryLookup::Found(summary),
        Err(error) => SummaryLookup::Unusable(error.to_string()),
    }
}
