use std::path::PathBuf;

use unibuild_core::platform::PlatformKey;

/// What a distribution backend needs to ship one successful build: the final
/// artifact path from its result record plus naming metadata.
#[derive(Clone, Debug)]
pub struct DistributeRequest {
    pub platform: PlatformKey,
    pub artifact_path: PathBuf,
    pub product_name: String,
    pub product_version: String,
}

/// What every backend reports back, successful or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistributeResult {
    pub success: bool,
    pub message: String,
}

impl DistributeResult {
    pub fn ok(message: impl Into<String>) -> Self {
        DistributeResult {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        DistributeResult {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DistributeError {
    MissingArtifact { path: String },
    InvalidWebBuild { path: String },
    Io(String),
}

impl std::fmt::Display for DistributeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributeError::MissingArtifact { path } => {
                write!(f, "build path not found: {}", path)
            }
            DistributeError::InvalidWebBuild { path } => {
                write!(f, "not a valid web build (index.html not found in '{}')", path)
            }
            DistributeError::Io(message) => write!(f, "io error: {}", message),
        }
    }
}

impl std::error::Error for DistributeError {}

pub trait Distributor {
    fn distribute(&self, request: &DistributeRequest) -> DistributeResult;
}

/// Validate, then hand the request to the backend. Backends can rely on the
/// artifact existing and looking like what the platform produces.
pub fn distribute_artifact<D: Distributor>(
    distributor: &D,
    request: &DistributeRequest,
) -> DistributeResult {
    if let Err(error) = validate_request(request) {
        return DistributeResult::failed(error.to_string());
    }
    distributor.distribute(request)
}

fn validate_request(request: &DistributeRequest) -> Result<(), DistributeError> {
    if !request.artifact_path.exists() {
        return Err(DistributeError::MissingArtifact {
            path: request.artifact_path.display().to_string(),
        });
    }
    if request.platform == PlatformKey::Webgl
        && !request.artifact_path.join("index.html").exists()
    {
        return Err(DistributeError::InvalidWebBuild {
            path: request.artifact_path.display().to_string(),
        });
    }
    Ok(())
}
