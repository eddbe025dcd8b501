use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "unibuild.yaml";

/// Configuration owned by one whole orchestration run.
///
/// Read-only after construction. The engine may be observed to rename the
/// product mid-run via its self-report; that drift is carried as a local
/// override by the reconciler and is never written back here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    pub project_root: PathBuf,
    pub product_name: String,
    pub product_version: String,
    pub engine_path: PathBuf,
    pub pre_build_hook: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    MissingConfig { path: String },
    MissingField { path: String, field: &'static str },
    EngineNotFound { path: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(error) => write!(f, "failed to read config: {}", error),
            ConfigError::Yaml(error) => write!(f, "failed to parse config: {}", error),
            ConfigError::MissingConfig { path } => {
                write!(f, "config file '{}' not found", path)
            }
            ConfigError::MissingField { path, field } => {
                write!(f, "config '{}' must declare {}", path, field)
            }
            ConfigError::EngineNotFound { path } => {
                write!(f, "engine executable not found at '{}'", path)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnibuildConfig {
    #[serde(default)]
    product: ProductConfig,
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    hooks: HooksConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductConfig {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EngineConfig {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HooksConfig {
    #[serde(default)]
    pre_build: Option<String>,
}

/// Load `unibuild.yaml` from the project root.
///
/// The engine path must point at an existing executable before anything is
/// spawned against it; product name and version are required because every
/// output path derives from them.
pub fn load(project_root: &Path) -> Result<BuildConfig, ConfigError> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Err(ConfigError::MissingConfig {
            path: path.display().to_string(),
        });
    }
    let contents = std::fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let parsed: UnibuildConfig = serde_yaml::from_str(&contents).map_err(ConfigError::Yaml)?;
    let display_path = path.display().to_string();

    let product_name = parsed.product.name.ok_or(ConfigError::MissingField {
        path: display_path.clone(),
        field: "product.name",
    })?;
    let product_version = parsed.product.version.ok_or(ConfigError::MissingField {
        path: display_path.clone(),
        field: "product.version",
    })?;
    let engine_path = parsed.engine.path.ok_or(ConfigError::MissingField {
        path: display_path,
        field: "engine.path",
    })?;
    let engine_path = PathBuf::from(engine_path);
    if !engine_path.exists() {
        return Err(ConfigError::EngineNotFound {
            path: engine_path.display().to_string(),
        });
    }

    Ok(BuildConfig {
        project_root: project_root.to_path_buf(),
        product_name,
        product_version,
        engine_path,
        pre_build_hook: parsed.hooks.pre_build,
    })
}
