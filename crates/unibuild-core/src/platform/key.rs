use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlatformKey {
    Windows,
    Macos,
    Android,
    Webgl,
}

impl PlatformKey {
    pub fn as_str(self) -> &'static str {
        self.descriptor().key_str
    }

    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }

    pub fn build_method(self) -> &'static str {
        self.descriptor().build_method
    }

    /// Extension of the produced artifact; `None` means the engine emits a
    /// directory tree rather than a single file.
    pub fn artifact_ext(self) -> Option<&'static str> {
        self.descriptor().artifact_ext
    }

    pub fn output_layout(self) -> OutputLayout {
        self.descriptor().output_layout
    }

    /// Capitalized directory name under `Builds/`.
    pub fn build_dir_name(self) -> &'static str {
        self.descriptor().build_dir_name
    }

    pub fn descriptor(self) -> &'static PlatformDescriptor {
        registry()
            .iter()
            .find(|entry| entry.key == self)
            .expect("platform key missing from registry")
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformKey {
    type Err = PlatformKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if !is_valid_key_format(value) {
            return Err(PlatformKeyError::InvalidFormat);
        }
        registry()
            .iter()
            .find(|entry| entry.key_str == value)
            .map(|entry| entry.key)
            .ok_or_else(|| PlatformKeyError::UnknownKey(value.to_string()))
    }
}

/// Host operating system a platform build may require.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostOs {
    Windows,
    Macos,
    Linux,
}

impl HostOs {
    /// The identifier `std::env::consts::OS` reports for this host.
    pub fn consts_name(self) -> &'static str {
        match self {
            HostOs::Windows => "windows",
            HostOs::Macos => "macos",
            HostOs::Linux => "linux",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            HostOs::Windows => "Windows",
            HostOs::Macos => "macOS",
            HostOs::Linux => "Linux",
        };
        f.write_str(value)
    }
}

/// How the engine lays out its output under the version folder.
///
/// `Scattered` platforms deposit loose sibling files and directories directly
/// under the version folder instead of one self-contained entry, and need
/// entry-by-entry relocation. Which platforms scatter is registry data, not
/// something the relocation code decides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputLayout {
    Bundled,
    Scattered,
}

pub struct PlatformDescriptor {
    pub key: PlatformKey,
    pub key_str: &'static str,
    pub display_name: &'static str,
    pub build_dir_name: &'static str,
    pub build_method: &'static str,
    pub artifact_ext: Option<&'static str>,
    pub output_layout: OutputLayout,
    pub host_requirement: Option<HostOs>,
    pub required_sdk_env: Option<&'static str>,
    pub advisory: Option<&'static str>,
}

static PLATFORM_REGISTRY: &[PlatformDescriptor] = &[
    PlatformDescriptor {
        key: PlatformKey::Windows,
        key_str: "windows",
        display_name: "Windows",
        build_dir_name: "Windows",
        build_method: "CommandLineBuild.BuildWindows",
        artifact_ext: Some(".exe"),
        // The editor drops the exe next to its data directories instead of
        // one bundle.
        output_layout: OutputLayout::Scattered,
        host_requirement: None,
        required_sdk_env: None,
        advisory: None,
    },
    PlatformDescriptor {
        key: PlatformKey::Macos,
        key_str: "mac",
        display_name: "macOS",
        build_dir_name: "Mac",
        build_method: "CommandLineBuild.BuildMac",
        artifact_ext: Some(".app"),
        output_layout: OutputLayout::Bundled,
        host_requirement: Some(HostOs::Macos),
        required_sdk_env: None,
        advisory: None,
    },
    PlatformDescriptor {
        key: PlatformKey::Android,
        key_str: "android",
        display_name: "Android",
        build_dir_name: "Android",
        build_method: "CommandLineBuild.BuildAndroid",
        artifact_ext: Some(".apk"),
        output_layout: OutputLayout::Bundled,
        host_requirement: None,
        required_sdk_env: Some("ANDROID_HOME"),
        advisory: None,
    },
    PlatformDescriptor {
        key: PlatformKey::Webgl,
        key_str: "webgl",
        display_name: "WebGL",
        build_dir_name: "Webgl",
        build_method: "CommandLineBuild.BuildWebGL",
        artifact_ext: None,
        output_layout: OutputLayout::Bundled,
        host_requirement: None,
        required_sdk_env: None,
        advisory: Some("WebGL builds require significant memory (8GB+ recommended)"),
    },
];

pub fn registry() -> &'static [PlatformDescriptor] {
    PLATFORM_REGISTRY
}

pub fn all_platform_keys() -> Vec<PlatformKey> {
    registry().iter().map(|entry| entry.key).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformKeyError {
    InvalidFormat,
    UnknownKey(String),
}

impl fmt::Display for PlatformKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKeyError::InvalidFormat => {
                write!(f, "platform key must be lowercase ascii")
            }
            PlatformKeyError::UnknownKey(value) => {
                write!(f, "unknown platform key '{}'", value)
            }
        }
    }
}

impl std::error::Error for PlatformKeyError {}

fn is_valid_key_format(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_lowercase())
}
