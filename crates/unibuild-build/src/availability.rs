use std::collections::HashMap;

use unibuild_core::platform::PlatformKey;

/// Snapshot of the host the orchestrator is running on. Pure data, so the
/// availability rules stay a function of their inputs.
#[derive(Clone, Debug)]
pub struct HostEnvironment {
    os: String,
    vars: HashMap<String, String>,
}

impl HostEnvironment {
    pub fn detect() -> Self {
        HostEnvironment {
            os: std::env::consts::OS.to_string(),
            vars: std::env::vars().collect(),
        }
    }

    pub fn with_vars(os: impl Into<String>, vars: HashMap<String, String>) -> Self {
        HostEnvironment {
            os: os.into(),
            vars,
        }
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

/// Whether a platform can be attempted at all. Evaluated before any process
/// is spawned; advisory notes accompany a `Ready` verdict without blocking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Availability {
    Ready { advisory: Option<String> },
    Unavailable { reason: String },
}

pub fn check_platform(platform: PlatformKey, host: &HostEnvironment) -> Availability {
    let descriptor = platform.descriptor();
    if let Some(required) = descriptor.host_requirement {
        if host.os() != required.consts_name() {
            return Availability::Unavailable {
                reason: format!(
                    "{} builds only available on {}",
                    descriptor.display_name, required
                ),
            };
        }
    }
    if let Some(var) = descriptor.required_sdk_env {
        let present = host.var(var).map(|value| !value.is_empty()).unwrap_or(false);
        if !present {
            return Availability::Unavailable {
                reason: format!("{} environment variable not set", var),
            };
        }
    }
    Availability::Ready {
        advisory: descriptor.advisory.map(str::to_string),
    }
}
