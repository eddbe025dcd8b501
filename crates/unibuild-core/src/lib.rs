pub mod config;
pub mod events;
pub mod paths;
pub mod platform;
pub mod report;
pub mod result;

pub use config::{BuildConfig, ConfigError};
pub use events::{BuildEvent, BuildEvents, SilentEvents};
pub use platform::{all_platform_keys, registry, PlatformDescriptor, PlatformKey, PlatformKeyError};
pub use result::{BatchOutcome, BuildResult, BuildStatus};
