pub mod key;

pub use key::{
    all_platform_keys, registry, HostOs, OutputLayout, PlatformDescriptor, PlatformKey,
    PlatformKeyError,
};
