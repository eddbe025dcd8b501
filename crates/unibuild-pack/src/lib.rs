pub mod archive;
pub mod relocate;

pub use archive::zip_artifact;
pub use relocate::{
    path_size, relocate_artifact, relocate_layout, relocate_scattered, size_in_mb, RelocateError,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackError {
    InvalidRequest { message: String },
    Io { message: String },
}

impl std::fmt::Display for PackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackError::InvalidRequest { message } => write!(f, "invalid request: {}", message),
            PackError::Io { message } => write!(f, "io error: {}", message),
        }
    }
}

impl std::error::Error for PackError {}
