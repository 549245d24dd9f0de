use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while loading or validating character data.
///
/// The per-frame path never produces these; it degrades to hidden markers
/// and skipped effects instead.
#[derive(Debug)]
pub enum VrError {
    /// Reading a config or nav mesh file failed
    Io { path: PathBuf, source: io::Error },

    /// JSON did not match the expected shape
    Parse {
        context: String,
        source: serde_json::Error,
    },

    /// A value was present but out of range
    Validation { item: String, reason: String },
}

impl VrError {
    pub fn validation(item: impl Into<String>, reason: impl Into<String>) -> Self {
        VrError::Validation {
            item: item.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for VrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VrError::Io { path, source } => {
                write!(f, "I/O error reading '{}': {}", path.display(), source)
            }
            VrError::Parse { context, source } => {
                write!(f, "Failed to parse {}: {}", context, source)
            }
            VrError::Validation { item, reason } => {
                write!(f, "Validation failed for '{}': {}", item, reason)
            }
        }
    }
}

impl std::error::Error for VrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VrError::Io { source, .. } => Some(source),
            VrError::Parse { source, .. } => Some(source),
            VrError::Validation { .. } => None,
        }
    }
}

pub type VrResult<T> = Result<T, VrError>;
