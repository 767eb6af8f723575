use std::io;
use std::path::PathBuf;

/// Every way an import run can fail. All of them are fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Configuration: {0}")]
    Configuration(String),

    #[error("Path {}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Metadata {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },

    #[error("Write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ImportError {
    pub fn path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ImportError::Path {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ImportError::Write {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ImportError::Configuration(_)
            | ImportError::Path { .. }
            | ImportError::Copy { .. }
            | ImportError::Metadata { .. }
            | ImportError::Write { .. } => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
