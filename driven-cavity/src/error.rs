use std::path::PathBuf;

use thiserror::Error;

pub type SolverResult<T> = Result<T, SolverError>;

/// Failures of a solver run.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Restart file that cannot be parsed
    #[error("Malformed restart file {path}:{line} - {message}")]
    Checkpoint {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Restart file written for a different grid
    #[error("Restart file has {found} cells, grid needs {expected}")]
    GridMismatch { expected: usize, found: usize },

    #[error("Solution diverged at iteration {iteration} (non-finite residual)")]
    Diverged { iteration: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SolverError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SolverError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn checkpoint(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        SolverError::Checkpoint {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
