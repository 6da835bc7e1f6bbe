use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed json in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown competition scope: {0}")]
    UnknownScope(String),

    #[error("statistic is undefined: {0}")]
    UndefinedStatistic(&'static str),
}

pub type Result<T> = std::result::Result<T, StatsError>;

impl StatsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return StatsError::NotFound(path.display().to_string());
        }
        StatsError::Io { path, source }
    }

    /// Failures while writing a cache entry. These never mean a requested
    /// resource is missing, so they are not mapped to `NotFound`.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StatsError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StatsError::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StatsError::NotFound(_))
    }

    /// Status code an HTTP boundary should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            StatsError::NotFound(_) => 404,
            _ => 500,
        }
    }
}
