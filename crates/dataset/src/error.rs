use dataset_workspace::WorkspaceError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("element {0} already exists")]
    DuplicateName(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("{0} is too large (over 100 MiB)")]
    SizeExceeded(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid record: {0}")]
    Validation(String),

    #[error("{0}")]
    Other(String),
}

impl From<WorkspaceError> for DatasetError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::NotFound(key) => DatasetError::NotFound(key),
            WorkspaceError::Io(err) => DatasetError::Io(err),
        }
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        DatasetError::Validation(err.to_string())
    }
}
