/// Failures reported by the remote blob service, independent of the phase
/// they occurred in.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Resource not found")]
    NotFound,

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error(transparent)]
    Any(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Initialization-time failures: bad credentials, unreachable account,
/// container or blob resolution.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to resolve container: {0}")]
    Container(#[source] StorageError),

    #[error("Failed to resolve blob: {0}")]
    Blob(#[source] StorageError),
}

/// Per-message write failures. `NotInitialized` marks a sink that started in
/// degraded mode and holds no blob handle.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("No blob handle is available")]
    NotInitialized,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type InitResult<T> = std::result::Result<T, InitError>;
pub type WriteResult<T> = std::result::Result<T, WriteError>;

impl From<&azure_storage::ErrorKind> for StorageError {
    fn from(kind: &azure_storage::ErrorKind) -> Self {
        match kind {
            azure_storage::ErrorKind::HttpResponse {
                status: _,
                error_code,
            } => match error_code.as_ref().map(String::as_str) {
                Some("ContainerNotFound" | "BlobNotFound") => Self::NotFound,
                Some("AuthenticationFailed") => Self::AuthenticationFailed,
                _ => Self::Any(Box::new(kind.clone().into_error())),
            },
            azure_storage::ErrorKind::Credential => Self::AuthenticationFailed,
            _ => Self::Any(Box::new(kind.clone().into_error())),
        }
    }
}
