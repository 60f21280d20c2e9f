use thiserror::Error;

/// Session orchestration errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("network error: {0}")]
    Net(#[from] aulos_net::NetError),

    #[error("manifest error: {0}")]
    Manifest(#[from] aulos_manifest::ManifestError),

    #[error("ABR error: {0}")]
    Abr(#[from] aulos_abr::AbrError),
}

pub type SessionResult<T> = Result<T, SessionError>;
