use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// A domain invariant was violated by the caller's input. The message is
    /// safe to surface to clients.
    #[error("{0}")]
    InvalidArgument(String),

    /// The storage collaborator failed. Propagated unmodified; the boundary
    /// layer maps it to a generic failure response.
    #[error("Storage error: {0}")]
    Database(#[from] DbError),
}
