use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("The provided token is invalid.")]
    InvalidToken,

    #[error("The provided token has expired.")]
    TokenExpired,
}
