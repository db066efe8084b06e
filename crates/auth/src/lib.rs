//! # Finprofile Auth
//!
//! Bearer-token issuance and validation for the HTTP surface. Login hands
//! out an HMAC-signed JWT; protected routes validate it on every request.
//! Credential checking itself lives at the boundary, this crate only deals
//! in tokens.

// Declare the modules that make up this crate.
pub mod error;
pub mod token;

// Re-export the core types to provide a clean public API.
pub use error::AuthError;
pub use token::{Claims, TokenService};
