//! # Finprofile Profile Service
//!
//! This crate owns the domain rules of the system: profile validation, the
//! tier classification applied after every balance change, and the balance
//! mutation performed when a transaction is recorded.
//!
//! ## Architectural Principles
//!
//! - **No Global State:** The service holds nothing but a reference to its
//!   storage collaborator (`Arc<dyn ProfileStore>`). Swapping the in-memory
//!   backend for PostgreSQL never touches this crate.
//! - **Explicit Outcomes:** Operations against a possibly-missing profile
//!   return `UpdateOutcome` / `TransactionOutcome` instead of silently
//!   doing nothing, so the boundary layer can report 404 deterministically.
//!
//! ## Public API
//!
//! - `ProfileService`: The main struct containing all domain operations.
//! - `ProfileDraft` / `TransactionDraft`: Validated inputs for writes.
//! - `ServiceError`: The specific error types returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod service;

// Re-export the key components to create a clean, public-facing API.
pub use error::ServiceError;
pub use service::{
    ProfileDraft, ProfileService, TransactionDraft, TransactionOutcome, UpdateOutcome,
};
