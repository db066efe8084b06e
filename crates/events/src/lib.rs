//! # Finprofile Events
//!
//! This crate defines the real-time event structures used for WebSocket
//! communication between the backend and connected clients.
//!
//! As a Layer 0 crate, it depends only on `core-types` and provides the
//! definitive language for all change notifications pushed to subscribers.

// Declare the modules that make up this crate.
pub mod messages;

// Re-export the core types to provide a clean public API.
pub use messages::{TransactionNotice, WsMessage};
