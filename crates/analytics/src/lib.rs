//! # Finprofile Analytics Engine
//!
//! This crate derives population-level statistics from the current set of
//! user profiles and transactions.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `AnalyticsEngine` is a stateless
//!   calculator. It takes the raw profile and transaction sets as input and
//!   produces an `AnalyticsReport` as output, with no side effects and no
//!   caching. This makes it highly reliable and easy to test.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The main struct that contains the aggregation logic.
//! - `AnalyticsReport`: The standardized snapshot of the user population.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use report::{AnalyticsReport, RecentTransaction};
