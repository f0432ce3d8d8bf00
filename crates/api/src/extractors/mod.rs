//! Custom Axum extractors.
//!
//! Extractors for resolving and validating request context.

pub mod actor;

#[allow(unused_imports)] // Re-exports for downstream use
pub use actor::{Actor, ACTOR_ID_HEADER};
