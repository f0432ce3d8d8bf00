//! Shared utilities and common types for the i-numa backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Webhook signature crypto (HMAC-SHA256)
//! - Common validation logic (bank identifiers)

pub mod crypto;
pub mod validation;
