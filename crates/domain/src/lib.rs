//! Domain layer for the i-numa backend.
//!
//! This crate contains:
//! - Domain models (profiles, offers, carts, offer plates, quotes, folders,
//!   notifications, payment info)
//! - The offer plate and quote status state machines
//! - Business logic services (pricing, notification composition)

pub mod models;
pub mod services;
