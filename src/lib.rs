//! Library surface for habitfetch.
//!
//! The binary and the integration tests both build on these modules.

pub mod cache;
pub mod config;
pub mod habitica;
