//! Common types and utilities for the icnfwd forwarding plane.
//!
//! This crate provides the value objects shared by the forwarding engine and
//! the administrative tooling: hierarchical names, the three NDN packet kinds
//! and their TLV wire form, plus the error and metrics types used throughout.

pub mod error;
pub mod metrics;
pub mod ndn;
pub mod tlv;
pub mod types;

/// Reexport of common types
pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
