//! Sward Core - Foundational types for the Sward vegetation client
//!
//! This crate provides the core types that all other Sward crates depend on:
//! - `NodeId` - Stable scene node identifiers
//! - Error types and Result alias

mod error;
mod id;

pub use error::{Result, SwardError};
pub use id::NodeId;
