//! extender-core: Core types for the image locality extender
//!
//! This crate provides the fundamental types shared by the extender crates:
//! - Pod, node and host priority wire types
//! - Configuration types
//! - Error handling

pub mod config;
pub mod error;
pub mod model;

pub use config::*;
pub use error::*;
pub use model::*;
