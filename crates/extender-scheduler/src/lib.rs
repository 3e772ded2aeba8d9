//! extender-scheduler: priority functions for the image locality extender
//!
//! This crate provides the scoring side of the extender:
//! - The `PriorityFunction` trait and the static priority table
//! - The `image_score` image locality priority

pub mod image_locality;
pub mod priority;

pub use image_locality::{node_image_score, ImageLocalityPriority};
pub use priority::{PriorityFunction, PriorityRegistry};
