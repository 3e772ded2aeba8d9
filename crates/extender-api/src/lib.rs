//! extender-api: HTTP endpoint of the image locality extender
//!
//! This crate exposes every registered priority as a route the cluster
//! scheduler can call during scoring.

pub mod rest;

pub use rest::create_router;
