//! gitfleet core - the engine behind every multi-repository action
//!
//! This crate holds the worker pool, the outcome classifier, the domain
//! types and the ports (interfaces) the engine talks through. It performs no
//! process or filesystem I/O itself - running git and walking directories is
//! left to adapters.

pub mod app;
pub mod classify;
pub mod domain;
pub mod error;
pub mod pool;
pub mod ports;

// Re-exports for ergonomics
pub use domain::*;
pub use error::*;
