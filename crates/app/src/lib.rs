//! gitfleet application library
//!
//! Adapters, services and configuration around the core engine. The binary
//! in `main.rs` is a thin composition root over this library.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod render;
pub mod services;
