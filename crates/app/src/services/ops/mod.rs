//! Per-command drivers. Each module adds its command to `Fleet`.

mod checkout;
mod clean;
mod clone;
mod diff;
mod exec;
mod fetch;
mod pull;
mod status;

pub use clone::clone_target;
