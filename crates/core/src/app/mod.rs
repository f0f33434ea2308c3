pub mod commands;
pub mod summary;

pub use commands::*;
pub use summary::*;
