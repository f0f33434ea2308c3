pub mod discovery;
pub mod process;

// Re-exports
pub use discovery::*;
pub use process::*;
