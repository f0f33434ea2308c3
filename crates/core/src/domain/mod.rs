pub mod events;
pub mod outcome;
pub mod repo;

// Re-exports for convenience
pub use events::*;
pub use outcome::*;
pub use repo::*;
