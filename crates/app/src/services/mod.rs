pub mod control;
pub mod fleet;
pub mod ops;
pub mod prober;
pub mod remote;

pub use control::RunControl;
pub use fleet::{Fleet, FleetSettings};
pub use prober::Prober;
pub use remote::{with_timeout, RemoteRunner, TimedOut};
