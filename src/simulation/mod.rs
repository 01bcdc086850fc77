mod event_queue;
#[allow(clippy::module_inception)]
mod simulation;
pub mod stats;
mod transition;
pub use event_queue::*;
pub use simulation::*;
pub use stats::QueueStats;
pub use transition::*;
