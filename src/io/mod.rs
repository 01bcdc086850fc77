//! Text formats around a [Simulation](crate::simulation::Simulation): the circuit description it is
//! built from, the layout drawn by visualizers and the traces it produces.
mod description;
mod layout;
mod trace;
pub use description::*;
pub use layout::*;
pub use trace::*;
