#[macro_use]
mod handles;
#[allow(clippy::module_inception)]
mod circuit;
mod gate;
mod gate_type;
mod snapshot;
mod truth_table;
pub use circuit::*;
pub use gate::Gate;
pub use gate_type::*;
pub use handles::*;
pub use snapshot::*;
pub use truth_table::*;
