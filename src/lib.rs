//! Event-driven simulation of combinational logic circuits.
//!
//! A [Circuit] is built from truth tables, gate types (a truth table plus a propagation delay) and named gates.
//! A [Simulation] is then seeded with input transitions and advanced in time until every gate has settled,
//! recording the output changes of probed gates.
//!
//! ```
//! use gatesim::{Circuit, Simulation};
//!
//! let mut c = Circuit::new();
//! c.add_truth_table("buf", &[0, 1]).unwrap();
//! c.add_truth_table("and", &[0, 0, 0, 1]).unwrap();
//! c.add_gate_type("in", "buf", 0).unwrap();
//! c.add_gate_type("and0", "and", 0).unwrap();
//! c.add_gate("a", "in", &[]).unwrap();
//! c.add_gate("b", "in", &[]).unwrap();
//! c.add_gate("out", "and0", &["a", "b"]).unwrap();
//! c.add_probe("out").unwrap();
//!
//! let mut sim = Simulation::new(c);
//! sim.add_transition("a", true, 0).unwrap();
//! sim.add_transition("b", true, 0).unwrap();
//! sim.run().unwrap();
//!
//! let probe = &sim.probes()[0];
//! assert_eq!((probe.time, probe.gate.as_str(), probe.value), (0, "out", true));
//! ```
#[macro_use]
pub mod circuit;
pub mod error;
pub mod io;
pub mod simulation;
pub use circuit::{Circuit, GateIndex};
pub use error::{Error, Result};
pub use simulation::{QueueOptions, Simulation};
