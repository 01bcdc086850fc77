use crate::circuit::{Circuit, GateIndex};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// Simulated time, in the same unit as [GateType](crate::circuit::GateType) delays.
pub type Time = u64;

/// A potential transition of a gate's output to a new value.
///
/// Transitions are ordered by time, ties are broken by `id`, a sequence number handed out by the
/// [Simulation](super::Simulation) in insertion order. No two transitions of a simulation compare equal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Transition {
    pub gate: GateIndex,
    pub new_output: bool,
    pub time: Time,
    pub id: u64,
}

impl Transition {
    /// Returns a new [Transition] of `gate` to `new_output` at `time`.
    pub fn new(gate: GateIndex, new_output: bool, time: Time, id: u64) -> Self {
        Transition {
            gate,
            new_output,
            time,
            id,
        }
    }

    /// Returns true if the transition would not change the output of its gate in `circuit`.
    #[inline(always)]
    pub fn is_stale(&self, circuit: &Circuit) -> bool {
        circuit.gate(self.gate).output() == self.new_output
    }
}

impl Ord for Transition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Transition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Transition at t={}, gate {} -> {}>",
            self.time,
            self.gate,
            u8::from(self.new_output)
        )
    }
}
