use std::fmt::{self, Display, Formatter};

/// Represents the index of a gate in a [Circuit](super::Circuit).
///
/// Indexes are handed out in insertion order and stay valid for the lifetime of the circuit,
/// gates are never removed.
#[repr(transparent)]
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub struct GateIndex {
    pub(super) idx: usize,
}

/// Returns a new GateIndex from a provided usize.
macro_rules! gi {
    ( $x:expr ) => {{
        GateIndex::new($x)
    }};
}

impl GateIndex {
    /// Returns a new GateIndex from a provided usize.
    pub const fn new(idx: usize) -> GateIndex {
        GateIndex { idx }
    }

    /// Returns the position of the gate in its circuit's registry.
    pub fn idx(&self) -> usize {
        self.idx
    }
}

impl Display for GateIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.idx)
    }
}
