use super::TruthTable;
use crate::error::{Error, Result};
use crate::simulation::Time;
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// A kind of gate, e.g. 2-input NAND with 60ps delay.
///
/// Pairs a shared [TruthTable] with the time it takes an input transition to show up at the output.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct GateType {
    name: String,
    truth_table: Rc<TruthTable>,
    delay: Time,
}

impl GateType {
    /// Returns a new [GateType] evaluating `truth_table` with a propagation delay of `delay`.
    ///
    /// Fails if `delay` is negative.
    pub fn new<S: Into<String>>(name: S, truth_table: Rc<TruthTable>, delay: i64) -> Result<Self> {
        let name = name.into();
        let delay = match Time::try_from(delay) {
            Ok(delay) => delay,
            Err(_) => return Err(Error::NegativeDelay { name, delay }),
        };
        Ok(GateType {
            name,
            truth_table,
            delay,
        })
    }

    /// Returns the name of the gate type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the truth table shared by every gate of this type.
    pub fn truth_table(&self) -> &TruthTable {
        &self.truth_table
    }

    /// Returns the number of input terminals of gates of this type.
    pub fn input_count(&self) -> usize {
        self.truth_table.input_count()
    }

    /// Returns the propagation delay.
    pub fn delay(&self) -> Time {
        self.delay
    }

    /// Returns the output value for `inputs`, see [TruthTable::output].
    #[inline(always)]
    pub fn output(&self, inputs: &[bool]) -> Result<bool> {
        self.truth_table.output(inputs)
    }

    /// Returns the time at which the output reflects an input transition that happened at `input_time`.
    ///
    /// Fails if the result doesn't fit in a [Time].
    #[inline(always)]
    pub fn output_time(&self, input_time: Time) -> Result<Time> {
        input_time
            .checked_add(self.delay)
            .ok_or_else(|| Error::TimeOverflow {
                name: self.name.clone(),
                time: input_time,
                delay: self.delay,
            })
    }
}

impl Display for GateType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.name, self.truth_table.name(), self.delay)
    }
}
