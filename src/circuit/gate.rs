use super::{GateIndex, GateType};
use crate::error::{Error, Result};
use crate::simulation::Time;
use smallvec::SmallVec;
use std::rc::Rc;

/// Amount of input terminals and dependents kept in the stack for a gate.
/// If a gate has more than GATE_TINYVEC_SIZE, they will spill into the heap.
pub(super) const GATE_TINYVEC_SIZE: usize = 2;

/// A gate node in a [Circuit](super::Circuit).
///
/// Edges are stored as [GateIndex]es into the circuit instead of references:
/// `inputs` holds the source of every input terminal, `dependents` the gates reading this gate's output.
/// Only the output value and the probed flag change once the gate is wired up.
#[derive(Debug, Clone)]
pub struct Gate {
    name: String,
    ty: Rc<GateType>,
    inputs: SmallVec<[Option<GateIndex>; GATE_TINYVEC_SIZE]>,
    pub(super) dependents: SmallVec<[GateIndex; GATE_TINYVEC_SIZE]>,
    output: bool,
    probed: bool,
}

impl Gate {
    /// Returns an unconnected [Gate] with output 0.
    pub fn new<S: Into<String>>(name: S, ty: Rc<GateType>) -> Self {
        Gate {
            name: name.into(),
            inputs: smallvec::smallvec![None; ty.input_count()],
            ty,
            dependents: SmallVec::new(),
            output: false,
            probed: false,
        }
    }

    /// Returns the name of the gate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type of the gate.
    pub fn ty(&self) -> &GateType {
        &self.ty
    }

    /// Returns the source of every input terminal, in terminal order.
    pub fn inputs(&self) -> &[Option<GateIndex>] {
        &self.inputs
    }

    /// Returns the gates reading this gate's output, in connection order.
    pub fn dependents(&self) -> &[GateIndex] {
        &self.dependents
    }

    /// Returns the current output value.
    pub fn output(&self) -> bool {
        self.output
    }

    pub(crate) fn set_output(&mut self, value: bool) {
        self.output = value;
    }

    /// Checks that `terminal` exists and is still free.
    pub(super) fn check_terminal(&self, terminal: usize) -> Result<()> {
        match self.inputs.get(terminal) {
            None => Err(Error::TerminalOutOfRange {
                gate: self.name.clone(),
                terminal,
                arity: self.inputs.len(),
            }),
            Some(Some(_)) => Err(Error::TerminalAlreadyConnected {
                gate: self.name.clone(),
                terminal,
            }),
            Some(None) => Ok(()),
        }
    }

    /// Connects input `terminal` to the output of `source`.
    ///
    /// Only records the forward edge, [Circuit::connect](super::Circuit::connect) records the back edge on `source`.
    pub(super) fn connect_input(&mut self, source: GateIndex, terminal: usize) -> Result<()> {
        self.check_terminal(terminal)?;
        self.inputs[terminal] = Some(source);
        Ok(())
    }

    /// Marks the gate as probed, so the simulation records its transitions.
    ///
    /// Fails if the gate is already probed.
    pub fn probe(&mut self) -> Result<()> {
        if self.probed {
            return Err(Error::AlreadyProbed(self.name.clone()));
        }
        self.probed = true;
        Ok(())
    }

    /// Clears the probed flag.
    pub fn unprobe(&mut self) {
        self.probed = false;
    }

    pub(crate) fn set_probed(&mut self, probed: bool) {
        self.probed = probed;
    }

    /// Returns true if the simulation records the transitions of this gate.
    pub fn is_probed(&self) -> bool {
        self.probed
    }

    /// Returns true if every input terminal is connected.
    pub fn inputs_connected(&self) -> bool {
        self.inputs.iter().all(Option::is_some)
    }

    /// Returns true if at least one gate reads this gate's output.
    pub fn output_connected(&self) -> bool {
        !self.dependents.is_empty()
    }

    /// Returns true if all the inputs and the output are connected.
    pub fn connected(&self) -> bool {
        self.inputs_connected() && self.output_connected()
    }

    /// Returns the time at which the output reflects an input change that happened at `input_time`.
    ///
    /// Fails if the result doesn't fit in a [Time].
    #[inline(always)]
    pub fn transition_time(&self, input_time: Time) -> Result<Time> {
        self.ty.output_time(input_time)
    }
}
