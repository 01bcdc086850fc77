use super::gate::GATE_TINYVEC_SIZE;
use super::{Gate, GateIndex, GateType, TruthTable};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::rc::Rc;
use tracing::debug;

/// The topology of a combinational circuit, and a snapshot of its state.
///
/// Owns every [TruthTable], [GateType] and [Gate] by unique name. Gates live in an arena and refer to each
/// other through [GateIndex]es, which are assigned in insertion order.
///
/// Gates must be added after the gates feeding their inputs. The circuit doesn't check for loops,
/// only combinational (acyclic) circuits settle when [simulated](crate::simulation::Simulation).
///
/// # Example
/// ```
/// # use gatesim::circuit::Circuit;
/// let mut c = Circuit::new();
/// c.add_truth_table("buf", &[0, 1]).unwrap();
/// c.add_truth_table("and", &[0, 0, 0, 1]).unwrap();
/// c.add_gate_type("in", "buf", 0).unwrap();
/// c.add_gate_type("and2", "and", 2).unwrap();
///
/// c.add_gate("a", "in", &[]).unwrap();
/// c.add_gate("b", "in", &[]).unwrap();
/// let out = c.add_gate("out", "and2", &["a", "b"]).unwrap();
/// c.add_probe("out").unwrap();
///
/// assert_eq!(c.gate(out).inputs_connected(), true);
/// assert_eq!(c.gate_by_name("out").unwrap().is_probed(), true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    truth_tables: IndexMap<String, Rc<TruthTable>>,
    gate_types: IndexMap<String, Rc<GateType>>,
    pub(super) gates: IndexMap<String, Gate>,
}

impl Circuit {
    /// Returns an empty [Circuit].
    pub fn new() -> Circuit {
        Default::default()
    }

    /// Adds a truth table that can be later attached to gate types.
    ///
    /// Fails if `name` is already used by another truth table or if `outputs` is not a valid table,
    /// see [TruthTable::new].
    pub fn add_truth_table<S: Into<String>>(
        &mut self,
        name: S,
        outputs: &[u8],
    ) -> Result<&TruthTable> {
        let name = name.into();
        if self.truth_tables.contains_key(&name) {
            return Err(Error::DuplicateTruthTable(name));
        }
        let table = Rc::new(TruthTable::new(name.clone(), outputs)?);
        debug!(table = %name, inputs = table.input_count(), "added truth table");
        Ok(&**self.truth_tables.entry(name).or_insert(table))
    }

    /// Adds a gate type that can be later attached to gates.
    ///
    /// Fails if `name` is already used by another gate type, if `truth_table` doesn't exist
    /// or if `delay` is negative.
    pub fn add_gate_type<S: Into<String>>(
        &mut self,
        name: S,
        truth_table: &str,
        delay: i64,
    ) -> Result<&GateType> {
        let name = name.into();
        if self.gate_types.contains_key(&name) {
            return Err(Error::DuplicateGateType(name));
        }
        let table = self
            .truth_tables
            .get(truth_table)
            .ok_or_else(|| Error::UnknownTruthTable(truth_table.into()))?;
        let ty = Rc::new(GateType::new(name.clone(), table.clone(), delay)?);
        debug!(gate_type = %ty, "added gate type");
        Ok(&**self.gate_types.entry(name).or_insert(ty))
    }

    /// Adds a gate of type `type_name` and connects input terminal `i` to the output of `inputs[i]`.
    ///
    /// `inputs` may be shorter than the arity of the type, the remaining terminals can be wired with
    /// [Circuit::connect] later on.
    ///
    /// Fails if `name` is already used by another gate, if `type_name` doesn't exist, if any of `inputs`
    /// doesn't exist yet or if there are more `inputs` than input terminals.
    /// Everything is checked before the gate is created, a failed call leaves the circuit untouched.
    pub fn add_gate<S: Into<String>>(
        &mut self,
        name: S,
        type_name: &str,
        inputs: &[&str],
    ) -> Result<GateIndex> {
        let name = name.into();
        if self.gates.contains_key(&name) {
            return Err(Error::DuplicateGate(name));
        }
        let ty = self
            .gate_types
            .get(type_name)
            .ok_or_else(|| Error::UnknownGateType(type_name.into()))?
            .clone();
        if inputs.len() > ty.input_count() {
            return Err(Error::TerminalOutOfRange {
                gate: name,
                terminal: ty.input_count(),
                arity: ty.input_count(),
            });
        }
        let sources = inputs
            .iter()
            .map(|input| self.index_of(input))
            .collect::<Result<SmallVec<[GateIndex; GATE_TINYVEC_SIZE]>>>()?;

        let (idx, _) = self.gates.insert_full(name.clone(), Gate::new(name, ty));
        let idx = gi!(idx);
        for (terminal, source) in sources.into_iter().enumerate() {
            self.connect(source, idx, terminal)?;
        }
        debug!(gate = %self.gate(idx).name(), %idx, "added gate");
        Ok(idx)
    }

    /// Connects input `terminal` of `target` to the output of `source`.
    ///
    /// Fails if `source` or `target` don't belong to this circuit, if `target` doesn't have input `terminal`
    /// or if it is already connected, the circuit is left untouched in that case.
    pub fn connect(&mut self, source: GateIndex, target: GateIndex, terminal: usize) -> Result<()> {
        for idx in [source, target] {
            if idx.idx >= self.gates.len() {
                return Err(Error::UnknownGate(idx.to_string()));
            }
        }
        self.gate_mut(target).connect_input(source, terminal)?;
        self.gate_mut(source).dependents.push(target);
        Ok(())
    }

    /// Marks gate `name` as probed.
    ///
    /// Fails if the gate doesn't exist or is already probed.
    pub fn add_probe(&mut self, name: &str) -> Result<()> {
        self.gates
            .get_mut(name)
            .ok_or_else(|| Error::UnknownGate(name.into()))?
            .probe()
    }

    /// Returns the [GateIndex] of gate `name`.
    pub fn index_of(&self, name: &str) -> Result<GateIndex> {
        self.gates
            .get_index_of(name)
            .map(GateIndex::new)
            .ok_or_else(|| Error::UnknownGate(name.into()))
    }

    /// Returns an immutable reference to the [Gate] at `idx`.
    ///
    /// # Panics
    ///
    /// Will panic if `idx` >= self.len().
    #[inline(always)]
    pub fn gate(&self, idx: GateIndex) -> &Gate {
        &self.gates[idx.idx]
    }

    /// Returns a mutable reference to the [Gate] at `idx`.
    ///
    /// # Panics
    ///
    /// Will panic if `idx` >= self.len().
    #[inline(always)]
    pub(crate) fn gate_mut(&mut self, idx: GateIndex) -> &mut Gate {
        &mut self.gates[idx.idx]
    }

    /// Returns the gate called `name`, if any.
    pub fn gate_by_name(&self, name: &str) -> Option<&Gate> {
        self.gates.get(name)
    }

    /// Returns the truth table called `name`, if any.
    pub fn truth_table(&self, name: &str) -> Option<&TruthTable> {
        self.truth_tables.get(name).map(|table| table.as_ref())
    }

    /// Returns the gate type called `name`, if any.
    pub fn gate_type(&self, name: &str) -> Option<&GateType> {
        self.gate_types.get(name).map(|ty| ty.as_ref())
    }

    /// Returns an iterator over pairs of `(GateIndex, &Gate)` in insertion order.
    pub fn gates(&self) -> impl Iterator<Item = (GateIndex, &Gate)> {
        self.gates
            .values()
            .enumerate()
            .map(|(idx, gate)| (gi!(idx), gate))
    }

    /// Returns the number of gates in the circuit.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns true if the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Returns the value the output of `idx` will take once its inputs' current values propagate.
    ///
    /// The output is not updated, the [Simulation](crate::simulation::Simulation) is responsible
    /// for applying it at [Gate::transition_time].
    ///
    /// Fails if one of the input terminals is not connected.
    pub fn transition_output(&self, idx: GateIndex) -> Result<bool> {
        let gate = self.gate(idx);
        let inputs = gate
            .inputs()
            .iter()
            .enumerate()
            .map(|(terminal, input)| match input {
                Some(source) => Ok(self.gate(*source).output()),
                None => Err(Error::UnconnectedInput {
                    gate: gate.name().into(),
                    terminal,
                }),
            })
            .collect::<Result<SmallVec<[bool; 4]>>>()?;
        gate.ty().output(&inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two inputs feeding an and gate and a not gate reading the and.
    fn and_not() -> Circuit {
        let mut c = Circuit::new();
        c.add_truth_table("buf", &[0, 1]).unwrap();
        c.add_truth_table("not", &[1, 0]).unwrap();
        c.add_truth_table("and", &[0, 0, 0, 1]).unwrap();
        c.add_gate_type("in", "buf", 0).unwrap();
        c.add_gate_type("not1", "not", 1).unwrap();
        c.add_gate_type("and2", "and", 2).unwrap();
        c.add_gate("a", "in", &[]).unwrap();
        c.add_gate("b", "in", &[]).unwrap();
        c.add_gate("and", "and2", &["a", "b"]).unwrap();
        c.add_gate("nand", "not1", &["and"]).unwrap();
        c
    }

    #[test]
    fn test_connectivity() {
        let c = and_not();
        let a = c.index_of("a").unwrap();
        let b = c.index_of("b").unwrap();
        let and = c.index_of("and").unwrap();
        let nand = c.index_of("nand").unwrap();

        assert_eq!(c.len(), 4);
        assert_eq!(c.gate(and).inputs(), &[Some(a), Some(b)]);
        assert_eq!(c.gate(a).dependents(), &[and]);
        assert_eq!(c.gate(b).dependents(), &[and]);
        assert_eq!(c.gate(and).dependents(), &[nand]);
        assert!(c.gate(and).connected());
        assert!(!c.gate(nand).output_connected());
        assert_eq!(c.gate(nand).ty().delay(), 1);
    }

    #[test]
    fn test_duplicate_names() {
        let mut c = and_not();
        assert!(matches!(
            c.add_truth_table("and", &[0, 1]),
            Err(Error::DuplicateTruthTable(_))
        ));
        assert!(matches!(
            c.add_gate_type("and2", "and", 0),
            Err(Error::DuplicateGateType(_))
        ));
        assert!(matches!(
            c.add_gate("a", "in", &[]),
            Err(Error::DuplicateGate(_))
        ));
        assert_eq!(c.truth_table("and").unwrap().input_count(), 2);
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn test_unknown_names_leave_circuit_untouched() {
        let mut c = and_not();
        assert!(matches!(
            c.add_gate_type("or2", "or", 0),
            Err(Error::UnknownTruthTable(name)) if name == "or"
        ));
        assert!(c.gate_type("or2").is_none());

        assert!(matches!(
            c.add_gate("x", "or2", &[]),
            Err(Error::UnknownGateType(name)) if name == "or2"
        ));
        assert!(matches!(
            c.add_gate("x", "and2", &["a", "nope"]),
            Err(Error::UnknownGate(name)) if name == "nope"
        ));
        assert!(c.gate_by_name("x").is_none());
        assert_eq!(c.len(), 4);
        // The known input didn't get a dangling dependent.
        assert_eq!(c.gate_by_name("a").unwrap().dependents().len(), 1);

        assert!(matches!(c.add_probe("nope"), Err(Error::UnknownGate(_))));
    }

    #[test]
    fn test_gate_cannot_read_itself() {
        let mut c = and_not();
        assert!(matches!(
            c.add_gate("loop", "not1", &["loop"]),
            Err(Error::UnknownGate(_))
        ));
    }

    #[test]
    fn test_too_many_inputs() {
        let mut c = and_not();
        assert!(matches!(
            c.add_gate("x", "not1", &["a", "b"]),
            Err(Error::TerminalOutOfRange { arity: 1, .. })
        ));
        assert!(c.gate_by_name("x").is_none());
    }

    #[test]
    fn test_connect_later() {
        let mut c = and_not();
        let x = c.add_gate("x", "and2", &["a"]).unwrap();
        let b = c.index_of("b").unwrap();
        assert!(!c.gate(x).inputs_connected());
        assert!(matches!(
            c.transition_output(x),
            Err(Error::UnconnectedInput { terminal: 1, .. })
        ));

        c.connect(b, x, 1).unwrap();
        assert!(c.gate(x).inputs_connected());
        assert_eq!(c.transition_output(x).unwrap(), false);

        let before = c.gate(b).dependents().len();
        assert!(matches!(
            c.connect(b, x, 1),
            Err(Error::TerminalAlreadyConnected { terminal: 1, .. })
        ));
        assert!(matches!(
            c.connect(b, x, 5),
            Err(Error::TerminalOutOfRange { terminal: 5, .. })
        ));
        assert_eq!(c.gate(b).dependents().len(), before);
    }

    #[test]
    fn test_connect_foreign_index() {
        let mut c = and_not();
        let x = c.add_gate("x", "and2", &["a"]).unwrap();
        let foreign = GateIndex::new(c.len());
        assert!(matches!(
            c.connect(foreign, x, 1),
            Err(Error::UnknownGate(name)) if name == "#5"
        ));
        assert!(matches!(
            c.connect(x, foreign, 0),
            Err(Error::UnknownGate(_))
        ));
        assert!(!c.gate(x).inputs_connected());
        assert!(c.gate(x).dependents().is_empty());
    }

    #[test]
    fn test_transition_output_reads_current_inputs() {
        let mut c = and_not();
        let a = c.index_of("a").unwrap();
        let b = c.index_of("b").unwrap();
        let and = c.index_of("and").unwrap();
        let nand = c.index_of("nand").unwrap();

        assert_eq!(c.transition_output(and).unwrap(), false);
        assert_eq!(c.transition_output(nand).unwrap(), true);

        c.gate_mut(a).set_output(true);
        c.gate_mut(b).set_output(true);
        assert_eq!(c.transition_output(and).unwrap(), true);
        // Not applied yet.
        assert_eq!(c.gate(and).output(), false);
    }

    #[test]
    fn test_probe() {
        let mut c = and_not();
        c.add_probe("nand").unwrap();
        assert!(c.gate_by_name("nand").unwrap().is_probed());
        assert!(matches!(
            c.add_probe("nand"),
            Err(Error::AlreadyProbed(name)) if name == "nand"
        ));
    }
}
