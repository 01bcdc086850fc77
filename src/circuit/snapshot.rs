use super::{Circuit, GateIndex};
use crate::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Serializable view of one gate's topology, used by visualizers.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GateSnapshot {
    pub id: String,
    pub table: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub probed: bool,
    pub inputs: Vec<Option<String>>,
    pub outputs: Vec<String>,
}

/// Serializable view of a [Circuit]'s topology, gates in insertion order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CircuitSnapshot {
    pub gates: Vec<GateSnapshot>,
}

impl Circuit {
    /// Returns a snapshot of every gate's name, type, truth table, probed flag, input and output gate names.
    pub fn snapshot(&self) -> CircuitSnapshot {
        let name = |idx: &GateIndex| self.gate(*idx).name().to_string();
        let gates = self
            .gates()
            .map(|(_, gate)| GateSnapshot {
                id: gate.name().into(),
                table: gate.ty().truth_table().name().into(),
                ty: gate.ty().name().into(),
                probed: gate.is_probed(),
                inputs: gate.inputs().iter().map(|i| i.as_ref().map(name)).collect(),
                outputs: gate.dependents().iter().map(name).collect(),
            })
            .collect();
        CircuitSnapshot { gates }
    }

    /// Returns the "full name" of `gate` in format "PROBE:?GATE_TYPE:GATE_NAME".
    ///
    /// PROBE:? means if the gate is probed it will be "PROBE:" otherwise, it will be "".
    fn full_name(&self, gate: GateIndex) -> String {
        let gate = self.gate(gate);
        let probe = if gate.is_probed() { "PROBE:" } else { "" };
        format!("{}{}:{}", probe, gate.ty().name(), gate.name())
    }

    /// Returns the circuit in [dot](https://en.wikipedia.org/wiki/DOT_(graph_description_language)) format,
    /// edges go from a gate to the gates reading its output.
    pub fn to_dot(&self) -> String {
        use petgraph::dot::{Config, Dot};
        let mut graph = petgraph::Graph::<_, ()>::new();
        let mut index = HashMap::new();
        for (i, _) in self.gates() {
            index.insert(i, graph.add_node(self.full_name(i)));
        }
        for (i, gate) in self.gates() {
            graph.extend_with_edges(
                gate.inputs()
                    .iter()
                    .flatten()
                    .map(|dependency| (index[dependency], index[&i])),
            );
        }
        format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }

    /// Dumps [Circuit::to_dot] to `path`, to be visualized by many supported tools.
    pub fn write_dot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_dot())?;
        Ok(())
    }
}
