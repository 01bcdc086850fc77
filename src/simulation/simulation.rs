use super::{EventQueue, QueueOptions, QueueStats, Time, Transition};
use crate::circuit::{Circuit, GateIndex};
use crate::error::Result;
use serde::Serialize;
use tracing::{debug, info, trace};

/// An output change of a probed gate, recorded by the [Simulation].
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct ProbeRecord {
    pub time: Time,
    pub gate: String,
    pub value: bool,
}

/// An externally driven transition, scheduled before the simulation starts.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct SeedTransition {
    time: Time,
    gate: GateIndex,
    value: bool,
}

/// Phase of a [Simulation].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SimulationState {
    /// Collecting input transitions, nothing is queued yet.
    Seeding,
    /// Transitions are pending.
    Stepping,
    /// The queue is empty, every gate has its final value.
    Settled,
}

/// State needed to compute a [Circuit]'s state as it evolves over time.
///
/// Input transitions are collected with [Simulation::add_transition], then [Simulation::run] drives the
/// circuit until no more transitions are pending. Alternatively call [Simulation::schedule_inputs] once
/// and [Simulation::step] as many times as needed, the simulation can be stopped between any two steps.
///
/// # Example
/// ```
/// # use gatesim::circuit::Circuit;
/// # use gatesim::simulation::{ProbeRecord, Simulation};
/// let mut c = Circuit::new();
/// c.add_truth_table("buf", &[0, 1]).unwrap();
/// c.add_truth_table("not", &[1, 0]).unwrap();
/// c.add_gate_type("in", "buf", 0).unwrap();
/// c.add_gate_type("not5", "not", 5).unwrap();
/// c.add_gate("a", "in", &[]).unwrap();
/// c.add_gate("na", "not5", &["a"]).unwrap();
/// c.add_probe("na").unwrap();
///
/// let mut sim = Simulation::new(c);
/// // The not gate starts at 0 even though its input is 0, settle it first.
/// sim.add_transition("na", true, 0).unwrap();
/// sim.add_transition("a", true, 10).unwrap();
/// sim.run().unwrap();
///
/// let na = |time, value| ProbeRecord { time, gate: "na".into(), value };
/// assert_eq!(sim.probes(), &[na(0, true), na(15, false)]);
/// ```
#[derive(Debug)]
pub struct Simulation {
    circuit: Circuit,
    in_transitions: Vec<SeedTransition>,
    queue: Box<dyn EventQueue>,
    next_transition_id: u64,
    seeded: bool,
    probes: Vec<ProbeRecord>,
    probe_all_undo_log: Vec<GateIndex>,
    // Allocated outside to prevent allocations in the hot loop.
    applied: Vec<GateIndex>,
}

impl Simulation {
    /// Returns a new [Simulation] of `circuit` with an uninstrumented queue.
    ///
    /// The circuit doesn't need to be wired completely yet, but it has to be before the first [Simulation::step].
    pub fn new(circuit: Circuit) -> Self {
        Self::with_queue_options(circuit, QueueOptions::default())
    }

    /// Returns a new [Simulation] of `circuit`, whose queue is instrumented according to `options`.
    pub fn with_queue_options(circuit: Circuit, options: QueueOptions) -> Self {
        Simulation {
            circuit,
            in_transitions: Vec::new(),
            queue: options.build(),
            next_transition_id: 0,
            seeded: false,
            probes: Vec::new(),
            probe_all_undo_log: Vec::new(),
            applied: Vec::new(),
        }
    }

    /// Replaces the queue with a new one instrumented according to `options`.
    ///
    /// Pending transitions are carried over.
    pub fn set_queue_options(&mut self, options: QueueOptions) {
        let mut queue = options.build();
        while let Some(transition) = self.queue.pop() {
            queue.push(transition);
        }
        self.queue = queue;
    }

    /// Returns the simulated circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Returns a mutable reference to the simulated circuit, to finish wiring it.
    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    /// Consumes the simulation and returns the circuit, with the gate outputs it reached.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Adds a transition of gate `gate_name` to `value` at `time` to the initial conditions.
    ///
    /// The transition should involve one of the circuit's input gates.
    ///
    /// Fails if the gate doesn't exist.
    pub fn add_transition(&mut self, gate_name: &str, value: bool, time: Time) -> Result<()> {
        let gate = self.circuit.index_of(gate_name)?;
        self.in_transitions.push(SeedTransition { time, gate, value });
        Ok(())
    }

    /// Returns a new [Transition] with the next sequence number.
    fn transition(&mut self, gate: GateIndex, new_output: bool, time: Time) -> Transition {
        let id = self.next_transition_id;
        self.next_transition_id += 1;
        Transition::new(gate, new_output, time, id)
    }

    /// Moves the initial conditions into the queue, sorted by time, gate name and value.
    pub fn schedule_inputs(&mut self) {
        let mut seeds = std::mem::take(&mut self.in_transitions);
        let circuit = &self.circuit;
        seeds.sort_by(|a, b| {
            a.time
                .cmp(&b.time)
                .then_with(|| circuit.gate(a.gate).name().cmp(circuit.gate(b.gate).name()))
                .then_with(|| a.value.cmp(&b.value))
        });
        for seed in seeds {
            let transition = self.transition(seed.gate, seed.value, seed.time);
            self.queue.push(transition);
        }
        self.seeded = true;
    }

    /// Returns the phase the simulation is in.
    pub fn state(&self) -> SimulationState {
        if !self.seeded {
            SimulationState::Seeding
        } else if self.queue.is_empty() {
            SimulationState::Settled
        } else {
            SimulationState::Stepping
        }
    }

    /// Runs the simulation for one time slice.
    ///
    /// A step does not equal one unit of time. Time units where nothing happens are skipped,
    /// and all the transitions that happen at the same time are bundled in a single step:
    /// first every one of them is applied, then the dependents of every changed gate are scheduled.
    /// Transitions that wouldn't change their gate's output anymore are dropped.
    ///
    /// Returns the time of the step, or None if no transitions are pending.
    ///
    /// Fails if a dependent of a changed gate has an unconnected input, or if its transition time overflows.
    pub fn step(&mut self) -> Result<Option<Time>> {
        let step_time = match self.queue.peek() {
            Some(transition) => transition.time,
            None => return Ok(None),
        };

        // Need to apply all the transitions at the same time before propagating.
        self.applied.clear();
        while self.queue.peek().map(|t| t.time) == Some(step_time) {
            let transition = match self.queue.pop() {
                Some(transition) => transition,
                None => break,
            };
            if transition.is_stale(&self.circuit) {
                trace!(%transition, "dropped stale transition");
                continue;
            }
            let gate = self.circuit.gate_mut(transition.gate);
            gate.set_output(transition.new_output);
            debug!(gate = gate.name(), time = step_time, value = transition.new_output, "applied transition");
            if gate.is_probed() {
                self.probes.push(ProbeRecord {
                    time: step_time,
                    gate: gate.name().into(),
                    value: transition.new_output,
                });
            }
            self.applied.push(transition.gate);
        }
        // Zero-delay chains apply more records at `step_time` in the following steps.
        let same_time = self.probes.partition_point(|p| p.time < step_time);
        self.probes[same_time..].sort_by(|a, b| a.gate.cmp(&b.gate));

        // Propagate the transition effects.
        let applied = std::mem::take(&mut self.applied);
        for changed in &applied {
            for i in 0..self.circuit.gate(*changed).dependents().len() {
                let dependent = self.circuit.gate(*changed).dependents()[i];
                let output = self.circuit.transition_output(dependent)?;
                let time = self.circuit.gate(dependent).transition_time(step_time)?;
                let transition = self.transition(dependent, output, time);
                self.queue.push(transition);
            }
        }
        self.applied = applied;

        Ok(Some(step_time))
    }

    /// Runs the simulation to completion.
    ///
    /// Schedules the initial conditions first if [Simulation::schedule_inputs] hasn't been called yet.
    pub fn run(&mut self) -> Result<()> {
        if !self.seeded || !self.in_transitions.is_empty() {
            self.schedule_inputs();
        }
        let mut steps = 0usize;
        let mut last = None;
        while let Some(time) = self.step()? {
            steps += 1;
            last = Some(time);
        }
        info!(steps, last_time = ?last, probes = self.probes.len(), "simulation settled");
        Ok(())
    }

    /// Returns every transition of a probed gate so far, sorted by time then gate name.
    pub fn probes(&self) -> &[ProbeRecord] {
        &self.probes
    }

    /// Returns the number of pending transitions.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if the queue collects workload statistics.
    pub fn has_stats(&self) -> bool {
        self.queue.stats().is_some()
    }

    /// Returns the queue's workload statistics, if it collects them.
    pub fn stats(&self) -> Option<QueueStats> {
        self.queue.stats()
    }

    /// Turns on probing for all gates in the simulation.
    ///
    /// The gates that weren't probed before are remembered, see [Simulation::undo_probe_all_gates].
    pub fn probe_all_gates(&mut self) {
        for i in 0..self.circuit.len() {
            let idx = GateIndex::new(i);
            let gate = self.circuit.gate_mut(idx);
            if gate.is_probed() {
                continue;
            }
            self.probe_all_undo_log.push(idx);
            gate.set_probed(true);
        }
    }

    /// Reverts the effects of calling [Simulation::probe_all_gates].
    pub fn undo_probe_all_gates(&mut self) {
        for idx in std::mem::take(&mut self.probe_all_undo_log) {
            self.circuit.gate_mut(idx).unprobe();
        }
    }
}
