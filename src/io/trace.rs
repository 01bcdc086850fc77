use crate::circuit::CircuitSnapshot;
use crate::error::Result;
use crate::simulation::{ProbeRecord, Simulation, Time};
use serde::Serialize;
use std::io::Write;

/// Everything a browser visualizer needs to replay a simulation.
#[derive(Debug, Serialize)]
pub struct Trace<'a> {
    pub circuit: CircuitSnapshot,
    /// `[time, gate, value]` for every probe record.
    pub trace: Vec<(Time, &'a str, u8)>,
    pub layout: Option<&'a str>,
}

impl<'a> Trace<'a> {
    /// Returns the trace of `sim` so far, with an optional SVG `layout`.
    pub fn new(sim: &'a Simulation, layout: Option<&'a str>) -> Self {
        Trace {
            circuit: sim.circuit().snapshot(),
            trace: sim
                .probes()
                .iter()
                .map(|p| (p.time, p.gate.as_str(), u8::from(p.value)))
                .collect(),
            layout,
        }
    }
}

/// Writes one `<time> <gate> <value>` line per probe record.
pub fn write_outputs<W: Write>(probes: &[ProbeRecord], mut writer: W) -> Result<()> {
    for probe in probes {
        writeln!(writer, "{} {} {}", probe.time, probe.gate, u8::from(probe.value))?;
    }
    Ok(())
}

/// Writes the [Trace] of `sim` as JSON wrapped in an `onJsonp(...)` call.
pub fn write_jsonp<W: Write>(sim: &Simulation, layout: Option<&str>, mut writer: W) -> Result<()> {
    write!(writer, "onJsonp(")?;
    serde_json::to_writer(&mut writer, &Trace::new(sim, layout))?;
    writeln!(writer, ");")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Circuit;
    use serde_json::{json, Value};

    fn buffer_sim() -> Simulation {
        let mut c = Circuit::new();
        c.add_truth_table("buf", &[0, 1]).unwrap();
        c.add_truth_table("not", &[1, 0]).unwrap();
        c.add_gate_type("in", "buf", 0).unwrap();
        c.add_gate_type("inv", "not", 2).unwrap();
        c.add_gate("a", "in", &[]).unwrap();
        c.add_gate("na", "inv", &["a"]).unwrap();
        c.add_probe("a").unwrap();

        let mut sim = Simulation::new(c);
        sim.add_transition("a", true, 1).unwrap();
        sim.add_transition("a", false, 4).unwrap();
        sim.run().unwrap();
        sim
    }

    #[test]
    fn test_write_outputs() {
        let sim = buffer_sim();
        let mut out = Vec::new();
        write_outputs(sim.probes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1 a 1\n4 a 0\n");
    }

    #[test]
    fn test_write_jsonp() {
        let sim = buffer_sim();
        let mut out = Vec::new();
        write_jsonp(&sim, Some("<svg/>"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("onJsonp("));
        assert!(text.ends_with(");\n"));

        let json: Value = serde_json::from_str(&text["onJsonp(".len()..text.len() - 3]).unwrap();
        assert_eq!(
            json,
            json!({
                "circuit": {
                    "gates": [
                        {"id": "a", "table": "buf", "type": "in", "probed": true,
                         "inputs": [null], "outputs": ["na"]},
                        {"id": "na", "table": "not", "type": "inv", "probed": false,
                         "inputs": ["a"], "outputs": []}
                    ]
                },
                "trace": [[1, "a", 1], [4, "a", 0]],
                "layout": "<svg/>"
            })
        );
    }

    #[test]
    fn test_no_layout_is_null() {
        let sim = buffer_sim();
        let json = serde_json::to_value(Trace::new(&sim, None)).unwrap();
        assert_eq!(json["layout"], Value::Null);
    }
}
