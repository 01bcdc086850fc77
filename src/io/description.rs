//! Reader for the line-oriented circuit description.
//!
//! Every line is a command followed by whitespace-separated arguments:
//! ```text
//! table <name> <output>...
//! type <name> <table> <delay>
//! gate <name> <type> <input>...
//! probe <gate>
//! flip <gate> <0|1> <time>
//! done
//! ```
//! Reading stops after `done` or at the end of the input, whatever follows `done` is left in the reader.

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::simulation::{Simulation, Time};
use std::io::BufRead;
use std::str::FromStr;
use strum_macros::EnumString;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Eq, PartialEq, EnumString)]
#[strum(serialize_all = "lowercase")]
enum Command {
    Table,
    Type,
    Gate,
    Probe,
    Flip,
    Done,
}

fn syntax<T>(line: usize, message: impl Into<String>) -> Result<T> {
    Err(Error::Syntax {
        line,
        message: message.into(),
    })
}

fn parse<T: FromStr>(line: usize, what: &str, token: &str) -> Result<T> {
    token
        .parse()
        .or_else(|_| syntax(line, format!("invalid {} `{}`", what, token)))
}

fn parse_value(token: &str) -> Result<bool> {
    match token {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(Error::InvalidValue(token.into())),
    }
}

fn expect_args(line: usize, command: &str, tokens: &[&str], count: usize) -> Result<()> {
    if tokens.len() != count {
        return syntax(
            line,
            format!(
                "`{}` takes {} arguments, got {}",
                command,
                count - 1,
                tokens.len() - 1
            ),
        );
    }
    Ok(())
}

/// Applies one command to `sim`, returns false once the description is over.
fn apply(sim: &mut Simulation, line: usize, tokens: &[&str]) -> Result<bool> {
    let command = match Command::from_str(tokens[0]) {
        Ok(command) => command,
        Err(_) => {
            warn!(line, command = tokens[0], "ignoring unknown command");
            return Ok(true);
        }
    };
    match command {
        Command::Table => {
            if tokens.len() < 2 {
                return syntax(line, "`table` needs a name");
            }
            let outputs = tokens[2..]
                .iter()
                .map(|token| parse::<u8>(line, "table entry", token))
                .collect::<Result<Vec<_>>>()?;
            sim.circuit_mut().add_truth_table(tokens[1], &outputs)?;
        }
        Command::Type => {
            expect_args(line, tokens[0], tokens, 4)?;
            let delay = parse::<i64>(line, "delay", tokens[3])?;
            sim.circuit_mut().add_gate_type(tokens[1], tokens[2], delay)?;
        }
        Command::Gate => {
            if tokens.len() < 3 {
                return syntax(line, "`gate` needs a name and a type");
            }
            sim.circuit_mut().add_gate(tokens[1], tokens[2], &tokens[3..])?;
        }
        Command::Probe => {
            expect_args(line, tokens[0], tokens, 2)?;
            sim.circuit_mut().add_probe(tokens[1])?;
        }
        Command::Flip => {
            expect_args(line, tokens[0], tokens, 4)?;
            let value = parse_value(tokens[2])?;
            let time = parse::<Time>(line, "time", tokens[3])?;
            sim.add_transition(tokens[1], value, time)?;
        }
        Command::Done => return Ok(false),
    }
    Ok(true)
}

/// Builds a [Simulation] from the description read from `reader`.
///
/// Fails on the first invalid line, the error carries its 1-based line number.
///
/// # Example
/// ```
/// # use gatesim::io::read_description;
/// let input = "table not 1 0\ntype not3 not 3\ngate a not3\nprobe a\nflip a 1 2\ndone\n";
/// let mut sim = read_description(input.as_bytes()).unwrap();
/// sim.run().unwrap();
/// assert_eq!(sim.probes().len(), 1);
/// ```
pub fn read_description<R: BufRead>(mut reader: R) -> Result<Simulation> {
    let mut sim = Simulation::new(Circuit::new());
    let mut buf = String::new();
    let mut line = 0;
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        line += 1;
        let tokens = buf.split_whitespace().collect::<Vec<_>>();
        if tokens.is_empty() {
            continue;
        }
        match apply(&mut sim, line, &tokens) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => return Err(e.at_line(line)),
        }
    }
    debug!(lines = line, gates = sim.circuit().len(), "read circuit description");
    Ok(sim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::ProbeRecord;
    use std::io::Read;

    const HALF_ADDER: &str = "
table xor 0 1 1 0
table and 0 0 0 1
table buf 0 1
type in buf 0
type xor2 xor 2
type and1 and 1
gate a in
gate b in
gate sum xor2 a b
gate carry and1 a b
probe sum
probe carry
flip a 1 0
flip b 1 5
done
";

    fn error_at(input: &str) -> (usize, Error) {
        match read_description(input.as_bytes()) {
            Err(Error::AtLine { line, source }) => (line, *source),
            Err(Error::Syntax { line, message }) => (line, Error::Syntax { line, message }),
            other => panic!("expected a line error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_half_adder() {
        let mut sim = read_description(HALF_ADDER.as_bytes()).unwrap();
        assert_eq!(sim.circuit().len(), 4);
        sim.run().unwrap();

        let r = |time, gate: &str, value| ProbeRecord {
            time,
            gate: gate.into(),
            value,
        };
        assert_eq!(
            sim.probes(),
            &[r(2, "sum", true), r(6, "carry", true), r(7, "sum", false)]
        );
    }

    #[test]
    fn test_stops_after_done() {
        let input = format!("{}layout\n<svg/>\n", HALF_ADDER);
        let mut reader = input.as_bytes();
        read_description(&mut reader).unwrap();
        let mut rest = String::new();
        reader.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "layout\n<svg/>\n");
    }

    #[test]
    fn test_eof_ends_description() {
        let sim = read_description("table buf 0 1\n\n  \ntype in buf 0\ngate a in".as_bytes()).unwrap();
        assert!(sim.circuit().gate_by_name("a").is_some());
    }

    #[test]
    fn test_unknown_command_is_ignored() {
        let sim = read_description("table buf 0 1\nwire x y\ntype in buf 0\n".as_bytes()).unwrap();
        assert!(sim.circuit().gate_type("in").is_some());
    }

    #[test]
    fn test_errors_carry_line() {
        let (line, e) = error_at("table buf 0 1\ntable bad 0 1 0\n");
        assert_eq!(line, 2);
        assert!(matches!(e, Error::InvalidTableLength { len: 3, .. }));

        let (line, e) = error_at("table buf 0 1\ntype in buf\n");
        assert_eq!(line, 2);
        assert!(matches!(e, Error::Syntax { .. }));

        let (line, e) = error_at("table buf 0 1\ntype in buf -1\n");
        assert_eq!(line, 2);
        assert!(matches!(e, Error::NegativeDelay { delay: -1, .. }));

        let (line, e) = error_at("table buf 0 x\n");
        assert_eq!(line, 1);
        assert!(matches!(e, Error::Syntax { .. }));

        let (line, e) = error_at("table buf 0 1\ntype in buf 0\ngate a in\n\nflip a 2 0\n");
        assert_eq!(line, 5);
        assert!(matches!(e, Error::InvalidValue(v) if v == "2"));

        let (line, e) = error_at("probe ghost\n");
        assert_eq!(line, 1);
        assert!(matches!(e, Error::UnknownGate(_)));
    }
}
