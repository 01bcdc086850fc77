use clap::Parser;
use gatesim::io::{read_description, read_layout, write_jsonp, write_outputs};
use gatesim::simulation::{QueueOptions, SimulationState};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use strum_macros::{Display, EnumString};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// What to print once the simulation settles.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
enum TraceMode {
    /// One `<time> <gate> <value>` line per probed transition.
    Text,
    /// Workload statistics of the event queue.
    Stats,
    /// Circuit, trace and layout for the browser visualizer.
    Jsonp,
}

/// Simulates the combinational circuit described on the input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Circuit description, stdin if not specified.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output format: text, stats or jsonp.
    #[arg(long, env = "TRACE", default_value_t = TraceMode::Text, value_parser = TraceMode::from_str)]
    trace: TraceMode,

    /// Log every event queue operation.
    #[arg(long, env = "DEBUG")]
    debug: bool,

    /// Write the circuit topology in dot format to this file.
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,
}

fn run(cli: &Cli) -> gatesim::Result<()> {
    let stdin = io::stdin();
    let mut input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(stdin.lock()),
    };

    let mut sim = read_description(&mut input)?;
    if let Some(path) = &cli.dot {
        sim.circuit().write_dot(path)?;
        info!(path = %path.display(), "wrote circuit topology");
    }
    let layout = if cli.trace == TraceMode::Jsonp {
        let layout = read_layout(&mut input)?;
        sim.probe_all_gates();
        Some(layout)
    } else {
        None
    };
    sim.set_queue_options(QueueOptions {
        stats: cli.trace == TraceMode::Stats,
        debug: cli.debug,
    });

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!(error = %e, "cannot install the Ctrl-C handler");
    }

    sim.schedule_inputs();
    while !interrupted.load(Ordering::SeqCst) {
        if sim.step()?.is_none() {
            break;
        }
    }
    if sim.state() != SimulationState::Settled {
        warn!(pending = sim.pending(), "interrupted before the circuit settled");
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match (sim.stats(), cli.trace) {
        (Some(stats), _) => write!(out, "{}", stats)?,
        (None, TraceMode::Jsonp) => {
            sim.undo_probe_all_gates();
            write_jsonp(&sim, layout.as_deref(), &mut out)?;
        }
        (None, _) => write_outputs(sim.probes(), &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
