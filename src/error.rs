use thiserror::Error;

/// Every way building, seeding, running or serializing a circuit can fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("truth table `{name}` has {len} entries, expected a power of two >= 2")]
    InvalidTableLength { name: String, len: usize },

    #[error("truth table `{name}` contains {value}, expected 0 or 1")]
    InvalidTableValue { name: String, value: u8 },

    #[error("truth table `{name}` takes {expected} inputs, got {actual}")]
    InputCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("gate type `{name}` has negative delay {delay}")]
    NegativeDelay { name: String, delay: i64 },

    #[error("truth table name `{0}` already used")]
    DuplicateTruthTable(String),

    #[error("gate type name `{0}` already used")]
    DuplicateGateType(String),

    #[error("gate name `{0}` already used")]
    DuplicateGate(String),

    #[error("unknown truth table `{0}`")]
    UnknownTruthTable(String),

    #[error("unknown gate type `{0}`")]
    UnknownGateType(String),

    #[error("unknown gate `{0}`")]
    UnknownGate(String),

    #[error("gate `{gate}` has {arity} input terminals, terminal {terminal} is out of range")]
    TerminalOutOfRange {
        gate: String,
        terminal: usize,
        arity: usize,
    },

    #[error("gate type `{name}` can't delay a transition at t={time} by {delay}, time overflows")]
    TimeOverflow { name: String, time: u64, delay: u64 },

    #[error("input terminal {terminal} of gate `{gate}` is already connected")]
    TerminalAlreadyConnected { gate: String, terminal: usize },

    #[error("input terminal {terminal} of gate `{gate}` is not connected")]
    UnconnectedInput { gate: String, terminal: usize },

    #[error("gate `{0}` is already probed")]
    AlreadyProbed(String),

    #[error("invalid logic value `{0}`, expected 0 or 1")]
    InvalidValue(String),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("input lacks circuit layout information")]
    MissingLayout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Attaches the 1-based description line that triggered `self`.
    pub(crate) fn at_line(self, line: usize) -> Error {
        match self {
            e @ Error::Syntax { .. } | e @ Error::AtLine { .. } => e,
            e => Error::AtLine {
                line,
                source: Box::new(e),
            },
        }
    }
}
