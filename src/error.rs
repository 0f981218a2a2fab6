use std::fmt;

/// Errors that can abort a Brainfuck run.
///
/// Structural and input-availability errors are raised before anything
/// executes; cancellation errors are raised at checkpoints during
/// execution. Tape boundaries and end-of-input are never errors.
#[derive(Debug, thiserror::Error)]
pub enum BfError {
    /// Brackets were not balanced; `kind` is the bracket that is missing.
    #[error("missing '{kind}'")]
    MissingBracket { kind: BracketKind },

    /// Loops are nested deeper than the configured limit.
    #[error("loops nested {depth} deep, limit is {limit}")]
    NestingTooDeep { depth: usize, limit: usize },

    /// The wall-clock timeout elapsed.
    #[error("program timed out after {seconds:.3} second(s)")]
    Timeout { seconds: f64 },

    /// The interrupt flag was raised (ctrl-c).
    #[error("ctrl-c detected after {elapsed:.3} seconds")]
    Interrupted { elapsed: f64 },

    /// Execution aborted due to step limit.
    #[error("step limit exceeded ({limit})")]
    StepLimitExceeded { limit: u64 },

    /// The program was requested from stdin but no stdin is attached.
    #[error("- specified but no stdin")]
    NoInputAvailable,

    /// The source file could not be read.
    #[error("failed to read {path}: {source}")]
    SourceRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing program output or reading program input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BfError {
    /// Short upper-case category used as the diagnostic prefix.
    pub fn category(&self) -> &'static str {
        match self {
            BfError::MissingBracket { .. } => "BRACKETS",
            BfError::NestingTooDeep { .. } => "NESTING",
            BfError::Timeout { .. } => "TIMEOUT",
            BfError::Interrupted { .. } => "TERMINATED",
            BfError::StepLimitExceeded { .. } => "STEPS",
            BfError::NoInputAvailable => "INPUT",
            BfError::SourceRead { .. } => "SOURCE",
            BfError::Io(_) => "IO",
        }
    }

    /// True for the errors raised by a cancellation checkpoint.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            BfError::Timeout { .. } | BfError::Interrupted { .. } | BfError::StepLimitExceeded { .. }
        )
    }
}

/// Which bracket a program is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "["),
            BracketKind::Close => write!(f, "]"),
        }
    }
}
