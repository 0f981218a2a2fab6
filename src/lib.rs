//! An optimizing Brainfuck interpreter library.
//!
//! Programs run on a tape of wrapping byte cells (30,000 by default) with a
//! single data pointer. Before anything executes, the source is stripped of
//! non-command characters and its brackets are checked.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; cell arithmetic wraps modulo 256.
//! - Moving right past the last cell wraps to cell 0; moving left from
//!   cell 0 stays at cell 0.
//! - Input `,` reads a single byte; at end of input the cell is left unchanged.
//! - Output `.` prints the cell as a character, except `$`, which prints a newline.
//! - Runs of `><+-` are applied as one tape operation.
//! - Loops shaped like `[-]`, `[<]`, `[>]` and `[->+>++<<]` execute in closed
//!   form; every other loop is interpreted literally.
//! - Cooperative timeout, interrupt and step limits.
//!
//! Quick start:
//!
//! ```no_run
//! use bf::Interpreter;
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
//! let mut bf = Interpreter::new(code);
//! bf.run().expect("program should run");
//! ```

use std::sync::Once;

pub mod classify;
pub mod cli_util;
pub mod commands;
pub mod config;
pub mod control;
pub mod error;
pub mod fold;
pub mod interpreter;
pub mod program;
pub mod source;
pub mod tape;
pub mod terminal;
pub mod theme;

pub use classify::LoopClass;
pub use config::Config;
pub use control::RunControl;
pub use error::{BfError, BracketKind};
pub use interpreter::Interpreter;
pub use program::{sanitize, validate_brackets, Program};
pub use tape::Tape;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=bf=debug` or
/// `RUST_LOG=bf=trace`; events go to stderr so program output stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
