use clap::Args;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::debug;

use crate::cli_util::print_error;
use crate::config::{parse_seconds, Config};
use crate::source::{self, Origin};
use crate::Interpreter;

/// Timeout applied by the CLI when neither a flag, the environment nor bf.toml sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Brainfuck code, the name of a Brainfuck file (.bf/.b optional), or - for stdin
    #[arg(value_name = "CODE_OR_FILE", allow_hyphen_values = true)]
    pub code_or_file: Option<String>,

    /// Seconds after which to kill the program; 0 runs until completion (fallback BF_TIMEOUT; default 60)
    #[arg(short = 't', long = "timeout", value_name = "SECONDS", value_parser = parse_seconds)]
    pub timeout: Option<Duration>,

    /// Maximum interpreter steps before abort (fallback BF_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<u64>,

    /// Number of tape cells (fallback BF_TAPE_LENGTH; default 30000)
    #[arg(long = "tape-length", value_name = "CELLS", value_parser = parse_cells)]
    pub tape_length: Option<usize>,

    /// Execute every loop literally instead of recognizing idioms
    #[arg(long = "no-optimize")]
    pub no_optimize: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

impl RunArgs {
    /// Resolve settings: flags -> env -> bf.toml -> defaults.
    pub fn config(&self, base: Config) -> Config {
        let mut cfg = base;
        if let Some(t) = self.timeout {
            cfg.timeout = Some(t);
        }
        cfg.timeout = cfg.timeout.or(Some(DEFAULT_TIMEOUT));
        if let Some(n) = self.max_steps {
            cfg.max_steps = Some(n);
        }
        if let Some(n) = self.tape_length {
            cfg.tape_length = n;
        }
        if self.no_optimize {
            cfg.optimize = false;
        }
        cfg
    }
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let Some(code_or_file) = args.code_or_file.as_deref() else {
        usage_and_exit(program, 2);
    };

    let stdin = io::stdin();
    let source = match source::resolve(code_or_file, stdin.lock(), stdin.is_terminal()) {
        Ok(source) => source,
        Err(err) => {
            print_error(&err);
            return 1;
        }
    };
    if let Origin::File(path) = &source.origin {
        debug!(path = %path.display(), "loaded program file");
    }

    let config = args.config(Config::load());
    debug!(?config, "resolved configuration");

    let mut bf = Interpreter::with_config(source.text, config);

    // Ctrl-C stops the run at its next checkpoint
    let interrupt = bf.interrupt_handle();
    if let Err(e) = ctrlc::set_handler(move || interrupt.store(true, Ordering::Relaxed)) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    let exit_code = match bf.run() {
        Ok(()) => 0,
        Err(err) => {
            print_error(&err);
            1
        }
    };

    let _ = io::stdout().flush();
    exit_code
}

fn parse_cells(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("the tape needs at least one cell".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid cell count '{s}': {e}")),
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] "<code>"      # Run Brainfuck code given on the command line
  {0} [OPTIONS] <FILE>        # Run a Brainfuck file (.bf and .b extensions are optional)
  {0} [OPTIONS] -             # Read the program from stdin

Options:
  --timeout, -t <SECONDS>  Kill the program after SECONDS (default 60, 0 = no limit)
  --max-steps <N>          Abort after N interpreter steps
  --tape-length <CELLS>    Number of tape cells (default 30000)
  --no-optimize            Execute every loop literally
  --help,    -h            Show this help

Notes:
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- A cell holding '$' prints as a newline.
- Input (`,`) reads one keypress on a terminal, one byte otherwise; at end of input the cell is left unchanged.
- If code or a file is given and stdin is piped, stdin is the program's input.
- Some programs never finish; use ctrl-c or --timeout to stop them.

Examples:
- Run a file, giving it input:
    {0} ./program.bf < input.txt
- Run forever:
    {0} --timeout 0 mandelbrot
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
