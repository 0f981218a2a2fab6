//! The execution driver.
//!
//! A run sanitizes and validates the whole source first, so structural
//! errors never leave a program half-executed. The command stream is then
//! walked left to right: linear commands are folded into runs and applied to
//! the tape in one call, and each loop is classified on entry and executed
//! either in closed form or by re-interpreting its body.

use std::io;
use std::sync::{atomic::AtomicBool, Arc};

use tracing::{debug, trace};

use crate::classify::LoopClass;
use crate::config::Config;
use crate::control::{Checkpoint, RunControl};
use crate::error::BfError;
use crate::fold::{Command, Run};
use crate::program::Program;
use crate::tape::{InputProvider, OutputSink, Tape};
use crate::terminal;

/// An optimizing Brainfuck interpreter for a single program.
pub struct Interpreter {
    source: String,
    config: Config,
    control: RunControl,
    tape: Tape,
    output_sink: OutputSink,
    input_provider: InputProvider,
}

impl Interpreter {
    /// Create an interpreter for `source` with default settings.
    ///
    /// Output goes to stdout and `,` reads from stdin until a sink or provider
    /// is set.
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_config(source, Config::default())
    }

    /// Create an interpreter for `source` using `config` for the tape size,
    /// limits and optimization switch.
    pub fn with_config(source: impl Into<String>, config: Config) -> Self {
        let control = RunControl::new(config.timeout, config.max_steps, Arc::default());
        let input_provider = terminal::stdin_provider(control.interrupt.clone());
        Self {
            source: source.into(),
            tape: Tape::new(config.tape_length),
            config,
            control,
            output_sink: terminal::stdout_sink(),
            input_provider,
        }
    }

    /// Replace the tape, e.g. to start from prepared cells.
    pub fn with_tape(mut self, tape: Tape) -> Self {
        self.tape = tape;
        self
    }

    /// Provide an output sink. When set, '.' sends bytes to this sink instead of stdout.
    pub fn set_output_sink<F>(&mut self, sink: F)
    where
        F: FnMut(&[u8]) -> io::Result<()> + Send + 'static,
    {
        self.output_sink = Box::new(sink);
    }

    /// Provide an input provider. When set, ',' reads from this provider instead of stdin.
    /// Returning `None` means input is exhausted and leaves the cell unchanged.
    pub fn set_input_provider<F>(&mut self, provider: F)
    where
        F: FnMut() -> io::Result<Option<u8>> + Send + 'static,
    {
        self.input_provider = Box::new(provider);
    }

    /// The flag that stops the run at its next checkpoint when set.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        self.control.interrupt.clone()
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Execute the program until completion, cancellation or error.
    pub fn run(&mut self) -> Result<(), BfError> {
        let program = Program::parse(&self.source)?;
        if program.depth() > self.config.max_nesting {
            return Err(BfError::NestingTooDeep {
                depth: program.depth(),
                limit: self.config.max_nesting,
            });
        }

        debug!(
            commands = program.len(),
            depth = program.depth(),
            optimize = self.config.optimize,
            "run started"
        );

        let mut checkpoint = self.control.start();
        let result = self.execute(&program, &mut checkpoint);

        debug!(
            elapsed_ms = checkpoint.elapsed().as_secs_f64() * 1000.0,
            steps = checkpoint.steps(),
            ok = result.is_ok(),
            "run finished"
        );
        result
    }

    // Walk the whole program. Literal loops are frames on an explicit stack,
    // so source nesting never grows the call stack.
    fn execute(&mut self, program: &Program, checkpoint: &mut Checkpoint) -> Result<(), BfError> {
        let code = program.code();
        let mut frames: Vec<Frame> = Vec::new();
        let mut pos = 0;

        loop {
            let end = frames.last().map_or(code.len(), |frame| frame.close);
            let Some(run) = Run::at(&code[..end], pos) else {
                // End of a loop body: iterate again or leave the loop.
                let Some(frame) = frames.last().copied() else {
                    return Ok(());
                };
                checkpoint.tick()?;
                if self.tape.get() != 0 {
                    pos = frame.open + 1;
                } else {
                    frames.pop();
                    pos = frame.close + 1;
                }
                continue;
            };

            match run.command {
                Command::Right => self.tape.move_right(run.count),
                Command::Left => self.tape.move_left(run.count),
                Command::Inc => self.tape.increment(run.count),
                Command::Dec => self.tape.decrement(run.count),
                Command::Output => self.tape.output(&mut self.output_sink)?,
                Command::Input => self.tape.input(&mut self.input_provider)?,
                Command::Open => {
                    let Some(close) = program.matching(pos) else {
                        // A `[` left open by a stray `]` holds the rest of the program.
                        trace!(at = pos, "unpaired [ ends the run");
                        return Ok(());
                    };
                    let frame = Frame { open: pos, close };
                    if self.enter_loop(program, frame, checkpoint)? {
                        frames.push(frame);
                        pos += 1;
                    } else {
                        pos = close + 1;
                    }
                    continue;
                }
                // Paired `]` are consumed through their frame; stray ones do nothing.
                Command::Close => {}
            }
            if run.command.is_foldable() {
                trace!(command = ?run.command, count = run.count, ptr = self.tape.pointer(), "run");
            }
            checkpoint.tick()?;
            pos += run.count;
        }
    }

    // Execute the loop at `frame` in closed form where possible. Returns true
    // when its body has to be interpreted literally.
    fn enter_loop(
        &mut self,
        program: &Program,
        frame: Frame,
        checkpoint: &mut Checkpoint,
    ) -> Result<bool, BfError> {
        if self.tape.get() == 0 {
            checkpoint.tick()?;
            return Ok(false);
        }

        let class = if self.config.optimize {
            LoopClass::classify(&program.code()[frame.open + 1..frame.close])
        } else {
            LoopClass::Generic
        };
        trace!(
            class = class.name(),
            at = frame.open,
            ptr = self.tape.pointer(),
            cell = self.tape.get(),
            "loop"
        );

        match &class {
            LoopClass::Clear => self.tape.set(0),
            LoopClass::ScanLeft => {
                while self.tape.get() != 0 {
                    self.tape.move_left(1);
                    checkpoint.tick()?;
                }
                return Ok(false);
            }
            LoopClass::ScanRight => {
                while self.tape.get() != 0 {
                    self.tape.move_right(1);
                    checkpoint.tick()?;
                }
                return Ok(false);
            }
            LoopClass::Copy(_) | LoopClass::Multiply(_) => {
                if !self.tape.transfer(&class.targets()) {
                    trace!(at = frame.open, "transfer leaves the tape, running body");
                    return Ok(true);
                }
            }
            LoopClass::Generic => return Ok(true),
        }
        checkpoint.tick()?;
        Ok(false)
    }
}

// A loop whose body is being interpreted literally.
#[derive(Debug, Clone, Copy)]
struct Frame {
    open: usize,
    close: usize,
}
