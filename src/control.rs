use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use crate::error::BfError;

/// Controls for cooperative cancellation, timeout and step limiting.
///
/// Cloning shares the interrupt flag, so a signal handler can hold one clone
/// while the interpreter holds another.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    pub timeout: Option<Duration>,
    pub max_steps: Option<u64>,
    pub interrupt: Arc<AtomicBool>,
}

impl RunControl {
    pub fn new(timeout: Option<Duration>, max_steps: Option<u64>, interrupt: Arc<AtomicBool>) -> Self {
        Self { timeout, max_steps, interrupt }
    }

    /// Raise the interrupt flag.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Start the clock for one run.
    pub fn start(&self) -> Checkpoint {
        Checkpoint {
            started: Instant::now(),
            deadline: self.timeout.filter(|t| !t.is_zero()),
            max_steps: self.max_steps,
            interrupt: self.interrupt.clone(),
            steps: 0,
        }
    }
}

/// Per-run cancellation state, ticked after every primitive operation.
#[derive(Debug)]
pub struct Checkpoint {
    started: Instant,
    deadline: Option<Duration>,
    max_steps: Option<u64>,
    interrupt: Arc<AtomicBool>,
    steps: u64,
}

impl Checkpoint {
    /// Count one step and fail if the run must stop.
    pub fn tick(&mut self) -> Result<(), BfError> {
        if self.interrupt.load(Ordering::Relaxed) {
            return Err(BfError::Interrupted { elapsed: self.elapsed().as_secs_f64() });
        }

        if let Some(limit) = self.max_steps {
            if self.steps >= limit {
                return Err(BfError::StepLimitExceeded { limit });
            }
        }
        self.steps += 1;

        if let Some(deadline) = self.deadline {
            if self.started.elapsed() >= deadline {
                return Err(BfError::Timeout { seconds: deadline.as_secs_f64() });
            }
        }
        Ok(())
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
