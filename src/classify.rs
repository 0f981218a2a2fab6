//! Structural classification of loop bodies.
//!
//! A loop body is folded into runs and matched against a handful of idioms
//! that have a closed-form effect on the tape. Classification only ever
//! looks at the body text; the tape is consulted when the chosen class is
//! executed, never here.

use crate::fold::{self, Command, Run};

/// How a loop is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopClass {
    /// `[-]` or `[+]`: zero the current cell.
    Clear,
    /// `[<]`: move left until a zero cell.
    ScanLeft,
    /// `[>]`: move right until a zero cell.
    ScanRight,
    /// `[->+>>+<<<]`-style transfer where every target receives the value once.
    /// Offsets are relative to the loop cell.
    Copy(Vec<usize>),
    /// Transfer where at least one target receives a multiple of the value.
    /// Pairs are `(offset, coefficient)`.
    Multiply(Vec<(usize, usize)>),
    /// Anything else: interpret the body while the current cell is nonzero.
    Generic,
}

impl LoopClass {
    /// Classify the text strictly between a `[` and its matching `]`.
    pub fn classify(body: &[u8]) -> Self {
        match body {
            b"-" | b"+" => LoopClass::Clear,
            b"<" => LoopClass::ScanLeft,
            b">" => LoopClass::ScanRight,
            _ => transfer(body).unwrap_or(LoopClass::Generic),
        }
    }

    /// `(offset, coefficient)` pairs for Copy and Multiply, empty otherwise.
    pub fn targets(&self) -> Vec<(usize, usize)> {
        match self {
            LoopClass::Copy(offsets) => offsets.iter().map(|&o| (o, 1)).collect(),
            LoopClass::Multiply(pairs) => pairs.clone(),
            _ => Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoopClass::Clear => "clear",
            LoopClass::ScanLeft => "scan-left",
            LoopClass::ScanRight => "scan-right",
            LoopClass::Copy(_) => "copy",
            LoopClass::Multiply(_) => "multiply",
            LoopClass::Generic => "generic",
        }
    }
}

// Matches `-` (`>`{k} `+`{m})+ `<`{sum of k}, with k, m >= 1.
fn transfer(body: &[u8]) -> Option<LoopClass> {
    let mut runs = fold::runs(body);

    let Run { command: Command::Dec, count: 1 } = runs.next()? else {
        return None;
    };

    let mut targets: Vec<(usize, usize)> = Vec::new();
    let mut offset = 0usize;
    loop {
        let run = runs.next()?;
        match run.command {
            Command::Right => {
                let add = runs.next()?;
                if add.command != Command::Inc {
                    return None;
                }
                offset += run.count;
                targets.push((offset, add.count));
            }
            Command::Left => {
                // The return trip must be the final run and undo every move.
                if targets.is_empty() || run.count != offset || runs.next().is_some() {
                    return None;
                }
                break;
            }
            _ => return None,
        }
    }

    if targets.iter().all(|&(_, coefficient)| coefficient == 1) {
        Some(LoopClass::Copy(targets.into_iter().map(|(o, _)| o).collect()))
    } else {
        Some(LoopClass::Multiply(targets))
    }
}
