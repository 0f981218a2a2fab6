//! Run-length folding of linear commands.
//!
//! Consecutive identical `>`, `<`, `+` or `-` commands collapse into a single
//! [`Run`] so the tape is mutated once per run instead of once per command.
//! Every other command is its own run of length 1.

/// One of the eight Brainfuck commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Right,
    Left,
    Inc,
    Dec,
    Output,
    Input,
    Open,
    Close,
}

impl Command {
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            b'>' => Command::Right,
            b'<' => Command::Left,
            b'+' => Command::Inc,
            b'-' => Command::Dec,
            b'.' => Command::Output,
            b',' => Command::Input,
            b'[' => Command::Open,
            b']' => Command::Close,
            _ => return None,
        })
    }

    /// Pointer moves and cell arithmetic fold; I/O and brackets do not.
    pub fn is_foldable(self) -> bool {
        matches!(self, Command::Right | Command::Left | Command::Inc | Command::Dec)
    }
}

/// `count` consecutive copies of `command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub command: Command,
    pub count: usize,
}

impl Run {
    /// Read the run starting at `pos`.
    ///
    /// Returns `None` at the end of `code` or on a byte that is not a command.
    pub fn at(code: &[u8], pos: usize) -> Option<Run> {
        let first = *code.get(pos)?;
        let command = Command::from_byte(first)?;
        let count = if command.is_foldable() {
            code[pos..].iter().take_while(|&&b| b == first).count()
        } else {
            1
        };
        Some(Run { command, count })
    }
}

/// Iterator over the runs of a command slice.
pub struct Runs<'a> {
    code: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let run = Run::at(self.code, self.pos)?;
        self.pos += run.count;
        Some(run)
    }
}

/// Fold `code` into runs.
pub fn runs(code: &[u8]) -> Runs<'_> {
    Runs { code, pos: 0 }
}
