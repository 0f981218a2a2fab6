//! The memory tape and its primitive operations.

use std::io;

/// Default number of cells on the tape.
pub const DEFAULT_TAPE_LENGTH: usize = 30_000;

/// Receives program output. For Brainfuck, one encoded character per call.
pub type OutputSink = Box<dyn FnMut(&[u8]) -> io::Result<()> + Send>;

/// Supplies program input one byte at a time. `Ok(None)` means input is exhausted.
pub type InputProvider = Box<dyn FnMut() -> io::Result<Option<u8>> + Send>;

/// A fixed-length tape of wrapping byte cells with a single data pointer.
///
/// Moving right past the last cell wraps to cell 0. Moving left never goes
/// below cell 0; the pointer stays there instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(DEFAULT_TAPE_LENGTH)
    }
}

impl Tape {
    /// A zeroed tape of `len` cells (at least one).
    pub fn new(len: usize) -> Self {
        Self { cells: vec![0; len.max(1)], pointer: 0 }
    }

    /// A tape holding `cells` with the pointer at 0.
    pub fn from_cells(cells: Vec<u8>) -> Self {
        if cells.is_empty() {
            return Self::new(1);
        }
        Self { cells, pointer: 0 }
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value of the current cell.
    pub fn get(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn move_right(&mut self, n: usize) {
        let len = self.cells.len();
        self.pointer = (self.pointer + n % len) % len;
    }

    pub fn move_left(&mut self, n: usize) {
        self.pointer = self.pointer.saturating_sub(n);
    }

    pub fn increment(&mut self, n: usize) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add((n % 256) as u8);
    }

    pub fn decrement(&mut self, n: usize) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub((n % 256) as u8);
    }

    /// Add `value * coefficient` into each target cell, then zero the current cell.
    ///
    /// Offsets are relative to the pointer and must stay on the tape; if any
    /// target would fall past the end nothing is changed and `false` is returned.
    pub fn transfer(&mut self, targets: &[(usize, usize)]) -> bool {
        let furthest = targets.iter().map(|&(offset, _)| offset).max().unwrap_or(0);
        if self.pointer + furthest >= self.cells.len() {
            return false;
        }

        let value = self.get();
        for &(offset, coefficient) in targets {
            let cell = &mut self.cells[self.pointer + offset];
            *cell = cell.wrapping_add(value.wrapping_mul((coefficient % 256) as u8));
        }
        self.set(0);
        true
    }

    /// The character `.` prints for the current cell. `$` prints as a newline.
    pub fn output_char(&self) -> char {
        match self.get() {
            b'$' => '\n',
            b => b as char,
        }
    }

    /// Send the current cell to `sink`.
    pub fn output(&self, sink: &mut OutputSink) -> io::Result<()> {
        let mut buf = [0u8; 4];
        let encoded = self.output_char().encode_utf8(&mut buf);
        (sink)(encoded.as_bytes())
    }

    /// Read one byte from `provider` into the current cell.
    ///
    /// Exhausted input, including an end-of-file error, leaves the cell unchanged.
    pub fn input(&mut self, provider: &mut InputProvider) -> io::Result<()> {
        match (provider)() {
            Ok(Some(b)) => self.set(b),
            Ok(None) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {}
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn arithmetic_wraps() {
        let mut tape = Tape::new(1);
        tape.decrement(1);
        assert_eq!(tape.get(), 255);
        tape.increment(1);
        assert_eq!(tape.get(), 0);
        tape.increment(300);
        assert_eq!(tape.get(), 44);
        tape.decrement(556);
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn right_wraps_left_clamps() {
        let mut tape = Tape::new(3);
        tape.move_right(2);
        assert_eq!(tape.pointer(), 2);
        tape.move_right(1);
        assert_eq!(tape.pointer(), 0);
        tape.move_left(5);
        assert_eq!(tape.pointer(), 0);
        tape.move_right(7);
        assert_eq!(tape.pointer(), 1);
    }

    #[test]
    fn transfer_copies_and_scales() {
        let mut tape = Tape::from_cells(vec![5, 0, 0]);
        assert!(tape.transfer(&[(1, 1), (2, 1)]));
        assert_eq!(tape.cells(), &[0, 5, 5]);

        let mut tape = Tape::from_cells(vec![3, 0]);
        assert!(tape.transfer(&[(1, 2)]));
        assert_eq!(tape.cells(), &[0, 6]);

        let mut tape = Tape::from_cells(vec![200, 10]);
        assert!(tape.transfer(&[(1, 2)]));
        assert_eq!(tape.cells(), &[0, 154]);
    }

    #[test]
    fn transfer_refuses_targets_off_the_end() {
        let mut tape = Tape::from_cells(vec![0, 4]);
        tape.move_right(1);
        assert!(!tape.transfer(&[(1, 1)]));
        assert_eq!(tape.cells(), &[0, 4]);
    }

    #[test]
    fn dollar_prints_as_newline() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let captured = out.clone();
        let mut sink: OutputSink = Box::new(move |bytes: &[u8]| {
            captured.lock().unwrap().extend_from_slice(bytes);
            Ok(())
        });

        let mut tape = Tape::from_cells(vec![b'$', b'A']);
        tape.output(&mut sink).unwrap();
        tape.move_right(1);
        tape.output(&mut sink).unwrap();
        assert_eq!(out.lock().unwrap().as_slice(), b"\nA");
    }

    #[test]
    fn exhausted_input_leaves_cell_alone() {
        let mut tape = Tape::from_cells(vec![9]);

        let mut empty: InputProvider = Box::new(|| Ok(None));
        tape.input(&mut empty).unwrap();
        assert_eq!(tape.get(), 9);

        let mut eof: InputProvider = Box::new(|| Err(io::Error::from(io::ErrorKind::UnexpectedEof)));
        tape.input(&mut eof).unwrap();
        assert_eq!(tape.get(), 9);

        let mut one: InputProvider = Box::new(|| Ok(Some(b'Z')));
        tape.input(&mut one).unwrap();
        assert_eq!(tape.get(), b'Z');
    }
}
