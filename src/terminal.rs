//! Default stdin/stdout hooks.
//!
//! When stdin is a terminal, `,` reads a single keypress in raw mode so the
//! program sees input without waiting for Enter. Otherwise it reads one byte
//! from the stream.

use std::io::{self, IsTerminal, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};

use crate::tape::{InputProvider, OutputSink};

/// Write each character to stdout and flush immediately.
pub fn stdout_sink() -> OutputSink {
    Box::new(|bytes: &[u8]| {
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    })
}

/// Read program input from stdin, one keypress at a time on a terminal.
///
/// Ctrl-C during a keypress read raises `interrupt`.
pub fn stdin_provider(interrupt: Arc<AtomicBool>) -> InputProvider {
    if io::stdin().is_terminal() {
        Box::new(move || read_keypress(&interrupt))
    } else {
        Box::new(read_byte)
    }
}

fn read_byte() -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match io::stdin().lock().read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// What a single key means to a running program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keypress {
    Byte(u8),
    EndOfInput,
    Interrupt,
    Ignored,
}

/// Translate a terminal key event into program input.
pub fn map_key(key: &KeyEvent) -> Keypress {
    if key.kind != KeyEventKind::Press {
        return Keypress::Ignored;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Keypress::Interrupt,
            KeyCode::Char('d') => Keypress::EndOfInput,
            _ => Keypress::Ignored,
        };
    }
    match key.code {
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            // Characters beyond one byte contribute their leading UTF-8 byte.
            Keypress::Byte(c.encode_utf8(&mut buf).as_bytes()[0])
        }
        KeyCode::Enter => Keypress::Byte(b'\n'),
        KeyCode::Tab => Keypress::Byte(b'\t'),
        KeyCode::Backspace => Keypress::Byte(0x08),
        KeyCode::Esc => Keypress::Byte(0x1b),
        _ => Keypress::Ignored,
    }
}

fn read_keypress(interrupt: &AtomicBool) -> io::Result<Option<u8>> {
    enable_raw_mode()?;
    let key = next_key();
    disable_raw_mode()?;

    match key? {
        Keypress::Byte(b) => Ok(Some(b)),
        Keypress::EndOfInput => Ok(None),
        Keypress::Interrupt => {
            interrupt.store(true, Ordering::Relaxed);
            Ok(None)
        }
        Keypress::Ignored => Ok(None),
    }
}

fn next_key() -> io::Result<Keypress> {
    loop {
        if let Event::Key(key) = event::read()? {
            match map_key(&key) {
                Keypress::Ignored => continue,
                other => return Ok(other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn printable_keys_become_bytes() {
        assert_eq!(map_key(&press(KeyCode::Char('a'), KeyModifiers::NONE)), Keypress::Byte(b'a'));
        assert_eq!(map_key(&press(KeyCode::Char('A'), KeyModifiers::SHIFT)), Keypress::Byte(b'A'));
        assert_eq!(map_key(&press(KeyCode::Enter, KeyModifiers::NONE)), Keypress::Byte(b'\n'));
    }

    #[test]
    fn control_keys_end_or_interrupt() {
        assert_eq!(map_key(&press(KeyCode::Char('d'), KeyModifiers::CONTROL)), Keypress::EndOfInput);
        assert_eq!(map_key(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Keypress::Interrupt);
        assert_eq!(map_key(&press(KeyCode::F(5), KeyModifiers::NONE)), Keypress::Ignored);
    }
}
