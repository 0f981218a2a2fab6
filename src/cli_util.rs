use std::io::{self, IsTerminal, Write};
use nu_ansi_term::Style;
use crate::error::BfError;
use crate::theme::catppuccin::Mocha;

/// One-line diagnostic for `err`, e.g. `BRAINFUCK BRACKETS: missing ']'`.
pub fn render_error(err: &BfError) -> String {
    format!("BRAINFUCK {}: {}", err.category(), err)
}

/// Print the diagnostic for `err` to stderr on a line of its own.
///
/// Cancellations are shown in a softer color than structural errors when
/// stderr is a terminal.
pub fn print_error(err: &BfError) {
    let line = render_error(err);
    let mut stderr = io::stderr();

    // Program output rarely ends with a newline; keep the diagnostic off its last line.
    if stderr.is_terminal() {
        let color = if err.is_cancellation() { Mocha::PEACH } else { Mocha::RED };
        let _ = writeln!(stderr, "\n{}", Style::new().bold().fg(color).paint(line));
    } else {
        let _ = writeln!(stderr, "\n{line}");
    }
    let _ = stderr.flush();
}
