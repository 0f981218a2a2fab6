//! Source sanitization and bracket validation.

use crate::error::{BfError, BracketKind};

/// The eight command characters; everything else in a source is a comment.
pub const COMMANDS: [char; 8] = ['>', '<', '+', '-', '.', ',', '[', ']'];

/// Keep only Brainfuck instruction characters, in their original order.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| COMMANDS.contains(c)).collect()
}

/// Check that the program has as many `[` as `]`.
///
/// Only bracket characters are counted, over the whole input. A surplus of
/// `[` fails with a missing `]`, a surplus of `]` with a missing `[`. Order
/// is not checked: `"]["` balances and validates.
pub fn validate_brackets(code: &str) -> Result<(), BfError> {
    let balance: isize = code
        .chars()
        .map(|c| match c {
            '[' => 1,
            ']' => -1,
            _ => 0,
        })
        .sum();

    match balance {
        0 => Ok(()),
        n if n > 0 => Err(BfError::MissingBracket { kind: BracketKind::Close }),
        _ => Err(BfError::MissingBracket { kind: BracketKind::Open }),
    }
}

/// A sanitized, bracket-checked program ready for execution.
#[derive(Debug, Clone)]
pub struct Program {
    code: Vec<u8>,
    // jumps[i] holds the matching bracket for a `[` or `]` at i, if it has one.
    jumps: Vec<Option<usize>>,
    depth: usize,
}

impl Program {
    /// Sanitize `raw`, validate its brackets and pair them up.
    ///
    /// Pairing is innermost-first. In a balanced but mis-nested program a
    /// `]` that closes nothing and the `[` it leaves open stay unpaired.
    pub fn parse(raw: &str) -> Result<Self, BfError> {
        let code = sanitize(raw);
        validate_brackets(&code)?;
        let code = code.into_bytes();

        let mut jumps = vec![None; code.len()];
        let mut stack: Vec<usize> = Vec::new();
        let mut depth = 0;
        for (i, &b) in code.iter().enumerate() {
            if b == b'[' {
                stack.push(i);
                depth = depth.max(stack.len());
            } else if b == b']' {
                if let Some(open) = stack.pop() {
                    jumps[open] = Some(i);
                    jumps[i] = Some(open);
                }
            }
        }

        Ok(Self { code, jumps, depth })
    }

    /// The sanitized command bytes.
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Deepest loop nesting in the program.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Index of the `]` matching the bracket at `pos`, or the `[` matching a `]`.
    pub(crate) fn matching(&self, pos: usize) -> Option<usize> {
        self.jumps[pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_comments_and_keeps_order() {
        assert_eq!(sanitize("a+b-c [x>y<] .,\n$"), "+-[><].,");
        assert_eq!(sanitize("hello"), "");
    }

    #[test]
    fn balanced_brackets_validate() {
        assert!(validate_brackets("[[]]").is_ok());
        assert!(validate_brackets("").is_ok());
        assert!(validate_brackets("+[-]>[<]").is_ok());
    }

    #[test]
    fn unclosed_loop_is_missing_close() {
        let result = validate_brackets("[[");
        assert!(matches!(result, Err(BfError::MissingBracket { kind: BracketKind::Close })));
    }

    #[test]
    fn surplus_close_is_missing_open() {
        let result = validate_brackets("]");
        assert!(matches!(result, Err(BfError::MissingBracket { kind: BracketKind::Open })));

        let result = validate_brackets("[]]");
        assert!(matches!(result, Err(BfError::MissingBracket { kind: BracketKind::Open })));
    }

    #[test]
    fn only_the_final_count_matters() {
        assert!(validate_brackets("][").is_ok());
        assert!(validate_brackets("]+[-]").is_ok());
    }

    #[test]
    fn parse_pairs_brackets() {
        let program = Program::parse("+[>[-]<]").unwrap();
        assert_eq!(program.code(), b"+[>[-]<]");
        assert_eq!(program.matching(1), Some(7));
        assert_eq!(program.matching(7), Some(1));
        assert_eq!(program.matching(3), Some(5));
        assert_eq!(program.depth(), 2);
    }

    #[test]
    fn misnested_brackets_stay_unpaired() {
        let program = Program::parse("]+[[-]").unwrap();
        assert_eq!(program.matching(0), None);
        assert_eq!(program.matching(2), None);
        assert_eq!(program.matching(3), Some(5));
        assert_eq!(program.depth(), 2);
    }
}
