//! Resolving the `CODE_OR_FILE` argument into program text.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::BfError;

/// Where the program text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Stdin,
    File(PathBuf),
    Literal,
}

/// Program text plus where it came from.
#[derive(Debug, Clone)]
pub struct Source {
    pub origin: Origin,
    pub text: String,
}

/// Resolve `arg` into program text.
///
/// - `-` reads the whole of `stdin`; a terminal stdin has nothing to read
///   and fails with [`BfError::NoInputAvailable`].
/// - An existing path is read as a file.
/// - Otherwise `<arg>.bf`, then `<arg>.b`, are tried.
/// - Failing all of that, `arg` is the program itself.
pub fn resolve<R: Read>(arg: &str, mut stdin: R, stdin_is_terminal: bool) -> Result<Source, BfError> {
    if arg == "-" {
        if stdin_is_terminal {
            return Err(BfError::NoInputAvailable);
        }
        let mut text = String::new();
        stdin.read_to_string(&mut text)?;
        return Ok(Source { origin: Origin::Stdin, text });
    }

    match find_file(Path::new(arg)) {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|source| BfError::SourceRead {
                path: path.display().to_string(),
                source,
            })?;
            Ok(Source { origin: Origin::File(path), text })
        }
        None => Ok(Source { origin: Origin::Literal, text: arg.to_string() }),
    }
}

fn find_file(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    ["bf", "b"]
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}
