use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use cross_xdg::BaseDirs;

use crate::tape::DEFAULT_TAPE_LENGTH;

/// Default limit on loop nesting depth.
pub const DEFAULT_MAX_NESTING: usize = 1024;

/// Interpreter settings.
///
/// `Config::default()` is what the library uses when nothing else is given.
/// [`Config::load`] layers the `[interpreter]` section of `bf.toml` and the
/// `BF_*` environment variables on top; command-line flags go on top of that.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of cells on the tape.
    pub tape_length: usize,
    /// Wall-clock limit for a run. `None` or zero runs until completion.
    pub timeout: Option<Duration>,
    /// Deepest loop nesting a program may have.
    pub max_nesting: usize,
    /// Abort after this many steps.
    pub max_steps: Option<u64>,
    /// Execute recognized loop idioms in closed form.
    pub optimize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tape_length: DEFAULT_TAPE_LENGTH,
            timeout: None,
            max_nesting: DEFAULT_MAX_NESTING,
            max_steps: None,
            optimize: true,
        }
    }
}

impl Config {
    /// Defaults, then `bf.toml` from the XDG config home, then the environment.
    pub fn load() -> Self {
        let mut cfg = Self::default();
        if let Some(content) = read_config_file() {
            cfg.apply_toml(&content);
        }
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg
    }

    /// Apply `key = value` pairs from the `[interpreter]` section of a TOML document.
    ///
    /// Unknown keys and unparsable values are ignored.
    pub fn apply_toml(&mut self, content: &str) {
        // Flat `key = value` lines only; other sections are skipped whole.
        let mut in_section = false;
        let mut map: HashMap<String, String> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_section = header.trim() == "interpreter";
                continue;
            }
            if !in_section {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"');
                map.insert(key.trim().to_string(), value.to_string());
            }
        }

        if let Some(n) = map.get("tape_length").and_then(|s| parse_count(s)) {
            self.tape_length = n;
        }
        if let Some(t) = map.get("timeout").and_then(|s| parse_seconds(s).ok()) {
            self.timeout = Some(t);
        }
        if let Some(n) = map.get("max_nesting").and_then(|s| parse_count(s)) {
            self.max_nesting = n;
        }
        if let Some(n) = map.get("max_steps").and_then(|s| s.parse::<u64>().ok()) {
            self.max_steps = Some(n);
        }
        if let Some(b) = map.get("optimize").and_then(|s| s.parse::<bool>().ok()) {
            self.optimize = b;
        }
    }

    /// Apply `BF_TAPE_LENGTH`, `BF_TIMEOUT` (seconds) and `BF_MAX_STEPS`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(n) = lookup("BF_TAPE_LENGTH").and_then(|s| parse_count(&s)) {
            self.tape_length = n;
        }
        if let Some(t) = lookup("BF_TIMEOUT").and_then(|s| parse_seconds(&s).ok()) {
            self.timeout = Some(t);
        }
        if let Some(n) = lookup("BF_MAX_STEPS").and_then(|s| s.trim().parse::<u64>().ok()) {
            self.max_steps = Some(n);
        }
    }
}

/// Parse a non-negative number of seconds, fractions allowed.
pub fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.trim().parse().map_err(|e| format!("invalid number of seconds '{s}': {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("seconds must be a finite, non-negative number, got '{s}'"))
}

// Positive integers only; a zero-length tape or nesting limit is meaningless.
fn parse_count(s: &str) -> Option<usize> {
    s.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

fn read_config_file() -> Option<String> {
    let base_dirs = BaseDirs::new().ok()?;

    // On Linux: resolves to /home/<user>/.config
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");

    fs::read_to_string(path).ok()
}
