use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

const HELLO: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env_remove("BF_TIMEOUT")
        .env_remove("BF_MAX_STEPS")
        .env_remove("BF_TAPE_LENGTH")
        .env_remove("RUST_LOG")
        .timeout(Duration::from_secs(10));
    cmd
}

fn write_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn hello_world_from_literal() {
    cargo_bin()
        .arg(HELLO)
        .assert()
        .success()
        .stdout("Hello World!\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn hello_world_without_optimizations() {
    cargo_bin()
        .arg("--no-optimize")
        .arg(HELLO)
        .assert()
        .success()
        .stdout("Hello World!\n");
}

#[test]
fn comments_are_ignored() {
    // 'A' is 65 = 13 * 5
    cargo_bin()
        .arg("set up +++++++++++++ then [multiply > +++++ < -] and print > .")
        .assert()
        .success()
        .stdout("A");
}

#[test]
fn program_from_file() {
    let tf = write_tempfile(HELLO);
    cargo_bin()
        .arg(tf.path())
        .assert()
        .success()
        .stdout("Hello World!\n");
}

#[test]
fn file_extension_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hello.bf"), HELLO).unwrap();
    cargo_bin()
        .arg(dir.path().join("hello"))
        .assert()
        .success()
        .stdout("Hello World!\n");
}

#[test]
fn program_from_stdin() {
    cargo_bin()
        .arg("-")
        .write_stdin(HELLO)
        .assert()
        .success()
        .stdout("Hello World!\n");
}

#[test]
fn stdin_is_program_input() {
    cargo_bin()
        .arg(",[.,]")
        .write_stdin("abc\0")
        .assert()
        .success()
        .stdout("abc");
}

#[test]
fn exhausted_input_leaves_cell_unchanged() {
    // 'B' is read, then end of input keeps it; both dots print 'B'.
    cargo_bin()
        .arg(",.,.")
        .write_stdin("B")
        .assert()
        .success()
        .stdout("BB");
}

#[test]
fn dollar_prints_newline() {
    cargo_bin()
        .arg(format!("{}.", "+".repeat(36)))
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn unclosed_loop_reports_missing_close() {
    cargo_bin()
        .arg("+.[[")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("BRAINFUCK BRACKETS: missing ']'"));
}

#[test]
fn stray_close_reports_missing_open() {
    cargo_bin()
        .arg("+.]")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("BRAINFUCK BRACKETS: missing '['"));
}

#[test]
fn misnested_but_balanced_brackets_run() {
    cargo_bin()
        .arg(format!("{}.][.", "+".repeat(65)))
        .assert()
        .success()
        .stdout("A");
}

#[test]
fn timeout_flag_stops_infinite_loop() {
    cargo_bin()
        .args(["--timeout", "0.2", "+[]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("BRAINFUCK TIMEOUT: program timed out after 0.200 second(s)"));
}

#[test]
fn timeout_from_environment() {
    let tf = write_tempfile("+[]");
    cargo_bin()
        .env("BF_TIMEOUT", "0.1")
        .arg(tf.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("TIMEOUT"));
}

#[test]
fn step_limit_flag() {
    cargo_bin()
        .args(["--max-steps", "50", "+[]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (50)"));
}

#[test]
fn nesting_limit_from_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bf.toml"), "[interpreter]\nmax_nesting = 1\n").unwrap();
    cargo_bin()
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("+[[-]]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("BRAINFUCK NESTING"));
}

#[test]
fn missing_argument_prints_usage() {
    cargo_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn help_flag_succeeds() {
    cargo_bin()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("--timeout"));
}
