// Regression tests: drive the p8pretty binary end to end.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const CART: &str = "pico-8 cartridge // http://www.pico-8.com\nversion 41\n__lua__\nx=1\n__gfx__\n0000\n";

fn p8pretty() -> Command {
    let mut cmd = Command::cargo_bin("p8pretty").unwrap();
    cmd.env_remove("P8PRETTY_PNG_TO_P8");
    cmd
}

#[test]
fn cli_writes_lua_only_output_next_to_the_cart() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("game.p8");
    fs::write(&input, CART).unwrap();

    p8pretty()
        .arg("--lua-only")
        .arg(&input)
        .assert()
        .success()
        .stdout(contains("Pretty printed Lua code written to:"));

    assert_eq!(fs::read_to_string(dir.path().join("game.lua")).unwrap(), "x = 1\n");
}

#[test]
fn cli_writes_full_cart_to_explicit_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("game.p8");
    let output = dir.path().join("pretty.p8");
    fs::write(&input, CART).unwrap();

    p8pretty()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(contains("Pretty printed .p8 cart written to:"));

    let written = fs::read_to_string(output).unwrap();
    assert!(written.contains("__lua__\nx = 1\n__gfx__\n"));
}

#[test]
fn cli_prints_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("main.lua");
    fs::write(&input, "for i=1,3 do ?i end").unwrap();

    p8pretty()
        .arg("--stdout")
        .arg(&input)
        .assert()
        .success()
        .stdout("for i = 1, 3 do\n  print(i)\nend\n");
}

#[test]
fn cli_refuses_to_overwrite_the_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("game.p8");
    fs::write(&input, CART).unwrap();

    p8pretty()
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("p8pretty::output").and(contains("overwrite")));

    assert_eq!(fs::read_to_string(&input).unwrap(), CART);
}

#[test]
fn cli_reports_miette_diagnostics_on_parse_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.lua");
    fs::write(&input, "if x then\n  y = 1\n").unwrap();

    p8pretty()
        .arg("--stdout")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("p8pretty::parse").and(contains("parse error at line")));
}

#[test]
fn cli_reports_missing_code_section() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("game.p8");
    fs::write(&input, "version 41\n__gfx__\n").unwrap();

    p8pretty()
        .arg("--lua-only")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("p8pretty::section"));

    assert!(!dir.path().join("game.lua").exists());
}

#[test]
fn cli_reports_missing_input() {
    let dir = TempDir::new().unwrap();

    p8pretty()
        .arg(dir.path().join("absent.p8"))
        .assert()
        .failure()
        .stderr(contains("p8pretty::input"));
}

#[test]
fn cli_reports_unavailable_converter() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("game.p8.png");
    fs::write(&input, b"\x89PNG").unwrap();

    p8pretty()
        .arg("--png-to-p8")
        .arg(dir.path().join("no-such-tool"))
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("p8pretty::bridge"));
}

#[test]
fn cli_check_exits_nonzero_with_a_diff() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("main.lua");
    fs::write(&input, "x=1\n").unwrap();

    p8pretty()
        .arg("--check")
        .arg(&input)
        .assert()
        .code(1)
        .stdout(contains("-x=1").and(contains("+x = 1")));

    fs::write(&input, "x = 1\n").unwrap();
    p8pretty()
        .arg("--check")
        .arg(&input)
        .assert()
        .success()
        .stdout(contains("already formatted"));
}

#[test]
fn cli_dumps_ast_as_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("main.lua");
    fs::write(&input, "x+=1").unwrap();

    p8pretty()
        .arg("--ast")
        .arg(&input)
        .assert()
        .success()
        .stdout(contains("\"CompoundAssign\"").and(contains("\"Add\"")));
}

#[test]
fn cli_verbose_logs_to_stderr() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("main.lua");
    fs::write(&input, "x=1").unwrap();

    p8pretty()
        .arg("-v")
        .arg("--lua-only")
        .arg(&input)
        .arg(dir.path().join("out.lua"))
        .assert()
        .success()
        .stderr(contains("INFO").and(contains("wrote")));
}

#[cfg(target_os = "linux")]
#[test]
fn cli_fails_when_stdout_cannot_be_written() {
    use std::{fs::OpenOptions, process::Stdio};

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("main.lua");
    fs::write(&input, "x=1").unwrap();
    let full = OpenOptions::new().write(true).open("/dev/full").unwrap();

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_p8pretty"))
        .arg("--stdout")
        .arg(&input)
        .stdout(Stdio::from(full))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("p8pretty::output"), "{stderr}");
}
