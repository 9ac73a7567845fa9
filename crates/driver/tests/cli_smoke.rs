use predicates::prelude::*;
use std::fs::File;
use std::io::Write;
use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn help_shows_usage() {
    let mut cmd = Command::cargo_bin("c2dot").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Graphviz"))
        .stdout(predicate::str::contains("dot"));
}

#[test]
fn tokens_prints_kind_lexeme_and_location() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("t.c");
    let mut f = File::create(&file_path).unwrap();
    writeln!(f, "int x;").unwrap();
    writeln!(f, "size_t n;").unwrap();

    let mut cmd = Command::cargo_bin("c2dot").unwrap();
    cmd.args(["tokens", file_path.to_string_lossy().as_ref(), "-T", "size_t"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("keyword int @1:1"))
        .stdout(predicate::str::contains("identifier x @1:5"))
        .stdout(predicate::str::contains("punct ; @1:6"))
        .stdout(predicate::str::contains("type-name size_t @2:1"));
}

#[test]
fn ast_prints_debug_tree() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("a.c");
    let mut f = File::create(&file_path).unwrap();
    writeln!(f, "int main(void) {{ return 0; }}").unwrap();

    let mut cmd = Command::cargo_bin("c2dot").unwrap();
    cmd.args(["ast", file_path.to_string_lossy().as_ref()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("TranslationUnit"))
        .stdout(predicate::str::contains("FuncDef"))
        .stdout(predicate::str::contains("\"main\""));
}

#[test]
fn stdin_input() {
    let mut cmd = Command::cargo_bin("c2dot").unwrap();
    cmd.args(["dot", "-"]).write_stdin("int x;\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("digraph AST {"))
        .stdout(predicate::str::contains("n1 [label=\"Decl: x\"];"));
}

#[test]
fn verbose_logging_goes_to_stderr() {
    let mut cmd = Command::cargo_bin("c2dot").unwrap();
    cmd.env_remove("RUST_LOG").args(["-vv", "dot", "-"]).write_stdin("int x;\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("digraph AST {"))
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn tokens_and_dot_keep_pragmas() {
    let src = "#pragma once\nint x;\n";
    let mut cmd = Command::cargo_bin("c2dot").unwrap();
    cmd.args(["tokens", "-"]).write_stdin(src);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pragma #pragma once @1:1"));

    let mut cmd = Command::cargo_bin("c2dot").unwrap();
    cmd.args(["dot", "-"]).write_stdin(src);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("n1 [label=\"Pragma: once\"];"));
}
