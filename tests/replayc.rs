//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of replayc.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::{fs, process::Command};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn compile_invalid_argument() -> TestResult {
    let mut cmd = Command::cargo_bin("replayc")?;
    cmd.arg("-q");
    cmd.assert()
        .failure()
        .code(exitcode::USAGE)
        .stderr(predicate::str::contains("Unrecognized option:"));

    Ok(())
}

#[test]
fn compile_missing_input_file() -> TestResult {
    let mut cmd = Command::cargo_bin("replayc")?;
    cmd.assert()
        .failure()
        .code(exitcode::USAGE)
        .stderr(predicate::str::contains("INPUT"));

    Ok(())
}

#[test]
fn compile_help() -> TestResult {
    let mut cmd = Command::cargo_bin("replayc")?;
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--runtime"));

    Ok(())
}

#[test]
fn compile_input_file_does_not_exist() -> TestResult {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("out.rs");

    let mut cmd = Command::cargo_bin("replayc")?;
    cmd.arg(dir.path().join("missing.xml"));
    cmd.arg("-o").arg(&output);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No such file or directory"));

    assert!(!output.exists());

    Ok(())
}

#[test]
fn compile_writes_default_output_path() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("doc.xml");
    fs::write(&input, r#"<root id="7">hi</root>"#)?;

    let mut cmd = Command::cargo_bin("replayc")?;
    cmd.arg(&input);
    cmd.assert().success();

    let out = fs::read_to_string(dir.path().join("doc.rs"))?;

    assert!(out.starts_with("// This code was generated by replayc."));
    assert!(out.contains("pub enum Replay {}"));
    assert!(out.contains(r#"attrs.add("", "id", "id", "CDATA", "7");"#));
    assert!(out.contains(r#"const CHARS: &'static str = "hi";"#));

    Ok(())
}

#[test]
fn compile_with_custom_output_runtime_and_type() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("doc.xml");
    let output = dir.path().join("generated.rs");
    fs::write(&input, "<root />")?;

    let mut cmd = Command::cargo_bin("replayc")?;
    cmd.arg(&input);
    cmd.arg("--output").arg(&output);
    cmd.arg("--runtime").arg("crate::replay");
    cmd.arg("--type").arg("Fixture");
    cmd.assert().success();

    let out = fs::read_to_string(&output)?;

    assert!(out.contains("pub enum Fixture {}"));
    assert!(out.contains("S: crate::replay::ContentHandler + ?Sized"));
    assert!(out.contains("crate::replay::Attributes::new()"));

    Ok(())
}

#[test]
fn compile_matches_fixture() -> TestResult {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("sample.rs");

    let mut cmd = Command::cargo_bin("replayc")?;
    cmd.arg("tests/fixtures/sample.xml");
    cmd.arg("-o").arg(&output);
    cmd.assert().success();

    assert_eq!(
        fs::read_to_string(&output)?,
        fs::read_to_string("tests/fixtures/sample.rs")?,
    );

    Ok(())
}

#[test]
fn compile_failure_leaves_no_output() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("doc.xml");
    let output = dir.path().join("doc.rs");
    fs::write(
        &input,
        "<?directive:package a?><?directive:package b?><root />",
    )?;

    let mut cmd = Command::cargo_bin("replayc")?;
    cmd.arg(&input);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("directive:package"))
        .stderr(predicate::str::contains("fatal: failed to compile"));

    assert!(!output.exists());

    Ok(())
}

#[test]
fn compile_malformed_xml() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("doc.xml");
    fs::write(&input, "<root>")?;

    let mut cmd = Command::cargo_bin("replayc")?;
    cmd.arg(&input);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading XML"));

    assert!(!dir.path().join("doc.rs").exists());

    Ok(())
}
