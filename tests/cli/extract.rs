use anyhow::Result;
use predicates::prelude::*;

use crate::CliTest;

#[test]
fn test_extract_from_args() -> Result<()> {
    let test = CliTest::new()?;

    test.command()
        .args(["extract", "the good part is at 1:23"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1:23  83s"))
        .stdout(predicate::str::contains("1 offset in 1 text"));

    Ok(())
}

#[test]
fn test_extract_multiple_texts_and_families() -> Result<()> {
    let test = CliTest::new()?;

    test.command()
        .args(["extract", "1h 2m 3s", "2분 30초"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1:02:03  3723s"))
        .stdout(predicate::str::contains("2:30  150s"))
        .stdout(predicate::str::contains("0:30  30s"));

    Ok(())
}

#[test]
fn test_extract_from_stdin() -> Result<()> {
    let test = CliTest::new()?;

    test.command()
        .arg("extract")
        .write_stdin("125초\n\nno times here\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2:05  125s"))
        .stdout(predicate::str::contains("(no timestamps)"))
        .stdout(predicate::str::contains("1 offset in 2 texts"));

    Ok(())
}

#[test]
fn test_extract_boundary_rejects_glued_digits() -> Result<()> {
    let test = CliTest::new()?;

    test.command()
        .args(["extract", "20251:23"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no timestamps)"));

    Ok(())
}
