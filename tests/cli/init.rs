use anyhow::{Context, Result};
use predicates::prelude::*;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert!(
        parsed.get("containerSelectors").is_some(),
        "Config should have 'containerSelectors' field"
    );
    assert!(
        parsed.get("commentSelectors").is_some(),
        "Config should have 'commentSelectors' field"
    );
    assert_eq!(
        parsed.get("contentSelector").and_then(Value::as_str),
        Some("#content-text")
    );
    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    test.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created .timelensrc.json"));

    assert!(test.root().join(".timelensrc.json").exists());

    let content = test.read_file(".timelensrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".timelensrc.json", "{}")?;

    test.command()
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    Ok(())
}
