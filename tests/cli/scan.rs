use anyhow::Result;
use predicates::prelude::*;

use crate::{CliTest, COMMENT_FIXTURE};

#[test]
fn test_scan_prints_timeline() -> Result<()> {
    let test = CliTest::with_file("page.json", COMMENT_FIXTURE)?;

    test.scan_command()
        .arg("page.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timeline (1 entry)"))
        .stdout(predicate::str::contains("1:23"))
        .stdout(predicate::str::contains("@user"))
        .stdout(predicate::str::contains("최고의 장면"));

    Ok(())
}

#[test]
fn test_scan_highlights_near_position() -> Result<()> {
    let test = CliTest::with_file("page.json", COMMENT_FIXTURE)?;

    test.scan_command()
        .args(["page.json", "--at", "82"])
        .assert()
        .success()
        .stdout(predicate::str::contains("position 82s, 1 highlighted"));

    test.scan_command()
        .args(["page.json", "--at", "500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("position 500s, 0 highlighted"));

    Ok(())
}

#[test]
fn test_scan_seek_jumps_to_entry() -> Result<()> {
    let test = CliTest::with_file("page.json", COMMENT_FIXTURE)?;

    test.scan_command()
        .args(["page.json", "--seek", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sought to 83s (entry 0)"));

    Ok(())
}

#[test]
fn test_scan_seek_without_media_fails_with_notice() -> Result<()> {
    let test = CliTest::with_file(
        "page.json",
        &COMMENT_FIXTURE.replace(r#""present": true"#, r#""present": false"#),
    )?;

    test.scan_command()
        .args(["page.json", "--seek", "0"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "seek unavailable: no media on this page",
        ));

    Ok(())
}

#[test]
fn test_scan_empty_page_shows_samples() -> Result<()> {
    let test = CliTest::with_file("empty.json", r#"{ "page": { "tag": "body" } }"#)?;

    test.scan_command()
        .arg("empty.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("no comments found, showing samples"))
        .stdout(predicate::str::contains("Timeline (3 entries)"))
        .stdout(predicate::str::contains("샘플유저1"));

    Ok(())
}

#[test]
fn test_scan_respects_config_selectors() -> Result<()> {
    // A config narrowed to a custom comment shape.
    let test = CliTest::with_file(
        "page.json",
        r#"{
            "page": {
                "tag": "body",
                "children": [{
                    "tag": "section", "id": "comments",
                    "children": [{
                        "tag": "my-comment",
                        "children": [
                            { "tag": "p", "id": "content-text", "text": "0:59 custom" },
                            { "tag": "span", "id": "author-text", "text": "@custom" }
                        ]
                    }]
                }]
            }
        }"#,
    )?;
    test.write_file(
        ".timelensrc.json",
        r##"{
            "containerSelectors": ["#comments"],
            "commentSelectors": ["my-comment"],
            "threadTags": ["my-comment"],
            "leafTags": []
        }"##,
    )?;

    test.scan_command()
        .arg("page.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("0:59"))
        .stdout(predicate::str::contains("@custom"));

    Ok(())
}

#[test]
fn test_scan_missing_fixture_fails() -> Result<()> {
    let test = CliTest::new()?;

    test.scan_command()
        .arg("nope.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read fixture file"));

    Ok(())
}

#[test]
fn test_scan_verbose_prints_stats() -> Result<()> {
    let test = CliTest::with_file("page.json", COMMENT_FIXTURE)?;

    test.scan_command()
        .args(["page.json", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("node(s)"));

    Ok(())
}
