use anyhow::Result;
use predicates::prelude::*;

use crate::CliTest;

const SCRIPTED_FIXTURE: &str = r##"{
    "page": {
        "tag": "body",
        "children": [{ "tag": "ytd-comments", "id": "comments" }]
    },
    "events": [{
        "atMs": 100,
        "appendTo": "#comments",
        "node": {
            "tag": "ytd-comment-thread-renderer",
            "children": [
                { "tag": "yt-formatted-string", "id": "content-text", "text": "0:45 드디어 시작" },
                { "tag": "a", "id": "author-text", "text": "@late" }
            ]
        }
    }]
}"##;

#[test]
fn test_watch_collects_scripted_comments() -> Result<()> {
    let test = CliTest::with_file("page.json", SCRIPTED_FIXTURE)?;

    // The appended comment lands after the 500ms mutation debounce.
    test.watch_command()
        .args(["page.json", "--duration-ms", "1500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pass 1"))
        .stdout(predicate::str::contains("pass 2"))
        .stdout(predicate::str::contains("Final timeline (1 entry)"))
        .stdout(predicate::str::contains("0:45"))
        .stdout(predicate::str::contains("@late"))
        .stdout(predicate::str::contains("ran 1500ms"));

    Ok(())
}

#[test]
fn test_watch_without_comments_ends_on_samples() -> Result<()> {
    let test = CliTest::with_file("empty.json", r#"{ "page": { "tag": "body" } }"#)?;

    // The container never appears, but the 3s poll still runs a pass and
    // the empty result falls back to the fixed sample set.
    test.watch_command()
        .args(["empty.json", "--duration-ms", "3500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no comments found, showing samples"))
        .stdout(predicate::str::contains("Final timeline (3 entries)"))
        .stdout(predicate::str::contains("샘플유저1"))
        .stdout(predicate::str::contains("ran 3500ms"));

    Ok(())
}
