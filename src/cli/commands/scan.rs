use std::path::PathBuf;

use anyhow::Result;

use super::super::args::ScanCommand;
use super::{CommandResult, CommandSummary, ScanSummary, SeekOutcome};
use crate::collect::session::session_from_fixture;
use crate::config::load_config;
use crate::dom::fixture::Fixture;
use crate::playback;

pub fn scan(cmd: ScanCommand) -> Result<CommandResult> {
    let config = load_config(&config_start_dir(&cmd.common.config_dir)?)?.config;
    let fixture = Fixture::load(&cmd.fixture)?;

    let (session, _dom) = session_from_fixture(&config, &fixture)?;
    session.run_pass();
    let comments = session.snapshot();

    let position = cmd
        .at
        .or_else(|| fixture.media.present.then_some(fixture.media.position_secs));
    let highlighted = position
        .map(|position| playback::highlighted_indices(&comments, position))
        .unwrap_or_default();

    let seek = cmd.seek.map(|index| match session.jump_to_entry(index) {
        Ok(seconds) => SeekOutcome::Sought { index, seconds },
        Err(err) => SeekOutcome::Failed {
            notice: format!("{err:#}"),
        },
    });
    let error_count = usize::from(matches!(seek, Some(SeekOutcome::Failed { .. })));

    Ok(CommandResult {
        summary: CommandSummary::Scan(ScanSummary {
            sample: session.is_sample(),
            stats: session.stats().last_pass,
            comments,
            position,
            highlighted,
            seek,
        }),
        error_count,
        exit_on_errors: true,
    })
}

pub(crate) fn config_start_dir(config_dir: &Option<PathBuf>) -> Result<PathBuf> {
    match config_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(std::env::current_dir()?),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::cli::args::CommonArgs;

    const FIXTURE: &str = r#"{
        "page": {
            "tag": "body",
            "children": [{
                "tag": "ytd-comments", "id": "comments",
                "children": [{
                    "tag": "ytd-comment-thread-renderer",
                    "children": [
                        { "tag": "yt-formatted-string", "id": "content-text", "text": "1:23 최고" },
                        { "tag": "a", "id": "author-text", "text": "@user" }
                    ]
                }]
            }]
        },
        "media": { "present": true, "positionSecs": 82.0 }
    }"#;

    fn write_fixture(dir: &TempDir, raw: &str) -> PathBuf {
        let path = dir.path().join("page.json");
        std::fs::write(&path, raw).unwrap();
        path
    }

    fn cmd(dir: &TempDir, at: Option<f64>, seek: Option<usize>) -> ScanCommand {
        ScanCommand {
            fixture: write_fixture(dir, FIXTURE),
            at,
            seek,
            common: CommonArgs {
                // Keep the scan off any real config on the machine.
                config_dir: Some(dir.path().to_path_buf()),
                verbose: false,
            },
        }
    }

    fn summary(result: CommandResult) -> ScanSummary {
        match result.summary {
            CommandSummary::Scan(summary) => summary,
            other => panic!("wrong summary variant: {other:?}"),
        }
    }

    #[test]
    fn test_scan_builds_timeline() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let result = scan(cmd(&dir, None, None)).unwrap();
        assert_eq!(result.error_count, 0);

        let summary = summary(result);
        assert_eq!(summary.comments.len(), 1);
        assert_eq!(summary.comments[0].seconds, 83);
        assert!(!summary.sample);
        // Fixture media position 82s is within the window of the 83s entry.
        assert_eq!(summary.highlighted, vec![0]);
    }

    #[test]
    fn test_scan_at_overrides_media_position() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let summary = summary(scan(cmd(&dir, Some(500.0), None)).unwrap());
        assert!(summary.highlighted.is_empty());
        assert_eq!(summary.position, Some(500.0));
    }

    #[test]
    fn test_scan_seek_success() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let result = scan(cmd(&dir, None, Some(0))).unwrap();
        assert_eq!(result.error_count, 0);
        match summary(result).seek {
            Some(SeekOutcome::Sought { index: 0, seconds }) => assert_eq!(seconds, 83.0),
            other => panic!("unexpected seek outcome: {other:?}"),
        }
    }

    #[test]
    fn test_scan_seek_out_of_range_counts_as_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let result = scan(cmd(&dir, None, Some(9))).unwrap();
        assert_eq!(result.error_count, 1);
        assert!(matches!(
            summary(result).seek,
            Some(SeekOutcome::Failed { .. })
        ));
    }

    #[test]
    fn test_scan_empty_page_reports_samples() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, r#"{ "page": { "tag": "body" } }"#).unwrap();
        let result = scan(ScanCommand {
            fixture: path,
            at: None,
            seek: None,
            common: CommonArgs {
                config_dir: Some(dir.path().to_path_buf()),
                verbose: false,
            },
        })
        .unwrap();
        let summary = summary(result);
        assert!(summary.sample);
        assert_eq!(summary.comments.len(), 3);
    }

    #[test]
    fn test_scan_missing_fixture_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let result = scan(ScanCommand {
            fixture: dir.path().join("nope.json"),
            at: None,
            seek: None,
            common: CommonArgs {
                config_dir: Some(dir.path().to_path_buf()),
                verbose: false,
            },
        });
        assert!(result.is_err());
    }
}
