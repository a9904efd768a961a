use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use assert_cmd::Command;
use tempfile::TempDir;

mod extract;
mod init;
mod scan;
mod watch;

const BIN_NAME: &str = "timelens";

/// A page fixture with one timestamped comment thread and a media surface.
pub const COMMENT_FIXTURE: &str = r#"{
    "page": {
        "tag": "body",
        "children": [{
            "tag": "ytd-comments", "id": "comments",
            "children": [{
                "tag": "ytd-comment-thread-renderer",
                "children": [
                    { "tag": "yt-formatted-string", "id": "content-text", "text": "1:23 최고의 장면" },
                    { "tag": "a", "id": "author-text", "text": "@user" }
                ]
            }]
        }]
    },
    "media": { "present": true, "positionSecs": 82.0 }
}"#;

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stop the upward config search at the project root.
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary should be built");
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn scan_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("scan");
        cmd
    }

    pub fn watch_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("watch");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}
