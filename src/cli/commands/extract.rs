use std::io::Read;

use anyhow::{Context, Result};

use super::super::args::ExtractCommand;
use super::{CommandResult, CommandSummary, ExtractSummary, ExtractedLine};
use crate::extract::extract_all;

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let texts = if cmd.text.is_empty() {
        read_stdin_lines()?
    } else {
        cmd.text
    };

    let lines = texts
        .into_iter()
        .map(|text| {
            let offsets = extract_all(&text);
            ExtractedLine { text, offsets }
        })
        .collect();

    Ok(CommandResult {
        summary: CommandSummary::Extract(ExtractSummary { lines }),
        error_count: 0,
        exit_on_errors: true,
    })
}

fn read_stdin_lines() -> Result<Vec<String>> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("Failed to read from stdin")?;
    Ok(raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}
