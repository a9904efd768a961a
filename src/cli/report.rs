//! Report formatting and printing utilities.
//!
//! This module renders timelines and command summaries for the terminal.
//! Separate from core logic to allow timelens to be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, ExtractSummary, InitSummary, ScanSummary, SeekOutcome,
    WatchSummary,
};
use crate::collect::session::PassReport;
use crate::config::CONFIG_FILE_NAME;
use crate::timeline::TimedComment;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Marker for timeline entries near the playback position.
pub const HIGHLIGHT_MARK: &str = "\u{25b6}"; // ▶

pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

/// Print a command result to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    match &result.summary {
        CommandSummary::Init(summary) => print_init(summary, writer),
        CommandSummary::Extract(summary) => print_extract(summary, writer),
        CommandSummary::Scan(summary) => print_scan(summary, verbose, writer),
        CommandSummary::Watch(summary) => print_watch(summary, verbose, writer),
    }
}

/// Streaming output for the watch command, one line per completed pass.
pub fn print_pass(report: &PassReport) {
    println!(
        "{} {} {} ({} scanned, {} skipped)",
        format!("pass {}", report.number).bold(),
        report.comments.len(),
        if report.comments.len() == 1 {
            "entry"
        } else {
            "entries"
        },
        report.stats.scanned,
        report.stats.skipped
    );
}

/// Render the timeline as an aligned table. Highlighted rows carry the
/// playback marker.
pub fn print_timeline_to<W: Write>(
    comments: &[TimedComment],
    highlighted: &[usize],
    writer: &mut W,
) {
    let timestamp_width = comments
        .iter()
        .map(|c| c.timestamp.len())
        .max()
        .unwrap_or(0);
    let author_width = comments
        .iter()
        .map(|c| UnicodeWidthStr::width(c.author.as_str()))
        .max()
        .unwrap_or(0);

    for (index, comment) in comments.iter().enumerate() {
        let marker = if highlighted.contains(&index) {
            HIGHLIGHT_MARK.yellow().to_string()
        } else {
            " ".to_string()
        };
        // Pad before coloring so escape codes don't skew the columns.
        let timestamp = format!("{:>timestamp_width$}", comment.timestamp);
        let author_padding =
            " ".repeat(author_width - UnicodeWidthStr::width(comment.author.as_str()));
        let _ = writeln!(
            writer,
            "{} {:>3}  {}  {}{}  {}",
            marker,
            index,
            timestamp.cyan(),
            comment.author.bold(),
            author_padding,
            comment.content
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

fn print_extract<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let mut total = 0;
    for line in &summary.lines {
        let _ = writeln!(writer, "{}", line.text.dimmed());
        if line.offsets.is_empty() {
            let _ = writeln!(writer, "  (no timestamps)");
            continue;
        }
        for offset in &line.offsets {
            total += 1;
            let _ = writeln!(writer, "  {}  {}s", offset.display.cyan(), offset.seconds);
        }
    }
    let _ = writeln!(
        writer,
        "\n{} {} {} in {} {}",
        SUCCESS_MARK.green(),
        total,
        if total == 1 { "offset" } else { "offsets" },
        summary.lines.len(),
        if summary.lines.len() == 1 {
            "text"
        } else {
            "texts"
        }
    );
}

fn print_scan<W: Write>(summary: &ScanSummary, verbose: bool, writer: &mut W) {
    if summary.sample {
        let _ = writeln!(
            writer,
            "{}",
            "no comments found, showing samples".yellow()
        );
    }
    let _ = writeln!(
        writer,
        "{}",
        format!(
            "Timeline ({} {})",
            summary.comments.len(),
            if summary.comments.len() == 1 {
                "entry"
            } else {
                "entries"
            }
        )
        .bold()
    );
    print_timeline_to(&summary.comments, &summary.highlighted, writer);

    if let Some(position) = summary.position {
        let _ = writeln!(
            writer,
            "position {position}s, {} highlighted",
            summary.highlighted.len()
        );
    }
    if verbose {
        let _ = writeln!(
            writer,
            "scanned {} node(s), {} skipped, {} without timestamps",
            summary.stats.scanned, summary.stats.skipped, summary.stats.without_timestamps
        );
    }
    match &summary.seek {
        Some(SeekOutcome::Sought { index, seconds }) => {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!("sought to {seconds}s (entry {index})").green()
            );
        }
        Some(SeekOutcome::Failed { notice }) => {
            let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), notice.red());
        }
        None => {}
    }
}

fn print_watch<W: Write>(summary: &WatchSummary, verbose: bool, writer: &mut W) {
    if summary.sample {
        let _ = writeln!(
            writer,
            "{}",
            "no comments found, showing samples".yellow()
        );
    }
    let _ = writeln!(
        writer,
        "{}",
        format!(
            "Final timeline ({} {})",
            summary.comments.len(),
            if summary.comments.len() == 1 {
                "entry"
            } else {
                "entries"
            }
        )
        .bold()
    );
    print_timeline_to(&summary.comments, &[], writer);
    let _ = writeln!(
        writer,
        "ran {}ms, {} {}",
        summary.duration_ms,
        summary.stats.passes,
        if summary.stats.passes == 1 {
            "pass"
        } else {
            "passes"
        }
    );
    if verbose {
        let _ = writeln!(
            writer,
            "last pass scanned {} node(s), {} skipped in total",
            summary.stats.last_pass.scanned, summary.stats.total_skipped
        );
    }
    for notice in &summary.stats.notices {
        let _ = writeln!(writer, "{} {}", FAILURE_MARK.yellow(), notice.yellow());
    }
}

// ============================================================
// Tests
// ============================================================
