use anyhow::Result;

use crate::cli::args::Arguments;
use crate::cli::commands::CommandResult;

pub mod args;
pub mod commands;
mod report;
mod run;

pub async fn run_cli(args: Arguments) -> Result<i32> {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return Ok(0);
    };

    let result = run::run(args).await?;
    report::print(&result, verbose);

    Ok(exit_code(&result))
}

/// Commands that opt into error-sensitive exits fail the process when any
/// error was counted.
fn exit_code(result: &CommandResult) -> i32 {
    match result.error_count {
        0 => 0,
        _ if result.exit_on_errors => 1,
        _ => 0,
    }
}
