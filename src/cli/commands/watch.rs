use std::sync::Arc;

use anyhow::Result;
use tokio::time::{self, Duration};

use super::super::args::WatchCommand;
use super::super::report;
use super::scan::config_start_dir;
use super::{CommandResult, CommandSummary, WatchSummary};
use crate::collect::scheduler::CollectorHandle;
use crate::collect::session::session_from_fixture;
use crate::config::load_config;
use crate::dom::fixture::Fixture;

/// Run the collector against the fixture's event script for a bounded time,
/// printing every pass as it lands.
pub async fn watch(cmd: WatchCommand) -> Result<CommandResult> {
    let config = load_config(&config_start_dir(&cmd.common.config_dir)?)?.config;
    let fixture = Fixture::load(&cmd.fixture)?;

    let (session, dom) = session_from_fixture(&config, &fixture)?;
    let session = Arc::new(session.with_pass_listener(Box::new(report::print_pass)));

    let handle = CollectorHandle::start(Arc::clone(&session));
    let events = fixture.events.clone();
    let driver = tokio::spawn(async move { dom.run_script(&events).await });

    time::sleep(Duration::from_millis(cmd.duration_ms)).await;
    handle.stop().await;
    driver.abort();

    Ok(CommandResult {
        summary: CommandSummary::Watch(WatchSummary {
            duration_ms: cmd.duration_ms,
            stats: session.stats(),
            comments: session.snapshot(),
            sample: session.is_sample(),
        }),
        error_count: 0,
        exit_on_errors: true,
    })
}
