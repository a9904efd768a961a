//! Discovery state machine and re-parse scheduling.
//!
//! The page is probed until a comment section container appears, then every
//! matching container is put under mutation observation. All re-parse
//! producers (mutations, polling, the post-attach settle, scroll movement)
//! feed one channel; the consumer debounces with last-timer-wins semantics
//! and runs idempotent passes, so overlapping triggers self-correct.

use std::sync::Arc;

use tokio::select;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::collect::session::{CollectorSession, CollectorState};
use crate::diag::Failure;
use crate::dom::{MutationBatch, PageDom};

/// Container probe interval while searching.
pub const SEARCH_RETRY_SECS: u64 = 2;
/// Mutation bursts within this window collapse into one pass.
pub const MUTATION_DEBOUNCE_MS: u64 = 500;
/// Unconditional safety-net re-parse, catches mutations observers miss.
pub const POLL_INTERVAL_SECS: u64 = 3;
/// One-shot pass after observation starts, once lazy content settles.
pub const SETTLE_DELAY_SECS: u64 = 3;
pub const SCROLL_DEBOUNCE_SECS: u64 = 1;
/// A scroll only triggers a pass when a container is within this many
/// pixels below the fold.
pub const SCROLL_PROXIMITY_PX: f64 = 1000.0;

/// Why a re-parse was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTrigger {
    Mutation,
    Poll,
    InitialSettle,
    Scroll,
}

impl ParseTrigger {
    fn debounce(self) -> Duration {
        match self {
            ParseTrigger::Mutation => Duration::from_millis(MUTATION_DEBOUNCE_MS),
            ParseTrigger::Scroll => Duration::from_secs(SCROLL_DEBOUNCE_SECS),
            ParseTrigger::Poll | ParseTrigger::InitialSettle => Duration::ZERO,
        }
    }
}

/// Running collector task. Owns the spawned loop like a supervisor; `stop`
/// cancels it and waits for the task to wind down.
pub struct CollectorHandle {
    handle: Option<JoinHandle<()>>,
    cancel: CancellationToken,
}

impl CollectorHandle {
    pub fn start(session: Arc<CollectorSession>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(run(session, token));
        CollectorHandle {
            handle: Some(handle),
            cancel,
        }
    }

    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(err) = handle.await
        {
            log::warn!("collector task ended abnormally: {err}");
        }
    }
}

/// The collector loop. Runs until cancelled.
///
/// The poll interval, the initial settle and the scroll observer are
/// installed at start, not at container discovery: a pass over a page with
/// no comment section still lands the sample fallback. Container probing
/// runs alongside them until the first match, then stops for good.
pub async fn run(session: Arc<CollectorSession>, cancel: CancellationToken) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    {
        let tx = tx.clone();
        session.dom().observe_scroll(Box::new(move |_| {
            let _ = tx.send(ParseTrigger::Scroll);
        }));
    }

    let mut probe = time::interval(Duration::from_secs(SEARCH_RETRY_SECS));
    probe.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let poll_period = Duration::from_secs(POLL_INTERVAL_SECS);
    let mut poll = time::interval_at(Instant::now() + poll_period, poll_period);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let settle = time::sleep(Duration::from_secs(SETTLE_DELAY_SECS));
    tokio::pin!(settle);
    let mut settled = false;

    loop {
        select! {
            _ = cancel.cancelled() => return,
            // First probe fires immediately.
            _ = probe.tick(), if session.state() == CollectorState::Searching => {
                if session.find_containers().is_empty() {
                    log::debug!(
                        "{}",
                        Failure::TransientAbsence {
                            what: "comment section".to_string()
                        }
                    );
                } else {
                    session.set_state(CollectorState::Observing);
                    log::info!("comment section found, observing");
                    attach_observers(&session, &tx);
                    session.run_pass();
                }
            }
            _ = poll.tick() => {
                let _ = tx.send(ParseTrigger::Poll);
            }
            _ = &mut settle, if !settled => {
                settled = true;
                let _ = tx.send(ParseTrigger::InitialSettle);
            }
            trigger = rx.recv() => {
                let Some(trigger) = trigger else { return };
                let Some(trigger) = debounce(&mut rx, &cancel, trigger).await else { return };
                if trigger == ParseTrigger::Scroll && !container_near_viewport(&session) {
                    continue;
                }
                // Containers can appear after the initial attach.
                attach_observers(&session, &tx);
                session.run_pass();
            }
        }
    }
}

/// Trailing debounce: each newer trigger replaces the pending one and
/// restarts the wait with its own window. Returns `None` on cancellation.
async fn debounce(
    rx: &mut UnboundedReceiver<ParseTrigger>,
    cancel: &CancellationToken,
    first: ParseTrigger,
) -> Option<ParseTrigger> {
    let mut trigger = first;
    loop {
        let wait = trigger.debounce();
        if wait.is_zero() {
            return Some(trigger);
        }
        select! {
            _ = cancel.cancelled() => return None,
            _ = time::sleep(wait) => return Some(trigger),
            next = rx.recv() => match next {
                Some(next) => trigger = next,
                None => return Some(trigger),
            }
        }
    }
}

/// Put every matching container under mutation observation, once. Already
/// marked containers are left alone, so repeated calls are safe.
pub fn attach_observers(
    session: &Arc<CollectorSession>,
    tx: &UnboundedSender<ParseTrigger>,
) -> usize {
    let dom = session.dom();
    let marker = &session.selectors().observer_marker;
    let mut attached = 0;

    for container in session.find_containers() {
        if dom.attr(container, marker).is_some() {
            continue;
        }
        dom.set_attr(container, marker, "true");

        let dom = Arc::clone(dom);
        let mut shapes = session.selectors().threads.clone();
        shapes.extend(session.selectors().leaves.iter().cloned());
        let tx = tx.clone();
        session.dom().observe_mutations(
            container,
            Box::new(move |batch: &MutationBatch| {
                // Only batches that bring in comment-shaped nodes matter.
                let relevant = batch
                    .added
                    .iter()
                    .any(|&node| shapes.iter().any(|shape| dom.contains_match(node, shape)));
                if relevant {
                    let _ = tx.send(ParseTrigger::Mutation);
                }
            }),
        );
        attached += 1;
    }
    if attached > 0 {
        log::debug!("attached observers to {attached} container(s)");
    }
    attached
}

fn container_near_viewport(session: &CollectorSession) -> bool {
    let scroll = session.dom().scroll_state();
    let limit = scroll.offset + scroll.viewport_height + SCROLL_PROXIMITY_PX;
    session
        .find_containers()
        .into_iter()
        .any(|container| {
            session
                .dom()
                .node_top(container)
                .is_none_or(|top| top < limit)
        })
}
