//! Background search worker.
//!
//! A search can run for a long time, so `spawn_search` moves it onto its own
//! thread. Nothing is called back on that thread: every report becomes a
//! `SearchEvent` on a channel, and the thread that owns the `SearchHandle`
//! decides when and where to handle it. The only state shared with the
//! worker is its `CancellationToken`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use tracing::{debug, error};

use crate::error::SearchError;
use crate::solver::{
    CancellationToken, HanoiSearch, Phase, SearchObserver, SearchOutcome, SearchStatistics,
    Strategy,
};
use crate::tower::{Move, TowerState};

/// Message sent from the search worker to its owner.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// A frontier entry was popped.
    Progress {
        state: TowerState,
        phase: Phase,
        path: Vec<Move>,
    },
    /// The search reached a definitive outcome (success or exhaustion).
    Completed {
        success: bool,
        path: Vec<Move>,
        stats: SearchStatistics,
    },
    /// The run is over, whatever its outcome. Always the last event of a
    /// run that did not fail.
    Finished {
        outcome: SearchOutcome,
        stats: SearchStatistics,
    },
    /// The worker panicked; no `Finished` event follows.
    Failed(String),
}

/// Final result of a background search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStatistics,
}

/// Worker settings.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    /// Strategy to run.
    pub strategy: Strategy,
    /// Send a `Progress` event for every popped node. Turning this off keeps
    /// large searches from filling the channel with states nobody reads.
    pub report_progress: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::BreadthFirst,
            report_progress: true,
        }
    }
}

/// Observer that forwards reports as `SearchEvent`s.
pub struct ChannelObserver {
    tx: Sender<SearchEvent>,
    report_progress: bool,
}

impl ChannelObserver {
    pub fn new(tx: Sender<SearchEvent>, report_progress: bool) -> Self {
        Self { tx, report_progress }
    }
}

impl SearchObserver for ChannelObserver {
    fn on_progress(&mut self, state: &TowerState, phase: Phase, path: &[Move]) {
        if self.report_progress {
            // The owner may have stopped listening; the search carries on regardless.
            let _ = self.tx.send(SearchEvent::Progress {
                state: state.clone(),
                phase,
                path: path.to_vec(),
            });
        }
    }

    fn on_complete(&mut self, success: bool, path: &[Move], stats: &SearchStatistics) {
        let _ = self.tx.send(SearchEvent::Completed {
            success,
            path: path.to_vec(),
            stats: stats.clone(),
        });
    }
}

/// Owner's side of a running search.
pub struct SearchHandle {
    events: Receiver<SearchEvent>,
    cancel: CancellationToken,
    thread: JoinHandle<Result<SearchReport, SearchError>>,
}

impl SearchHandle {
    /// Events from the worker, in the order they were produced.
    pub fn events(&self) -> &Receiver<SearchEvent> {
        &self.events
    }

    /// Asks the worker to stop at its next poll point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the worker to end and returns its final report.
    ///
    /// Events not yet received stay in the channel and are dropped with the handle.
    pub fn join(self) -> Result<SearchReport, SearchError> {
        match self.thread.join() {
            Ok(result) => result,
            Err(payload) => Err(SearchError::WorkerPanicked(panic_message(payload.as_ref()))),
        }
    }
}

/// Starts a search of `start` on a new thread.
///
/// # Returns
/// * `Ok(SearchHandle)` once the thread is running.
/// * `Err(SearchError::Spawn)` if the OS refused to create the thread.
pub fn spawn_search(
    start: &TowerState,
    config: WorkerConfig,
    cancel: CancellationToken,
) -> Result<SearchHandle, SearchError> {
    let (tx, rx) = unbounded();
    let start = start.clone();
    let token = cancel.clone();

    let thread = thread::Builder::new()
        .name(format!("hanoi-{}", config.strategy))
        .spawn(move || {
            let observer = ChannelObserver::new(tx.clone(), config.report_progress);
            run_guarded(&tx, move || {
                let mut search = HanoiSearch::with_cancellation(&start, observer, token);
                let outcome = search.run(config.strategy);
                (outcome, search.statistics().clone())
            })
        })
        .map_err(|e| SearchError::Spawn(e.to_string()))?;

    debug!(strategy = %config.strategy, "search worker spawned");
    Ok(SearchHandle {
        events: rx,
        cancel,
        thread,
    })
}

/// Runs `search` and turns its result, or its panic, into the final event.
fn run_guarded<F>(tx: &Sender<SearchEvent>, search: F) -> Result<SearchReport, SearchError>
where
    F: FnOnce() -> (SearchOutcome, SearchStatistics),
{
    match panic::catch_unwind(AssertUnwindSafe(search)) {
        Ok((outcome, stats)) => {
            let _ = tx.send(SearchEvent::Finished {
                outcome: outcome.clone(),
                stats: stats.clone(),
            });
            Ok(SearchReport { outcome, stats })
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(%message, "search worker panicked");
            let _ = tx.send(SearchEvent::Failed(message.clone()));
            Err(SearchError::WorkerPanicked(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Cancels a token after a delay unless dropped first.
///
/// Dropping the guard stops the timer without touching the token.
pub struct TimeoutGuard {
    done: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Drop for TimeoutGuard {
    fn drop(&mut self) {
        // Disconnecting the channel wakes the timer thread.
        self.done.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Imposes a time limit on a search by cancelling `token` after `timeout`.
pub fn cancel_after(token: CancellationToken, timeout: Duration) -> TimeoutGuard {
    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);
    let thread = thread::spawn(move || {
        select! {
            recv(done_rx) -> _ => {}
            recv(crossbeam_channel::after(timeout)) -> _ => {
                debug!(timeout_ms = timeout.as_millis() as u64, "search timed out");
                token.cancel();
            }
        }
    });
    TimeoutGuard {
        done: Some(done_tx),
        thread: Some(thread),
    }
}
