//! Paced replay of a solution on a separate thread.
//!
//! `Playback` applies one move per interval to its own copy of the start
//! state and reports each step as a `PlaybackEvent`. It can be paused,
//! resumed and stopped from any thread; both flags are polled, pauses every
//! `PAUSE_POLL`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

use crate::error::{SearchError, TowerError};
use crate::tower::{Move, TowerState};

/// How often a paused or sleeping playback checks its flags.
pub const PAUSE_POLL: Duration = Duration::from_millis(50);

/// Message sent from the playback thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Move `index` of the path was applied, giving `state`.
    Step {
        index: usize,
        mv: Move,
        state: TowerState,
    },
    /// Every move was applied.
    Finished(TowerState),
    /// `stop()` was observed before move `index`.
    Stopped { index: usize },
    /// The path contained an illegal move; playback ended there.
    Failed(TowerError),
}

/// Handle to a running playback.
pub struct Playback {
    paused: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    events: Receiver<PlaybackEvent>,
    thread: JoinHandle<TowerState>,
}

impl Playback {
    /// Starts replaying `path` from `start`, one move every `interval`.
    pub fn start(start: &TowerState, path: Vec<Move>, interval: Duration) -> Self {
        Self::spawn(start, path, interval, false)
    }

    /// Like `start`, but no move is applied until `resume()` is called.
    pub fn start_paused(start: &TowerState, path: Vec<Move>, interval: Duration) -> Self {
        Self::spawn(start, path, interval, true)
    }

    fn spawn(start: &TowerState, path: Vec<Move>, interval: Duration, paused: bool) -> Self {
        let paused = Arc::new(AtomicBool::new(paused));
        let stopped = Arc::new(AtomicBool::new(false));
        let (tx, rx) = unbounded();

        let flags = Flags {
            paused: Arc::clone(&paused),
            stopped: Arc::clone(&stopped),
        };
        let tower = start.clone();
        let thread = thread::spawn(move || play(tower, path, interval, &flags, &tx));

        Playback {
            paused,
            stopped,
            events: rx,
            thread,
        }
    }

    pub fn events(&self) -> &Receiver<PlaybackEvent> {
        &self.events
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Ends playback before the next move, even while paused.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Waits for the playback thread and returns the state it ended in.
    pub fn join(self) -> Result<TowerState, SearchError> {
        self.thread
            .join()
            .map_err(|_| SearchError::WorkerPanicked("playback thread panicked".to_string()))
    }
}

struct Flags {
    paused: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl Flags {
    fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Blocks while paused. Returns false if stopped.
    fn wait_while_paused(&self) -> bool {
        while self.paused.load(Ordering::SeqCst) {
            if self.stopped() {
                return false;
            }
            thread::sleep(PAUSE_POLL);
        }
        !self.stopped()
    }

    /// Sleeps for `duration` in slices, waking early if stopped.
    fn sleep(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline || self.stopped() {
                return;
            }
            thread::sleep((deadline - now).min(PAUSE_POLL));
        }
    }
}

fn play(
    mut tower: TowerState,
    path: Vec<Move>,
    interval: Duration,
    flags: &Flags,
    tx: &Sender<PlaybackEvent>,
) -> TowerState {
    debug!(moves = path.len(), interval_ms = interval.as_millis() as u64, "playback started");

    for (index, mv) in path.into_iter().enumerate() {
        if !flags.wait_while_paused() {
            let _ = tx.send(PlaybackEvent::Stopped { index });
            return tower;
        }
        if !tower.apply_move(mv) {
            let _ = tx.send(PlaybackEvent::Failed(TowerError::IllegalMove { index, mv }));
            return tower;
        }
        let _ = tx.send(PlaybackEvent::Step {
            index,
            mv,
            state: tower.clone(),
        });
        flags.sleep(interval);
    }

    let _ = tx.send(PlaybackEvent::Finished(tower.clone()));
    tower
}
