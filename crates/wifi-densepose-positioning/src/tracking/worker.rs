//! Bounded hand-off of scan cycles to a session on its own thread.
//!
//! Producers (a scan loop, a test harness) push [`ScanCycle`]s into a
//! [`ScanFeed`]; the single [`SessionWorker`] owns the [`TrackingSession`]
//! and processes one cycle at a time, so the session never sees concurrent
//! mutation.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

use crate::error::{PositioningError, PositioningResult};
use crate::tracking::session::{CycleReport, ScanCycle, TrackingSession};

/// Create a feed/worker pair with room for `capacity` pending cycles.
pub fn session_channel(session: TrackingSession, capacity: usize) -> (ScanFeed, SessionWorker) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (ScanFeed { tx }, SessionWorker { rx, session })
}

/// Producer half. Cloneable; the worker stops once every clone is dropped.
#[derive(Debug, Clone)]
pub struct ScanFeed {
    tx: SyncSender<ScanCycle>,
}

impl ScanFeed {
    /// Queue a cycle, blocking while the feed is full.
    pub fn push(&self, cycle: impl Into<ScanCycle>) -> PositioningResult<()> {
        self.tx
            .send(cycle.into())
            .map_err(|_| PositioningError::FeedClosed)
    }

    /// Queue a cycle without blocking. Returns `Ok(false)` and drops the
    /// cycle when the feed is full.
    pub fn try_push(&self, cycle: impl Into<ScanCycle>) -> PositioningResult<bool> {
        match self.tx.try_send(cycle.into()) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => {
                tracing::debug!("scan feed full, cycle dropped");
                Ok(false)
            }
            Err(TrySendError::Disconnected(_)) => Err(PositioningError::FeedClosed),
        }
    }
}

/// Consumer half owning the session.
#[derive(Debug)]
pub struct SessionWorker {
    rx: Receiver<ScanCycle>,
    session: TrackingSession,
}

impl SessionWorker {
    /// Block for the next cycle and process it. `None` once every feed
    /// has been dropped and the queue is empty.
    pub fn process_next(&mut self) -> Option<CycleReport> {
        let cycle = self.rx.recv().ok()?;
        Some(self.session.process(cycle))
    }

    /// Process whatever is queued right now without blocking.
    pub fn drain(&mut self) -> Vec<CycleReport> {
        let mut reports = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(cycle) => reports.push(self.session.process(cycle)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        reports
    }

    /// Process cycles until the feed closes, handing each report to
    /// `on_report`. Returns the number of cycles processed.
    pub fn run<F>(&mut self, mut on_report: F) -> usize
    where
        F: FnMut(&CycleReport),
    {
        let mut processed = 0;
        while let Some(report) = self.process_next() {
            on_report(&report);
            processed += 1;
        }
        tracing::info!(processed, "scan feed closed, worker stopping");
        processed
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    /// Mutable access for start/stop between cycles.
    pub fn session_mut(&mut self) -> &mut TrackingSession {
        &mut self.session
    }

    pub fn into_session(self) -> TrackingSession {
        self.session
    }
}
