#![forbid(unsafe_code)]

//! One-shot timers driven by the host's clock.
//!
//! [`TimerSet`] holds a handful of named deadlines. Nothing runs on its own:
//! the host calls [`take_due`](TimerSet::take_due) (through
//! [`FlipPage::tick`](crate::flip::FlipPage::tick)) with the current time and
//! acts on whatever has expired.
//!
//! # Invariants
//!
//! 1. At most one deadline per [`TimerKind`]; scheduling again replaces it.
//! 2. Due timers are returned in deadline order, ties in scheduling order.
//! 3. After [`close`](TimerSet::close) nothing can be scheduled and nothing
//!    fires.

use web_time::Instant;

/// Named scheduled tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// End of a commit animation.
    Commit,
    /// Start of the peek hint.
    HintShow,
    /// End of the peek hint.
    HintHide,
    /// Touch affordance appears.
    TouchHintShow,
    /// Touch affordance disappears.
    TouchHintHide,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    kind: TimerKind,
    deadline: Instant,
    seq: u64,
}

/// Owned set of cancellable one-shot timers.
#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    entries: Vec<Entry>,
    next_seq: u64,
    closed: bool,
}

impl TimerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at `deadline`, replacing any pending one.
    ///
    /// Returns `false` once the set is closed.
    pub fn schedule(&mut self, kind: TimerKind, deadline: Instant) -> bool {
        if self.closed {
            tracing::warn!(?kind, "timer scheduled after teardown, ignored");
            return false;
        }
        self.entries.retain(|e| e.kind != kind);
        self.entries.push(Entry {
            kind,
            deadline,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        true
    }

    /// Cancel `kind`. Returns whether it was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.kind != kind);
        self.entries.len() != before
    }

    /// Cancel everything and refuse further scheduling.
    pub fn close(&mut self) {
        self.entries.clear();
        self.closed = true;
    }

    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    #[must_use]
    pub fn deadline(&self, kind: TimerKind) -> Option<Instant> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.deadline)
    }

    /// Earliest pending deadline, for hosts that sleep until the next event.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every timer whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerKind> {
        if self.closed {
            return Vec::new();
        }
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|e| {
            if e.deadline <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.deadline.cmp(&b.deadline).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|e| e.kind).collect()
    }
}
