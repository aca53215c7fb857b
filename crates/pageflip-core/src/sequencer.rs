#![forbid(unsafe_code)]

//! Page sequencing: the authoritative page index and the commit animation.
//!
//! [`PageSequencer`] owns the current page and the style overrides of both
//! halves. A commit runs in two phases:
//!
//! 1. [`commit_next`](PageSequencer::commit_next) /
//!    [`commit_previous`](PageSequencer::commit_previous) swing the moving half
//!    to ±180° with the standard transition and schedule
//!    [`TimerKind::Commit`].
//! 2. When that timer fires, [`complete_commit`](PageSequencer::complete_commit)
//!    moves the index, drops the override on the half that turned, and
//!    notifies the observer.
//!
//! # Invariants
//!
//! 1. The index changes exactly once per completed commit, and only there.
//! 2. The observer runs after the index has moved and receives the index the
//!    page was turned *from*.
//! 3. A commit cannot be interrupted: while one is pending, drags and further
//!    commits are refused, and [`reset`](PageSequencer::reset) only clears
//!    styles.
//!
//! # Failure Modes
//!
//! - `advance`/`retreat` past an end without wraparound are no-ops (logged).
//! - A commit timer firing with no commit pending does nothing.

use std::fmt;

use web_time::{Duration, Instant};

use crate::config::{FlipConfig, Orientation};
use crate::gesture::SwipeDirection;
use crate::timer::{TimerKind, TimerSet};
use crate::transform::{HalfStyles, HalfTransform, RotationAxis};

/// What the two halves are doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationPhase {
    #[default]
    Idle,
    Dragging,
    CommittingNext,
    CommittingPrevious,
}

impl AnimationPhase {
    #[inline]
    #[must_use]
    pub const fn is_committing(self) -> bool {
        matches!(self, Self::CommittingNext | Self::CommittingPrevious)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::CommittingNext => "committing-next",
            Self::CommittingPrevious => "committing-previous",
        }
    }
}

/// A completed page turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageChange {
    /// Index before the turn; this is what observers receive.
    pub previous: usize,
    /// Index after the turn.
    pub current: usize,
}

/// Callback invoked with the pre-turn index after every completed commit.
pub type PageObserver = Box<dyn FnMut(usize)>;

/// Owner of the page cursor and the half-page transforms.
pub struct PageSequencer {
    page: usize,
    len: usize,
    loop_forever: bool,
    axis: RotationAxis,
    duration: Duration,
    phase: AnimationPhase,
    styles: HalfStyles,
    observer: Option<PageObserver>,
}

impl fmt::Debug for PageSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSequencer")
            .field("page", &self.page)
            .field("len", &self.len)
            .field("loop_forever", &self.loop_forever)
            .field("phase", &self.phase)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

impl PageSequencer {
    #[must_use]
    pub fn new(
        len: usize,
        start_page: usize,
        loop_forever: bool,
        orientation: Orientation,
        duration: Duration,
    ) -> Self {
        Self {
            page: clamp_index(start_page, len),
            len,
            loop_forever,
            axis: RotationAxis::for_orientation(orientation),
            duration,
            phase: AnimationPhase::Idle,
            styles: HalfStyles::NEUTRAL,
            observer: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &FlipConfig, len: usize) -> Self {
        Self::new(
            len,
            config.start_page,
            config.loop_forever,
            config.orientation,
            config.animation_duration(),
        )
    }

    /// Register the page-change observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: impl FnMut(usize) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    #[inline]
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn styles(&self) -> HalfStyles {
        self.styles
    }

    /// Update the page count, clamping the cursor into range.
    ///
    /// A pending commit whose starting page was clamped away is abandoned and
    /// the halves settle. Returns whether that happened.
    pub fn set_len(&mut self, len: usize) -> bool {
        self.len = len;
        let clamped = clamp_index(self.page, len);
        if clamped == self.page {
            return false;
        }
        tracing::debug!(from = self.page, to = clamped, len, "page cursor clamped");
        self.page = clamped;
        if !self.phase.is_committing() {
            return false;
        }
        tracing::debug!(phase = self.phase.as_str(), "pending commit abandoned");
        self.styles = HalfStyles::settle();
        self.phase = AnimationPhase::Idle;
        true
    }

    // -----------------------------------------------------------------------
    // Availability and index transitions
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.len > 0 && (self.loop_forever || self.page + 1 < self.len)
    }

    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.len > 0 && (self.loop_forever || self.page > 0)
    }

    /// Move to the next page, wrapping when enabled.
    pub fn advance(&mut self) {
        if !self.has_next_page() {
            tracing::warn!(page = self.page, len = self.len, "advance past last page ignored");
            return;
        }
        self.page = (self.page + 1) % self.len;
    }

    /// Move to the previous page, wrapping when enabled.
    pub fn retreat(&mut self) {
        if !self.has_previous_page() {
            tracing::warn!(page = self.page, len = self.len, "retreat past first page ignored");
            return;
        }
        self.page = if self.page == 0 {
            self.len - 1
        } else {
            self.page - 1
        };
    }

    // -----------------------------------------------------------------------
    // Drag styles
    // -----------------------------------------------------------------------

    /// Enter the dragging phase. Refused while a commit is pending.
    pub fn begin_drag(&mut self) -> bool {
        if self.phase.is_committing() {
            return false;
        }
        self.phase = AnimationPhase::Dragging;
        true
    }

    /// Tilt the half that follows a drag in `direction` by `rotate` degrees.
    ///
    /// Forward drags lift the second half; backward drags lift the first half
    /// and stack it above the second so its face passes over the back. With
    /// the pointer back behind the origin (`rotate == 0`) the half lies flat.
    pub fn apply_drag(&mut self, direction: SwipeDirection, rotate: f64) {
        if self.phase != AnimationPhase::Dragging {
            return;
        }
        if rotate <= 0.0 {
            if direction.turns_forward() {
                self.styles.second = HalfTransform::NEUTRAL;
            } else {
                self.styles.first = HalfTransform::NEUTRAL;
            }
            return;
        }
        match direction {
            SwipeDirection::Up => {
                self.styles.second = HalfTransform::rotated(RotationAxis::X, rotate);
            }
            SwipeDirection::Down => {
                self.styles.first = HalfTransform::rotated(RotationAxis::X, -rotate).elevate();
            }
            SwipeDirection::Left => {
                self.styles.second = HalfTransform::rotated(RotationAxis::Y, -rotate);
            }
            SwipeDirection::Right => {
                self.styles.first = HalfTransform::rotated(RotationAxis::Y, rotate).elevate();
            }
        }
    }

    /// Tilt the second half for the peek hint. Only applies when idle.
    pub fn peek(&mut self, transform: HalfTransform) -> bool {
        if self.phase != AnimationPhase::Idle {
            return false;
        }
        self.styles.second = transform;
        true
    }

    /// Take the peek tilt off the second half.
    ///
    /// Idle halves animate back. A drag that just grabbed the page gets a
    /// flat half at once. Refused while a commit owns the halves.
    pub fn end_peek(&mut self) -> bool {
        match self.phase {
            AnimationPhase::Idle => self.styles.second = HalfTransform::settle(),
            AnimationPhase::Dragging => self.styles.second = HalfTransform::NEUTRAL,
            AnimationPhase::CommittingNext | AnimationPhase::CommittingPrevious => return false,
        }
        true
    }

    // -----------------------------------------------------------------------
    // Commit animation
    // -----------------------------------------------------------------------

    /// Start turning to the next page.
    ///
    /// Returns `false` when there is no next page or a commit is pending.
    pub fn commit_next(&mut self, now: Instant, timers: &mut TimerSet) -> bool {
        if self.phase.is_committing() || !self.has_next_page() {
            return false;
        }
        let degrees = match self.axis {
            RotationAxis::X => 180.0,
            RotationAxis::Y => -180.0,
        };
        self.styles = HalfStyles {
            first: HalfTransform::settle(),
            second: HalfTransform::rotated(self.axis, degrees).animate(),
        };
        self.start_commit(AnimationPhase::CommittingNext, now, timers)
    }

    /// Start turning to the previous page.
    ///
    /// Returns `false` when there is no previous page or a commit is pending.
    pub fn commit_previous(&mut self, now: Instant, timers: &mut TimerSet) -> bool {
        if self.phase.is_committing() || !self.has_previous_page() {
            return false;
        }
        let degrees = match self.axis {
            RotationAxis::X => -180.0,
            RotationAxis::Y => 180.0,
        };
        self.styles = HalfStyles {
            first: HalfTransform::rotated(self.axis, degrees).elevate().animate(),
            second: HalfTransform::settle(),
        };
        self.start_commit(AnimationPhase::CommittingPrevious, now, timers)
    }

    fn start_commit(&mut self, phase: AnimationPhase, now: Instant, timers: &mut TimerSet) -> bool {
        if !timers.schedule(TimerKind::Commit, now + self.duration) {
            self.styles = HalfStyles::settle();
            self.phase = AnimationPhase::Idle;
            return false;
        }
        self.phase = phase;
        tracing::debug!(page = self.page, phase = phase.as_str(), "commit started");
        true
    }

    /// Finish the pending commit: move the index, flatten the turned half,
    /// then notify the observer.
    ///
    /// A commit whose target disappeared meanwhile settles without moving or
    /// notifying.
    pub fn complete_commit(&mut self) -> Option<PageChange> {
        let previous = self.page;
        let available = match self.phase {
            AnimationPhase::CommittingNext => self.has_next_page(),
            AnimationPhase::CommittingPrevious => self.has_previous_page(),
            AnimationPhase::Idle | AnimationPhase::Dragging => true,
        };
        if !available {
            tracing::debug!(page = previous, len = self.len, "commit target gone, settling");
            self.styles = HalfStyles::settle();
            self.phase = AnimationPhase::Idle;
            return None;
        }
        match self.phase {
            AnimationPhase::CommittingNext => {
                self.advance();
                self.styles.second = HalfTransform::NEUTRAL;
            }
            AnimationPhase::CommittingPrevious => {
                self.retreat();
                self.styles.first = HalfTransform::NEUTRAL;
            }
            AnimationPhase::Idle | AnimationPhase::Dragging => {
                tracing::debug!(phase = self.phase.as_str(), "commit timer with no commit pending");
                return None;
            }
        }
        self.phase = AnimationPhase::Idle;
        let change = PageChange {
            previous,
            current: self.page,
        };
        tracing::debug!(previous, current = change.current, "commit finished");
        if let Some(observer) = self.observer.as_mut() {
            observer(previous);
        }
        Some(change)
    }

    /// Animate both halves back to flat.
    ///
    /// Leaves the phase alone while a commit is pending; the commit still
    /// completes.
    pub fn reset(&mut self) {
        self.styles = HalfStyles::settle();
        if !self.phase.is_committing() {
            self.phase = AnimationPhase::Idle;
        }
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    const DURATION: Duration = Duration::from_millis(200);

    fn seq(len: usize, start: usize, wrap: bool) -> PageSequencer {
        PageSequencer::new(len, start, wrap, Orientation::Vertical, DURATION)
    }

    fn recorder(seq: &mut PageSequencer) -> Rc<RefCell<Vec<usize>>> {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        seq.set_observer(move |prev| sink.borrow_mut().push(prev));
        calls
    }

    // --- availability ---

    #[test]
    fn boundaries_without_wrap() {
        let s = seq(3, 0, false);
        assert!(s.has_next_page());
        assert!(!s.has_previous_page());
        let s = seq(3, 2, false);
        assert!(!s.has_next_page());
        assert!(s.has_previous_page());
    }

    #[test]
    fn wrap_always_available() {
        for start in 0..3 {
            let s = seq(3, start, true);
            assert!(s.has_next_page());
            assert!(s.has_previous_page());
        }
        let s = seq(1, 0, true);
        assert!(s.has_next_page() && s.has_previous_page());
    }

    #[test]
    fn empty_set_has_nothing() {
        let s = seq(0, 0, true);
        assert!(!s.has_next_page());
        assert!(!s.has_previous_page());
    }

    #[test]
    fn start_page_clamped() {
        assert_eq!(seq(3, 9, false).page(), 2);
        assert_eq!(seq(0, 4, false).page(), 0);
    }

    // --- advance / retreat ---

    #[test]
    fn advance_and_retreat_wrap_modulo() {
        let mut s = seq(3, 2, true);
        s.advance();
        assert_eq!(s.page(), 0);
        s.retreat();
        assert_eq!(s.page(), 2);
    }

    #[test]
    fn advance_past_end_is_noop() {
        let mut s = seq(3, 2, false);
        s.advance();
        assert_eq!(s.page(), 2);
        let mut s = seq(3, 0, false);
        s.retreat();
        assert_eq!(s.page(), 0);
    }

    #[test]
    fn shrinking_clamps_cursor() {
        let mut s = seq(5, 4, false);
        s.set_len(2);
        assert_eq!(s.page(), 1);
        assert!(!s.has_next_page());
    }

    // --- commit ---

    #[test]
    fn commit_next_applies_full_turn_then_advances() {
        let t = Instant::now();
        let mut timers = TimerSet::new();
        let mut s = seq(3, 0, false);
        let calls = recorder(&mut s);

        assert!(s.commit_next(t, &mut timers));
        assert_eq!(s.phase(), AnimationPhase::CommittingNext);
        assert_eq!(s.styles().second.degrees(), 180.0);
        assert!(s.styles().second.animated);
        assert!(s.styles().first.is_flat());
        assert_eq!(s.page(), 0, "index must not move before the timer fires");
        assert_eq!(timers.deadline(TimerKind::Commit), Some(t + DURATION));

        let change = s.complete_commit().unwrap();
        assert_eq!(change, PageChange { previous: 0, current: 1 });
        assert_eq!(s.page(), 1);
        assert_eq!(s.phase(), AnimationPhase::Idle);
        assert_eq!(s.styles().second, HalfTransform::NEUTRAL);
        assert_eq!(*calls.borrow(), vec![0]);
    }

    #[test]
    fn commit_previous_elevates_first_half() {
        let t = Instant::now();
        let mut timers = TimerSet::new();
        let mut s = seq(3, 2, false);
        let calls = recorder(&mut s);

        assert!(s.commit_previous(t, &mut timers));
        assert_eq!(s.styles().first.degrees(), -180.0);
        assert!(s.styles().first.elevated);
        assert!(s.styles().second.is_flat());

        s.complete_commit();
        assert_eq!(s.page(), 1);
        assert_eq!(s.styles().first, HalfTransform::NEUTRAL);
        assert_eq!(*calls.borrow(), vec![2]);
    }

    #[test]
    fn horizontal_commit_uses_rotate_y() {
        let t = Instant::now();
        let mut timers = TimerSet::new();
        let mut s = PageSequencer::new(3, 1, false, Orientation::Horizontal, DURATION);
        s.commit_next(t, &mut timers);
        assert_eq!(
            s.styles().second.css_transform("130em").as_deref(),
            Some("perspective(130em) rotateY(-180deg)")
        );
        s.complete_commit();
        s.commit_previous(t, &mut timers);
        assert_eq!(
            s.styles().first.css_transform("130em").as_deref(),
            Some("perspective(130em) rotateY(180deg)")
        );
    }

    #[test]
    fn commit_refused_without_target() {
        let mut timers = TimerSet::new();
        let mut s = seq(3, 2, false);
        assert!(!s.commit_next(Instant::now(), &mut timers));
        assert_eq!(s.phase(), AnimationPhase::Idle);
        assert!(timers.is_empty());
    }

    #[test]
    fn second_commit_refused_while_pending() {
        let t = Instant::now();
        let mut timers = TimerSet::new();
        let mut s = seq(5, 2, false);
        assert!(s.commit_next(t, &mut timers));
        assert!(!s.commit_previous(t, &mut timers));
        assert!(!s.commit_next(t, &mut timers));
        assert!(!s.begin_drag());
        assert_eq!(s.phase(), AnimationPhase::CommittingNext);
    }

    #[test]
    fn commit_refused_after_timers_closed() {
        let mut timers = TimerSet::new();
        timers.close();
        let mut s = seq(3, 0, false);
        assert!(!s.commit_next(Instant::now(), &mut timers));
        assert_eq!(s.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn stale_commit_timer_is_noop() {
        let mut s = seq(3, 0, false);
        let calls = recorder(&mut s);
        assert_eq!(s.complete_commit(), None);
        assert_eq!(s.page(), 0);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn wraparound_commit_next_from_last() {
        let mut timers = TimerSet::new();
        let mut s = seq(3, 2, true);
        let calls = recorder(&mut s);
        s.commit_next(Instant::now(), &mut timers);
        assert_eq!(s.complete_commit().map(|c| c.current), Some(0));
        assert_eq!(*calls.borrow(), vec![2]);
    }

    // --- drag / reset ---

    #[test]
    fn drag_styles_follow_direction() {
        let mut s = seq(3, 1, false);
        assert!(s.begin_drag());
        s.apply_drag(SwipeDirection::Up, 40.0);
        assert_eq!(s.styles().second.degrees(), 40.0);
        assert!(!s.styles().second.elevated);

        s.apply_drag(SwipeDirection::Down, 40.0);
        assert_eq!(s.styles().first.degrees(), -40.0);
        assert!(s.styles().first.elevated);
    }

    #[test]
    fn drag_back_past_origin_flattens_the_half() {
        let mut s = seq(3, 1, false);
        s.begin_drag();
        s.apply_drag(SwipeDirection::Left, 25.0);
        assert!(!s.styles().second.is_flat());
        s.apply_drag(SwipeDirection::Left, 0.0);
        assert_eq!(s.styles().second, HalfTransform::NEUTRAL);
    }

    #[test]
    fn drag_styles_ignored_when_not_dragging() {
        let mut s = seq(3, 1, false);
        s.apply_drag(SwipeDirection::Up, 40.0);
        assert!(s.styles().is_flat());
    }

    #[test]
    fn reset_returns_to_neutral_baseline() {
        let mut s = seq(3, 1, false);
        s.begin_drag();
        s.apply_drag(SwipeDirection::Right, 70.0);
        s.reset();
        assert!(s.styles().is_flat());
        assert!(s.styles().first.animated && s.styles().second.animated);
        assert_eq!(s.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn reset_during_commit_keeps_commit_alive() {
        let mut timers = TimerSet::new();
        let mut s = seq(3, 0, false);
        s.commit_next(Instant::now(), &mut timers);
        s.reset();
        assert!(s.styles().is_flat());
        assert_eq!(s.phase(), AnimationPhase::CommittingNext);
        assert!(s.complete_commit().is_some());
        assert_eq!(s.page(), 1);
    }

    #[test]
    fn peek_only_when_idle() {
        let mut s = seq(3, 0, false);
        let tilt = HalfTransform::rotated(RotationAxis::X, 30.0).animate();
        assert!(s.peek(tilt));
        assert_eq!(s.styles().second, tilt);
        assert!(s.end_peek());
        assert!(s.styles().second.is_flat());

        s.begin_drag();
        assert!(!s.peek(tilt));
    }

    #[test]
    fn end_peek_flattens_under_a_fresh_drag() {
        let mut s = seq(3, 0, false);
        let tilt = HalfTransform::rotated(RotationAxis::X, 30.0).animate();
        s.peek(tilt);
        s.begin_drag();
        assert!(s.end_peek());
        assert_eq!(s.styles().second, HalfTransform::NEUTRAL);

        let mut timers = TimerSet::new();
        s.reset();
        assert!(s.commit_next(Instant::now(), &mut timers));
        assert!(!s.end_peek());
    }

    #[test]
    fn shrinking_under_a_commit_abandons_it() {
        let mut s = seq(3, 1, false);
        let calls = recorder(&mut s);
        let mut timers = TimerSet::new();
        assert!(s.commit_next(Instant::now(), &mut timers));
        assert!(s.set_len(1));
        assert_eq!(s.page(), 0);
        assert_eq!(s.phase(), AnimationPhase::Idle);
        assert_eq!(s.complete_commit(), None);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn commit_without_target_at_completion_settles_silently() {
        let mut s = seq(3, 1, false);
        let calls = recorder(&mut s);
        let mut timers = TimerSet::new();
        assert!(s.commit_next(Instant::now(), &mut timers));
        // Cursor still valid, but the page after it is gone
        assert!(!s.set_len(2));
        assert_eq!(s.complete_commit(), None);
        assert_eq!(s.page(), 1);
        assert_eq!(s.phase(), AnimationPhase::Idle);
        assert!(s.styles().is_flat());
        assert!(calls.borrow().is_empty());
    }
}
