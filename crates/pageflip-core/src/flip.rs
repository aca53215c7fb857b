#![forbid(unsafe_code)]

//! The page-flip controller.
//!
//! [`FlipPage`] is what a rendering surface talks to. Feed it pointer events
//! and clock ticks; read back a [`FlipView`] describing what to draw.
//!
//! ```text
//! PointerEvent ──▶ GestureTracker ──▶ compute_rotation ──▶ drag styles
//!                        │
//!                   Up / Leave
//!                        ▼
//!               decide_on_release ──▶ PageSequencer::commit_* ──▶ TimerSet
//!                                                                     │
//!                                           tick(now) ◀───────────────┘
//!                                               │
//!                                               ▼
//!                               complete_commit ──▶ observer(previous)
//! ```
//!
//! # Invariants
//!
//! 1. While a commit is pending, pointer downs and programmatic turns are
//!    refused; a commit always runs to completion.
//! 2. After [`teardown`](FlipPage::teardown) every operation is a no-op and
//!    `tick` never fires anything.
//! 3. Events are returned in the order they happened.

use std::fmt;

use web_time::Instant;

use crate::config::FlipConfig;
use crate::decision::{FlipDecision, compute_rotation, decide_on_release};
use crate::error::Result;
use crate::geometry::Point;
use crate::gesture::{GestureState, GestureTracker, SwipeDirection};
use crate::hint::{HintEvent, HintSchedule};
use crate::pages::PageSet;
use crate::sequencer::{AnimationPhase, PageChange, PageSequencer};
use crate::timer::{TimerKind, TimerSet};
use crate::transform::{HalfStyles, css_transition};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Raw pointer input. Mouse and touch map onto the same variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Mouse down / touch start.
    Down(Point),
    /// Mouse move / touch move.
    Move(Point),
    /// Mouse up / touch end.
    Up,
    /// Pointer left the element.
    Leave,
}

/// Which way a commit turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipTarget {
    Next,
    Previous,
}

/// Something observable that happened inside the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlipEvent {
    /// The current drag locked in a direction.
    DirectionCommitted(SwipeDirection),
    /// A commit animation started from `from`.
    FlipCommitted { target: FlipTarget, from: usize },
    /// A drag ended without turning the page.
    FlipCancelled,
    /// A commit animation finished.
    PageChanged(PageChange),
    /// A hint changed visibility.
    Hint(HintEvent),
}

// ---------------------------------------------------------------------------
// FlipView
// ---------------------------------------------------------------------------

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FlipView<'a, T> {
    pub page: usize,
    pub page_count: usize,
    pub phase: AnimationPhase,
    /// Signed drag rotation in degrees.
    pub angle: f64,
    /// Magnitude of the drag rotation.
    pub rotate: f64,
    pub direction: Option<SwipeDirection>,
    pub styles: HalfStyles,
    pub current: Option<&'a T>,
    /// Item on the back of the first half.
    pub before: Option<&'a T>,
    /// Item on the back of the second half.
    pub after: Option<&'a T>,
    pub touch_hint_visible: bool,
}

// ---------------------------------------------------------------------------
// FlipPage
// ---------------------------------------------------------------------------

/// Headless page-flip widget.
pub struct FlipPage<T> {
    config: FlipConfig,
    pages: PageSet<T>,
    tracker: GestureTracker,
    sequencer: PageSequencer,
    hints: HintSchedule,
    timers: TimerSet,
    destroyed: bool,
}

impl<T> fmt::Debug for FlipPage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlipPage")
            .field("page", &self.sequencer.page())
            .field("page_count", &self.pages.len())
            .field("phase", &self.sequencer.phase())
            .field("dragging", &self.tracker.is_dragging())
            .field("pending_timers", &self.timers.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl<T> FlipPage<T> {
    /// Create a controller, validating `config`.
    pub fn new(config: FlipConfig, pages: PageSet<T>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tracker: GestureTracker::new(config.orientation, config.threshold),
            sequencer: PageSequencer::from_config(&config, pages.len()),
            hints: HintSchedule::from_config(&config),
            timers: TimerSet::new(),
            destroyed: false,
            pages,
            config,
        })
    }

    /// Register the page-change callback. It receives the index the page
    /// was turned *from*.
    pub fn on_page_change(&mut self, observer: impl FnMut(usize) + 'static) {
        self.sequencer.set_observer(observer);
    }

    /// Arm the configured hints. Call once when the widget appears.
    pub fn mount(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        self.hints.arm(now, &mut self.timers);
    }

    /// Cancel every timer and stop reacting to input.
    pub fn teardown(&mut self) {
        if self.destroyed {
            return;
        }
        self.timers.close();
        self.tracker.reset();
        self.hints.clear();
        self.destroyed = true;
        tracing::debug!(page = self.sequencer.page(), "flip page torn down");
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Process one pointer event, returning any resulting events.
    pub fn process(&mut self, event: &PointerEvent, now: Instant) -> Vec<FlipEvent> {
        let mut out = Vec::with_capacity(2);
        if self.destroyed {
            return out;
        }
        match *event {
            PointerEvent::Down(point) => self.on_down(point, &mut out),
            PointerEvent::Move(point) => self.on_move(point, now, &mut out),
            PointerEvent::Up => self.on_release(now, &mut out),
            PointerEvent::Leave => self.on_leave(now, &mut out),
        }
        out
    }

    /// Turn to the next page programmatically. Returns whether a turn started.
    pub fn next(&mut self, now: Instant) -> Option<FlipEvent> {
        self.goto(FlipTarget::Next, now)
    }

    /// Turn to the previous page programmatically. Returns whether a turn started.
    pub fn previous(&mut self, now: Instant) -> Option<FlipEvent> {
        self.goto(FlipTarget::Previous, now)
    }

    /// Fire every timer due at `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<FlipEvent> {
        let mut out = Vec::new();
        if self.destroyed {
            return out;
        }
        for kind in self.timers.take_due(now) {
            match kind {
                TimerKind::Commit => {
                    if let Some(change) = self.sequencer.complete_commit() {
                        out.push(FlipEvent::PageChanged(change));
                    }
                }
                hint => {
                    let halves_free = self.sequencer.phase() == AnimationPhase::Idle;
                    if let Some(event) = self.hints.fire(hint, now, &mut self.timers, halves_free) {
                        match event {
                            HintEvent::PeekStarted => {
                                self.sequencer.peek(self.hints.peek_transform());
                            }
                            HintEvent::PeekEnded => {
                                if !self.sequencer.end_peek() {
                                    tracing::debug!("peek end absorbed by commit");
                                    continue;
                                }
                            }
                            HintEvent::TouchShown | HintEvent::TouchHidden => {}
                        }
                        out.push(FlipEvent::Hint(event));
                    }
                }
            }
        }
        out
    }

    /// Replace the page list (e.g. after the host's data changed).
    ///
    /// A pending commit whose starting page no longer exists is dropped
    /// without a page change.
    pub fn replace_pages(&mut self, pages: Vec<T>) -> Vec<T> {
        let old = self.pages.replace(pages);
        if self.sequencer.set_len(self.pages.len()) {
            self.timers.cancel(TimerKind::Commit);
        }
        old
    }

    fn on_down(&mut self, point: Point, out: &mut Vec<FlipEvent>) {
        if self.tracker.is_dragging() {
            return;
        }
        if !self.sequencer.begin_drag() {
            tracing::warn!(phase = self.sequencer.phase().as_str(), "drag refused during commit");
            return;
        }
        self.tracker.on_drag_start(point);
        if self.hints.interrupt_peek(&mut self.timers) {
            self.sequencer.end_peek();
            out.push(FlipEvent::Hint(HintEvent::PeekEnded));
        }
    }

    fn on_move(&mut self, point: Point, now: Instant, out: &mut Vec<FlipEvent>) {
        if !self.tracker.is_dragging() {
            return;
        }
        if let Some(direction) = self.tracker.on_drag_move(point, now) {
            tracing::debug!(direction = direction.as_str(), "swipe direction committed");
            out.push(FlipEvent::DirectionCommitted(direction));
        }
        let rotation = compute_rotation(
            self.tracker.state(),
            self.config.max_angle,
            self.sequencer.has_next_page(),
            self.sequencer.has_previous_page(),
        );
        self.tracker.apply_rotation(rotation);
        if let Some(direction) = self.tracker.state().direction {
            self.sequencer.apply_drag(direction, rotation.rotate);
        }
    }

    fn on_release(&mut self, now: Instant, out: &mut Vec<FlipEvent>) {
        if !self.tracker.is_dragging() {
            return;
        }
        let state = self.tracker.on_drag_end();
        let decision = decide_on_release(
            &state,
            now,
            self.sequencer.has_next_page(),
            self.sequencer.has_previous_page(),
        );
        self.sequencer.reset();
        let from = self.sequencer.page();
        let started = match decision {
            FlipDecision::CommitNext => self
                .sequencer
                .commit_next(now, &mut self.timers)
                .then_some(FlipTarget::Next),
            FlipDecision::CommitPrevious => self
                .sequencer
                .commit_previous(now, &mut self.timers)
                .then_some(FlipTarget::Previous),
            FlipDecision::Cancel => None,
        };
        match started {
            Some(target) => out.push(FlipEvent::FlipCommitted { target, from }),
            None => out.push(FlipEvent::FlipCancelled),
        }
    }

    fn on_leave(&mut self, now: Instant, out: &mut Vec<FlipEvent>) {
        if !self.tracker.is_dragging() {
            return;
        }
        if self.config.flip_on_leave {
            self.on_release(now, out);
        } else {
            self.tracker.reset();
            self.sequencer.reset();
            out.push(FlipEvent::FlipCancelled);
        }
    }

    fn goto(&mut self, target: FlipTarget, now: Instant) -> Option<FlipEvent> {
        if self.destroyed {
            return None;
        }
        if self.sequencer.phase().is_committing() {
            tracing::warn!(?target, "turn refused during commit");
            return None;
        }
        if self.tracker.is_dragging() {
            self.tracker.reset();
            self.sequencer.reset();
        }
        let from = self.sequencer.page();
        let started = match target {
            FlipTarget::Next => self.sequencer.commit_next(now, &mut self.timers),
            FlipTarget::Previous => self.sequencer.commit_previous(now, &mut self.timers),
        };
        started.then_some(FlipEvent::FlipCommitted { target, from })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> FlipView<'_, T> {
        let page = self.sequencer.page();
        let wrap = self.config.loop_forever;
        let gesture = self.tracker.state();
        FlipView {
            page,
            page_count: self.pages.len(),
            phase: self.sequencer.phase(),
            angle: gesture.angle,
            rotate: gesture.rotate,
            direction: gesture.direction,
            styles: self.sequencer.styles(),
            current: self.pages.get(page),
            before: self.pages.before_item(page, wrap),
            after: self.pages.after_item(page, wrap),
            touch_hint_visible: self.hints.touch_hint_visible(),
        }
    }

    #[inline]
    #[must_use]
    pub fn page(&self) -> usize {
        self.sequencer.page()
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> AnimationPhase {
        self.sequencer.phase()
    }

    #[inline]
    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        self.tracker.state()
    }

    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.sequencer.has_next_page()
    }

    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.sequencer.has_previous_page()
    }

    #[inline]
    #[must_use]
    pub fn pages(&self) -> &PageSet<T> {
        &self.pages
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &FlipConfig {
        &self.config
    }

    /// Earliest pending timer, for hosts that sleep between events.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// CSS `transition` value for animated halves.
    #[must_use]
    pub fn transition(&self) -> String {
        css_transition(self.config.animation_duration())
    }

    #[inline]
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use web_time::Duration;

    use super::*;
    use crate::config::Orientation;

    const MS_5: Duration = Duration::from_millis(5);
    const MS_100: Duration = Duration::from_millis(100);
    const MS_200: Duration = Duration::from_millis(200);

    fn book(config: FlipConfig) -> FlipPage<&'static str> {
        FlipPage::new(config, PageSet::new(vec!["a", "b", "c"])).unwrap()
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down(Point::new(x, y))
    }

    fn mv(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move(Point::new(x, y))
    }

    fn record(fp: &mut FlipPage<&'static str>) -> Rc<RefCell<Vec<usize>>> {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        fp.on_page_change(move |prev| sink.borrow_mut().push(prev));
        calls
    }

    #[test]
    fn invalid_config_rejected() {
        let err = FlipPage::new(
            FlipConfig::default().with_max_angle(-3.0),
            PageSet::new(vec![1]),
        );
        assert!(err.is_err());
    }

    #[test]
    fn drag_sets_phase_and_styles() {
        let mut fp = book(FlipConfig::default());
        let t = Instant::now();
        fp.process(&down(0.0, 300.0), t);
        assert_eq!(fp.phase(), AnimationPhase::Dragging);

        let events = fp.process(&mv(0.0, 250.0), t + MS_5);
        assert_eq!(events, vec![FlipEvent::DirectionCommitted(SwipeDirection::Up)]);
        let view = fp.view();
        assert!((view.angle - -36.0).abs() < 1e-9);
        assert!((view.styles.second.degrees() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn slow_short_drag_cancels() {
        let mut fp = book(FlipConfig::default());
        let t = Instant::now();
        fp.process(&down(0.0, 300.0), t);
        fp.process(&mv(0.0, 250.0), t + MS_5);
        let events = fp.process(&PointerEvent::Up, t + MS_100);
        assert_eq!(events, vec![FlipEvent::FlipCancelled]);
        assert_eq!(fp.phase(), AnimationPhase::Idle);
        assert!(fp.view().styles.is_flat());
        assert!(!fp.gesture().is_active());
    }

    #[test]
    fn release_past_halfway_commits_and_tick_completes() {
        let mut fp = book(FlipConfig::default());
        let calls = record(&mut fp);
        let t = Instant::now();
        fp.process(&down(0.0, 300.0), t);
        fp.process(&mv(0.0, 100.0), t + MS_5);
        let events = fp.process(&PointerEvent::Up, t + MS_100);
        assert_eq!(
            events,
            vec![FlipEvent::FlipCommitted {
                target: FlipTarget::Next,
                from: 0
            }]
        );
        assert_eq!(fp.phase(), AnimationPhase::CommittingNext);

        assert!(fp.tick(t + MS_100 + MS_100).is_empty());
        assert_eq!(fp.page(), 0);

        let events = fp.tick(t + MS_100 + MS_200);
        assert_eq!(
            events,
            vec![FlipEvent::PageChanged(PageChange {
                previous: 0,
                current: 1
            })]
        );
        assert_eq!(fp.page(), 1);
        assert_eq!(*calls.borrow(), vec![0]);
    }

    #[test]
    fn drag_refused_during_commit() {
        let mut fp = book(FlipConfig::default());
        let t = Instant::now();
        fp.next(t).unwrap();
        fp.process(&down(0.0, 300.0), t + MS_5);
        assert!(!fp.gesture().is_active());
        assert_eq!(fp.phase(), AnimationPhase::CommittingNext);
    }

    #[test]
    fn programmatic_turn_refused_during_commit() {
        let mut fp = book(FlipConfig::default());
        let t = Instant::now();
        assert!(fp.next(t).is_some());
        assert!(fp.next(t + MS_5).is_none());
        assert!(fp.previous(t + MS_5).is_none());
        fp.tick(t + MS_200);
        assert_eq!(fp.page(), 1);
        assert!(fp.previous(t + MS_200).is_some());
    }

    #[test]
    fn previous_at_first_page_refused() {
        let mut fp = book(FlipConfig::default());
        assert!(fp.previous(Instant::now()).is_none());
        assert_eq!(fp.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn leave_cancels_by_default() {
        let mut fp = book(FlipConfig::default());
        let t = Instant::now();
        fp.process(&down(0.0, 300.0), t);
        fp.process(&mv(0.0, 50.0), t + MS_5);
        let events = fp.process(&PointerEvent::Leave, t + MS_5);
        assert_eq!(events, vec![FlipEvent::FlipCancelled]);
        assert_eq!(fp.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn leave_releases_with_flip_on_leave() {
        let mut fp = book(FlipConfig::default().with_flip_on_leave(true));
        let t = Instant::now();
        fp.process(&down(0.0, 300.0), t);
        fp.process(&mv(0.0, 50.0), t + MS_5);
        let events = fp.process(&PointerEvent::Leave, t + MS_100);
        assert!(matches!(
            events[..],
            [FlipEvent::FlipCommitted {
                target: FlipTarget::Next,
                ..
            }]
        ));
    }

    #[test]
    fn leave_without_drag_is_silent() {
        let mut fp = book(FlipConfig::default());
        assert!(fp.process(&PointerEvent::Leave, Instant::now()).is_empty());
        assert!(fp.process(&PointerEvent::Up, Instant::now()).is_empty());
    }

    #[test]
    fn teardown_cancels_pending_commit() {
        let mut fp = book(FlipConfig::default());
        let calls = record(&mut fp);
        let t = Instant::now();
        fp.next(t);
        fp.teardown();
        assert!(fp.tick(t + Duration::from_secs(5)).is_empty());
        assert!(calls.borrow().is_empty());
        assert_eq!(fp.next_deadline(), None);
        assert!(fp.process(&down(0.0, 0.0), t).is_empty());
        assert!(fp.next(t).is_none());
    }

    #[test]
    fn hints_run_after_mount() {
        let mut fp = book(FlipConfig::default().with_hints(true, false));
        let t = Instant::now();
        fp.mount(t);
        assert!(fp.tick(t + Duration::from_millis(999)).is_empty());
        let events = fp.tick(t + Duration::from_millis(1000));
        assert_eq!(events, vec![FlipEvent::Hint(HintEvent::PeekStarted)]);
        assert_eq!(fp.view().styles.second.degrees(), 30.0);
        let events = fp.tick(t + Duration::from_millis(2000));
        assert_eq!(events, vec![FlipEvent::Hint(HintEvent::PeekEnded)]);
        assert!(fp.view().styles.is_flat());
    }

    #[test]
    fn touch_hint_visibility_in_view() {
        let mut fp = book(FlipConfig::default().with_hints(false, true));
        let t = Instant::now();
        fp.mount(t);
        fp.tick(t + Duration::from_millis(1000));
        assert!(fp.view().touch_hint_visible);
        fp.tick(t + Duration::from_millis(5000));
        assert!(!fp.view().touch_hint_visible);
    }

    #[test]
    fn view_exposes_neighbours() {
        let fp = FlipPage::new(
            FlipConfig::default().with_start_page(1),
            PageSet::new(vec!["a", "b", "c"]),
        )
        .unwrap();
        let view = fp.view();
        assert_eq!(view.current, Some(&"b"));
        assert_eq!(view.before, Some(&"a"));
        assert_eq!(view.after, Some(&"c"));
        assert_eq!(view.page_count, 3);
    }

    #[test]
    fn replace_pages_clamps_cursor() {
        let mut fp = FlipPage::new(
            FlipConfig::default().with_start_page(2),
            PageSet::new(vec!["a", "b", "c"]),
        )
        .unwrap();
        fp.replace_pages(vec!["x"]);
        assert_eq!(fp.page(), 0);
        assert!(!fp.has_next_page());
    }

    #[test]
    fn horizontal_drag_rotates_about_y() {
        let mut fp = book(FlipConfig::default().with_orientation(Orientation::Horizontal));
        let t = Instant::now();
        fp.process(&down(300.0, 0.0), t);
        fp.process(&mv(175.0, 0.0), t + MS_5);
        let view = fp.view();
        assert_eq!(view.direction, Some(SwipeDirection::Left));
        assert_eq!(
            view.styles.second.css_transform("130em").as_deref(),
            Some("perspective(130em) rotateY(-90deg)")
        );
    }

    #[test]
    fn transition_string_uses_config_duration() {
        let fp = book(FlipConfig::default());
        assert_eq!(fp.transition(), "transform 0.2s ease-in-out");
    }
}
