#![forbid(unsafe_code)]

//! Discoverability hints shown shortly after mount.
//!
//! Two independent affordances:
//!
//! - **Peek**: the second half tilts 30° for a moment, suggesting the page
//!   can be lifted.
//! - **Touch hint**: a host-drawn overlay (e.g. an animated finger) is
//!   visible for a few seconds.
//!
//! Both are plain timer chains on the shared [`TimerSet`]; neither touches
//! the gesture state. A peek that comes due while a drag or commit owns the
//! halves is skipped, and a drag starting mid-peek ends it early.

use web_time::{Duration, Instant};

use crate::config::{FlipConfig, Orientation};
use crate::timer::{TimerKind, TimerSet};
use crate::transform::{HalfTransform, RotationAxis};

/// Delay before the peek when it is the only hint.
pub const HINT_DELAY: Duration = Duration::from_millis(1000);
/// Delay before the peek when the touch hint is also shown.
pub const HINT_DELAY_WITH_TOUCH: Duration = Duration::from_millis(1800);
/// How long the half stays tilted.
pub const HINT_PEEK_DURATION: Duration = Duration::from_millis(1000);
/// Tilt of the peek, in degrees.
pub const HINT_ANGLE: f64 = 30.0;
/// Delay before the touch hint appears.
pub const TOUCH_HINT_DELAY: Duration = Duration::from_millis(1000);
/// How long the touch hint stays visible.
pub const TOUCH_HINT_DURATION: Duration = Duration::from_millis(4000);

/// A hint transition produced by a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintEvent {
    PeekStarted,
    PeekEnded,
    TouchShown,
    TouchHidden,
}

/// Hint timing and visibility.
#[derive(Debug, Clone, Default)]
pub struct HintSchedule {
    show_hint: bool,
    show_touch_hint: bool,
    orientation: Orientation,
    peeking: bool,
    touch_visible: bool,
}

impl HintSchedule {
    #[must_use]
    pub fn from_config(config: &FlipConfig) -> Self {
        Self {
            show_hint: config.show_hint,
            show_touch_hint: config.show_touch_hint,
            orientation: config.orientation,
            peeking: false,
            touch_visible: false,
        }
    }

    /// Schedule the configured hints relative to `now`.
    pub fn arm(&self, now: Instant, timers: &mut TimerSet) {
        if self.show_hint {
            let delay = if self.show_touch_hint {
                HINT_DELAY_WITH_TOUCH
            } else {
                HINT_DELAY
            };
            timers.schedule(TimerKind::HintShow, now + delay);
        }
        if self.show_touch_hint {
            timers.schedule(TimerKind::TouchHintShow, now + TOUCH_HINT_DELAY);
        }
    }

    /// The tilt applied to the second half during a peek.
    #[must_use]
    pub fn peek_transform(&self) -> HalfTransform {
        let degrees = match self.orientation {
            Orientation::Vertical => HINT_ANGLE,
            Orientation::Horizontal => -HINT_ANGLE,
        };
        HalfTransform::rotated(RotationAxis::for_orientation(self.orientation), degrees).animate()
    }

    /// React to a hint timer.
    ///
    /// `halves_free` says whether the peek may take the second half; when it
    /// may not, a due peek is dropped without scheduling its end.
    pub fn fire(
        &mut self,
        kind: TimerKind,
        now: Instant,
        timers: &mut TimerSet,
        halves_free: bool,
    ) -> Option<HintEvent> {
        match kind {
            TimerKind::HintShow => {
                if !halves_free {
                    tracing::debug!("peek hint skipped, halves busy");
                    return None;
                }
                self.peeking = true;
                timers.schedule(TimerKind::HintHide, now + HINT_PEEK_DURATION);
                Some(HintEvent::PeekStarted)
            }
            TimerKind::HintHide => {
                self.peeking = false;
                Some(HintEvent::PeekEnded)
            }
            TimerKind::TouchHintShow => {
                self.touch_visible = true;
                timers.schedule(TimerKind::TouchHintHide, now + TOUCH_HINT_DURATION);
                Some(HintEvent::TouchShown)
            }
            TimerKind::TouchHintHide => {
                self.touch_visible = false;
                Some(HintEvent::TouchHidden)
            }
            TimerKind::Commit => None,
        }
    }

    /// End a running peek early, dropping its pending end.
    ///
    /// Returns whether a peek was running.
    pub fn interrupt_peek(&mut self, timers: &mut TimerSet) -> bool {
        if !self.peeking {
            return false;
        }
        self.peeking = false;
        timers.cancel(TimerKind::HintHide);
        true
    }

    #[inline]
    #[must_use]
    pub fn is_peeking(&self) -> bool {
        self.peeking
    }

    #[inline]
    #[must_use]
    pub fn touch_hint_visible(&self) -> bool {
        self.touch_visible
    }

    /// Forget visibility (used on teardown).
    pub fn clear(&mut self) {
        self.peeking = false;
        self.touch_visible = false;
    }
}
