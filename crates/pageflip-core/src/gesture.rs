#![forbid(unsafe_code)]

//! Gesture tracking: turns raw pointer positions into a directed swipe.
//!
//! [`GestureTracker`] follows one drag at a time. It records where the drag
//! started, how far it has moved, which direction it committed to, and which
//! way the most recent incremental movement went (for the fast-flick rule in
//! [`decision`](crate::decision)).
//!
//! # State Machine
//!
//! ```text
//! idle ──drag_start──▶ tracking ──move past threshold──▶ committed
//!   ▲                     │                                  │
//!   └──────drag_end / reset┴──────────────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. The committed direction is set at most once per drag and is never
//!    overwritten until [`GestureTracker::reset`] or
//!    [`GestureTracker::on_drag_end`].
//! 2. Only the component matching the configured orientation commits a
//!    direction: vertical drags commit up/down, horizontal drags left/right.
//!    A diagonal drag never switches axis mid-gesture.
//! 3. `last_move` compares the new offset with the previous offset, never
//!    with the origin. An off-axis-only step records the off-axis direction,
//!    which can never match a committed direction. A move that changes
//!    neither component keeps the previous value.
//!
//! # Failure Modes
//!
//! - A move or end without a preceding start is ignored.
//! - A second start while a drag is active is ignored; the original origin
//!   stays in force.

use web_time::Instant;

use crate::config::Orientation;
use crate::decision::Rotation;
use crate::geometry::{Offset, Point};

// ---------------------------------------------------------------------------
// SwipeDirection
// ---------------------------------------------------------------------------

/// Direction of a committed swipe or of a single incremental movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Whether dragging this way turns towards the next page.
    ///
    /// Up and left produce negative angles, which flip forward.
    #[inline]
    #[must_use]
    pub const fn turns_forward(self) -> bool {
        matches!(self, Self::Up | Self::Left)
    }

    /// Sign of the rotation angle produced by a drag in this direction.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> f64 {
        if self.turns_forward() { -1.0 } else { 1.0 }
    }

    /// Distance travelled in this direction (negative when moving against it).
    #[inline]
    #[must_use]
    pub fn distance_along(self, offset: Offset) -> f64 {
        match self {
            Self::Up => -offset.dy,
            Self::Down => offset.dy,
            Self::Left => -offset.dx,
            Self::Right => offset.dx,
        }
    }

    /// Direction of `delta` projected on the orientation axis, if any.
    #[must_use]
    pub fn along(orientation: Orientation, delta: f64) -> Option<Self> {
        let (negative, positive) = match orientation {
            Orientation::Vertical => (Self::Up, Self::Down),
            Orientation::Horizontal => (Self::Left, Self::Right),
        };
        if delta < 0.0 {
            Some(negative)
        } else if delta > 0.0 {
            Some(positive)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// GestureState
// ---------------------------------------------------------------------------

/// Snapshot of one drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    /// Where the drag started; `None` when no drag is active.
    pub origin: Option<Point>,
    /// Displacement from `origin` at the last move.
    pub offset: Offset,
    /// Direction locked in for this drag.
    pub direction: Option<SwipeDirection>,
    /// Direction of the most recent incremental movement.
    pub last_move: Option<SwipeDirection>,
    /// When the last move event arrived.
    pub last_move_at: Option<Instant>,
    /// Signed rotation in degrees; negative turns forward.
    pub angle: f64,
    /// `|angle|`, the magnitude applied to the moving half.
    pub rotate: f64,
}

impl GestureState {
    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }
}

// ---------------------------------------------------------------------------
// GestureTracker
// ---------------------------------------------------------------------------

/// Stateful tracker for a single pointer or touch drag.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    orientation: Orientation,
    threshold: f64,
    state: GestureState,
}

impl GestureTracker {
    #[must_use]
    pub fn new(orientation: Orientation, threshold: f64) -> Self {
        Self {
            orientation,
            threshold,
            state: GestureState::default(),
        }
    }

    /// Begin a drag at `point`.
    ///
    /// Returns `false` (and changes nothing) if a drag is already active.
    pub fn on_drag_start(&mut self, point: Point) -> bool {
        if self.state.is_active() {
            return false;
        }
        self.state = GestureState {
            origin: Some(point),
            ..GestureState::default()
        };
        true
    }

    /// Track a move to `point`.
    ///
    /// Returns the direction committed by this move, if this is the move that
    /// crossed the threshold.
    pub fn on_drag_move(&mut self, point: Point, now: Instant) -> Option<SwipeDirection> {
        let origin = self.state.origin?;
        let offset = point - origin;
        let previous = self.state.offset;

        let mut committed = None;
        if self.state.direction.is_none() && offset.exceeds(self.threshold) {
            committed = SwipeDirection::along(self.orientation, self.axis_component(offset));
            self.state.direction = committed;
        }

        let step = Offset::new(offset.dx - previous.dx, offset.dy - previous.dy);
        if let Some(dir) = self.step_direction(step) {
            self.state.last_move = Some(dir);
        }

        self.state.offset = offset;
        self.state.last_move_at = Some(now);

        tracing::trace!(
            dx = offset.dx,
            dy = offset.dy,
            direction = ?self.state.direction,
            last_move = ?self.state.last_move,
            "drag move"
        );
        committed
    }

    /// Store the rotation computed for the current offset.
    pub fn apply_rotation(&mut self, rotation: Rotation) {
        self.state.angle = rotation.angle;
        self.state.rotate = rotation.rotate;
    }

    /// Finish the drag, returning its final snapshot. The tracker is reset.
    pub fn on_drag_end(&mut self) -> GestureState {
        std::mem::take(&mut self.state)
    }

    /// Abandon any drag in progress.
    pub fn reset(&mut self) {
        self.state = GestureState::default();
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.is_active()
    }

    /// Current drag snapshot.
    #[inline]
    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn step_direction(&self, step: Offset) -> Option<SwipeDirection> {
        let (across, off_axis) = match self.orientation {
            Orientation::Vertical => (Orientation::Horizontal, step.dx),
            Orientation::Horizontal => (Orientation::Vertical, step.dy),
        };
        SwipeDirection::along(self.orientation, self.axis_component(step))
            .or_else(|| SwipeDirection::along(across, off_axis))
    }

    fn axis_component(&self, offset: Offset) -> f64 {
        match self.orientation {
            Orientation::Vertical => offset.dy,
            Orientation::Horizontal => offset.dx,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
