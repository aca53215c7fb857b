#![forbid(unsafe_code)]

//! Flip decisions: how far the page has turned, and whether to let it go.
//!
//! Two pure functions sit between the [`GestureTracker`](crate::gesture::GestureTracker)
//! and the [`PageSequencer`](crate::sequencer::PageSequencer):
//!
//! - [`compute_rotation`] runs on every move and maps the drag distance to a
//!   bounded angle.
//! - [`decide_on_release`] runs once when the pointer lets go and picks
//!   commit-next, commit-previous, or cancel.
//!
//! # Rules
//!
//! A release commits when the page is past vertical (|angle| ≥ 90°), or when
//! the last move was a flick: it arrived within [`FLICK_WINDOW`] of the
//! release and went the same way as the committed direction. Only a page that
//! exists can be committed to.
//!
//! # Invariants
//!
//! 1. `|angle| ≤ 180°`, and `|angle| ≤ max_angle` when dragging towards a
//!    missing page.
//! 2. The angle's sign always matches the committed direction; dragging back
//!    past the origin yields 0°, never the opposite sign.
//! 3. At most one of commit-next / commit-previous is chosen; next takes
//!    precedence when both rules match.

use web_time::{Duration, Instant};

use crate::gesture::{GestureState, SwipeDirection};

/// Drag distance that swings a half through a full 180°.
pub const FULL_SWING: f64 = 250.0;

/// Upper bound on rotation when the target page exists.
pub const MAX_ROTATION: f64 = 180.0;

/// Angle past which a release flips the page.
pub const FLIP_THRESHOLD: f64 = 90.0;

/// Maximum gap between the last move and the release for a flick.
pub const FLICK_WINDOW: Duration = Duration::from_millis(20);

/// Rotation of the moving half for the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    /// Signed degrees; negative turns forward.
    pub angle: f64,
    /// `|angle|`.
    pub rotate: f64,
    /// Whether the bounce-back limit was in force.
    pub bounded: bool,
}

/// Outcome of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipDecision {
    CommitNext,
    CommitPrevious,
    Cancel,
}

/// Map the drag in `state` to a bounded rotation.
///
/// Returns zero rotation until a direction has been committed.
#[must_use]
pub fn compute_rotation(
    state: &GestureState,
    max_angle: f64,
    has_next: bool,
    has_previous: bool,
) -> Rotation {
    let Some(direction) = state.direction else {
        return Rotation::default();
    };

    let distance = direction.distance_along(state.offset).max(0.0);
    let target_exists = if direction.turns_forward() {
        has_next
    } else {
        has_previous
    };
    let limit = if target_exists { MAX_ROTATION } else { max_angle };
    let rotate = (distance / FULL_SWING * MAX_ROTATION).min(limit);

    Rotation {
        angle: if rotate == 0.0 { 0.0 } else { direction.sign() * rotate },
        rotate,
        bounded: !target_exists,
    }
}

/// Decide what a release of `state` at `now` should do.
#[must_use]
pub fn decide_on_release(
    state: &GestureState,
    now: Instant,
    has_next: bool,
    has_previous: bool,
) -> FlipDecision {
    let flicked = |dirs: [SwipeDirection; 2]| -> bool {
        let Some(direction) = state.direction else {
            return false;
        };
        let Some(at) = state.last_move_at else {
            return false;
        };
        now.saturating_duration_since(at) <= FLICK_WINDOW
            && dirs.contains(&direction)
            && state.last_move == Some(direction)
    };

    let go_next = has_next
        && (state.angle <= -FLIP_THRESHOLD
            || flicked([SwipeDirection::Up, SwipeDirection::Right]));
    let go_previous = has_previous
        && (state.angle >= FLIP_THRESHOLD
            || flicked([SwipeDirection::Down, SwipeDirection::Left]));

    // Horizontal drags can satisfy both rules at once (left turns forward by
    // angle but backward by flick). Next wins.
    if go_next && go_previous {
        tracing::warn!(
            angle = state.angle,
            direction = ?state.direction,
            "release matched both rules, taking next"
        );
    }

    let decision = if go_next {
        FlipDecision::CommitNext
    } else if go_previous {
        FlipDecision::CommitPrevious
    } else {
        FlipDecision::Cancel
    };

    tracing::debug!(
        angle = state.angle,
        direction = ?state.direction,
        last_move = ?state.last_move,
        ?decision,
        "release decision"
    );
    decision
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
