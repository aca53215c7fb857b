#![forbid(unsafe_code)]

//! Renderer-neutral description of the two page halves.
//!
//! A page is drawn as two halves (top/bottom for vertical flips, left/right
//! for horizontal flips). During a flip one half rotates around the centre
//! line while the other stays put. [`HalfStyles`] captures, for each half,
//! the rotation to apply, whether it must be stacked above its neighbour, and
//! whether the change should be animated.
//!
//! The CSS helpers format these into `transform` and `transition` values for
//! web surfaces; other surfaces read the fields directly.

use std::fmt::Write as _;

use web_time::Duration;

use crate::config::Orientation;

/// Stacking order given to an elevated half so its face passes over the
/// back of the other half.
pub const ELEVATED_Z_INDEX: u8 = 2;

/// Axis a half rotates around, named after the CSS rotate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    /// Horizontal axis (`rotateX`), used by vertical flips.
    X,
    /// Vertical axis (`rotateY`), used by horizontal flips.
    Y,
}

impl RotationAxis {
    #[must_use]
    pub const fn for_orientation(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Vertical => Self::X,
            Orientation::Horizontal => Self::Y,
        }
    }

    const fn css_fn(self) -> &'static str {
        match self {
            Self::X => "rotateX",
            Self::Y => "rotateY",
        }
    }
}

/// A rotation of one half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfRotation {
    pub axis: RotationAxis,
    pub degrees: f64,
}

/// Style override for one half.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HalfTransform {
    /// Rotation to apply; `None` leaves the half flat.
    pub rotation: Option<HalfRotation>,
    /// Stack above the other half.
    pub elevated: bool,
    /// Animate towards this state with the standard transition.
    pub animated: bool,
}

impl HalfTransform {
    /// Flat, unanimated: no override at all.
    pub const NEUTRAL: Self = Self {
        rotation: None,
        elevated: false,
        animated: false,
    };

    /// Flat, animating back from wherever the half was.
    #[must_use]
    pub const fn settle() -> Self {
        Self {
            rotation: None,
            elevated: false,
            animated: true,
        }
    }

    #[must_use]
    pub fn rotated(axis: RotationAxis, degrees: f64) -> Self {
        Self {
            rotation: Some(HalfRotation {
                axis,
                // Keep -0 out of the CSS output.
                degrees: if degrees == 0.0 { 0.0 } else { degrees },
            }),
            elevated: false,
            animated: false,
        }
    }

    #[must_use]
    pub fn elevate(mut self) -> Self {
        self.elevated = true;
        self
    }

    #[must_use]
    pub fn animate(mut self) -> Self {
        self.animated = true;
        self
    }

    /// Whether the half is flat and unstacked (animation flag aside).
    #[inline]
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.rotation.is_none() && !self.elevated
    }

    /// Signed rotation in degrees, 0 when flat.
    #[inline]
    #[must_use]
    pub fn degrees(&self) -> f64 {
        self.rotation.map_or(0.0, |r| r.degrees)
    }

    /// Stacking order override, if any.
    #[inline]
    #[must_use]
    pub fn z_index(&self) -> Option<u8> {
        self.elevated.then_some(ELEVATED_Z_INDEX)
    }

    /// CSS `transform` value, e.g. `perspective(130em) rotateX(30deg)`.
    #[must_use]
    pub fn css_transform(&self, perspective: &str) -> Option<String> {
        let rotation = self.rotation?;
        let mut out = String::with_capacity(40);
        let _ = write!(
            out,
            "perspective({perspective}) {}({}deg)",
            rotation.axis.css_fn(),
            rotation.degrees
        );
        Some(out)
    }
}

/// Style overrides for both halves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HalfStyles {
    /// Top half (vertical) or left half (horizontal).
    pub first: HalfTransform,
    /// Bottom half (vertical) or right half (horizontal).
    pub second: HalfTransform,
}

impl HalfStyles {
    /// No overrides on either half.
    pub const NEUTRAL: Self = Self {
        first: HalfTransform::NEUTRAL,
        second: HalfTransform::NEUTRAL,
    };

    /// Both halves animating back to flat.
    #[must_use]
    pub const fn settle() -> Self {
        Self {
            first: HalfTransform::settle(),
            second: HalfTransform::settle(),
        }
    }

    /// Whether both halves are flat.
    #[inline]
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.first.is_flat() && self.second.is_flat()
    }
}

/// CSS `transition` value for animated halves, e.g. `transform 0.2s ease-in-out`.
#[must_use]
pub fn css_transition(duration: Duration) -> String {
    format!("transform {}s ease-in-out", duration.as_secs_f64())
}
