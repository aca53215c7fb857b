#![forbid(unsafe_code)]

//! Core: headless page-flip gestures, flip decisions, and page sequencing.
//!
//! # Role in pageflip
//! `pageflip-core` is everything a flip-book widget needs except pixels. It
//! turns pointer input into a rotation of one half of the current page,
//! decides on release whether to turn or spring back, and runs the timed
//! commit that moves the page cursor.
//!
//! # Primary responsibilities
//! - **GestureTracker**: origin, offset, committed direction, last movement.
//! - **Decisions**: bounded rotation per move, flip-or-cancel per release.
//! - **PageSequencer**: the page cursor, half-page styles, commit animation.
//! - **TimerSet**: host-clocked one-shot timers, cancelled on teardown.
//! - **FlipPage**: the controller wiring the above together.
//!
//! # How it fits in the system
//! Hosts feed [`PointerEvent`]s and call [`FlipPage::tick`] with their clock;
//! they render from [`FlipView`]. Nothing here reads the wall clock or spawns
//! threads, so the whole state machine replays deterministically (see the
//! `pageflip-harness` crate).
//!
//! ```
//! use pageflip_core::{FlipConfig, FlipPage, PageSet, Point, PointerEvent};
//! use web_time::{Duration, Instant};
//!
//! let mut book = FlipPage::new(FlipConfig::default(), PageSet::new(vec!["a", "b"]))?;
//! let t = Instant::now();
//! book.process(&PointerEvent::Down(Point::new(0.0, 300.0)), t);
//! book.process(&PointerEvent::Move(Point::new(0.0, 100.0)), t);
//! book.process(&PointerEvent::Up, t + Duration::from_millis(100));
//! book.tick(t + Duration::from_millis(300));
//! assert_eq!(book.page(), 1);
//! # Ok::<(), pageflip_core::ConfigError>(())
//! ```

pub mod config;
pub mod decision;
pub mod error;
pub mod flip;
pub mod geometry;
pub mod gesture;
pub mod hint;
pub mod pages;
pub mod sequencer;
pub mod timer;
pub mod transform;

pub use config::{FlipConfig, Orientation};
pub use decision::{FlipDecision, Rotation, compute_rotation, decide_on_release};
pub use error::ConfigError;
pub use flip::{FlipEvent, FlipPage, FlipTarget, FlipView, PointerEvent};
pub use geometry::{Offset, Point};
pub use gesture::{GestureState, GestureTracker, SwipeDirection};
pub use hint::HintEvent;
pub use pages::PageSet;
pub use sequencer::{AnimationPhase, PageChange, PageSequencer};
pub use timer::{TimerKind, TimerSet};
pub use transform::{HalfStyles, HalfTransform, RotationAxis};
