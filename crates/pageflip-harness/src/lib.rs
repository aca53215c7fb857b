#![forbid(unsafe_code)]

//! Deterministic trace replay for the pageflip controller.
//!
//! Feeds a recorded JSONL pointer trace through
//! [`FlipPage`](pageflip_core::FlipPage) on a synthetic clock and reports the
//! controller state after each input, so a gesture bug seen in a browser can
//! be reproduced and bisected offline.

pub mod cli;
pub mod error;
pub mod replay;
pub mod trace;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{HarnessError, Result};
pub use replay::{ReplaySummary, Replayer, Snapshot, replay};
pub use trace::{TraceRecord, parse_trace, read_trace};
