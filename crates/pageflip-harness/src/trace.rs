#![forbid(unsafe_code)]

//! JSONL input traces.
//!
//! # Format
//!
//! One JSON object per line, tagged by `event`, each carrying `ts_ms`
//! (milliseconds since the start of the trace):
//!
//! ```text
//! {"event":"mount","ts_ms":0}
//! {"event":"down","ts_ms":0,"x":0,"y":400}
//! {"event":"move","ts_ms":16,"x":0,"y":200}
//! {"event":"up","ts_ms":120}
//! {"event":"tick","ts_ms":320}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Timestamps must not
//! go backwards.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use pageflip_core::{Point, PointerEvent};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// A single input in a trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    Mount { ts_ms: u64 },
    Down { ts_ms: u64, x: f64, y: f64 },
    Move { ts_ms: u64, x: f64, y: f64 },
    Up { ts_ms: u64 },
    Leave { ts_ms: u64 },
    Tick { ts_ms: u64 },
    Next { ts_ms: u64 },
    Previous { ts_ms: u64 },
    Teardown { ts_ms: u64 },
}

impl TraceRecord {
    #[must_use]
    pub fn ts_ms(&self) -> u64 {
        match *self {
            Self::Mount { ts_ms }
            | Self::Down { ts_ms, .. }
            | Self::Move { ts_ms, .. }
            | Self::Up { ts_ms }
            | Self::Leave { ts_ms }
            | Self::Tick { ts_ms }
            | Self::Next { ts_ms }
            | Self::Previous { ts_ms }
            | Self::Teardown { ts_ms } => ts_ms,
        }
    }

    /// The `event` tag, for logs and snapshots.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mount { .. } => "mount",
            Self::Down { .. } => "down",
            Self::Move { .. } => "move",
            Self::Up { .. } => "up",
            Self::Leave { .. } => "leave",
            Self::Tick { .. } => "tick",
            Self::Next { .. } => "next",
            Self::Previous { .. } => "previous",
            Self::Teardown { .. } => "teardown",
        }
    }

    /// The pointer event this record carries, if it is one.
    #[must_use]
    pub fn pointer(&self) -> Option<PointerEvent> {
        match *self {
            Self::Down { x, y, .. } => Some(PointerEvent::Down(Point::new(x, y))),
            Self::Move { x, y, .. } => Some(PointerEvent::Move(Point::new(x, y))),
            Self::Up { .. } => Some(PointerEvent::Up),
            Self::Leave { .. } => Some(PointerEvent::Leave),
            _ => None,
        }
    }
}

/// Parse a whole trace, checking timestamps are monotonic.
pub fn parse_trace(reader: impl BufRead) -> Result<Vec<TraceRecord>> {
    let mut records = Vec::new();
    let mut last_ts = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record: TraceRecord = serde_json::from_str(trimmed)
            .map_err(|err| HarnessError::invalid_trace(line_no, err.to_string()))?;
        let ts = record.ts_ms();
        if ts < last_ts {
            return Err(HarnessError::invalid_trace(
                line_no,
                format!("timestamp {ts} ms is before previous {last_ts} ms"),
            ));
        }
        last_ts = ts;
        records.push(record);
    }
    tracing::debug!(records = records.len(), "trace parsed");
    Ok(records)
}

/// Read and parse a trace file.
pub fn read_trace(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>> {
    let file = std::fs::File::open(path)?;
    parse_trace(BufReader::new(file))
}

/// Parse a trace from any reader (e.g. stdin).
pub fn read_trace_from(reader: impl Read) -> Result<Vec<TraceRecord>> {
    parse_trace(BufReader::new(reader))
}
