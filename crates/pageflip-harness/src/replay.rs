#![forbid(unsafe_code)]

//! Replays a trace against a [`FlipPage`] and reports a snapshot per input.
//!
//! Timestamps are offsets from a single base instant, so two replays of the
//! same trace produce identical output.

use std::io::Write;

use pageflip_core::{FlipConfig, FlipEvent, FlipPage, FlipTarget, HintEvent, PageSet};
use serde::Serialize;
use web_time::{Duration, Instant};

use crate::error::Result;
use crate::trace::TraceRecord;

/// State after one trace record, serialized as one JSONL line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub ts_ms: u64,
    pub input: &'static str,
    pub page: usize,
    pub page_count: usize,
    pub phase: &'static str,
    pub angle: f64,
    pub rotate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_z_index: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
}

/// Totals over a whole replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub records: usize,
    pub page_changes: usize,
    pub cancels: usize,
    pub final_page: usize,
}

/// Drives a controller from trace records.
#[derive(Debug)]
pub struct Replayer {
    page: FlipPage<usize>,
    base: Instant,
    summary: ReplaySummary,
}

impl Replayer {
    /// A controller over `page_count` placeholder pages.
    pub fn new(config: FlipConfig, page_count: usize) -> Result<Self> {
        let pages = PageSet::new((0..page_count).collect());
        Ok(Self {
            page: FlipPage::new(config, pages)?,
            base: Instant::now(),
            summary: ReplaySummary::default(),
        })
    }

    /// Apply one record and describe the result.
    pub fn apply(&mut self, record: &TraceRecord) -> Snapshot {
        let now = self.base + Duration::from_millis(record.ts_ms());
        let events: Vec<FlipEvent> = match record {
            TraceRecord::Mount { .. } => {
                self.page.mount(now);
                Vec::new()
            }
            TraceRecord::Next { .. } => self.page.next(now).into_iter().collect(),
            TraceRecord::Previous { .. } => self.page.previous(now).into_iter().collect(),
            TraceRecord::Tick { .. } => self.page.tick(now),
            TraceRecord::Teardown { .. } => {
                self.page.teardown();
                Vec::new()
            }
            TraceRecord::Down { .. }
            | TraceRecord::Move { .. }
            | TraceRecord::Up { .. }
            | TraceRecord::Leave { .. } => match record.pointer() {
                Some(pointer) => self.page.process(&pointer, now),
                None => Vec::new(),
            },
        };

        self.summary.records += 1;
        for event in &events {
            match event {
                FlipEvent::PageChanged(_) => self.summary.page_changes += 1,
                FlipEvent::FlipCancelled => self.summary.cancels += 1,
                _ => {}
            }
        }
        self.summary.final_page = self.page.page();

        let config = self.page.config();
        let view = self.page.view();
        Snapshot {
            ts_ms: record.ts_ms(),
            input: record.name(),
            page: view.page,
            page_count: view.page_count,
            phase: view.phase.as_str(),
            angle: view.angle,
            rotate: view.rotate,
            direction: view.direction.map(|d| d.as_str()),
            first_transform: view.styles.first.css_transform(&config.perspective),
            second_transform: view.styles.second.css_transform(&config.perspective),
            first_z_index: view.styles.first.z_index(),
            events: events.iter().map(describe).collect(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> &ReplaySummary {
        &self.summary
    }

    #[must_use]
    pub fn controller(&self) -> &FlipPage<usize> {
        &self.page
    }
}

/// Short, stable name for an event, e.g. `committed:next@0`.
#[must_use]
pub fn describe(event: &FlipEvent) -> String {
    match event {
        FlipEvent::DirectionCommitted(direction) => format!("direction:{}", direction.as_str()),
        FlipEvent::FlipCommitted { target, from } => {
            let target = match target {
                FlipTarget::Next => "next",
                FlipTarget::Previous => "previous",
            };
            format!("committed:{target}@{from}")
        }
        FlipEvent::FlipCancelled => "cancelled".to_string(),
        FlipEvent::PageChanged(change) => {
            format!("page:{}->{}", change.previous, change.current)
        }
        FlipEvent::Hint(hint) => match hint {
            HintEvent::PeekStarted => "hint:peek-start",
            HintEvent::PeekEnded => "hint:peek-end",
            HintEvent::TouchShown => "hint:touch-show",
            HintEvent::TouchHidden => "hint:touch-hide",
        }
        .to_string(),
    }
}

/// Replay `records`, writing one JSON snapshot per line to `out`.
pub fn replay(
    config: FlipConfig,
    page_count: usize,
    records: &[TraceRecord],
    out: &mut impl Write,
) -> Result<ReplaySummary> {
    let mut replayer = Replayer::new(config, page_count)?;
    for record in records {
        let snapshot = replayer.apply(record);
        serde_json::to_writer(&mut *out, &snapshot)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    let summary = replayer.summary().clone();
    tracing::debug!(
        records = summary.records,
        page_changes = summary.page_changes,
        final_page = summary.final_page,
        "replay finished"
    );
    Ok(summary)
}
