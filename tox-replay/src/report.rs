//! Report generation
//!
//! Renders the final replay state either as a plain-text table or as JSON.

use crate::config::OutputFormat;
use crate::state::{EventRecord, ReplayState};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tox_dispatch::{AvCategory, CallStateFlags, CoreCategory};

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub core_batches: usize,
    pub av_batches: usize,
    pub total_events: u64,
    /// Every category in dispatch order, zero counts included
    pub counts: BTreeMap<String, u64>,
    pub friends: Vec<u32>,
    pub last_call_state: Option<u32>,
    pub reused_frame_buffers: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventRecord>>,
}

impl Report {
    pub fn new(state: ReplayState, core_batches: usize, av_batches: usize, reused_frame_buffers: u64) -> Self {
        let mut counts: BTreeMap<String, u64> = CoreCategory::ALL
            .iter()
            .map(|c| c.to_string())
            .chain(AvCategory::ALL.iter().map(|c| c.to_string()))
            .map(|name| (name, 0))
            .collect();
        counts.extend(state.counts.iter().map(|(k, v)| (k.clone(), *v)));

        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            core_batches,
            av_batches,
            total_events: state.total(),
            counts,
            friends: state.friends.into_iter().collect(),
            last_call_state: state.last_call_state,
            reused_frame_buffers,
            events: state.events,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Txt => Ok(self.render_txt()),
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report")
            }
        }
    }

    fn render_txt(&self) -> String {
        let mut out = String::new();
        let rule = "─".repeat(47);

        let _ = writeln!(out, "Tox Event Replay Report");
        let _ = writeln!(out, "Generated: {}", self.generated_at);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Core batches:  {}", self.core_batches);
        let _ = writeln!(out, "AV batches:    {}", self.av_batches);
        let _ = writeln!(out, "Total events:  {}", self.total_events);
        let _ = writeln!(out, "Friends seen:  {}", self.friends.len());
        if let Some(mask) = self.last_call_state {
            let _ = writeln!(
                out,
                "Call state:    {:#08b} {:?}",
                mask,
                CallStateFlags::from_mask(mask)
            );
        }
        if self.reused_frame_buffers > 0 {
            let _ = writeln!(out, "Reused frames: {}", self.reused_frame_buffers);
        }

        let _ = writeln!(out, "\n{:<28} {:>10}", "Category", "Events");
        let _ = writeln!(out, "{}", rule);
        let ordered = CoreCategory::ALL
            .iter()
            .map(|c| c.name())
            .chain(AvCategory::ALL.iter().map(|c| c.name()));
        for name in ordered {
            let count = self.counts.get(name).copied().unwrap_or(0);
            let _ = writeln!(out, "{:<28} {:>10}", name, count);
        }

        if let Some(events) = &self.events {
            let _ = writeln!(out, "\nEvents");
            let _ = writeln!(out, "{}", rule);
            for event in events {
                let friend = event
                    .friend
                    .map(|f| format!("friend {}", f))
                    .unwrap_or_else(|| "-".to_string());
                let _ = writeln!(
                    out,
                    "[{:>4}] {:<24} {:<10} {}",
                    event.batch, event.category, friend, event.detail
                );
            }
        }

        out
    }
}

/// Write the rendered report to `output`, or stdout when absent
pub fn write_report(report: &Report, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let rendered = report.render(format)?;
    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tox_dispatch::FriendNumber;

    fn sample_state(keep_events: bool) -> ReplayState {
        ReplayState::new(keep_events)
            .record("friend_message", Some(FriendNumber(4)), || "hello".into())
            .record("friend_message", Some(FriendNumber(4)), || "again".into())
            .record("call", Some(FriendNumber(2)), || "ring".into())
    }

    #[test]
    fn test_counts_cover_every_category() {
        let report = Report::new(sample_state(false), 2, 1, 0);
        assert_eq!(report.counts.len(), 21);
        assert_eq!(report.counts["friend_message"], 2);
        assert_eq!(report.counts["friend_name"], 0);
        assert_eq!(report.total_events, 3);
        assert_eq!(report.friends, vec![2, 4]);
    }

    #[test]
    fn test_json_report() {
        let report = Report::new(sample_state(false), 2, 1, 0);
        let json: serde_json::Value =
            serde_json::from_str(&report.render(OutputFormat::Json).unwrap()).unwrap();

        assert_eq!(json["core_batches"], 2);
        assert_eq!(json["counts"]["call"], 1);
        assert!(json.get("events").is_none());
        assert!(json["generated_at"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_txt_report_lists_events() {
        let report = Report::new(sample_state(true), 1, 0, 0);
        let text = report.render(OutputFormat::Txt).unwrap();

        assert!(text.contains("Total events:  3"));
        assert!(text.contains("friend 4"));
        assert!(text.contains("again"));
        let core_line = text.find("friend_message").unwrap();
        let av_line = text.find("video_receive_frame").unwrap();
        assert!(core_line < av_line);
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = Report::new(sample_state(false), 1, 1, 3);

        write_report(&report, OutputFormat::Json, Some(&path)).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"reused_frame_buffers\": 3"));
    }
}
