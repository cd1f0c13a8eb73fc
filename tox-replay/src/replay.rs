//! Replays recorded batch files through the dispatch sessions
//!
//! Each file holds the raw payload of one native iteration. An empty file
//! stands for an idle tick (the native layer returned no batch).

use crate::config::AppConfig;
use crate::events::ReplayListener;
use crate::report::Report;
use crate::state::ReplayState;
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use tox_dispatch::{AvSession, CallStateSink, CoreSession, EventSource, FriendNumber};

/// Event source backed by batch files read up front
#[derive(Debug, Default)]
pub struct BatchFiles {
    batches: VecDeque<Option<Vec<u8>>>,
}

impl BatchFiles {
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let mut batches = VecDeque::with_capacity(paths.len());
        for path in paths {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read batch file: {:?}", path))?;
            log::debug!("Loaded {:?} ({} bytes)", path, bytes.len());
            batches.push_back(if bytes.is_empty() { None } else { Some(bytes) });
        }
        Ok(Self { batches })
    }
}

impl EventSource for BatchFiles {
    fn iterate(&mut self) -> Option<Vec<u8>> {
        self.batches.pop_front().flatten()
    }

    fn kill(&mut self) {
        if !self.batches.is_empty() {
            log::debug!("Discarding {} unreplayed batch(es)", self.batches.len());
        }
        self.batches.clear();
    }
}

impl CallStateSink for BatchFiles {
    fn invoke_call_state(&mut self, friend_number: FriendNumber, call_state: u32) {
        log::debug!(
            "Recorded session has no peer, dropping call state {:#b} for friend {}",
            call_state,
            friend_number
        );
    }
}

/// Replay every configured batch and build the report
///
/// Core batches run first, then audio/video batches, sharing one threaded
/// state. `max_batches` caps the total across both.
pub fn run(config: &AppConfig) -> Result<Report> {
    let limit = config.replay.max_batches.unwrap_or(usize::MAX);
    let core_paths = &config.input.core[..config.input.core.len().min(limit)];
    let av_limit = limit - core_paths.len();
    let av_paths = &config.input.av[..config.input.av.len().min(av_limit)];

    let mut listener = ReplayListener::new(config.replay.reuse_frame_buffers);
    let mut state = ReplayState::new(config.output.include_events);

    let mut core = CoreSession::new(BatchFiles::load(core_paths)?);
    let mut av = AvSession::new(&core, BatchFiles::load(av_paths)?)?;

    for path in core_paths {
        log::debug!("Replaying core batch {:?}", path);
        state = core
            .iterate(&mut listener, state)
            .with_context(|| format!("Failed to dispatch core batch: {:?}", path))?
            .next_batch();
    }

    for path in av_paths {
        log::debug!("Replaying AV batch {:?}", path);
        state = av
            .iterate(&mut listener, state)
            .with_context(|| format!("Failed to dispatch AV batch: {:?}", path))?
            .next_batch();
    }

    core.close();
    debug_assert!(av.is_closed());

    log::info!(
        "Replayed {} core and {} AV batch(es), {} event(s)",
        core_paths.len(),
        av_paths.len(),
        state.total()
    );

    Ok(Report::new(
        state,
        core_paths.len(),
        av_paths.len(),
        listener.reused_frame_buffers(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use std::path::Path;
    use tox_dispatch::proto;

    fn write_batch(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn typing_batch(friend_number: u32) -> Vec<u8> {
        proto::CoreEvents {
            friend_typing: vec![proto::FriendTyping { friend_number, is_typing: true }],
            ..Default::default()
        }
        .encode_to_vec()
    }

    #[test]
    fn test_replay_core_and_av() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.input.core = vec![
            write_batch(dir.path(), "core-1.bin", &typing_batch(1)),
            write_batch(dir.path(), "core-2.bin", &[]),
            write_batch(dir.path(), "core-3.bin", &typing_batch(2)),
        ];
        let call = proto::AvEvents {
            call: vec![proto::Call { friend_number: 3, audio_enabled: true, video_enabled: true }],
            ..Default::default()
        };
        config.input.av = vec![write_batch(dir.path(), "av-1.bin", &call.encode_to_vec())];

        let report = run(&config).unwrap();
        assert_eq!(report.core_batches, 3);
        assert_eq!(report.av_batches, 1);
        assert_eq!(report.counts["friend_typing"], 2);
        assert_eq!(report.counts["call"], 1);
        assert_eq!(report.friends, vec![1, 2, 3]);
    }

    #[test]
    fn test_max_batches_spans_both_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.input.core = vec![
            write_batch(dir.path(), "a.bin", &typing_batch(1)),
            write_batch(dir.path(), "b.bin", &typing_batch(1)),
        ];
        config.input.av = vec![write_batch(dir.path(), "c.bin", &[])];
        config.replay.max_batches = Some(1);

        let report = run(&config).unwrap();
        assert_eq!(report.core_batches, 1);
        assert_eq!(report.av_batches, 0);
        assert_eq!(report.total_events, 1);
    }

    #[test]
    fn test_decode_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.input.core = vec![
            write_batch(dir.path(), "good.bin", &typing_batch(1)),
            write_batch(dir.path(), "broken.bin", &[0xFF, 0xFF]),
        ];

        let err = run(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.bin"));
    }
}
