// src/logging.rs
//
// Telemetry sinks for training runs.
// - EpisodeSink: trait invoked once per completed episode
// - NoopSink:    discards all records (default for lazy training)
// - FileSink:    writes one JSON line per episode for offline analysis

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One line of per-episode telemetry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Episode index, `0..num_episodes`.
    pub episode: usize,
    /// Uniformly drawn start state of the episode.
    pub start_state: usize,
    /// State reached at the final time step.
    pub final_state: usize,
    /// Sum of absolute temporal-difference errors over this episode; a
    /// coarse convergence signal.
    pub cumulative_td_error: f64,
}

/// Abstract sink for per-episode telemetry.
pub trait EpisodeSink {
    fn log_episode(&mut self, record: &EpisodeRecord);
}

/// Sink that discards all records.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EpisodeSink for NoopSink {
    fn log_episode(&mut self, _record: &EpisodeRecord) {
        // intentionally no-op
    }
}

/// JSONL file sink: each episode is a single JSON object on its own line.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create a new sink writing to `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl EpisodeSink for FileSink {
    fn log_episode(&mut self, record: &EpisodeRecord) {
        // Telemetry failures must not abort a training run, so write errors
        // are deliberately ignored.
        if let Ok(line) = serde_json::to_string(record) {
            let _ = self.writer.write_all(line.as_bytes());
            let _ = self.writer.write_all(b"\n");
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink_accepts_records() {
        let mut sink = NoopSink;
        sink.log_episode(&EpisodeRecord {
            episode: 0,
            start_state: 1,
            final_state: 2,
            cumulative_td_error: 0.5,
        });
    }

    #[test]
    fn test_record_serialization() {
        let record = EpisodeRecord {
            episode: 3,
            start_state: 0,
            final_state: 4,
            cumulative_td_error: 1.25,
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: EpisodeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.episode, 3);
        assert_eq!(parsed.final_state, 4);
        assert_eq!(parsed.cumulative_td_error, 1.25);
    }
}
