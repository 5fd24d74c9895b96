//! Frame callback that writes snapshots as newline-delimited JSON.

use std::io::Write;

use lumen_core::engine::SweepReport;
use lumen_core::runner::FrameCallback;
use lumen_types::FrameSnapshot;
use tracing::{debug, warn};

/// Writes one JSON line per emitted frame.
///
/// Every `every`-th frame is written, plus any frame on which the counter
/// animation finished. The first write error is logged and all later
/// output is dropped, so a closed pipe never stops the engine.
pub struct JsonLinesSink<W> {
    writer: W,
    every: u64,
    written: u64,
    failed: bool,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Create a sink emitting one of every `every` frames (0 is treated as 1).
    pub fn new(writer: W, every: u64) -> Self {
        Self {
            writer,
            every: every.max(1),
            written: 0,
            failed: false,
        }
    }

    /// Number of lines written so far.
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_line(&mut self, snapshot: &FrameSnapshot) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, snapshot)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write + Send> FrameCallback for JsonLinesSink<W> {
    fn on_frame(&mut self, frame: u64, report: &SweepReport, snapshot: &FrameSnapshot) {
        if self.failed {
            return;
        }
        let due = frame.checked_rem(self.every) == Some(0) || report.counter_finished;
        if !due {
            return;
        }

        match self.write_line(snapshot) {
            Ok(()) => {
                self.written = self.written.saturating_add(1);
                debug!(frame, at_ms = snapshot.at_ms, "frame written");
            }
            Err(e) => {
                warn!(frame, error = %e, "frame output failed, dropping further frames");
                self.failed = true;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use lumen_core::clock::Timestamp;
    use lumen_core::config::EffectsConfig;
    use lumen_core::engine::EffectsEngine;

    use super::*;

    fn snapshot(at: u64) -> FrameSnapshot {
        let mut engine = EffectsEngine::new(EffectsConfig::default()).unwrap();
        engine.start(Timestamp::ZERO).unwrap();
        engine.snapshot(Timestamp::from_millis(at))
    }

    #[test]
    fn writes_every_nth_frame_as_json_lines() {
        let mut sink = JsonLinesSink::new(Vec::new(), 2);
        for frame in 1..=5 {
            sink.on_frame(frame, &SweepReport::default(), &snapshot(frame * 16));
        }
        assert_eq!(sink.written(), 2);

        let output = String::from_utf8(sink.finish().unwrap()).unwrap();
        let lines: Vec<FrameSnapshot> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let times: Vec<u64> = lines.iter().map(|s| s.at_ms).collect();
        assert_eq!(times, vec![32, 64]);
    }

    #[test]
    fn counter_finish_is_always_written() {
        let mut sink = JsonLinesSink::new(Vec::new(), 100);
        let report = SweepReport {
            counter_ticks: 1,
            counter_finished: true,
            ..SweepReport::default()
        };
        sink.on_frame(7, &report, &snapshot(112));
        assert_eq!(sink.written(), 1);
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_stops_output_quietly() {
        let mut sink = JsonLinesSink::new(Broken, 1);
        sink.on_frame(1, &SweepReport::default(), &snapshot(16));
        sink.on_frame(2, &SweepReport::default(), &snapshot(32));
        assert_eq!(sink.written(), 0);
    }
}
