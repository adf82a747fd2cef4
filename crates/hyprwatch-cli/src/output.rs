//! JSON sink for decoded events

use std::io::Write;

use anyhow::{Context, Result};
use hyprwatch_events::DecodedEvent;

/// Writes one JSON object per event, one event per line
///
/// The writer is flushed after every event so consumers reading from a pipe
/// see events as they happen.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn emit(&mut self, event: &DecodedEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)
            .with_context(|| format!("failed to serialize event {}", event.event_name()))?;
        self.writer
            .write_all(b"\n")
            .context("failed to write event")?;
        self.writer.flush().context("failed to flush output")?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyprwatch_events::LineDecoder;

    #[test]
    fn test_emit_writes_json_lines() {
        let decoder = LineDecoder::default();
        let mut sink = JsonSink::new(Vec::new());

        sink.emit(&decoder.decode("workspacev2>>3,web\n").unwrap())
            .unwrap();
        sink.emit(&decoder.decode("fullscreen>>1\n").unwrap()).unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            output,
            "{\"event_name\":\"workspacev2\",\"workspace_id\":3,\"workspace_name\":\"web\"}\n\
             {\"event_name\":\"fullscreen\",\"window_fullscreened\":true}\n"
        );
    }

    #[test]
    fn test_emit_escapes_titles() {
        let decoder = LineDecoder::default();
        let mut sink = JsonSink::new(Vec::new());

        sink.emit(
            &decoder
                .decode("openwindow>>0x1,2,kitty,say \"hi\"\n")
                .unwrap(),
        )
        .unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(value["window_title"], "say \"hi\"");
    }
}
