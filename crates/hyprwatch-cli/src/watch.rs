//! Event watch loop
//!
//! ## Architecture
//!
//! ```text
//! +----------------+      +--------+      +---------+      +----------+
//! | reader thread  | ---> | mpsc   | ---> | Watcher | ---> | JsonSink |
//! | (blocking I/O) |      | channel|      | (async) |      |          |
//! +----------------+      +--------+      +---------+      +----------+
//! ```
//!
//! Input is read on a plain OS thread because a blocking read (stdin, a pipe
//! held open by `socat`) cannot be cancelled. The watcher only ever waits on
//! the channel, so a shutdown request ends the loop immediately and the
//! reader thread dies with the process.
//!
//! A bad line is logged and skipped; only I/O failures end the loop early.
//! The loop ends on EOF or when the `shutdown` future resolves (Ctrl-C in the
//! binary).

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::{Context, Result};
use hyprwatch_events::{DecodeError, DecodedEvent, EntityFilter, LineDecoder};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::output::JsonSink;

/// Default channel buffer size between the reader thread and the watcher
pub const DEFAULT_CHANNEL_BUFFER: usize = 64;

/// Raw lines (including the trailing newline) produced by the reader thread
pub type LineReceiver = mpsc::Receiver<io::Result<Vec<u8>>>;

/// Read `reader` line by line on a dedicated thread
///
/// The thread stops at EOF, after forwarding a read error, or once the
/// receiver is dropped.
pub fn spawn_line_reader<R>(mut reader: R, buffer_size: usize) -> io::Result<LineReceiver>
where
    R: BufRead + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(buffer_size);

    thread::Builder::new()
        .name("hyprwatch-reader".into())
        .spawn(move || loop {
            let mut buf = Vec::new();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break, // EOF
                Ok(_) => {
                    if sender.blocking_send(Ok(buf)).is_err() {
                        debug!("Line receiver dropped, stopping reader thread");
                        break;
                    }
                }
                Err(e) => {
                    let _ = sender.blocking_send(Err(e));
                    break;
                }
            }
        })?;

    Ok(receiver)
}

/// Per-run line counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub forwarded: u64,
    pub filtered: u64,
    pub unsupported: u64,
    pub malformed: u64,
}

impl WatchStats {
    pub fn total(&self) -> u64 {
        self.forwarded + self.filtered + self.unsupported + self.malformed
    }
}

/// Decodes and filters single lines, keeping statistics
#[derive(Debug)]
pub struct Watcher {
    decoder: LineDecoder,
    filter: EntityFilter,
    stats: WatchStats,
}

impl Watcher {
    pub fn new(decoder: LineDecoder, filter: EntityFilter) -> Self {
        Self {
            decoder,
            filter,
            stats: WatchStats::default(),
        }
    }

    pub fn stats(&self) -> WatchStats {
        self.stats
    }

    /// Decode one raw line, returning the event if it should be forwarded
    pub fn process_line(&mut self, raw: &str) -> Option<DecodedEvent> {
        debug!(raw = raw.trim_end(), "received event");

        match self.decoder.decode_filtered(raw, &self.filter) {
            Ok(Some(event)) => {
                self.stats.forwarded += 1;
                Some(event)
            }
            Ok(None) => {
                self.stats.filtered += 1;
                debug!(
                    raw = raw.trim_end(),
                    entity = %self.filter.subscribed(),
                    "event filtered out"
                );
                None
            }
            Err(DecodeError::UnsupportedEvent { name }) => {
                self.stats.unsupported += 1;
                debug!(event = %name, "unsupported event");
                None
            }
            Err(e @ DecodeError::MalformedLine { .. }) => {
                self.stats.malformed += 1;
                warn!("{}", e);
                None
            }
        }
    }

    /// Run until the line channel closes or until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run<W, F>(
        &mut self,
        mut lines: LineReceiver,
        sink: &mut JsonSink<W>,
        shutdown: F,
    ) -> Result<WatchStats>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let buf = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping");
                    break;
                }
                received = lines.recv() => match received {
                    Some(read) => read.context("failed to read event line")?,
                    // EOF
                    None => break,
                },
            };

            // Titles are arbitrary bytes; keep the line instead of failing
            let line = String::from_utf8_lossy(&buf);
            if let Some(event) = self.process_line(&line) {
                sink.emit(&event)?;
            }
        }

        let stats = self.stats();
        info!(
            total = stats.total(),
            forwarded = stats.forwarded,
            filtered = stats.filtered,
            unsupported = stats.unsupported,
            malformed = stats.malformed,
            "Event stream ended"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyprwatch_events::Entity;
    use std::time::Duration;

    const INPUT: &[u8] = b"workspacev2>>3,web\n\
        configreloaded>>\n\
        garbage line\n\
        monitoraddedv2>>1,DP-1,Dell U2720Q\n\
        openwindow>>0x123,1,firefox,Mozilla Firefox\n\
        minimize>>0x123,notabool\n";

    async fn run_with(filter: EntityFilter, input: &'static [u8]) -> (WatchStats, String) {
        let mut watcher = Watcher::new(LineDecoder::default(), filter);
        let mut sink = JsonSink::new(Vec::new());
        let lines = spawn_line_reader(input, DEFAULT_CHANNEL_BUFFER).unwrap();

        let stats = watcher
            .run(lines, &mut sink, std::future::pending())
            .await
            .unwrap();

        (stats, String::from_utf8(sink.into_inner()).unwrap())
    }

    #[tokio::test]
    async fn test_run_forwards_all_entities() {
        let (stats, output) = run_with(EntityFilter::all(), INPUT).await;

        assert_eq!(
            stats,
            WatchStats {
                forwarded: 4,
                filtered: 0,
                unsupported: 1,
                malformed: 1,
            }
        );
        assert_eq!(stats.total(), 6);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            r#"{"event_name":"workspacev2","workspace_id":3,"workspace_name":"web"}"#
        );
        assert_eq!(
            lines[3],
            r#"{"event_name":"minimize","window_address":"0x123","window_minimized":"notabool#ERROR_BOOL"}"#
        );
    }

    #[tokio::test]
    async fn test_run_filters_by_entity() {
        let (stats, output) =
            run_with(EntityFilter::new(Entity::WORKSPACE | Entity::WINDOW), INPUT).await;

        assert_eq!(stats.forwarded, 3);
        assert_eq!(stats.filtered, 1);
        assert!(!output.contains("monitoraddedv2"));
    }

    #[tokio::test]
    async fn test_run_honours_ignore_list() {
        let filter = EntityFilter::new(Entity::WINDOW).ignoring(["minimize"]);
        let (stats, output) = run_with(filter, INPUT).await;

        assert_eq!(stats.forwarded, 1);
        assert_eq!(stats.filtered, 3);
        assert!(output.starts_with(r#"{"event_name":"openwindow""#));
    }

    #[tokio::test]
    async fn test_run_handles_missing_trailing_newline() {
        let (stats, output) = run_with(EntityFilter::all(), b"closewindow>>0xdead").await;

        assert_eq!(stats.forwarded, 1);
        assert_eq!(
            output,
            "{\"event_name\":\"closewindow\",\"window_address\":\"0xdead\"}\n"
        );
    }

    #[tokio::test]
    async fn test_run_keeps_non_utf8_titles() {
        let (stats, output) =
            run_with(EntityFilter::all(), b"openwindow>>0x1,2,kitty,caf\xe9\n").await;

        assert_eq!(stats.forwarded, 1);
        assert!(output.contains("caf\u{fffd}"));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let mut watcher = Watcher::new(LineDecoder::default(), EntityFilter::all());
        let mut sink = JsonSink::new(Vec::new());
        let lines = spawn_line_reader(INPUT, DEFAULT_CHANNEL_BUFFER).unwrap();

        let stats = watcher
            .run(lines, &mut sink, std::future::ready(()))
            .await
            .unwrap();

        assert_eq!(stats.total(), 0);
        assert!(sink.into_inner().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_while_read_is_blocked() {
        use std::os::unix::net::UnixStream;

        // The peer stays open and never writes, so the reader thread blocks
        // in read() for the whole test.
        let (local, _peer) = UnixStream::pair().unwrap();
        let lines = spawn_line_reader(io::BufReader::new(local), DEFAULT_CHANNEL_BUFFER).unwrap();

        let mut watcher = Watcher::new(LineDecoder::default(), EntityFilter::all());
        let mut sink = JsonSink::new(Vec::new());
        let shutdown = tokio::time::sleep(Duration::from_millis(50));

        let stats = tokio::time::timeout(
            Duration::from_secs(5),
            watcher.run(lines, &mut sink, shutdown),
        )
        .await
        .expect("watch loop did not stop after shutdown")
        .unwrap();

        assert_eq!(stats.total(), 0);
    }

    #[tokio::test]
    async fn test_run_stops_when_input_never_yields() {
        // Sender kept alive: the channel never produces a line nor closes
        let (_sender, lines) = mpsc::channel(1);

        let mut watcher = Watcher::new(LineDecoder::default(), EntityFilter::all());
        let mut sink = JsonSink::new(Vec::new());
        let shutdown = tokio::time::sleep(Duration::from_millis(20));

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            watcher.run(lines, &mut sink, shutdown),
        )
        .await;

        assert!(result.is_ok(), "watch loop did not stop after shutdown");
    }

    #[tokio::test]
    async fn test_read_error_ends_run() {
        let (sender, lines) = mpsc::channel(1);
        sender
            .send(Err(io::Error::new(io::ErrorKind::Other, "boom")))
            .await
            .unwrap();

        let mut watcher = Watcher::new(LineDecoder::default(), EntityFilter::all());
        let mut sink = JsonSink::new(Vec::new());

        let err = watcher
            .run(lines, &mut sink, std::future::pending())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("boom"));
    }

    #[test]
    fn test_process_line_counts() {
        let mut watcher = Watcher::new(LineDecoder::default(), EntityFilter::new(Entity::MONITOR));

        assert!(watcher.process_line("focusedmon>>DP-1,2\n").is_some());
        assert!(watcher.process_line("workspacev2>>2,2\n").is_none());
        assert!(watcher.process_line("bogusevent>>1,2\n").is_none());
        assert!(watcher.process_line("no delimiter\n").is_none());

        assert_eq!(
            watcher.stats(),
            WatchStats {
                forwarded: 1,
                filtered: 1,
                unsupported: 1,
                malformed: 1,
            }
        );
    }
}
