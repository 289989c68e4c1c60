//! The dispatch loop.

use std::fs::File;
use std::io::{self, Write};

use wsn_frame::{decode, FrameWithFcs};

use crate::capture::{CaptureError, CaptureSink, CaptureWriter, Timestamp};
use crate::config::SnifferConfig;
use crate::display::{FcsStatus, FrameFormatter};
use crate::event::{Event, TransportError};

/// A terminal error of [`Sniffer::run`].
#[derive(Debug, thiserror::Error)]
pub enum SnifferError {
    /// The byte source failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Capturing failed with `capture_errors_fatal` set, or the capture file
    /// could not be closed.
    #[error(transparent)]
    Capture(#[from] CaptureError),
    /// Writing to the info or display sink failed.
    #[error("output error: {0}")]
    Sink(#[source] io::Error),
}

/// Counters of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    /// Events received.
    pub events: u64,
    /// Frame events received.
    pub frames: u64,
    /// Frames that decoded.
    pub decoded: u64,
    /// Frames that did not decode.
    pub decode_failures: u64,
    /// Records written to the capture file.
    pub captured: u64,
    /// Records that could not be written.
    pub capture_failures: u64,
    /// Info events received.
    pub info: u64,
    /// Events with an unknown tag.
    pub unknown: u64,
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} events, {} frames ({} decoded, {} failed), {} captured ({} failed), {} info, {} unknown",
            self.events,
            self.frames,
            self.decoded,
            self.decode_failures,
            self.captured,
            self.capture_failures,
            self.info,
            self.unknown
        )
    }
}

/// Routes events to the display, the info sink and the capture file.
///
/// `I` receives the text of info events, `D` the rendered frames.
pub struct Sniffer<I: Write, D: Write, S: CaptureSink = File> {
    config: SnifferConfig,
    formatter: FrameFormatter,
    capture: Option<CaptureWriter<S>>,
    info: I,
    display: D,
    stats: Stats,
}

impl<I: Write, D: Write, S: CaptureSink> Sniffer<I, D, S> {
    /// Create a new sniffer.
    pub fn new(
        config: SnifferConfig,
        capture: Option<CaptureWriter<S>>,
        info: I,
        display: D,
    ) -> Self {
        Self {
            formatter: FrameFormatter::new(config.display).with_payload(config.show_payload),
            config,
            capture,
            info,
            display,
            stats: Stats::default(),
        }
    }

    /// Dispatch `events` until the sequence ends or a fatal error occurs.
    ///
    /// The capture file is closed before returning, whatever the outcome.
    pub fn run<E>(mut self, events: E) -> Result<Stats, SnifferError>
    where
        E: IntoIterator<Item = Result<Event, TransportError>>,
    {
        let outcome = self.dispatch(events);

        let closed = match self.capture.as_mut() {
            Some(capture) => capture.close(),
            None => Ok(()),
        };

        match (outcome, closed) {
            (Err(err), closed) => {
                if let Err(close_err) = closed {
                    log::error!("cannot close capture file: {close_err}");
                }
                log::error!("sniffer stopped: {err}");
                Err(err)
            }
            (Ok(()), Err(err)) => Err(err.into()),
            (Ok(()), Ok(())) => {
                log::info!("{}", self.stats);
                Ok(self.stats)
            }
        }
    }

    fn dispatch<E>(&mut self, events: E) -> Result<(), SnifferError>
    where
        E: IntoIterator<Item = Result<Event, TransportError>>,
    {
        for event in events {
            let event = event?;
            self.stats.events += 1;

            match event {
                Event::Frame { raw } => self.on_frame(&raw)?,
                Event::Info { text } => self.on_info(&text)?,
                Event::Unknown { tag, raw } => self.on_unknown(tag, &raw),
            }

            self.display.write_all(b"\n").map_err(SnifferError::Sink)?;
        }

        Ok(())
    }

    fn on_frame(&mut self, raw: &[u8]) -> Result<(), SnifferError> {
        let timestamp = Timestamp::now();
        self.stats.frames += 1;

        let decoded = if self.config.fcs {
            FrameWithFcs::new(raw).and_then(|frame| {
                let decoded = frame.decode()?;
                Ok(self
                    .formatter
                    .format_with_fcs(&decoded, FcsStatus::from(&frame)))
            })
        } else {
            decode(raw).map(|frame| self.formatter.format(&frame))
        };

        let rendered = match decoded {
            Ok(rendered) => {
                self.stats.decoded += 1;
                Some(rendered)
            }
            Err(err) => {
                self.stats.decode_failures += 1;
                log::warn!("cannot decode frame: {err}");
                log::debug!("frame: {}", hex::encode(raw));
                None
            }
        };

        // The record is saved before the display can fail.
        if self.config.capture_policy.should_capture(rendered.is_some()) {
            self.save_frame(raw, timestamp)?;
        }

        match rendered {
            Some(rendered) => self
                .display
                .write_all(rendered.as_bytes())
                .and_then(|_| self.display.flush())
                .map_err(SnifferError::Sink),
            None => Ok(()),
        }
    }

    fn save_frame(&mut self, raw: &[u8], timestamp: Timestamp) -> Result<(), SnifferError> {
        let Some(capture) = self.capture.as_mut() else {
            return Ok(());
        };

        match capture.append(raw, timestamp) {
            Ok(()) => {
                self.stats.captured += 1;
                Ok(())
            }
            Err(err) if self.config.capture_errors_fatal => {
                self.stats.capture_failures += 1;
                Err(err.into())
            }
            Err(err) => {
                self.stats.capture_failures += 1;
                log::warn!("cannot capture frame: {err}");
                Ok(())
            }
        }
    }

    fn on_info(&mut self, text: &[u8]) -> Result<(), SnifferError> {
        self.stats.info += 1;
        self.info
            .write_all(text)
            .and_then(|_| self.info.flush())
            .map_err(SnifferError::Sink)
    }

    fn on_unknown(&mut self, tag: u8, raw: &[u8]) {
        self.stats.unknown += 1;
        log::warn!("invalid event {tag:#04x} ignored ({} octets)", raw.len());
        log::debug!("event: {}", hex::encode(raw));
    }
}
