//! Events forwarded by the radio over the serial link.
//!
//! The byte stream is split into framing units. The first octet of a unit is
//! its tag, the remaining octets are the event payload:
//!
//! | tag    | event             |
//! |--------|-------------------|
//! | `0xff` | [`Event::Frame`]  |
//! | `0xfe` | [`Event::Info`]   |
//! | other  | [`Event::Unknown`]|

use std::io::{self, BufRead, BufReader, ErrorKind, Read};

use crate::config::Framing;

/// Tag of a frame event.
pub const EV_FRAME: u8 = 0xff;
/// Tag of an info event.
pub const EV_INFO: u8 = 0xfe;

/// An event received from the radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A received MAC frame, not yet decoded.
    Frame {
        /// The raw frame.
        raw: Vec<u8>,
    },
    /// A diagnostic message from the radio, not null-terminated.
    Info {
        /// The message text.
        text: Vec<u8>,
    },
    /// An event with an unassigned tag.
    Unknown {
        /// The tag.
        tag: u8,
        /// The octets following the tag.
        raw: Vec<u8>,
    },
}

impl Event {
    /// Build an event from a framing unit, `None` when the unit is empty.
    pub fn from_unit(mut unit: Vec<u8>) -> Option<Self> {
        if unit.is_empty() {
            return None;
        }

        let tag = unit.remove(0);
        Some(match tag {
            EV_FRAME => Event::Frame { raw: unit },
            EV_INFO => Event::Info { text: unit },
            tag => Event::Unknown { tag, raw: unit },
        })
    }

    /// Encode the event as a framing unit, the inverse of [`Event::from_unit`].
    pub fn to_unit(&self) -> Vec<u8> {
        let (tag, data) = match self {
            Event::Frame { raw } => (EV_FRAME, raw),
            Event::Info { text } => (EV_INFO, text),
            Event::Unknown { tag, raw } => (*tag, raw),
        };

        let mut unit = Vec::with_capacity(1 + data.len());
        unit.push(tag);
        unit.extend_from_slice(data);
        unit
    }
}

/// The byte source failed.
#[derive(Debug, thiserror::Error)]
#[error("transport error: {0}")]
pub struct TransportError(#[from] pub io::Error);

/// SLIP unit delimiter.
pub const SLIP_END: u8 = 0xc0;
/// SLIP escape.
pub const SLIP_ESC: u8 = 0xdb;
/// Escaped [`SLIP_END`].
pub const SLIP_ESC_END: u8 = 0xdc;
/// Escaped [`SLIP_ESC`].
pub const SLIP_ESC_ESC: u8 = 0xdd;

/// Incremental SLIP decoder.
#[derive(Debug, Default)]
pub struct SlipDecoder {
    buf: Vec<u8>,
    esc: bool,
    /// An invalid escape was seen, drop octets up to the next delimiter.
    discard: bool,
}

impl SlipDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one octet, returning the unit it completes.
    ///
    /// Empty units are never returned.
    pub fn push(&mut self, b: u8) -> Option<Vec<u8>> {
        if b == SLIP_END {
            let unit = std::mem::take(&mut self.buf);
            let discarded = std::mem::take(&mut self.discard);
            self.esc = false;
            return (!discarded && !unit.is_empty()).then_some(unit);
        }

        if self.discard {
            return None;
        }

        if self.esc {
            self.esc = false;
            match b {
                SLIP_ESC_END => self.buf.push(SLIP_END),
                SLIP_ESC_ESC => self.buf.push(SLIP_ESC),
                b => {
                    log::warn!("invalid slip escape {b:#04x}, unit discarded");
                    self.buf.clear();
                    self.discard = true;
                }
            }
            return None;
        }

        match b {
            SLIP_ESC => self.esc = true,
            b => self.buf.push(b),
        }
        None
    }

    /// Returns `true` when a unit is partially assembled.
    pub fn is_pending(&self) -> bool {
        !self.buf.is_empty() || self.esc
    }
}

/// SLIP encode a framing unit, with a delimiter on both ends.
pub fn slip_encode(unit: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(unit.len() + 2);
    out.push(SLIP_END);
    for &b in unit {
        match b {
            SLIP_END => out.extend_from_slice(&[SLIP_ESC, SLIP_ESC_END]),
            SLIP_ESC => out.extend_from_slice(&[SLIP_ESC, SLIP_ESC_ESC]),
            b => out.push(b),
        }
    }
    out.push(SLIP_END);
    out
}

/// Encode a framing unit with a one octet length prefix.
///
/// Returns `None` when the unit is longer than 255 octets.
pub fn length_prefix(unit: &[u8]) -> Option<Vec<u8>> {
    let len = u8::try_from(unit.len()).ok()?;
    let mut out = Vec::with_capacity(1 + unit.len());
    out.push(len);
    out.extend_from_slice(unit);
    Some(out)
}

/// Splits a byte stream into [`Event`]s.
///
/// The iterator ends on end-of-stream, a unit cut short by end-of-stream is
/// dropped. A read error is returned once, after which the iterator is done.
pub struct EventFramer<R: Read> {
    reader: BufReader<R>,
    framing: Framing,
    slip: SlipDecoder,
    done: bool,
}

impl<R: Read> EventFramer<R> {
    /// Create a new framer reading from `reader`.
    pub fn new(reader: R, framing: Framing) -> Self {
        Self {
            reader: BufReader::new(reader),
            framing,
            slip: SlipDecoder::new(),
            done: false,
        }
    }

    /// Return the framing in use.
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Read the next non-empty framing unit, `None` on end-of-stream.
    fn next_unit(&mut self) -> io::Result<Option<Vec<u8>>> {
        match self.framing {
            Framing::LengthPrefixed => self.next_length_prefixed(),
            Framing::Slip => self.next_slip(),
        }
    }

    fn next_length_prefixed(&mut self) -> io::Result<Option<Vec<u8>>> {
        loop {
            let mut len = [0u8; 1];
            if let Err(err) = self.reader.read_exact(&mut len) {
                return match err.kind() {
                    ErrorKind::UnexpectedEof => Ok(None),
                    _ => Err(err),
                };
            }

            if len[0] == 0 {
                log::debug!("skipping empty framing unit");
                continue;
            }

            let mut unit = vec![0u8; len[0] as usize];
            return match self.reader.read_exact(&mut unit) {
                Ok(()) => Ok(Some(unit)),
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                    log::debug!("stream ended inside a unit of {} octets", len[0]);
                    Ok(None)
                }
                Err(err) => Err(err),
            };
        }
    }

    fn next_slip(&mut self) -> io::Result<Option<Vec<u8>>> {
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };

            if available.is_empty() {
                if self.slip.is_pending() {
                    log::debug!("stream ended inside a slip unit");
                }
                return Ok(None);
            }

            let mut consumed = 0;
            let mut unit = None;
            for &b in available {
                consumed += 1;
                if let Some(u) = self.slip.push(b) {
                    unit = Some(u);
                    break;
                }
            }
            self.reader.consume(consumed);

            if unit.is_some() {
                return Ok(unit);
            }
        }
    }
}

impl<R: Read> Iterator for EventFramer<R> {
    type Item = Result<Event, TransportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.next_unit() {
                Ok(Some(unit)) => {
                    if let Some(event) = Event::from_unit(unit) {
                        return Some(Ok(event));
                    }
                }
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(TransportError(err)));
                }
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for EventFramer<R> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(data: &[u8], framing: Framing) -> Vec<Event> {
        EventFramer::new(data, framing)
            .map(|event| event.unwrap())
            .collect()
    }

    #[test]
    fn tags() {
        assert_eq!(Event::from_unit(vec![]), None);
        assert_eq!(
            Event::from_unit(vec![0xff, 0x02, 0x10, 0x01]),
            Some(Event::Frame {
                raw: vec![0x02, 0x10, 0x01]
            })
        );
        assert_eq!(
            Event::from_unit(b"\xfehello".to_vec()),
            Some(Event::Info {
                text: b"hello".to_vec()
            })
        );
        assert_eq!(
            Event::from_unit(vec![0x42, 0x01]),
            Some(Event::Unknown {
                tag: 0x42,
                raw: vec![0x01]
            })
        );
        assert_eq!(
            Event::from_unit(vec![0xff]),
            Some(Event::Frame { raw: vec![] })
        );
    }

    #[test]
    fn length_prefixed() {
        let data = [
            0x04, 0xff, 0x02, 0x10, 0x01, // frame
            0x00, // empty unit
            0x03, 0xfe, b'h', b'i', // info
            0x01, 0x07, // unknown, no payload
        ];

        assert_eq!(
            collect(&data, Framing::LengthPrefixed),
            [
                Event::Frame {
                    raw: vec![0x02, 0x10, 0x01]
                },
                Event::Info {
                    text: b"hi".to_vec()
                },
                Event::Unknown {
                    tag: 0x07,
                    raw: vec![]
                },
            ]
        );
    }

    #[test]
    fn short_unit_ends_the_stream() {
        let data = [0x03, 0xfe, b'h', b'i', 0x05, 0xff, 0x02];
        let mut framer = EventFramer::new(&data[..], Framing::LengthPrefixed);

        assert!(matches!(framer.next(), Some(Ok(Event::Info { .. }))));
        assert!(framer.next().is_none());
        assert!(framer.next().is_none());
    }

    #[test]
    fn slip() {
        let mut data = slip_encode(&[0xff, 0xc0, 0xdb, 0x01]);
        data.extend_from_slice(&[SLIP_END, SLIP_END]);
        data.extend_from_slice(&slip_encode(b"\xfeok"));

        assert_eq!(
            collect(&data, Framing::Slip),
            [
                Event::Frame {
                    raw: vec![0xc0, 0xdb, 0x01]
                },
                Event::Info {
                    text: b"ok".to_vec()
                },
            ]
        );
    }

    #[test]
    fn slip_invalid_escape() {
        let data = [
            SLIP_END, 0xff, SLIP_ESC, 0x00, 0x01, SLIP_END, // discarded
            0xfe, b'x', SLIP_END,
        ];
        assert_eq!(
            collect(&data, Framing::Slip),
            [Event::Info {
                text: b"x".to_vec()
            }]
        );
    }

    #[test]
    fn slip_partial_unit_at_end() {
        let data = [SLIP_END, 0xfe, b'a', SLIP_END, 0xff, 0x02];
        assert_eq!(
            collect(&data, Framing::Slip),
            [Event::Info {
                text: b"a".to_vec()
            }]
        );
    }

    struct Failing {
        data: Vec<u8>,
        interrupted: bool,
    }

    impl Read for Failing {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            if self.data.is_empty() {
                return Err(io::Error::new(ErrorKind::BrokenPipe, "unplugged"));
            }
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data.drain(..n);
            Ok(n)
        }
    }

    #[test]
    fn read_error_is_reported_once() {
        for framing in [Framing::LengthPrefixed, Framing::Slip] {
            let data = match framing {
                Framing::LengthPrefixed => length_prefix(b"\xfeup").unwrap(),
                Framing::Slip => slip_encode(b"\xfeup"),
            };
            let mut framer = EventFramer::new(
                Failing {
                    data,
                    interrupted: false,
                },
                framing,
            );

            assert_eq!(
                framer.next().unwrap().unwrap(),
                Event::Info {
                    text: b"up".to_vec()
                }
            );
            let err = framer.next().unwrap().unwrap_err();
            assert_eq!(err.0.kind(), ErrorKind::BrokenPipe);
            assert!(framer.next().is_none());
        }
    }

    #[test]
    fn unit_round_trip() {
        let event = Event::Unknown {
            tag: 0x10,
            raw: vec![1, 2, 3],
        };
        assert_eq!(Event::from_unit(event.to_unit()), Some(event));
        assert_eq!(length_prefix(&[0; 256]), None);
    }
}
