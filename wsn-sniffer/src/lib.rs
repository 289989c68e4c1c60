//! A live IEEE 802.15.4 sniffer for serial radio bridges.
//!
//! A radio forwards what it hears over a serial link as a stream of tagged
//! events. The [`EventFramer`] splits the stream into [`Event`]s, the
//! [`Sniffer`] decodes frame events with [`wsn_frame::decode`], renders them
//! with a [`FrameFormatter`] and appends the raw octets to a pcap
//! [`CaptureFile`].
//!
//! ```
//! use wsn_sniffer::{EventFramer, Framing, Sniffer, SnifferConfig};
//!
//! // An info event followed by an immediate acknowledgment.
//! let stream = [0x03, 0xfe, b'o', b'k', 0x04, 0xff, 0x02, 0x10, 0x01];
//!
//! let mut info = Vec::new();
//! let mut display = Vec::new();
//! let sniffer: Sniffer<_, _> =
//!     Sniffer::new(SnifferConfig::default(), None, &mut info, &mut display);
//! let stats = sniffer
//!     .run(EventFramer::new(&stream[..], Framing::LengthPrefixed))
//!     .unwrap();
//!
//! assert_eq!(stats.decoded, 1);
//! assert_eq!(info, b"ok");
//! ```
#![deny(unsafe_code)]

pub mod capture;
pub mod config;
pub mod display;
pub mod event;
pub mod sniffer;
pub mod source;

pub use capture::{CaptureError, CaptureFile, CaptureOptions, CaptureWriter, LinkType, Timestamp};
pub use config::{CapturePolicy, DisplayMask, Framing, SnifferConfig};
pub use display::FrameFormatter;
pub use event::{Event, EventFramer, TransportError};
pub use sniffer::{Sniffer, SnifferError, Stats};
