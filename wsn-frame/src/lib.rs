//! Bounds-checked decoding of IEEE 802.15.4 MAC frames.
//!
//! The crate turns a raw byte slice, as it arrives from a radio, into a
//! [`MacFrame`]. Decoding never panics and never reads past the end of the
//! input: every field is length checked before it is consumed, and a failure
//! reports which field did not fit (or which field carried a reserved value).
//!
//! A decoded frame contains:
//! - [`control`]: the [`FrameControl`] field.
//! - [`sequence`]: the sequence number.
//! - [`dst_pan`], [`dst_addr`], [`src_pan`], [`src_addr`]: the addressing
//!   fields, absent when the matching [`AddressingMode`] is
//!   [`AddressingMode::Absent`].
//! - [`security`]: the [`AuxSecurityHeader`], when security is enabled.
//! - [`payload`]: the remaining octets, borrowed from the input.
//!
//! ## Reading a frame
//! ```
//! # use wsn_frame::{decode, Address, AddressingMode, FrameType};
//! let raw = [
//!     0x41, 0xd8, 0x01, 0xcd, 0xab, 0xff, 0xff, 0xc7, 0xd9, 0xb5, 0x14, 0x00, 0x4b, 0x12, 0x00,
//!     0x2b, 0x00, 0x00, 0x00,
//! ];
//! let frame = decode(&raw).unwrap();
//!
//! assert_eq!(frame.control.frame_type, FrameType::Data);
//! assert_eq!(frame.control.src_addressing_mode, AddressingMode::Extended);
//! assert_eq!(frame.dst_addr, Some(Address::BROADCAST));
//! assert_eq!(frame.src_addr, Some(Address::Extended(0x0012_4b00_14b5_d9c7)));
//! assert_eq!(frame.payload, &[0x2b, 0x00, 0x00, 0x00]);
//! ```
//!
//! ## Writing a frame
//!
//! [`FrameBuilder`] builds a [`MacFrame`] whose frame control is consistent
//! with its fields, [`MacFrame::emit`] serialises it.
//! ```
//! # use wsn_frame::{decode, Address, FrameBuilder};
//! let frame = FrameBuilder::new_data(&[0x2b, 0x00, 0x00, 0x00])
//!     .set_sequence_number(1)
//!     .set_dst(0xabcd, Address::BROADCAST)
//!     .set_src(0xabcd, Address::Short(0x0001))
//!     .finalize();
//!
//! let mut buffer = vec![0; frame.buffer_len()];
//! frame.emit(&mut buffer);
//!
//! assert_eq!(decode(&buffer).unwrap(), frame);
//! ```
//!
//! [`control`]: MacFrame::control
//! [`sequence`]: MacFrame::sequence
//! [`dst_pan`]: MacFrame::dst_pan
//! [`dst_addr`]: MacFrame::dst_addr
//! [`src_pan`]: MacFrame::src_pan
//! [`src_addr`]: MacFrame::src_addr
//! [`security`]: MacFrame::security
//! [`payload`]: MacFrame::payload
#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(test)]
mod tests;

mod reader;

mod frame_control;
pub use frame_control::*;

mod addressing;
pub use addressing::*;

mod aux_sec_header;
pub use aux_sec_header::*;

mod fcs;
pub use fcs::*;

mod frame;
pub use frame::*;

mod builder;
pub use builder::FrameBuilder;

/// A field of an IEEE 802.15.4 MAC header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The two octet Frame Control field.
    FrameControl,
    /// The frame type bits of the Frame Control field.
    FrameType,
    /// The frame version bits of the Frame Control field.
    FrameVersion,
    /// The destination addressing mode bits of the Frame Control field.
    DstAddressingMode,
    /// The source addressing mode bits of the Frame Control field.
    SrcAddressingMode,
    /// The sequence number.
    SequenceNumber,
    /// The destination PAN identifier.
    DstPanId,
    /// The destination address.
    DstAddress,
    /// The source PAN identifier.
    SrcPanId,
    /// The source address.
    SrcAddress,
    /// The Security Control field of the Auxiliary Security Header.
    SecurityControl,
    /// The key identifier mode bits of the Security Control field.
    KeyIdentifierMode,
    /// The frame counter of the Auxiliary Security Header.
    FrameCounter,
    /// The key identifier of the Auxiliary Security Header.
    KeyIdentifier,
    /// The Frame Check Sequence.
    Fcs,
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Field::FrameControl => "frame control",
            Field::FrameType => "frame type",
            Field::FrameVersion => "frame version",
            Field::DstAddressingMode => "dst addressing mode",
            Field::SrcAddressingMode => "src addressing mode",
            Field::SequenceNumber => "sequence number",
            Field::DstPanId => "dst pan id",
            Field::DstAddress => "dst address",
            Field::SrcPanId => "src pan id",
            Field::SrcAddress => "src address",
            Field::SecurityControl => "security control",
            Field::KeyIdentifierMode => "key identifier mode",
            Field::FrameCounter => "frame counter",
            Field::KeyIdentifier => "key identifier",
            Field::Fcs => "fcs",
        };
        f.write_str(name)
    }
}

/// An error that can occur when decoding an IEEE 802.15.4 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer ended before `field`, which starts at `offset`.
    #[error("truncated {field} at offset {offset}")]
    Truncated {
        /// The field that did not fit.
        field: Field,
        /// The offset at which the field starts.
        offset: usize,
    },
    /// `field` holds a reserved or undefined value.
    #[error("invalid {field}: {value:#04x}")]
    InvalidField {
        /// The offending field.
        field: Field,
        /// The raw value of the field.
        value: u8,
    },
}

/// A type alias for `Result<T, DecodeError>`.
pub type Result<T> = core::result::Result<T, DecodeError>;
