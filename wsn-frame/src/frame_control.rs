//! IEEE 802.15.4 Frame Control field.

use crate::AddressingMode;
use crate::{DecodeError, Field, Result};

/// IEEE 802.15.4 frame type.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum FrameType {
    /// A beacon frame.
    Beacon = 0b000,
    /// A data frame.
    Data = 0b001,
    /// An acknowledgment frame.
    Ack = 0b010,
    /// A MAC command frame.
    MacCommand = 0b011,
}

impl FrameType {
    /// Return the frame type for the 3 bit `value`, `None` when reserved.
    pub fn from_bits(value: u8) -> Option<Self> {
        match value {
            0b000 => Some(Self::Beacon),
            0b001 => Some(Self::Data),
            0b010 => Some(Self::Ack),
            0b011 => Some(Self::MacCommand),
            _ => None,
        }
    }
}

/// IEEE 802.15.4 frame version.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum FrameVersion {
    /// IEEE 802.15.4-2003.
    Ieee802154_2003 = 0b00,
    /// IEEE 802.15.4-2006.
    Ieee802154_2006 = 0b01,
    /// IEEE 802.15.4-2015 and later.
    ///
    /// Only 2015 frames laid out like 2006 frames are decoded. Sequence
    /// number suppression and information elements (bits 8 and 9 of the
    /// Frame Control field) are rejected.
    Ieee802154_2015 = 0b10,
}

impl FrameVersion {
    /// Return the frame version for the 2 bit `value`, `None` when reserved.
    pub fn from_bits(value: u8) -> Option<Self> {
        match value {
            0b00 => Some(Self::Ieee802154_2003),
            0b01 => Some(Self::Ieee802154_2006),
            0b10 => Some(Self::Ieee802154_2015),
            _ => None,
        }
    }
}

/// The decoded IEEE 802.15.4 Frame Control field.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct FrameControl {
    /// Frame type.
    pub frame_type: FrameType,
    /// Security enabled.
    pub security_enabled: bool,
    /// Frame pending.
    pub frame_pending: bool,
    /// Acknowledgment request.
    pub ack_request: bool,
    /// PAN ID compression.
    pub pan_id_compression: bool,
    /// Bits 7 to 9, kept verbatim. Bits 8 and 9 are always clear in a 2015
    /// frame.
    pub reserved: u8,
    /// Destination addressing mode.
    pub dst_addressing_mode: AddressingMode,
    /// Frame version.
    pub frame_version: FrameVersion,
    /// Source addressing mode.
    pub src_addressing_mode: AddressingMode,
}

impl FrameControl {
    /// Decode the Frame Control field from its little-endian integer value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidField`] when the frame type, the frame
    /// version or one of the addressing modes holds a reserved value. A 2015
    /// frame with bit 8 or 9 set fails on [`Field::FrameControl`] with the
    /// value of those two bits.
    pub fn parse(raw: u16) -> Result<Self> {
        let bits = |shift: u16, mask: u16| ((raw >> shift) & mask) as u8;
        let flag = |shift: u16| (raw >> shift) & 0b1 == 1;

        let frame_type = bits(0, 0b111);
        let frame_type = FrameType::from_bits(frame_type).ok_or(DecodeError::InvalidField {
            field: Field::FrameType,
            value: frame_type,
        })?;

        let dst_mode = bits(10, 0b11);
        let dst_addressing_mode =
            AddressingMode::from_bits(dst_mode).ok_or(DecodeError::InvalidField {
                field: Field::DstAddressingMode,
                value: dst_mode,
            })?;

        let version = bits(12, 0b11);
        let frame_version = FrameVersion::from_bits(version).ok_or(DecodeError::InvalidField {
            field: Field::FrameVersion,
            value: version,
        })?;

        let extended = bits(8, 0b11);
        if frame_version == FrameVersion::Ieee802154_2015 && extended != 0 {
            return Err(DecodeError::InvalidField {
                field: Field::FrameControl,
                value: extended,
            });
        }

        let src_mode = bits(14, 0b11);
        let src_addressing_mode =
            AddressingMode::from_bits(src_mode).ok_or(DecodeError::InvalidField {
                field: Field::SrcAddressingMode,
                value: src_mode,
            })?;

        Ok(Self {
            frame_type,
            security_enabled: flag(3),
            frame_pending: flag(4),
            ack_request: flag(5),
            pan_id_compression: flag(6),
            reserved: bits(7, 0b111),
            dst_addressing_mode,
            frame_version,
            src_addressing_mode,
        })
    }

    /// Return the little-endian integer value of the Frame Control field.
    pub fn bits(&self) -> u16 {
        (self.frame_type as u16 & 0b111)
            | (self.security_enabled as u16) << 3
            | (self.frame_pending as u16) << 4
            | (self.ack_request as u16) << 5
            | (self.pan_id_compression as u16) << 6
            | (self.reserved as u16 & 0b111) << 7
            | (self.dst_addressing_mode as u16 & 0b11) << 10
            | (self.frame_version as u16 & 0b11) << 12
            | (self.src_addressing_mode as u16 & 0b11) << 14
    }

    /// Returns `true` when a single PAN identifier is shared between the
    /// destination and the source.
    ///
    /// The compression flag only has an effect when both addresses are
    /// present.
    pub fn pan_id_compressed(&self) -> bool {
        self.pan_id_compression
            && self.dst_addressing_mode != AddressingMode::Absent
            && self.src_addressing_mode != AddressingMode::Absent
    }
}

impl core::fmt::Display for FrameControl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Frame Control")?;
        writeln!(f, "  type: {:?}", self.frame_type)?;
        writeln!(f, "  security enabled: {}", self.security_enabled as usize)?;
        writeln!(f, "  frame pending: {}", self.frame_pending as usize)?;
        writeln!(f, "  ack request: {}", self.ack_request as usize)?;
        writeln!(f, "  pan id compression: {}", self.pan_id_compression as usize)?;
        writeln!(f, "  dst addressing mode: {:?}", self.dst_addressing_mode)?;
        writeln!(f, "  src addressing mode: {:?}", self.src_addressing_mode)?;
        writeln!(f, "  frame version: {:?}", self.frame_version)?;
        Ok(())
    }
}
