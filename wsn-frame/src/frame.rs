//! Decoded IEEE 802.15.4 MAC frames.

use crate::reader::Reader;
use crate::{Address, AddressingMode, AuxSecurityHeader, FrameControl, FrameType};
use crate::{Field, Result};

/// A decoded IEEE 802.15.4 MAC frame.
///
/// The payload is borrowed from the buffer the frame was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacFrame<'p> {
    /// The frame control field.
    pub control: FrameControl,
    /// The sequence number.
    pub sequence: Option<u8>,
    /// The destination PAN identifier.
    pub dst_pan: Option<u16>,
    /// The destination address.
    pub dst_addr: Option<Address>,
    /// The source PAN identifier. Equal to the destination PAN identifier when
    /// PAN ID compression is in effect.
    pub src_pan: Option<u16>,
    /// The source address.
    pub src_addr: Option<Address>,
    /// The auxiliary security header.
    pub security: Option<AuxSecurityHeader>,
    /// The MAC payload, not interpreted.
    pub payload: &'p [u8],
}

/// Decode an IEEE 802.15.4 MAC frame.
///
/// # Errors
///
/// Returns [`DecodeError::Truncated`] when the buffer ends before a field
/// announced by the already decoded fields, and [`DecodeError::InvalidField`]
/// when a field holds a reserved value.
///
/// [`DecodeError::Truncated`]: crate::DecodeError::Truncated
/// [`DecodeError::InvalidField`]: crate::DecodeError::InvalidField
pub fn decode(raw: &[u8]) -> Result<MacFrame<'_>> {
    let mut reader = Reader::new(raw);

    let control = FrameControl::parse(reader.u16(Field::FrameControl)?)?;
    let sequence = Some(reader.u8(Field::SequenceNumber)?);

    let (dst_pan, dst_addr) = match control.dst_addressing_mode {
        AddressingMode::Absent => (None, None),
        mode => {
            let pan = reader.u16(Field::DstPanId)?;
            let addr = read_address(&mut reader, mode, Field::DstAddress)?;
            (Some(pan), Some(addr))
        }
    };

    let (src_pan, src_addr) = match control.src_addressing_mode {
        AddressingMode::Absent => (None, None),
        mode => {
            let pan = if control.pan_id_compressed() {
                dst_pan
            } else {
                Some(reader.u16(Field::SrcPanId)?)
            };
            let addr = read_address(&mut reader, mode, Field::SrcAddress)?;
            (pan, Some(addr))
        }
    };

    let security = if control.security_enabled {
        Some(AuxSecurityHeader::parse(&mut reader)?)
    } else {
        None
    };

    Ok(MacFrame {
        control,
        sequence,
        dst_pan,
        dst_addr,
        src_pan,
        src_addr,
        security,
        payload: reader.rest(),
    })
}

fn read_address(reader: &mut Reader<'_>, mode: AddressingMode, field: Field) -> Result<Address> {
    match mode {
        AddressingMode::Extended => Ok(Address::Extended(reader.u64(field)?)),
        _ => Ok(Address::Short(reader.u16(field)?)),
    }
}

impl<'p> MacFrame<'p> {
    /// Return the frame type.
    pub fn frame_type(&self) -> FrameType {
        self.control.frame_type
    }

    /// Return the length of the payload in octets.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Return the length of the MAC header in octets.
    pub fn header_len(&self) -> usize {
        let mut len = 2;

        if self.sequence.is_some() {
            len += 1;
        }

        if self.dst_addr.is_some() {
            len += 2 + self.control.dst_addressing_mode.size();
        }

        if self.src_addr.is_some() {
            if !self.control.pan_id_compressed() {
                len += 2;
            }
            len += self.control.src_addressing_mode.size();
        }

        if let Some(security) = &self.security {
            len += security.len();
        }

        len
    }

    /// Return the length of the frame when emitted into a buffer.
    pub fn buffer_len(&self) -> usize {
        self.header_len() + self.payload.len()
    }

    /// Emit the frame into a buffer and return the number of octets written.
    ///
    /// The fields are written as announced by [`MacFrame::control`]; build the
    /// frame with [`FrameBuilder`] to keep both consistent.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is shorter than [`MacFrame::buffer_len`].
    ///
    /// [`FrameBuilder`]: crate::FrameBuilder
    pub fn emit(&self, buffer: &mut [u8]) -> usize {
        buffer[..2].copy_from_slice(&self.control.bits().to_le_bytes());
        let mut offset = 2;

        if let Some(sequence) = self.sequence {
            buffer[offset] = sequence;
            offset += 1;
        }

        if let Some(addr) = self.dst_addr {
            let pan = self.dst_pan.unwrap_or(0xffff);
            buffer[offset..][..2].copy_from_slice(&pan.to_le_bytes());
            offset += 2;

            addr.emit(&mut buffer[offset..]);
            offset += addr.len();
        }

        if let Some(addr) = self.src_addr {
            if !self.control.pan_id_compressed() {
                let pan = self.src_pan.unwrap_or(0xffff);
                buffer[offset..][..2].copy_from_slice(&pan.to_le_bytes());
                offset += 2;
            }

            addr.emit(&mut buffer[offset..]);
            offset += addr.len();
        }

        if let Some(security) = &self.security {
            offset += security.emit(&mut buffer[offset..]);
        }

        buffer[offset..][..self.payload.len()].copy_from_slice(self.payload);
        offset + self.payload.len()
    }
}
