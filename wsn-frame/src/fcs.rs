//! Frame Check Sequence.

use crate::{decode, MacFrame};
use crate::{DecodeError, Field, Result};

/// The FCS of IEEE 802.15.4: a 16-bit ITU-T CRC using the
/// x^16 + x^12 + x^5 + 1 polynomial. Unlike most CRCs, the initial and final
/// values are both 0x0000.
const CRC_16_IEEE802154: crc::Algorithm<u16> = crc::Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0x0000,
    refin: true,
    refout: true,
    xorout: 0x0000,
    check: 0x2189,
    residue: 0x0000,
};

/// Calculate the Frame Check Sequence over `content`.
pub fn calculate_fcs(content: &[u8]) -> u16 {
    crc::Crc::<u16>::new(&CRC_16_IEEE802154).checksum(content)
}

/// A frame followed by its two octet Frame Check Sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameWithFcs<'b> {
    buffer: &'b [u8],
}

impl<'b> FrameWithFcs<'b> {
    /// Create a new [`FrameWithFcs`] over `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Truncated`] if the buffer cannot hold an FCS.
    pub fn new(buffer: &'b [u8]) -> Result<Self> {
        if buffer.len() < 2 {
            return Err(DecodeError::Truncated {
                field: Field::Fcs,
                offset: 0,
            });
        }

        Ok(Self { buffer })
    }

    /// Return the content of the frame, excluding the FCS.
    pub fn content(&self) -> &'b [u8] {
        &self.buffer[..self.buffer.len() - 2]
    }

    /// Return the Frame Check Sequence (FCS) of the frame.
    pub fn fcs(&self) -> u16 {
        let len = self.buffer.len();
        u16::from_le_bytes([self.buffer[len - 2], self.buffer[len - 1]])
    }

    /// Check the Frame Check Sequence (FCS) of the frame.
    pub fn check_fcs(&self) -> bool {
        calculate_fcs(self.content()) == self.fcs()
    }

    /// Decode the content of the frame, excluding the FCS.
    pub fn decode(&self) -> Result<MacFrame<'b>> {
        decode(self.content())
    }
}
