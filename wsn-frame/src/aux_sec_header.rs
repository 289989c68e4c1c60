//! Auxiliary Security Header.

use crate::reader::Reader;
use crate::{DecodeError, Field, Result};

/// The IEEE 802.15.4 Auxiliary Security Header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxSecurityHeader {
    /// The Security Control field.
    pub security_control: SecurityControl,
    /// The frame counter.
    pub frame_counter: u32,
    /// The key identifier, its shape follows
    /// [`SecurityControl::key_identifier_mode`].
    pub key_identifier: KeyIdentifier,
}

impl AuxSecurityHeader {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let security_control = SecurityControl::parse(reader.u8(Field::SecurityControl)?)?;
        let frame_counter = reader.u32(Field::FrameCounter)?;

        let b = reader.take(
            security_control.key_identifier_mode.key_identifier_len(),
            Field::KeyIdentifier,
        )?;

        let key_identifier = match security_control.key_identifier_mode {
            KeyIdentifierMode::Implicit => KeyIdentifier::Implicit,
            KeyIdentifierMode::Index => KeyIdentifier::Index(b[0]),
            KeyIdentifierMode::Source4 => KeyIdentifier::Source4 {
                source: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
                index: b[4],
            },
            KeyIdentifierMode::Source8 => {
                let mut source = [0u8; 8];
                source.copy_from_slice(&b[..8]);
                KeyIdentifier::Source8 {
                    source: u64::from_le_bytes(source),
                    index: b[8],
                }
            }
        };

        Ok(Self {
            security_control,
            frame_counter,
            key_identifier,
        })
    }

    /// Return the length of the header in octets.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        1 + 4 + self.key_identifier.len()
    }

    /// Write the header into `buffer` and return the number of octets written.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is shorter than [`AuxSecurityHeader::len`].
    pub fn emit(&self, buffer: &mut [u8]) -> usize {
        buffer[0] = self.security_control.bits();
        buffer[1..5].copy_from_slice(&self.frame_counter.to_le_bytes());

        let b = &mut buffer[5..];
        match self.key_identifier {
            KeyIdentifier::Implicit => {}
            KeyIdentifier::Index(index) => b[0] = index,
            KeyIdentifier::Source4 { source, index } => {
                b[..4].copy_from_slice(&source.to_le_bytes());
                b[4] = index;
            }
            KeyIdentifier::Source8 { source, index } => {
                b[..8].copy_from_slice(&source.to_le_bytes());
                b[8] = index;
            }
        }

        self.len()
    }
}

/// The Security Control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityControl {
    /// The security level.
    pub security_level: SecurityLevel,
    /// The key identifier mode.
    pub key_identifier_mode: KeyIdentifierMode,
    /// Bits 5 to 7, kept verbatim.
    pub reserved: u8,
}

impl SecurityControl {
    /// Decode the Security Control field.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidField`] when the key identifier mode is
    /// out of range.
    pub fn parse(value: u8) -> Result<Self> {
        let mode = (value >> 3) & 0b11;
        let key_identifier_mode =
            KeyIdentifierMode::from_bits(mode).ok_or(DecodeError::InvalidField {
                field: Field::KeyIdentifierMode,
                value: mode,
            })?;

        Ok(Self {
            security_level: SecurityLevel::from_bits(value),
            key_identifier_mode,
            reserved: (value >> 5) & 0b111,
        })
    }

    /// Return the raw value of the Security Control field.
    pub fn bits(&self) -> u8 {
        (self.security_level as u8 & 0b111)
            | (self.key_identifier_mode as u8 & 0b11) << 3
            | (self.reserved & 0b111) << 5
    }
}

/// A security level, the combination of confidentiality and the length of the
/// message integrity code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
    /// No security.
    None = 0,
    /// Authentication with a 32-bit MIC.
    Mic32 = 1,
    /// Authentication with a 64-bit MIC.
    Mic64 = 2,
    /// Authentication with a 128-bit MIC.
    Mic128 = 3,
    /// Encryption only.
    Enc = 4,
    /// Encryption and a 32-bit MIC.
    EncMic32 = 5,
    /// Encryption and a 64-bit MIC.
    EncMic64 = 6,
    /// Encryption and a 128-bit MIC.
    EncMic128 = 7,
}

impl SecurityLevel {
    /// Return the security level held in the 3 lower bits of `value`.
    pub fn from_bits(value: u8) -> Self {
        match value & 0b111 {
            0 => Self::None,
            1 => Self::Mic32,
            2 => Self::Mic64,
            3 => Self::Mic128,
            4 => Self::Enc,
            5 => Self::EncMic32,
            6 => Self::EncMic64,
            _ => Self::EncMic128,
        }
    }

    /// Return `true` when confidentiality is enabled.
    pub fn data_confidentiality(&self) -> bool {
        ((*self as u8) >> 2) & 0b1 == 1
    }

    /// Return `true` when authenticity is enabled.
    pub fn data_authenticity(&self) -> bool {
        self.mic_length() != 0
    }

    /// Return the MIC length.
    pub fn mic_length(&self) -> usize {
        match self {
            Self::Mic32 | Self::EncMic32 => 4,
            Self::Mic64 | Self::EncMic64 => 8,
            Self::Mic128 | Self::EncMic128 => 16,
            Self::None | Self::Enc => 0,
        }
    }
}

/// A Key Identifier Mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIdentifierMode {
    /// The key is determined implicitly.
    Implicit = 0b00,
    /// The key is determined by a 1-octet key index.
    Index = 0b01,
    /// The key is determined by a 4-octet key source and a key index.
    Source4 = 0b10,
    /// The key is determined by an 8-octet key source and a key index.
    Source8 = 0b11,
}

impl KeyIdentifierMode {
    /// Return the key identifier mode for `value`, `None` when out of range.
    pub fn from_bits(value: u8) -> Option<Self> {
        match value {
            0b00 => Some(Self::Implicit),
            0b01 => Some(Self::Index),
            0b10 => Some(Self::Source4),
            0b11 => Some(Self::Source8),
            _ => None,
        }
    }

    /// Return the length of the key identifier in octets.
    pub fn key_identifier_len(&self) -> usize {
        match self {
            Self::Implicit => 0,
            Self::Index => 1,
            Self::Source4 => 5,
            Self::Source8 => 9,
        }
    }
}

/// A Key Identifier field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIdentifier {
    /// No key identifier is transmitted.
    Implicit,
    /// A key index.
    Index(u8),
    /// A 4-octet key source and a key index.
    Source4 {
        /// The key source.
        source: u32,
        /// The key index.
        index: u8,
    },
    /// An 8-octet key source and a key index.
    Source8 {
        /// The key source.
        source: u64,
        /// The key index.
        index: u8,
    },
}

impl KeyIdentifier {
    /// Return the [`KeyIdentifierMode`] matching this key identifier.
    pub fn mode(&self) -> KeyIdentifierMode {
        match self {
            Self::Implicit => KeyIdentifierMode::Implicit,
            Self::Index(_) => KeyIdentifierMode::Index,
            Self::Source4 { .. } => KeyIdentifierMode::Source4,
            Self::Source8 { .. } => KeyIdentifierMode::Source8,
        }
    }

    /// Return the length of the key identifier in octets.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.mode().key_identifier_len()
    }

    /// Return the key index, if any.
    pub fn key_index(&self) -> Option<u8> {
        match self {
            Self::Implicit => None,
            Self::Index(index)
            | Self::Source4 { index, .. }
            | Self::Source8 { index, .. } => Some(*index),
        }
    }
}
