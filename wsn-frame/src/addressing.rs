//! Addressing fields.

/// An IEEE 802.15.4 address.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Address {
    /// A 16-bit short address.
    Short(u16),
    /// A 64-bit extended address.
    Extended(u64),
}

impl Address {
    /// The broadcast address.
    pub const BROADCAST: Address = Address::Short(0xffff);

    /// Query whether the address is an unicast address.
    pub fn is_unicast(&self) -> bool {
        !self.is_broadcast()
    }

    /// Query whether this address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Return the [`AddressingMode`] that selects this kind of address.
    pub fn mode(&self) -> AddressingMode {
        match self {
            Address::Short(_) => AddressingMode::Short,
            Address::Extended(_) => AddressingMode::Extended,
        }
    }

    /// Return the length of the address in octets.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.mode().size()
    }

    /// Write the address in transmission order (little-endian) into `buffer`.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is shorter than [`Address::len`].
    pub fn emit(&self, buffer: &mut [u8]) {
        match self {
            Address::Short(value) => buffer[..2].copy_from_slice(&value.to_le_bytes()),
            Address::Extended(value) => buffer[..8].copy_from_slice(&value.to_le_bytes()),
        }
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Address::Short(value) => {
                let b = value.to_be_bytes();
                write!(f, "{:02x}:{:02x}", b[0], b[1])
            }
            Address::Extended(value) => {
                let b = value.to_be_bytes();
                write!(
                    f,
                    "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                    b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]
                )
            }
        }
    }
}

/// IEEE 802.15.4 addressing mode.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum AddressingMode {
    /// No PAN identifier and no address.
    Absent = 0b00,
    /// A 16-bit short address.
    Short = 0b10,
    /// A 64-bit extended address.
    Extended = 0b11,
}

impl AddressingMode {
    /// Return the addressing mode for the 2 bit `value`, `None` when reserved.
    pub fn from_bits(value: u8) -> Option<Self> {
        match value {
            0b00 => Some(Self::Absent),
            0b10 => Some(Self::Short),
            0b11 => Some(Self::Extended),
            _ => None,
        }
    }

    /// Return the size of the address in octets.
    pub fn size(&self) -> usize {
        match self {
            Self::Absent => 0,
            Self::Short => 2,
            Self::Extended => 8,
        }
    }
}

impl From<Option<Address>> for AddressingMode {
    fn from(value: Option<Address>) -> Self {
        value.map_or(AddressingMode::Absent, |addr| addr.mode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_broadcast() {
        assert!(Address::BROADCAST.is_broadcast());
        assert!(Address::Short(0xffff).is_broadcast());
        assert!(!Address::Short(0xfeff).is_broadcast());
        assert!(!Address::Extended(0xffff).is_broadcast());

        assert!(!Address::BROADCAST.is_unicast());
        assert!(Address::Short(0xfeff).is_unicast());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Address::Short(0xabcd)), "ab:cd");
        assert_eq!(
            format!("{}", Address::Extended(0x0012_4b00_14b5_d9c7)),
            "00:12:4b:00:14:b5:d9:c7"
        );
    }

    #[test]
    fn emit() {
        let mut buffer = [0u8; 8];
        Address::Short(0xabcd).emit(&mut buffer);
        assert_eq!(buffer[..2], [0xcd, 0xab]);

        Address::Extended(0x0012_4b00_14b5_d9c7).emit(&mut buffer);
        assert_eq!(buffer, [0xc7, 0xd9, 0xb5, 0x14, 0x00, 0x4b, 0x12, 0x00]);
    }

    #[test]
    fn modes() {
        assert_eq!(AddressingMode::from_bits(0b00), Some(AddressingMode::Absent));
        assert_eq!(AddressingMode::from_bits(0b01), None);
        assert_eq!(AddressingMode::from_bits(0b10), Some(AddressingMode::Short));
        assert_eq!(AddressingMode::from_bits(0b11), Some(AddressingMode::Extended));
        assert_eq!(AddressingMode::from(None), AddressingMode::Absent);
        assert_eq!(
            AddressingMode::from(Some(Address::Extended(1))),
            AddressingMode::Extended
        );
    }
}
