//! Building IEEE 802.15.4 MAC frames.

use crate::{Address, AddressingMode, AuxSecurityHeader, FrameControl, FrameType, FrameVersion};
use crate::MacFrame;

/// A helper for building IEEE 802.15.4 frames.
///
/// The addressing modes, the security enabled flag and PAN ID compression of
/// the frame control field are derived from the fields that were set.
pub struct FrameBuilder<'p> {
    frame: MacFrame<'p>,
}

impl<'p> FrameBuilder<'p> {
    /// Create a new builder for a frame of the given type.
    pub fn new(frame_type: FrameType) -> Self {
        Self {
            frame: MacFrame {
                control: FrameControl {
                    frame_type,
                    security_enabled: false,
                    frame_pending: false,
                    ack_request: false,
                    pan_id_compression: false,
                    reserved: 0,
                    dst_addressing_mode: AddressingMode::Absent,
                    frame_version: FrameVersion::Ieee802154_2006,
                    src_addressing_mode: AddressingMode::Absent,
                },
                sequence: Some(0),
                dst_pan: None,
                dst_addr: None,
                src_pan: None,
                src_addr: None,
                security: None,
                payload: &[],
            },
        }
    }

    /// Create a new builder for an acknowledgment frame.
    pub fn new_ack(sequence_number: u8) -> Self {
        Self::new(FrameType::Ack).set_sequence_number(sequence_number)
    }

    /// Create a new builder for a beacon frame.
    pub fn new_beacon(payload: &'p [u8]) -> Self {
        Self::new(FrameType::Beacon).set_payload(payload)
    }

    /// Create a new builder for a data frame.
    pub fn new_data(payload: &'p [u8]) -> Self {
        Self::new(FrameType::Data).set_payload(payload)
    }

    /// Create a new builder for a MAC command frame.
    pub fn new_mac_command(payload: &'p [u8]) -> Self {
        Self::new(FrameType::MacCommand).set_payload(payload)
    }

    /// Set the sequence number.
    pub fn set_sequence_number(mut self, sequence_number: u8) -> Self {
        self.frame.sequence = Some(sequence_number);
        self
    }

    /// Set the destination PAN identifier and address.
    pub fn set_dst(mut self, pan_id: u16, address: Address) -> Self {
        self.frame.dst_pan = Some(pan_id);
        self.frame.dst_addr = Some(address);
        self
    }

    /// Set the source PAN identifier and address.
    pub fn set_src(mut self, pan_id: u16, address: Address) -> Self {
        self.frame.src_pan = Some(pan_id);
        self.frame.src_addr = Some(address);
        self
    }

    /// Set the frame pending flag.
    pub fn set_frame_pending(mut self, frame_pending: bool) -> Self {
        self.frame.control.frame_pending = frame_pending;
        self
    }

    /// Set the acknowledgment request flag.
    pub fn set_ack_request(mut self, ack_request: bool) -> Self {
        self.frame.control.ack_request = ack_request;
        self
    }

    /// Set the frame version.
    pub fn set_frame_version(mut self, frame_version: FrameVersion) -> Self {
        self.frame.control.frame_version = frame_version;
        self
    }

    /// Set the auxiliary security header.
    pub fn set_security(mut self, security: AuxSecurityHeader) -> Self {
        self.frame.security = Some(security);
        self
    }

    /// Set the payload.
    pub fn set_payload(mut self, payload: &'p [u8]) -> Self {
        self.frame.payload = payload;
        self
    }

    /// Finalize the frame.
    ///
    /// PAN ID compression is used when both addresses are present and share
    /// the same PAN identifier.
    pub fn finalize(mut self) -> MacFrame<'p> {
        let fc = &mut self.frame.control;

        fc.dst_addressing_mode = AddressingMode::from(self.frame.dst_addr);
        fc.src_addressing_mode = AddressingMode::from(self.frame.src_addr);
        fc.security_enabled = self.frame.security.is_some();
        fc.pan_id_compression = matches!(
            (self.frame.dst_pan, self.frame.src_pan),
            (Some(dst), Some(src)) if dst == src
        );

        self.frame
    }
}
