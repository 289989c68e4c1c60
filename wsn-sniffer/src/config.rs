//! Sniffer configuration, established once at start-up.

use crate::capture::{CaptureOptions, LinkType, DEFAULT_SNAPLEN};

bitflags::bitflags! {
    /// Selects the parts of a decoded frame that are displayed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DisplayMask: u8 {
        /// The frame control field.
        const CONTROL = 0b0001;
        /// The sequence number.
        const SEQNO = 0b0010;
        /// The addressing fields.
        const ADDR = 0b0100;
        /// The auxiliary security header.
        const SECURITY = 0b1000;
        /// Everything above.
        const ALL = Self::CONTROL.bits()
            | Self::SEQNO.bits()
            | Self::ADDR.bits()
            | Self::SECURITY.bits();
    }
}

/// How framing units are delimited on the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Framing {
    /// Every unit is preceded by a one octet length.
    #[default]
    LengthPrefixed,
    /// Units are SLIP encoded.
    Slip,
}

/// Which frames end up in the capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CapturePolicy {
    /// Capture every frame event, whether it decodes or not.
    #[default]
    Always,
    /// Capture only frames that decode.
    DecodedOnly,
}

impl CapturePolicy {
    /// Returns `true` when a frame with the given decode outcome is captured.
    pub fn should_capture(&self, decoded: bool) -> bool {
        match self {
            CapturePolicy::Always => true,
            CapturePolicy::DecodedOnly => decoded,
        }
    }
}

/// The configuration of a [`Sniffer`](crate::Sniffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnifferConfig {
    /// The parts of decoded frames to display.
    pub display: DisplayMask,
    /// Dump the payload of decoded frames.
    pub show_payload: bool,
    /// The framing of the byte stream.
    pub framing: Framing,
    /// Which frames are captured.
    pub capture_policy: CapturePolicy,
    /// Stop on the first capture failure.
    pub capture_errors_fatal: bool,
    /// Frames are followed by their FCS.
    pub fcs: bool,
    /// The snapshot length of the capture file.
    pub snaplen: u32,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            display: DisplayMask::empty(),
            show_payload: false,
            framing: Framing::default(),
            capture_policy: CapturePolicy::default(),
            capture_errors_fatal: false,
            fcs: false,
            snaplen: DEFAULT_SNAPLEN,
        }
    }
}

impl SnifferConfig {
    /// Returns `true` when nothing is displayed.
    pub fn is_silent(&self) -> bool {
        self.display.is_empty() && !self.show_payload
    }

    /// Return the options for the capture file.
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            snaplen: self.snaplen,
            link_type: if self.fcs {
                LinkType::Ieee802154WithFcs
            } else {
                LinkType::Ieee802154NoFcs
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_the_union() {
        let mask =
            DisplayMask::CONTROL | DisplayMask::SEQNO | DisplayMask::ADDR | DisplayMask::SECURITY;
        assert_eq!(mask, DisplayMask::ALL);
        assert_eq!(DisplayMask::default(), DisplayMask::empty());
    }

    #[test]
    fn capture_policy() {
        assert!(CapturePolicy::Always.should_capture(false));
        assert!(CapturePolicy::Always.should_capture(true));
        assert!(!CapturePolicy::DecodedOnly.should_capture(false));
        assert!(CapturePolicy::DecodedOnly.should_capture(true));
    }

    #[test]
    fn link_type_follows_fcs() {
        let mut config = SnifferConfig::default();
        assert!(config.is_silent());
        assert_eq!(
            config.capture_options().link_type,
            LinkType::Ieee802154NoFcs
        );

        config.fcs = true;
        assert_eq!(
            config.capture_options().link_type,
            LinkType::Ieee802154WithFcs
        );
        assert_eq!(config.capture_options().snaplen, DEFAULT_SNAPLEN);
    }
}
