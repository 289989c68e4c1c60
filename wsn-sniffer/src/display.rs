//! Human readable rendering of decoded frames.

use colored::*;
use wsn_frame::*;

use crate::config::DisplayMask;

struct Writer<'b> {
    buffer: &'b mut String,
    indent: usize,
}

impl<'b> Writer<'b> {
    fn new(buffer: &'b mut String) -> Self {
        Self { buffer, indent: 0 }
    }

    fn increase_indent(&mut self) {
        self.indent += 2;
    }

    fn decrease_indent(&mut self) {
        self.indent -= 2;
    }

    fn title(&mut self, title: &str) {
        self.writeln(title.underline().bold().to_string());
    }

    fn field(&mut self, name: &str, value: impl std::fmt::Display) {
        self.writeln(format!("{}: {}", name.bold(), value));
    }

    fn writeln(&mut self, s: String) {
        self.buffer.push_str(&" ".repeat(self.indent));
        self.buffer.push_str(&s);
        self.buffer.push('\n');
    }
}

/// The Frame Check Sequence of a received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FcsStatus {
    /// The FCS as received.
    pub value: u16,
    /// The FCS matches the frame content.
    pub valid: bool,
}

impl From<&FrameWithFcs<'_>> for FcsStatus {
    fn from(frame: &FrameWithFcs<'_>) -> Self {
        Self {
            value: frame.fcs(),
            valid: frame.check_fcs(),
        }
    }
}

/// Renders the parts of a [`MacFrame`] selected by a [`DisplayMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameFormatter {
    mask: DisplayMask,
    show_payload: bool,
}

impl FrameFormatter {
    /// Create a formatter that shows the parts in `mask`.
    pub fn new(mask: DisplayMask) -> Self {
        Self {
            mask,
            show_payload: false,
        }
    }

    /// Also dump the payload.
    pub fn with_payload(mut self, show_payload: bool) -> Self {
        self.show_payload = show_payload;
        self
    }

    /// Render `frame`.
    pub fn format(&self, frame: &MacFrame<'_>) -> String {
        self.render(frame, None)
    }

    /// Render `frame` followed by the status of its FCS.
    pub fn format_with_fcs(&self, frame: &MacFrame<'_>, fcs: FcsStatus) -> String {
        self.render(frame, Some(fcs))
    }

    fn render(&self, frame: &MacFrame<'_>, fcs: Option<FcsStatus>) -> String {
        let mut buffer = String::new();
        let mut w = Writer::new(&mut buffer);

        if self.mask.contains(DisplayMask::CONTROL) {
            let fc = &frame.control;
            w.title("Frame Control");
            w.increase_indent();
            w.field("frame type", format!("{:?}", fc.frame_type).bright_blue());
            w.field("security", fc.security_enabled as usize);
            w.field("frame pending", fc.frame_pending as usize);
            w.field("ack request", fc.ack_request as usize);
            w.field("pan id compression", fc.pan_id_compression as usize);
            w.field(
                "dst addressing mode",
                format!("{:?}", fc.dst_addressing_mode),
            );
            w.field(
                "src addressing mode",
                format!("{:?}", fc.src_addressing_mode),
            );
            w.field(
                "frame version",
                format!("{} ({:?})", fc.frame_version as usize, fc.frame_version),
            );
            w.decrease_indent();
        }

        if self.mask.contains(DisplayMask::SEQNO) {
            if let Some(seq) = frame.sequence {
                w.title("Sequence Number");
                w.increase_indent();
                w.field("sequence number", seq);
                w.decrease_indent();
            }
        }

        if self.mask.contains(DisplayMask::ADDR)
            && (frame.dst_addr.is_some() || frame.src_addr.is_some())
        {
            w.title("Addressing");
            w.increase_indent();

            if let Some(dst_pan_id) = frame.dst_pan {
                w.field("dst pan id", format!("{dst_pan_id:x}"));
            }

            if let Some(dst_addr) = frame.dst_addr {
                w.field("dst addr", with_broadcast(dst_addr));
            }

            // A compressed source PAN ID is not on the air, do not repeat it.
            if let Some(src_pan_id) = frame
                .src_pan
                .filter(|_| !frame.control.pan_id_compressed())
            {
                w.field("src pan id", format!("{src_pan_id:x}"));
            }

            if let Some(src_addr) = frame.src_addr {
                w.field("src addr", with_broadcast(src_addr));
            }
            w.decrease_indent();
        }

        if self.mask.contains(DisplayMask::SECURITY) {
            if let Some(security) = &frame.security {
                let control = &security.security_control;
                w.title("Auxiliary Security Header");
                w.increase_indent();
                w.field("security level", format!("{:?}", control.security_level));
                w.field("mic length", control.security_level.mic_length());
                w.field(
                    "key identifier mode",
                    format!("{:?}", control.key_identifier_mode),
                );
                w.field("frame counter", security.frame_counter);
                match security.key_identifier {
                    KeyIdentifier::Implicit => {}
                    KeyIdentifier::Index(index) => w.field("key index", index),
                    KeyIdentifier::Source4 { source, index } => {
                        w.field("key source", format!("{source:08x}"));
                        w.field("key index", index);
                    }
                    KeyIdentifier::Source8 { source, index } => {
                        w.field("key source", format!("{source:016x}"));
                        w.field("key index", index);
                    }
                }
                w.decrease_indent();
            }
        }

        if let Some(fcs) = fcs.filter(|_| !self.mask.is_empty()) {
            w.title("FCS");
            w.increase_indent();
            w.field(
                "fcs",
                format!(
                    "{:04x} ({})",
                    fcs.value,
                    if fcs.valid {
                        "valid".green()
                    } else {
                        "invalid".red()
                    }
                ),
            );
            w.decrease_indent();
        }

        if self.show_payload {
            w.title("Payload");
            w.increase_indent();
            w.field("length", frame.payload_len());
            if !frame.payload.is_empty() {
                w.writeln(hex::encode(frame.payload));
            }
            w.decrease_indent();
        }

        buffer
    }
}

fn with_broadcast(addr: Address) -> String {
    format!(
        "{}{}",
        addr,
        if addr.is_broadcast() {
            " (broadcast)"
        } else {
            ""
        }
    )
}
