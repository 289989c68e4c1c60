use wsn_frame::*;
use wsn_sniffer::display::FcsStatus;
use wsn_sniffer::{DisplayMask, FrameFormatter};

use strip_ansi_escapes::strip;

fn render(formatter: FrameFormatter, input: &str) -> String {
    let data = hex::decode(input).unwrap();
    let frame = decode(&data).unwrap();
    String::from_utf8(strip(formatter.format(&frame))).unwrap()
}

#[test]
fn data_frame() {
    let input = "41d801cdabffffc7d9b514004b12002b000000";
    let output = render(
        FrameFormatter::new(DisplayMask::ALL).with_payload(true),
        input,
    );
    assert_eq!(
        output,
        "Frame Control
  frame type: Data
  security: 0
  frame pending: 0
  ack request: 0
  pan id compression: 1
  dst addressing mode: Short
  src addressing mode: Extended
  frame version: 1 (Ieee802154_2006)
Sequence Number
  sequence number: 1
Addressing
  dst pan id: abcd
  dst addr: ff:ff (broadcast)
  src addr: 00:12:4b:00:14:b5:d9:c7
Payload
  length: 4
  2b000000
"
    );
}

#[test]
fn uncompressed_pan_ids() {
    let input = "018807cdab3412efbe78560102";
    let output = render(FrameFormatter::new(DisplayMask::ADDR), input);
    assert_eq!(
        output,
        "Addressing
  dst pan id: abcd
  dst addr: 12:34
  src pan id: beef
  src addr: 56:78
"
    );
}

#[test]
fn secured_frame() {
    let input = "499805cdab020001000d0100000003aabbccdd";
    let output = render(
        FrameFormatter::new(DisplayMask::SEQNO | DisplayMask::SECURITY),
        input,
    );
    assert_eq!(
        output,
        "Sequence Number
  sequence number: 5
Auxiliary Security Header
  security level: EncMic32
  mic length: 4
  key identifier mode: Index
  frame counter: 1
  key index: 3
"
    );
}

#[test]
fn beacon_without_addressing() {
    let input = "00002affcf000000000000000000000000";
    let output = render(
        FrameFormatter::new(DisplayMask::CONTROL | DisplayMask::ADDR),
        input,
    );
    assert_eq!(
        output,
        "Frame Control
  frame type: Beacon
  security: 0
  frame pending: 0
  ack request: 0
  pan id compression: 0
  dst addressing mode: Absent
  src addressing mode: Absent
  frame version: 0 (Ieee802154_2003)
"
    );
}

#[test]
fn fcs_status() {
    let data = [0x02, 0x10, 0x8d, 0xc4, 0x7f];
    let frame = FrameWithFcs::new(&data).unwrap();
    let decoded = frame.decode().unwrap();

    let output = FrameFormatter::new(DisplayMask::SEQNO)
        .format_with_fcs(&decoded, FcsStatus::from(&frame));
    let output = String::from_utf8(strip(output)).unwrap();
    assert_eq!(
        output,
        "Sequence Number
  sequence number: 141
FCS
  fcs: 7fc4 (valid)
"
    );
}
