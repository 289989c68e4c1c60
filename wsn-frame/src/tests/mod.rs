use super::*;


#[test]
fn emit_imm_ack() {
    let imm_ack = FrameBuilder::new_ack(1).finalize();

    let mut buffer = vec![0; imm_ack.buffer_len()];
    imm_ack.emit(&mut buffer[..]);

    assert_eq!(buffer, [0x02, 0x10, 0x01]);
}

#[test]
fn emit_data_frame() {
    let frame = FrameBuilder::new_data(&[0x2b, 0x00, 0x00, 0x00])
        .set_sequence_number(1)
        .set_dst(0xabcd, Address::BROADCAST)
        .set_src(0xabcd, Address::Extended(0x0012_4b00_14b5_d9c7))
        .finalize();

    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut buffer[..]);

    assert_eq!(
        buffer,
        [
            0x41, 0xd8, 0x01, 0xcd, 0xab, 0xff, 0xff, 0xc7, 0xd9, 0xb5, 0x14, 0x00, 0x4b, 0x12,
            0x00, 0x2b, 0x00, 0x00, 0x00,
        ]
    );
}

/// Different destination and source PAN IDs disable compression.
#[test]
fn emit_without_compression() {
    let frame = FrameBuilder::new_data(&[0x2b, 0x00, 0x00, 0x00])
        .set_sequence_number(1)
        .set_dst(0xabce, Address::Short(0x0402))
        .set_src(0xabcd, Address::Extended(0x0012_4b00_14b5_d9c7))
        .finalize();

    assert!(!frame.control.pan_id_compression);

    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut buffer[..]);

    assert_eq!(
        buffer,
        [
            0x01, 0xd8, 0x01, 0xce, 0xab, 0x02, 0x04, 0xcd, 0xab, 0xc7, 0xd9, 0xb5, 0x14, 0x00,
            0x4b, 0x12, 0x00, 0x2b, 0x00, 0x00, 0x00,
        ]
    );
}

#[test]
fn emit_secured_frame() {
    let frame = FrameBuilder::new_data(&[0xaa, 0xbb, 0xcc, 0xdd])
        .set_sequence_number(5)
        .set_dst(0xabcd, Address::Short(0x0002))
        .set_src(0xabcd, Address::Short(0x0001))
        .set_security(AuxSecurityHeader {
            security_control: SecurityControl {
                security_level: SecurityLevel::EncMic32,
                key_identifier_mode: KeyIdentifierMode::Index,
                reserved: 0,
            },
            frame_counter: 1,
            key_identifier: KeyIdentifier::Index(3),
        })
        .finalize();

    assert!(frame.control.security_enabled);

    let mut buffer = vec![0; frame.buffer_len()];
    frame.emit(&mut buffer[..]);

    assert_eq!(
        buffer,
        [
            0x49, 0x98, 0x05, 0xcd, 0xab, 0x02, 0x00, 0x01, 0x00, 0x0d, 0x01, 0x00, 0x00, 0x00,
            0x03, 0xaa, 0xbb, 0xcc, 0xdd,
        ]
    );
}

#[test]
fn round_trip() {
    let security = AuxSecurityHeader {
        security_control: SecurityControl {
            security_level: SecurityLevel::Mic128,
            key_identifier_mode: KeyIdentifierMode::Source8,
            reserved: 0,
        },
        frame_counter: 0xdead_beef,
        key_identifier: KeyIdentifier::Source8 {
            source: 0x0102_0304_0506_0708,
            index: 0x42,
        },
    };

    let frames = [
        FrameBuilder::new_beacon(&[0xff, 0xcf, 0x00, 0x00]).finalize(),
        FrameBuilder::new_ack(200).set_frame_pending(true).finalize(),
        FrameBuilder::new_mac_command(&[0x04])
            .set_sequence_number(9)
            .set_ack_request(true)
            .set_dst(0xffff, Address::BROADCAST)
            .finalize(),
        FrameBuilder::new_data(b"payload")
            .set_src(0x1234, Address::Extended(0xfeed_0000_0000_0001))
            .set_security(security)
            .set_frame_version(FrameVersion::Ieee802154_2003)
            .finalize(),
        FrameBuilder::new_data(&[])
            .set_dst(0x0001, Address::Extended(u64::MAX))
            .set_src(0x0002, Address::Short(0))
            .finalize(),
    ];

    for frame in frames {
        let mut buffer = vec![0; frame.buffer_len()];
        assert_eq!(frame.emit(&mut buffer[..]), buffer.len());
        assert_eq!(decode(&buffer), Ok(frame));
    }
}
