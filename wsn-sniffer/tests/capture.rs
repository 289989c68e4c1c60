use std::path::PathBuf;

use wsn_sniffer::capture::{GLOBAL_HEADER_LEN, RECORD_HEADER_LEN};
use wsn_sniffer::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("wsn-sniffer-{}-{name}.pcap", std::process::id()))
}

fn u32_at(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
}

#[test]
fn header_and_records() {
    let path = temp_path("header-and-records");
    let options = CaptureOptions {
        snaplen: 16,
        link_type: LinkType::Ieee802154WithFcs,
    };

    let mut capture = CaptureFile::open(&path, options).unwrap();
    let ts = Timestamp {
        secs: 1_700_000_000,
        micros: 42,
    };
    capture.append(&[0x02, 0x10, 0x01], ts).unwrap();
    capture.append(&[0xee; 20], ts).unwrap();
    capture.close().unwrap();

    let data = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(
        &data[..GLOBAL_HEADER_LEN],
        &[
            0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0xc3, 0x00, 0x00, 0x00,
        ]
    );

    let first = GLOBAL_HEADER_LEN;
    assert_eq!(u32_at(&data, first), 1_700_000_000);
    assert_eq!(u32_at(&data, first + 4), 42);
    assert_eq!(u32_at(&data, first + 8), 3);
    assert_eq!(u32_at(&data, first + 12), 3);
    assert_eq!(
        &data[first + RECORD_HEADER_LEN..first + RECORD_HEADER_LEN + 3],
        &[0x02, 0x10, 0x01]
    );

    // Truncated to the snapshot length, the original length is kept.
    let second = first + RECORD_HEADER_LEN + 3;
    assert_eq!(u32_at(&data, second + 8), 16);
    assert_eq!(u32_at(&data, second + 12), 20);
    assert_eq!(&data[second + RECORD_HEADER_LEN..], &[0xee; 16]);
}

#[test]
fn close_is_idempotent() {
    let path = temp_path("close-is-idempotent");

    let mut capture = CaptureFile::open(&path, CaptureOptions::default()).unwrap();
    capture.append(&[0x01], Timestamp::default()).unwrap();
    capture.close().unwrap();
    capture.close().unwrap();
    assert!(matches!(
        capture.append(&[0x01], Timestamp::default()),
        Err(CaptureError::Closed)
    ));
    drop(capture);

    let len = std::fs::metadata(&path).unwrap().len();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(len as usize, GLOBAL_HEADER_LEN + RECORD_HEADER_LEN + 1);
}

#[test]
fn open_truncates() {
    let path = temp_path("open-truncates");
    std::fs::write(&path, [0xaa; 100]).unwrap();

    drop(CaptureFile::open(&path, CaptureOptions::default()).unwrap());

    let data = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(data.len(), GLOBAL_HEADER_LEN);
    assert_eq!(&data[20..24], &230u32.to_le_bytes());
}

#[test]
fn open_fails_on_missing_directory() {
    let path = std::env::temp_dir()
        .join(format!("wsn-sniffer-{}-missing", std::process::id()))
        .join("capture.pcap");
    assert!(matches!(
        CaptureFile::open(&path, CaptureOptions::default()),
        Err(CaptureError::Io(_))
    ));
}
