#![no_main]

use wsn_frame::{decode, FrameWithFcs};

use libfuzzer_sys::{fuzz_target, Corpus};

fuzz_target!(|data: &[u8]| -> Corpus {
    if data.len() > 127 {
        return Corpus::Reject;
    }

    if let Ok(frame) = decode(data) {
        // Emitting a decoded frame restores the input.
        let mut buffer = vec![0; frame.buffer_len()];
        assert_eq!(frame.emit(&mut buffer), data.len());
        assert_eq!(buffer, data);
    }

    if let Ok(frame) = FrameWithFcs::new(data) {
        let _ = frame.check_fcs();
        let _ = frame.decode();
    }

    Corpus::Keep
});
