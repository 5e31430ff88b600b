#![no_main]

use bacport_core::encoding::reader::Reader;
use bacport_core::encoding::writer::Writer;
use bacport_core::types::TagValue;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    if let Ok(value) = TagValue::decode(&mut r) {
        let mut buf = [0u8; 512];
        let mut w = Writer::new(&mut buf);
        if value.encode(&mut w).is_ok() {
            let mut back = Reader::new(w.as_written());
            let reparsed = TagValue::decode(&mut back).ok();
            // NaN payloads never compare equal to themselves.
            if !matches!(value, TagValue::Real(v) if v.is_nan()) {
                assert_eq!(reparsed, Some(value));
            }
        }
    }
});
