#![no_main]

use bacport_core::encoding::reader::Reader;
use bacport_core::encoding::writer::Writer;
use bacport_core::npdu::Npdu;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    if let Ok(npdu) = Npdu::decode(&mut r) {
        // Anything that decodes must re-encode without panicking.
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        let _ = npdu.encode(&mut w);
    }
});
