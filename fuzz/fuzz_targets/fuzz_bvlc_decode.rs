#![no_main]

use bacport_core::encoding::reader::Reader;
use bacport_datalink::BvlcHeader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    let _ = BvlcHeader::decode(&mut r);
});
