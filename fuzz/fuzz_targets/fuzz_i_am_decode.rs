#![no_main]

use bacport_core::encoding::reader::Reader;
use bacport_core::services::IAmRequest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    let _ = IAmRequest::decode_after_header(&mut r);

    // The short-form path has to hold up on the same input.
    let mut r = Reader::new(data);
    let _ = IAmRequest::decode_device_id(&mut r);
});
