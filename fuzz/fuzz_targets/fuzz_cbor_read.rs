#![no_main]
use libfuzzer_sys::fuzz_target;
use swid_tools::{CborCodec, TagCodec};

/// Fuzz the CoSWID CBOR decoder.
///
/// Arbitrary input must produce either a valid document or a typed
/// error, never a panic.
fuzz_target!(|data: &[u8]| {
    let _ = CborCodec::new().read(data);
});
