#![no_main]
use libfuzzer_sys::fuzz_target;
use swid_tools::{TagCodec, XmlCodec};

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the SWID XML decoder.
///
/// Also wraps input in a minimal valid SoftwareIdentity envelope so the
/// fuzzer reaches the entity/link/file decoding paths rather than
/// failing at the root element.
fuzz_target!(|data: &[u8]| {
    let codec = XmlCodec::new();

    // Try raw input first
    let _ = codec.read(data);

    if let Ok(s) = std::str::from_utf8(data) {
        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"<SoftwareIdentity xmlns="http://standards.iso.org/iso/19770/-2/2015/schema.xsd" name="a" tagId="b" tagVersion="0"><Entity name="x" regid="none" role="tagCreator"/>{s}</SoftwareIdentity>"#,
            );
            let _ = codec.read(wrapped.as_bytes());
        }
    }
});
