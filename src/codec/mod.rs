//! Codec family: serializers for the frozen tag document.
//!
//! Every codec implements [`TagCodec`] and walks the document tree in one
//! canonical order: tag attributes, entities (builder-insertion order —
//! entity order is semantically meaningful and is never re-sorted), links,
//! payload resources (collection sort order), evidence resources.
//!
//! Codecs are pure with respect to the document: the same frozen document
//! serializes to byte-identical output on every invocation. Writes are
//! all-or-nothing — output is staged in an internal buffer and reaches
//! the sink only after the whole document serialized successfully.

mod cbor;
mod xml;

pub use cbor::CborCodec;
pub use xml::XmlCodec;

use crate::error::Result;
use crate::model::SwidTag;
use std::io::Write;

/// Sentinel written for an absent entity regid, as the governing
/// specification defaults it. Applied at this boundary only; the model
/// keeps the real optional.
pub(crate) const REGID_NONE: &str = "none";

/// A serializer/deserializer pair for one wire format.
pub trait TagCodec {
    /// Short format name for diagnostics ("coswid-cbor", "swid-xml")
    fn format_name(&self) -> &'static str;

    /// Serialize the frozen document into `sink`.
    ///
    /// All-or-nothing: on error nothing has been written to the sink.
    fn write(&self, tag: &SwidTag, sink: &mut dyn Write) -> Result<()>;

    /// Decode a serialized tag back into the document model.
    ///
    /// Decoding runs the same builder-graph validation as direct
    /// assembly, so a document that decodes successfully satisfies every
    /// document invariant.
    fn read(&self, bytes: &[u8]) -> Result<SwidTag>;

    /// Serialize into a fresh byte buffer.
    fn to_bytes(&self, tag: &SwidTag) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(tag, &mut buf)?;
        Ok(buf)
    }
}
