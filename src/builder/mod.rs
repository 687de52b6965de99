//! Builder graph for assembling validated tag documents.
//!
//! One builder per structural unit: [`SwidTagBuilder`] for the root,
//! [`EntityBuilder`], [`LinkBuilder`], [`PayloadBuilder`] and
//! [`EvidenceBuilder`] for the sections. Builders are the only mutable
//! accumulation objects in the library; the documents they produce are
//! immutable value trees, and codecs only ever see the frozen form.
//!
//! Vocabulary constraints (roles, version schemes, link attributes) are
//! enforced at the type level by the closed enums in [`crate::model`];
//! structural constraints local to one unit fail at that unit's
//! `build()`; cross-field constraints over the whole document are
//! collected and reported together by [`SwidTagBuilder::build`].

mod entity;
mod link;
mod payload;
mod tag;

pub use entity::EntityBuilder;
pub use link::LinkBuilder;
pub use payload::{EvidenceBuilder, PayloadBuilder};
pub use tag::SwidTagBuilder;
