//! Link records: relationships from this tag to other tags or artifacts.

use crate::model::vocab::{LinkOwnership, LinkRel, LinkUse};
use serde::{Deserialize, Serialize};

/// A relationship to another tag or external artifact.
///
/// `href` and `rel` are required; the remaining attributes are the
/// optional ISO 19770-2 link attribute set. Constructed through
/// [`LinkBuilder`](crate::builder::LinkBuilder); immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub(crate) href: String,
    pub(crate) rel: LinkRel,
    pub(crate) media_type: Option<String>,
    pub(crate) artifact: Option<String>,
    pub(crate) media: Option<String>,
    pub(crate) ownership: Option<LinkOwnership>,
    pub(crate) link_use: Option<LinkUse>,
}

impl Link {
    /// Target of the relationship (URI reference)
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    #[must_use]
    pub const fn rel(&self) -> LinkRel {
        self.rel
    }

    /// MIME type of the target (the ISO `@type` attribute)
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Installation artifact the link pertains to
    #[must_use]
    pub fn artifact(&self) -> Option<&str> {
        self.artifact.as_deref()
    }

    /// Media query restricting where the link applies
    #[must_use]
    pub fn media(&self) -> Option<&str> {
        self.media.as_deref()
    }

    #[must_use]
    pub const fn ownership(&self) -> Option<LinkOwnership> {
        self.ownership
    }

    #[must_use]
    pub const fn link_use(&self) -> Option<LinkUse> {
        self.link_use
    }
}
