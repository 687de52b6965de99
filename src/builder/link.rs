//! Builder for link records.

use crate::error::{Result, SwidError, ValidationIssue};
use crate::model::{Link, LinkOwnership, LinkRel, LinkUse};

/// Fluent builder for [`Link`].
#[derive(Debug, Default, Clone)]
#[must_use]
pub struct LinkBuilder {
    href: Option<String>,
    rel: Option<LinkRel>,
    media_type: Option<String>,
    artifact: Option<String>,
    media: Option<String>,
    ownership: Option<LinkOwnership>,
    link_use: Option<LinkUse>,
}

impl LinkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the link target (URI reference).
    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Set the relationship type.
    pub const fn rel(mut self, rel: LinkRel) -> Self {
        self.rel = Some(rel);
        self
    }

    /// Set the MIME type of the target.
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Name the installation artifact the link pertains to.
    pub fn artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    /// Restrict the link with a media query.
    pub fn media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    pub const fn ownership(mut self, ownership: LinkOwnership) -> Self {
        self.ownership = Some(ownership);
        self
    }

    pub const fn link_use(mut self, link_use: LinkUse) -> Self {
        self.link_use = Some(link_use);
        self
    }

    /// Validate and freeze into a [`Link`].
    pub fn build(self) -> Result<Link> {
        let mut issues = Vec::new();

        let href = self.href.unwrap_or_default();
        if href.trim().is_empty() {
            issues.push(ValidationIssue::new("link.href", "must not be empty"));
        }
        let Some(rel) = self.rel else {
            issues.push(ValidationIssue::new("link.rel", "relationship is required"));
            return Err(SwidError::validation(issues));
        };

        if !issues.is_empty() {
            return Err(SwidError::validation(issues));
        }

        Ok(Link {
            href,
            rel,
            media_type: self.media_type,
            artifact: self.artifact,
            media: self.media,
            ownership: self.ownership,
            link_use: self.link_use,
        })
    }
}
