//! Entity records: organizations or people associated with a tag.

use crate::model::vocab::Role;
use serde::{Deserialize, Serialize};

/// An organization or person associated with the tag, carrying one or more
/// roles from the fixed role vocabulary.
///
/// Constructed through [`EntityBuilder`](crate::builder::EntityBuilder),
/// which enforces the at-least-one-role invariant; immutable afterwards.
///
/// `regid` is a real optional: the `"none"` sentinel the specification
/// defaults to is substituted at the codec boundary, not stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub(crate) name: String,
    pub(crate) regid: Option<String>,
    pub(crate) roles: Vec<Role>,
    pub(crate) thumbprint: Option<String>,
}

impl Entity {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registration identifier (URI-like), if known
    #[must_use]
    pub fn regid(&self) -> Option<&str> {
        self.regid.as_deref()
    }

    /// Roles in insertion order, deduplicated
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Signing certificate thumbprint, if present
    #[must_use]
    pub fn thumbprint(&self) -> Option<&str> {
        self.thumbprint.as_deref()
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
