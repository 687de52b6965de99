//! Closed vocabularies fixed by the governing specifications.
//!
//! Every enum carries its canonical external string (the ISO 19770-2 XML
//! token) and its CoSWID integer index (RFC 9393 registry value). None of
//! these vocabularies has an open extension point; values outside the
//! registry are rejected at the parse boundary.

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Entity role vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    TagCreator,
    SoftwareCreator,
    Aggregator,
    Distributor,
    Licensor,
    Maintainer,
}

impl Role {
    /// Canonical ISO 19770-2 token
    #[must_use]
    pub const fn iso_name(&self) -> &'static str {
        match self {
            Self::TagCreator => "tagCreator",
            Self::SoftwareCreator => "softwareCreator",
            Self::Aggregator => "aggregator",
            Self::Distributor => "distributor",
            Self::Licensor => "licensor",
            Self::Maintainer => "maintainer",
        }
    }

    /// CoSWID role registry index
    #[must_use]
    pub const fn coswid_index(&self) -> u64 {
        match self {
            Self::TagCreator => 1,
            Self::SoftwareCreator => 2,
            Self::Aggregator => 3,
            Self::Distributor => 4,
            Self::Licensor => 5,
            Self::Maintainer => 6,
        }
    }

    #[must_use]
    pub fn from_iso_name(name: &str) -> Option<Self> {
        match name {
            "tagCreator" => Some(Self::TagCreator),
            "softwareCreator" => Some(Self::SoftwareCreator),
            "aggregator" => Some(Self::Aggregator),
            "distributor" => Some(Self::Distributor),
            "licensor" => Some(Self::Licensor),
            "maintainer" => Some(Self::Maintainer),
            _ => None,
        }
    }

    #[must_use]
    pub const fn from_coswid_index(index: u64) -> Option<Self> {
        match index {
            1 => Some(Self::TagCreator),
            2 => Some(Self::SoftwareCreator),
            3 => Some(Self::Aggregator),
            4 => Some(Self::Distributor),
            5 => Some(Self::Licensor),
            6 => Some(Self::Maintainer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iso_name())
    }
}

/// Version scheme vocabulary.
///
/// `Unknown` is a legitimate scheme value (the version string's structure
/// is unspecified) and has no CoSWID index; it is never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionScheme {
    MultipartNumeric,
    MultipartNumericSuffix,
    Alphanumeric,
    Decimal,
    Semver,
    Unknown,
}

fn multipart_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[0-9]+(\.[0-9]+)*$").expect("static regex"))
}

fn multipart_suffix_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^[0-9]+(\.[0-9]+)*[A-Za-z0-9+_-]*$").expect("static regex")
    })
}

fn alphanumeric_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.+_-]*$").expect("static regex"))
}

fn decimal_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^[0-9]+\.[0-9]+$").expect("static regex"))
}

impl VersionScheme {
    /// Canonical ISO 19770-2 token
    #[must_use]
    pub const fn iso_name(&self) -> &'static str {
        match self {
            Self::MultipartNumeric => "multipartnumeric",
            Self::MultipartNumericSuffix => "multipartnumeric+suffix",
            Self::Alphanumeric => "alphanumeric",
            Self::Decimal => "decimal",
            Self::Semver => "semver",
            Self::Unknown => "unknown",
        }
    }

    /// CoSWID version-scheme registry index; `Unknown` has none
    #[must_use]
    pub const fn coswid_index(&self) -> Option<u64> {
        match self {
            Self::MultipartNumeric => Some(1),
            Self::MultipartNumericSuffix => Some(2),
            Self::Alphanumeric => Some(3),
            Self::Decimal => Some(4),
            Self::Semver => Some(16384),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub fn from_iso_name(name: &str) -> Option<Self> {
        match name {
            "multipartnumeric" => Some(Self::MultipartNumeric),
            "multipartnumeric+suffix" => Some(Self::MultipartNumericSuffix),
            "alphanumeric" => Some(Self::Alphanumeric),
            "decimal" => Some(Self::Decimal),
            "semver" => Some(Self::Semver),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    #[must_use]
    pub const fn from_coswid_index(index: u64) -> Option<Self> {
        match index {
            1 => Some(Self::MultipartNumeric),
            2 => Some(Self::MultipartNumericSuffix),
            3 => Some(Self::Alphanumeric),
            4 => Some(Self::Decimal),
            16384 => Some(Self::Semver),
            _ => None,
        }
    }

    /// Check a version string for well-formedness under this scheme
    #[must_use]
    pub fn validates(&self, version: &str) -> bool {
        match self {
            Self::MultipartNumeric => multipart_re().is_match(version),
            Self::MultipartNumericSuffix => multipart_suffix_re().is_match(version),
            Self::Alphanumeric => alphanumeric_re().is_match(version),
            Self::Decimal => decimal_re().is_match(version),
            Self::Semver => Version::parse(version).is_ok(),
            Self::Unknown => true,
        }
    }
}

impl fmt::Display for VersionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iso_name())
    }
}

/// Tag type classification.
///
/// Primary is the absence of the corpus/patch/supplemental markers in both
/// wire formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagType {
    #[default]
    Primary,
    Corpus,
    Patch,
    Supplemental,
}

impl TagType {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Corpus => "corpus",
            Self::Patch => "patch",
            Self::Supplemental => "supplemental",
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Link relationship vocabulary (CoSWID link-rel registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkRel {
    Ancestor,
    Component,
    Feature,
    InstallationMedia,
    PackageInstaller,
    Parent,
    Patches,
    Requires,
    SeeAlso,
    Supersedes,
}

impl LinkRel {
    #[must_use]
    pub const fn iso_name(&self) -> &'static str {
        match self {
            Self::Ancestor => "ancestor",
            Self::Component => "component",
            Self::Feature => "feature",
            Self::InstallationMedia => "installationmedia",
            Self::PackageInstaller => "packageinstaller",
            Self::Parent => "parent",
            Self::Patches => "patches",
            Self::Requires => "requires",
            Self::SeeAlso => "seeAlso",
            Self::Supersedes => "supersedes",
        }
    }

    #[must_use]
    pub const fn coswid_index(&self) -> u64 {
        match self {
            Self::Ancestor => 1,
            Self::Component => 2,
            Self::Feature => 3,
            Self::InstallationMedia => 4,
            Self::PackageInstaller => 5,
            Self::Parent => 6,
            Self::Patches => 7,
            Self::Requires => 8,
            Self::SeeAlso => 9,
            Self::Supersedes => 10,
        }
    }

    #[must_use]
    pub fn from_iso_name(name: &str) -> Option<Self> {
        match name {
            "ancestor" => Some(Self::Ancestor),
            "component" => Some(Self::Component),
            "feature" => Some(Self::Feature),
            "installationmedia" => Some(Self::InstallationMedia),
            "packageinstaller" => Some(Self::PackageInstaller),
            "parent" => Some(Self::Parent),
            "patches" => Some(Self::Patches),
            "requires" => Some(Self::Requires),
            "seeAlso" => Some(Self::SeeAlso),
            "supersedes" => Some(Self::Supersedes),
            _ => None,
        }
    }

    #[must_use]
    pub const fn from_coswid_index(index: u64) -> Option<Self> {
        match index {
            1 => Some(Self::Ancestor),
            2 => Some(Self::Component),
            3 => Some(Self::Feature),
            4 => Some(Self::InstallationMedia),
            5 => Some(Self::PackageInstaller),
            6 => Some(Self::Parent),
            7 => Some(Self::Patches),
            8 => Some(Self::Requires),
            9 => Some(Self::SeeAlso),
            10 => Some(Self::Supersedes),
            _ => None,
        }
    }
}

impl fmt::Display for LinkRel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iso_name())
    }
}

/// Link ownership vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkOwnership {
    Abandon,
    Private,
    Shared,
}

impl LinkOwnership {
    #[must_use]
    pub const fn iso_name(&self) -> &'static str {
        match self {
            Self::Abandon => "abandon",
            Self::Private => "private",
            Self::Shared => "shared",
        }
    }

    #[must_use]
    pub const fn coswid_index(&self) -> u64 {
        match self {
            Self::Abandon => 1,
            Self::Private => 2,
            Self::Shared => 3,
        }
    }

    #[must_use]
    pub fn from_iso_name(name: &str) -> Option<Self> {
        match name {
            "abandon" => Some(Self::Abandon),
            "private" => Some(Self::Private),
            "shared" => Some(Self::Shared),
            _ => None,
        }
    }

    #[must_use]
    pub const fn from_coswid_index(index: u64) -> Option<Self> {
        match index {
            1 => Some(Self::Abandon),
            2 => Some(Self::Private),
            3 => Some(Self::Shared),
            _ => None,
        }
    }
}

impl fmt::Display for LinkOwnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iso_name())
    }
}

/// Link use vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkUse {
    Optional,
    Required,
    Recommended,
}

impl LinkUse {
    #[must_use]
    pub const fn iso_name(&self) -> &'static str {
        match self {
            Self::Optional => "optional",
            Self::Required => "required",
            Self::Recommended => "recommended",
        }
    }

    #[must_use]
    pub const fn coswid_index(&self) -> u64 {
        match self {
            Self::Optional => 1,
            Self::Required => 2,
            Self::Recommended => 3,
        }
    }

    #[must_use]
    pub fn from_iso_name(name: &str) -> Option<Self> {
        match name {
            "optional" => Some(Self::Optional),
            "required" => Some(Self::Required),
            "recommended" => Some(Self::Recommended),
            _ => None,
        }
    }

    #[must_use]
    pub const fn from_coswid_index(index: u64) -> Option<Self> {
        match index {
            1 => Some(Self::Optional),
            2 => Some(Self::Required),
            3 => Some(Self::Recommended),
            _ => None,
        }
    }
}

impl fmt::Display for LinkUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iso_name())
    }
}
