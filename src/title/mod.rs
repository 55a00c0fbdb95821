//! Node identifier handling
//!
//! Every node of the content graph is keyed by its canonical title. All
//! identifiers entering the crawler (configured entry points, category
//! members, outbound links) pass through [`Title::parse`] before they reach
//! the visited registry, so two spellings of the same page always collapse to
//! one node.

mod normalize;

pub use normalize::canonicalize;

use crate::TitleError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Namespaces recognized as title prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Category,
    Portal,
    File,
    Template,
    Help,
    Wikipedia,
    Talk,
    User,
    Special,
    Draft,
    Module,
}

impl Namespace {
    const ALL: [Namespace; 11] = [
        Namespace::Category,
        Namespace::Portal,
        Namespace::File,
        Namespace::Template,
        Namespace::Help,
        Namespace::Wikipedia,
        Namespace::Talk,
        Namespace::User,
        Namespace::Special,
        Namespace::Draft,
        Namespace::Module,
    ];

    /// Canonical spelling of the prefix (without the colon)
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Portal => "Portal",
            Self::File => "File",
            Self::Template => "Template",
            Self::Help => "Help",
            Self::Wikipedia => "Wikipedia",
            Self::Talk => "Talk",
            Self::User => "User",
            Self::Special => "Special",
            Self::Draft => "Draft",
            Self::Module => "Module",
        }
    }

    /// Matches a prefix case-insensitively
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ns| ns.prefix().eq_ignore_ascii_case(prefix))
    }
}

/// A canonical page title, the unique key of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Title(String);

impl Title {
    /// Parses and canonicalizes a raw title
    ///
    /// # Example
    ///
    /// ```
    /// use wikifrontier::Title;
    ///
    /// let a = Title::parse("crop_rotation").unwrap();
    /// let b = Title::parse("Crop rotation").unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TitleError> {
        canonicalize(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the namespace if the title carries a known prefix
    pub fn namespace(&self) -> Option<Namespace> {
        let (prefix, _) = self.0.split_once(':')?;
        Namespace::from_prefix(prefix)
    }

    /// Lower-cased form used for keyword matching
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Title {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Title {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Title::parse(&raw).map_err(serde::de::Error::custom)
    }
}
