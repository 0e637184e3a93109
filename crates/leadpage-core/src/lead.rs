//! The lead record and its identifier types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Primary key of a lead row.
///
/// Opaque to this system; the external workflow that writes the `leads`
/// table decides the format (usually a UUID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(String);

impl LeadId {
    /// Creates a lead ID from a string.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LeadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// URL slug identifying one personalized page.
///
/// The only check is non-emptiness. Matching is exact and case-sensitive,
/// so a slug is never trimmed or lowercased.
///
/// # Examples
///
/// ```
/// use leadpage_core::Slug;
///
/// let slug = Slug::parse("acme-realty").unwrap();
/// assert_eq!(slug.as_str(), "acme-realty");
/// assert!(Slug::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Parses a slug, rejecting the empty string.
    pub fn parse<S: Into<String>>(slug: S) -> Result<Self> {
        let slug = slug.into();
        if slug.is_empty() {
            return Err(Error::validation("slug must not be empty"));
        }
        Ok(Self(slug))
    }

    /// Returns the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl std::str::FromStr for Slug {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A prospective customer and the data used to personalize their page.
///
/// Rows are created and updated by an external workflow; this system only
/// reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Primary key
    pub id: LeadId,
    /// Unique lookup key
    pub slug: Slug,
    /// Company shown throughout the page
    pub company_name: String,
    /// Contact's first name, used in the greeting
    pub first_name: String,
    /// Contact address for the `mailto:` link
    pub email: String,
    /// Voice assistant handed to the call widget
    pub vapi_agent_id: String,
    /// When the row was created
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Uppercased first character of the company name, for the logo badge.
    pub fn company_initial(&self) -> Option<char> {
        self.company_name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }

    /// Returns `true` if the lead has a voice agent configured.
    pub fn has_agent(&self) -> bool {
        !self.vapi_agent_id.is_empty()
    }
}
