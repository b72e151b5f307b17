//! Domain data structures for care categories and provider records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Care categories a visitor can filter providers by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryId {
    /// Every registered provider, regardless of category.
    All,
    /// Child care providers.
    ChildCare,
    /// Elder care providers.
    ElderCare,
    /// Pet care providers.
    PetCare,
}

impl CategoryId {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::All, Self::ChildCare, Self::ElderCare, Self::PetCare];

    /// Numeric code used by the selector affordances.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::All => 0,
            Self::ChildCare => 1,
            Self::ElderCare => 2,
            Self::PetCare => 3,
        }
    }

    /// Resolve a selector code, if it names a known category.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::All),
            1 => Some(Self::ChildCare),
            2 => Some(Self::ElderCare),
            3 => Some(Self::PetCare),
            _ => None,
        }
    }

    /// URL-friendly slug, matching the backend filter paths.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ChildCare => "child-care",
            Self::ElderCare => "elder-care",
            Self::PetCare => "pet-care",
        }
    }

    /// Human-friendly label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All providers",
            Self::ChildCare => "Child care",
            Self::ElderCare => "Elder care",
            Self::PetCare => "Pet care",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.slug())
    }
}

/// Raised when a category slug is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for CategoryId {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let slug = raw.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == slug)
            .ok_or_else(|| UnknownCategory(raw.to_owned()))
    }
}

/// Provider entry returned by the backend.
///
/// The orchestrator never looks inside a record; only the view reads the
/// display fields. Unknown fields are kept as-is in [`ProviderRecord::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Account name of the provider.
    #[serde(default)]
    pub username: Option<String>,
    /// Given name.
    #[serde(default)]
    pub name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub surname: Option<String>,
    /// Contact e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Remaining backend fields, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderRecord {
    /// Build a record that only carries a username.
    #[must_use]
    pub fn named<S: Into<String>>(username: S) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    /// Best available human-readable name.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full_name = [self.name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full_name.is_empty() {
            return full_name;
        }

        self.username
            .as_deref()
            .filter(|username| !username.trim().is_empty())
            .unwrap_or("<unnamed provider>")
            .to_owned()
    }
}
