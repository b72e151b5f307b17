//! Display model for the provider result list.

use crate::model::{CategoryId, ProviderRecord};
use crate::synchronizer::ResultSnapshot;

/// One rendered provider entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRow {
    /// Provider display name.
    pub title: String,
    /// Secondary line, usually contact details.
    pub detail: Option<String>,
}

impl From<&ProviderRecord> for ProviderRow {
    fn from(record: &ProviderRecord) -> Self {
        let detail = match (record.username.as_deref(), record.email.as_deref()) {
            (Some(username), Some(email)) => Some(format!("@{username} · {email}")),
            (None, Some(email)) => Some(email.to_owned()),
            (Some(username), None) => Some(format!("@{username}")),
            (None, None) => None,
        };
        Self {
            title: record.display_name(),
            detail,
        }
    }
}

/// What the list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultDisplay {
    /// Empty result set.
    NoResults,
    /// One row per provider record.
    Entries(Vec<ProviderRow>),
}

/// Everything the result view draws, derived purely from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultViewModel {
    /// List contents.
    pub display: ResultDisplay,
    /// Category the rows belong to.
    pub category: Option<CategoryId>,
    /// Category of a query still waiting for its answer.
    pub pending: Option<CategoryId>,
    /// Message describing the last failed query.
    pub failure: Option<String>,
}

impl ResultViewModel {
    /// Build the view model for a snapshot.
    #[must_use]
    pub fn render(snapshot: &ResultSnapshot<'_>) -> Self {
        let display = if snapshot.results.is_empty() {
            ResultDisplay::NoResults
        } else {
            ResultDisplay::Entries(snapshot.results.iter().map(ProviderRow::from).collect())
        };

        Self {
            display,
            category: snapshot.category,
            pending: snapshot.pending,
            failure: snapshot.failure.map(|failure| {
                format!(
                    "Could not load {}: {}",
                    failure.category.label().to_lowercase(),
                    failure.message
                )
            }),
        }
    }

    /// Number of rendered entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        match &self.display {
            ResultDisplay::NoResults => 0,
            ResultDisplay::Entries(rows) => rows.len(),
        }
    }
}
