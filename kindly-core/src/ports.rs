//! Trait describing the backend provider queries and shared helper types.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{CategoryId, ProviderRecord};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while querying the provider backend.
pub enum GatewayError {
    /// Network layer failed or the body could not be decoded.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Body text sent along with the status.
        message: String,
    },
    /// Configured base URL cannot be used.
    #[error("Invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// Internal gateway error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The four backend query operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderQuery {
    /// Every provider.
    FetchAll,
    /// Providers offering child care.
    FetchChildCare,
    /// Providers offering elder care.
    FetchElderCare,
    /// Providers offering pet care.
    FetchPetCare,
}

impl ProviderQuery {
    /// Query that answers a category selection.
    #[must_use]
    pub const fn for_category(category: CategoryId) -> Self {
        match category {
            CategoryId::All => Self::FetchAll,
            CategoryId::ChildCare => Self::FetchChildCare,
            CategoryId::ElderCare => Self::FetchElderCare,
            CategoryId::PetCare => Self::FetchPetCare,
        }
    }

    /// Run this query against a gateway.
    ///
    /// # Errors
    ///
    /// Returns the [`GatewayError`] reported by the gateway.
    pub async fn run(
        self,
        gateway: &dyn ProviderGateway,
    ) -> Result<Vec<ProviderRecord>, GatewayError> {
        match self {
            Self::FetchAll => gateway.fetch_all().await,
            Self::FetchChildCare => gateway.fetch_child_care().await,
            Self::FetchElderCare => gateway.fetch_elder_care().await,
            Self::FetchPetCare => gateway.fetch_pet_care().await,
        }
    }
}

#[async_trait]
/// Data-access boundary performing the provider queries.
pub trait ProviderGateway: Send + Sync {
    /// Fetch every provider.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the backend request fails.
    async fn fetch_all(&self) -> Result<Vec<ProviderRecord>, GatewayError>;

    /// Fetch providers offering child care.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the backend request fails.
    async fn fetch_child_care(&self) -> Result<Vec<ProviderRecord>, GatewayError>;

    /// Fetch providers offering elder care.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the backend request fails.
    async fn fetch_elder_care(&self) -> Result<Vec<ProviderRecord>, GatewayError>;

    /// Fetch providers offering pet care.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] when the backend request fails.
    async fn fetch_pet_care(&self) -> Result<Vec<ProviderRecord>, GatewayError>;
}
