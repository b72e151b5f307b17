//! Provider gateway talking to the Kindly REST backend.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use kindly_core::{
    model::ProviderRecord,
    ports::{GatewayError, ProviderGateway, ProviderQuery},
};

const USERS_PATH: &str = "/api/users";

/// Gateway issuing the provider queries over HTTP.
pub struct HttpProviderGateway {
    client: Client,
    base_url: String,
}

impl HttpProviderGateway {
    /// Create a gateway bound to the given HTTP client and backend root.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidBaseUrl`] unless `base_url` is an
    /// `http://` or `https://` URL.
    pub fn new<S: AsRef<str>>(client: Client, base_url: S) -> Result<Self, GatewayError> {
        let base_url = base_url.as_ref().trim().trim_end_matches('/');
        let has_scheme = base_url
            .strip_prefix("http://")
            .or_else(|| base_url.strip_prefix("https://"))
            .is_some_and(|host| !host.is_empty());

        if !has_scheme {
            return Err(GatewayError::InvalidBaseUrl(base_url.to_owned()));
        }

        Ok(Self {
            client,
            base_url: base_url.to_owned(),
        })
    }

    /// Full URL answering `query`.
    #[must_use]
    pub fn endpoint(&self, query: ProviderQuery) -> String {
        let filter = match query {
            ProviderQuery::FetchAll => "",
            ProviderQuery::FetchChildCare => "/filter/child-care",
            ProviderQuery::FetchElderCare => "/filter/elder-care",
            ProviderQuery::FetchPetCare => "/filter/pet-care",
        };
        format!("{}{USERS_PATH}{filter}", self.base_url)
    }

    async fn fetch(&self, query: ProviderQuery) -> Result<Vec<ProviderRecord>, GatewayError> {
        let url = self.endpoint(query);
        debug!(%url, ?query, "requesting providers");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();

        if status == StatusCode::NOT_FOUND && signals_no_match(query) {
            debug!(%url, "no providers matched");
            return Ok(Vec::new());
        }

        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: message.trim().to_owned(),
            });
        }

        resp.json().await.map_err(GatewayError::from)
    }
}

/// Only the child and elder care filters answer 404 to mean "nobody matched".
/// Anywhere else a 404 is a misrouted request and must surface as a failure.
const fn signals_no_match(query: ProviderQuery) -> bool {
    matches!(
        query,
        ProviderQuery::FetchChildCare | ProviderQuery::FetchElderCare
    )
}

#[async_trait]
impl ProviderGateway for HttpProviderGateway {
    async fn fetch_all(&self) -> Result<Vec<ProviderRecord>, GatewayError> {
        self.fetch(ProviderQuery::FetchAll).await
    }

    async fn fetch_child_care(&self) -> Result<Vec<ProviderRecord>, GatewayError> {
        self.fetch(ProviderQuery::FetchChildCare).await
    }

    async fn fetch_elder_care(&self) -> Result<Vec<ProviderRecord>, GatewayError> {
        self.fetch(ProviderQuery::FetchElderCare).await
    }

    async fn fetch_pet_care(&self) -> Result<Vec<ProviderRecord>, GatewayError> {
        self.fetch(ProviderQuery::FetchPetCare).await
    }
}
