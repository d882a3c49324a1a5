use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{
    BuyRequest, CreatePurchaseOfferRequest, CreateSellOfferRequest, Project, ProjectId,
    PurchaseOffer, SellOffer, Transaction, UserProfile,
};
use tracing::{debug, warn};

use crate::config::{AppConfig, DEFAULT_API_URL};
use crate::errors::ApiError;
use crate::services::traits::{ProjectApi, PurchaseOfferApi, SellOfferApi};

/// API client for communicating with the trading server
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    auth_token: Option<String>,
    http: Client,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_URL.to_string())
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            http: Client::new(),
        }
    }

    /// Create a client honoring the configured URL, token and timeout
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
            http,
        })
    }

    /// Attach a bearer token to every request
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the authenticated user
    pub async fn get_current_user(&self) -> Result<UserProfile, ApiError> {
        self.send(self.request(Method::GET, "/api/users/me")).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let builder = self.http.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RequestBuilder {
        self.request(Method::POST, path).json(body)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = serde_json::from_slice(&bytes).ok();
            warn!("Request rejected with status {}", status);
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectApi for ApiClient {
    async fn get(&self, id: ProjectId) -> Result<Project, ApiError> {
        self.send(self.request(Method::GET, &format!("/api/git-projects/{}", id)))
            .await
    }
}

#[async_trait]
impl SellOfferApi for ApiClient {
    async fn get_all(&self, project_id: ProjectId) -> Result<Vec<SellOffer>, ApiError> {
        let path = format!("/api/git-projects/{}/sell-offers", project_id);
        self.send(self.request(Method::GET, &path)).await
    }

    async fn create(&self, request: &CreateSellOfferRequest) -> Result<SellOffer, ApiError> {
        self.send(self.post_json("/api/sell-offers", request)).await
    }

    async fn buy(&self, request: &BuyRequest) -> Result<Transaction, ApiError> {
        self.send(self.post_json("/api/sell-offers/buy", request)).await
    }
}

#[async_trait]
impl PurchaseOfferApi for ApiClient {
    async fn get_all(&self, project_id: ProjectId) -> Result<Vec<PurchaseOffer>, ApiError> {
        let path = format!("/api/git-projects/{}/purchase-offers", project_id);
        self.send(self.request(Method::GET, &path)).await
    }

    async fn create(&self, request: &CreatePurchaseOfferRequest) -> Result<PurchaseOffer, ApiError> {
        self.send(self.post_json("/api/purchase-offers", request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::with_base_url("http://localhost:9000/".to_string());
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_from_config() {
        let config = AppConfig {
            api_base_url: "https://trading.example.org".to_string(),
            auth_token: Some("token".to_string()),
            request_timeout_secs: 3,
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://trading.example.org");
        assert_eq!(client.auth_token.as_deref(), Some("token"));
    }
}
