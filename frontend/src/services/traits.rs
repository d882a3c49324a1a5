//! # Collaborator Traits
//!
//! The auction workflow never talks to HTTP, dialogs or toasts directly. It
//! goes through these traits so the page can be driven by the real
//! [`ApiClient`](crate::services::api::ApiClient) or by in-memory fakes.

use async_trait::async_trait;
use shared::{
    BuyRequest, CreatePurchaseOfferRequest, CreateSellOfferRequest, Project, ProjectId,
    PurchaseOffer, SellOffer, Transaction,
};

use crate::errors::ApiError;

/// Lookup of the project a page is about
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn get(&self, id: ProjectId) -> Result<Project, ApiError>;
}

/// Sell offer endpoints
#[async_trait]
pub trait SellOfferApi: Send + Sync {
    /// All open sell offers of a project
    async fn get_all(&self, project_id: ProjectId) -> Result<Vec<SellOffer>, ApiError>;

    async fn create(&self, request: &CreateSellOfferRequest) -> Result<SellOffer, ApiError>;

    /// Buy tokens from an existing sell offer
    async fn buy(&self, request: &BuyRequest) -> Result<Transaction, ApiError>;
}

/// Purchase offer endpoints
#[async_trait]
pub trait PurchaseOfferApi: Send + Sync {
    async fn get_all(&self, project_id: ProjectId) -> Result<Vec<PurchaseOffer>, ApiError>;

    async fn create(&self, request: &CreatePurchaseOfferRequest) -> Result<PurchaseOffer, ApiError>;
}

/// Re-synchronizes the authenticated user (balance, holdings) after a buy
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn refresh_user(&self) -> Result<(), ApiError>;
}

/// Toast-style user notifications. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str, title: &str);
    fn error(&self, message: &str, title: &str);
}

/// Dialogs the auction page can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    CreateSellOffer,
    CreatePurchaseOffer,
    BuyTokens,
}

/// Opens and closes modal dialogs
pub trait DialogController: Send + Sync {
    fn open(&self, dialog: Dialog);
    fn close(&self, dialog: Dialog);
    fn dismiss_all(&self);
}
