//! # Offer Directory
//!
//! Client-held snapshot of the sell offers and purchase offers of one
//! project.
//!
//! ## Responsibilities:
//! - Hold each list as `None` until its first successful load
//! - Replace a list wholesale on refresh, never patch it in place
//! - Keep the previous snapshot when a refresh fails (logged only)
//!
//! The directory is a cheap-to-clone handle, so refreshes can run on spawned
//! tasks while the page keeps reading it.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shared::{ProjectId, PurchaseOffer, SellOffer};
use tracing::{info, warn};

use crate::services::traits::{PurchaseOfferApi, SellOfferApi};

#[derive(Debug, Default)]
struct DirectorySnapshot {
    sales: Option<Vec<SellOffer>>,
    purchase_offers: Option<Vec<PurchaseOffer>>,
}

#[derive(Debug, Clone, Default)]
pub struct OfferDirectory {
    snapshot: Arc<RwLock<DirectorySnapshot>>,
}

impl OfferDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sell offers as of the last successful refresh
    pub fn current_sales(&self) -> Option<Vec<SellOffer>> {
        self.read().sales.clone()
    }

    /// Purchase offers as of the last successful refresh
    pub fn current_purchase_offers(&self) -> Option<Vec<PurchaseOffer>> {
        self.read().purchase_offers.clone()
    }

    /// Reload the sell offers of a project. Returns whether the snapshot was
    /// replaced.
    pub async fn refresh_sell_offers(&self, api: &dyn SellOfferApi, project_id: ProjectId) -> bool {
        match api.get_all(project_id).await {
            Ok(sales) => {
                info!("📋 Loaded {} sell offers for project {}", sales.len(), project_id);
                self.write().sales = Some(sales);
                true
            }
            Err(e) => {
                warn!("Failed to load sell offers for project {}: {}", project_id, e);
                false
            }
        }
    }

    /// Reload the purchase offers of a project. Returns whether the snapshot
    /// was replaced.
    pub async fn refresh_purchase_offers(&self, api: &dyn PurchaseOfferApi, project_id: ProjectId) -> bool {
        match api.get_all(project_id).await {
            Ok(offers) => {
                info!("📋 Loaded {} purchase offers for project {}", offers.len(), project_id);
                self.write().purchase_offers = Some(offers);
                true
            }
            Err(e) => {
                warn!("Failed to load purchase offers for project {}: {}", project_id, e);
                false
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectorySnapshot> {
        self.snapshot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectorySnapshot> {
        self.snapshot.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use async_trait::async_trait;
    use shared::{BuyRequest, CreateSellOfferRequest, OfferId, Transaction};
    use std::sync::Mutex;

    /// Serves queued responses to `get_all`, one per call
    struct ScriptedSellOffers {
        responses: Mutex<Vec<Result<Vec<SellOffer>, ApiError>>>,
    }

    impl ScriptedSellOffers {
        fn new(mut responses: Vec<Result<Vec<SellOffer>, ApiError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl SellOfferApi for ScriptedSellOffers {
        async fn get_all(&self, _project_id: ProjectId) -> Result<Vec<SellOffer>, ApiError> {
            self.responses.lock().unwrap().pop().expect("unexpected get_all call")
        }

        async fn create(&self, _request: &CreateSellOfferRequest) -> Result<SellOffer, ApiError> {
            unimplemented!()
        }

        async fn buy(&self, _request: &BuyRequest) -> Result<Transaction, ApiError> {
            unimplemented!()
        }
    }

    fn offer(id: OfferId, tokens: u32) -> SellOffer {
        SellOffer {
            id,
            number_of_tokens: tokens,
            sell_price_per_token: "2.50".to_string(),
            project: None,
        }
    }

    fn rejected() -> ApiError {
        ApiError::Rejected { status: 500, body: None }
    }

    #[tokio::test]
    async fn test_lists_start_unloaded() {
        let directory = OfferDirectory::new();
        assert!(directory.current_sales().is_none());
        assert!(directory.current_purchase_offers().is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_whole_snapshot() {
        let api = ScriptedSellOffers::new(vec![
            Ok(vec![offer(1, 10), offer(2, 5)]),
            Ok(vec![offer(2, 3)]),
        ]);
        let directory = OfferDirectory::new();

        assert!(directory.refresh_sell_offers(&api, 3).await);
        assert_eq!(directory.current_sales().unwrap().len(), 2);

        assert!(directory.refresh_sell_offers(&api, 3).await);
        assert_eq!(directory.current_sales(), Some(vec![offer(2, 3)]));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let api = ScriptedSellOffers::new(vec![Ok(vec![offer(1, 10)]), Err(rejected())]);
        let directory = OfferDirectory::new();

        directory.refresh_sell_offers(&api, 3).await;
        assert!(!directory.refresh_sell_offers(&api, 3).await);
        assert_eq!(directory.current_sales(), Some(vec![offer(1, 10)]));
    }

    #[tokio::test]
    async fn test_failed_first_refresh_stays_unloaded() {
        let api = ScriptedSellOffers::new(vec![Err(rejected())]);
        let directory = OfferDirectory::new();

        assert!(!directory.refresh_sell_offers(&api, 3).await);
        assert!(directory.current_sales().is_none());
    }
}
