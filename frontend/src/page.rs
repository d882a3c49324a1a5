//! # Project Auction Page
//!
//! The trading page of one git project: its sell offers, its purchase
//! offers, and the three forms that create offers or buy from them.
//!
//! ## Key Functions:
//! - `init()` - Load the project and both offer lists, build the forms
//! - `submit_sell_form()` / `submit_purchase_form()` - Create an offer
//! - `open_buy_dialog()` / `submit_buy_form()` - Buy from a sell offer
//! - `set_tokens_to_buy()` - Update the buy quantity and its total price
//!
//! ## Data Flow:
//! 1. The route supplies the project id
//! 2. Forms are validated client-side before any network call
//! 3. A successful mutation closes its dialog, spawns a directory refresh
//!    and notifies the user without waiting for the refresh
//! 4. Failures end here as an error toast (plus a field error for buys)
//!
//! Submissions take `&mut self`, so a page never has two of them in flight.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use shared::{
    BuyRequest, Contribution, CreatePurchaseOfferRequest, CreateSellOfferRequest, Project, ProjectId,
    PurchaseOffer, SellOffer,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::{compute_total, joined_field_error};
use crate::errors::{ApiError, FormError, PageError};
use crate::forms::offer_forms::{
    build_buy_form, build_purchase_form, build_sell_form, NB_TOKENS, NB_TOKENS_SERVER_ERROR,
};
use crate::forms::Form;
use crate::services::{
    ApiClient, Dialog, DialogController, HttpSession, Notifier, ProjectApi, PurchaseOfferApi,
    SellOfferApi, SessionService,
};
use crate::state::OfferDirectory;

pub const PAGE_TITLE: &str = "GitHub Trading";

pub const SAVED_MESSAGE: &str = "The data have been saved successfully";
pub const SAVED_TITLE: &str = "Data saved";
pub const TRANSACTION_COMPLETE_MESSAGE: &str = "Your transaction is complete";
pub const TRANSACTION_COMPLETE_TITLE: &str = "Transaction complete";
pub const SAVE_ERROR_MESSAGE: &str = "An error occurred while saving your data";

/// Route parameter carrying the project id
pub const PROJECT_ID_PARAM: &str = "id";

/// Parameters of the route the page was opened with
#[derive(Debug, Clone, Default)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn project_id(&self) -> Result<ProjectId, PageError> {
        let raw = self
            .get(PROJECT_ID_PARAM)
            .ok_or(PageError::MissingRouteParam(PROJECT_ID_PARAM))?;
        raw.trim()
            .parse::<ProjectId>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| PageError::InvalidProjectId(raw.to_string()))
    }
}

/// Tabs of the auction page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuctionTab {
    #[default]
    SellOffers,
    PurchaseOffers,
}

/// Everything the page talks to
#[derive(Clone)]
pub struct Collaborators {
    pub projects: Arc<dyn ProjectApi>,
    pub sell_offers: Arc<dyn SellOfferApi>,
    pub purchase_offers: Arc<dyn PurchaseOfferApi>,
    pub session: Arc<dyn SessionService>,
    pub notifier: Arc<dyn Notifier>,
    pub dialogs: Arc<dyn DialogController>,
}

impl Collaborators {
    /// Collaborators backed by the trading API
    pub fn over_http(
        client: ApiClient,
        session: HttpSession,
        notifier: Arc<dyn Notifier>,
        dialogs: Arc<dyn DialogController>,
    ) -> Self {
        let client = Arc::new(client);
        Self {
            projects: client.clone(),
            sell_offers: client.clone(),
            purchase_offers: client,
            session: Arc::new(session),
            notifier,
            dialogs,
        }
    }
}

/// How a submission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent
    Invalid,
    /// The server accepted the submission
    Saved,
    /// The server call failed; the user was notified
    Failed,
}

pub struct ProjectAuctionPage {
    title: &'static str,
    selected_tab: AuctionTab,
    project_id: ProjectId,
    current_project: Arc<RwLock<Option<Project>>>,
    directory: OfferDirectory,

    sell_form: Form,
    purchase_form: Form,
    buy_form: Option<Form>,
    current_sell_offer_buying: Option<SellOffer>,
    buy_total: Option<String>,

    collaborators: Collaborators,
    background: Vec<JoinHandle<()>>,
}

impl ProjectAuctionPage {
    pub fn new(route: &RouteParams, collaborators: Collaborators) -> Result<Self, PageError> {
        let project_id = route.project_id()?;

        Ok(Self {
            title: PAGE_TITLE,
            selected_tab: AuctionTab::default(),
            project_id,
            current_project: Arc::new(RwLock::new(None)),
            directory: OfferDirectory::new(),
            sell_form: build_sell_form(project_id),
            purchase_form: build_purchase_form(project_id),
            buy_form: None,
            current_sell_offer_buying: None,
            buy_total: None,
            collaborators,
            background: Vec::new(),
        })
    }

    /// Start loading the page. Must be called from within a tokio runtime.
    pub fn init(&mut self) {
        info!("📊 Loading auction page for project {}", self.project_id);

        self.load_project();
        self.sell_form = build_sell_form(self.project_id);
        self.purchase_form = build_purchase_form(self.project_id);
        self.refresh_sell_offers();
        self.refresh_purchase_offers();
    }

    /// Wait for every background load spawned so far
    pub async fn settle(&mut self) {
        for handle in std::mem::take(&mut self.background) {
            if let Err(e) = handle.await {
                error!("Background task failed: {}", e);
            }
        }
    }

    pub fn title(&self) -> &str {
        self.title
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn selected_tab(&self) -> AuctionTab {
        self.selected_tab
    }

    pub fn select_tab(&mut self, tab: AuctionTab) {
        self.selected_tab = tab;
    }

    pub fn current_project(&self) -> Option<Project> {
        self.current_project
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Contributions embedded in the loaded project
    pub fn current_contributions(&self) -> Option<Vec<Contribution>> {
        self.current_project().and_then(|project| project.contributions)
    }

    pub fn current_sales(&self) -> Option<Vec<SellOffer>> {
        self.directory.current_sales()
    }

    pub fn current_purchase_offers(&self) -> Option<Vec<PurchaseOffer>> {
        self.directory.current_purchase_offers()
    }

    pub fn directory(&self) -> &OfferDirectory {
        &self.directory
    }

    pub fn sell_form(&self) -> &Form {
        &self.sell_form
    }

    pub fn purchase_form(&self) -> &Form {
        &self.purchase_form
    }

    pub fn buy_form(&self) -> Option<&Form> {
        self.buy_form.as_ref()
    }

    pub fn current_sell_offer_buying(&self) -> Option<&SellOffer> {
        self.current_sell_offer_buying.as_ref()
    }

    /// Total price displayed next to the buy quantity
    pub fn buy_total(&self) -> Option<&str> {
        self.buy_total.as_deref()
    }

    pub fn set_sell_input(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        self.sell_form.set_input(field, raw)
    }

    pub fn set_purchase_input(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        self.purchase_form.set_input(field, raw)
    }

    /// Spawn a reload of the sell offers
    pub fn refresh_sell_offers(&mut self) {
        let directory = self.directory.clone();
        let api = Arc::clone(&self.collaborators.sell_offers);
        let project_id = self.project_id;
        self.spawn(async move {
            directory.refresh_sell_offers(api.as_ref(), project_id).await;
        });
    }

    /// Spawn a reload of the purchase offers
    pub fn refresh_purchase_offers(&mut self) {
        let directory = self.directory.clone();
        let api = Arc::clone(&self.collaborators.purchase_offers);
        let project_id = self.project_id;
        self.spawn(async move {
            directory.refresh_purchase_offers(api.as_ref(), project_id).await;
        });
    }

    pub fn open_sell_dialog(&self) {
        self.collaborators.dialogs.open(Dialog::CreateSellOffer);
    }

    pub fn open_purchase_offer_dialog(&self) {
        self.collaborators.dialogs.open(Dialog::CreatePurchaseOffer);
    }

    /// Select a sell offer to buy from and show the buy dialog
    pub fn open_buy_dialog(&mut self, sell_offer: SellOffer) {
        info!("🛒 Offer selected: {} ({} tokens at {})",
            sell_offer.id, sell_offer.number_of_tokens, sell_offer.sell_price_per_token);

        self.collaborators.dialogs.open(Dialog::BuyTokens);
        self.buy_form = Some(build_buy_form(sell_offer.id));
        self.current_sell_offer_buying = Some(sell_offer);
        self.buy_total = None;
    }

    pub fn close_buy_dialog(&self) {
        self.collaborators.dialogs.dismiss_all();
    }

    /// Update the number of tokens to buy and recompute the displayed total
    pub fn set_tokens_to_buy(&mut self, raw: &str) -> Result<(), FormError> {
        let form = self.buy_form.as_mut().ok_or(FormError::NotOpen("buy"))?;
        form.set_input(NB_TOKENS, raw)?;
        self.update_buy_total();
        Ok(())
    }

    pub async fn submit_sell_form(&mut self) -> SubmitOutcome {
        let Some(request) = Self::validated_payload::<CreateSellOfferRequest>(&mut self.sell_form) else {
            return SubmitOutcome::Invalid;
        };

        match self.collaborators.sell_offers.create(&request).await {
            Ok(offer) => {
                info!("✅ Created sell offer {} for project {}", offer.id, self.project_id);
                self.collaborators.dialogs.close(Dialog::CreateSellOffer);
                self.sell_form = build_sell_form(self.project_id);
                self.refresh_sell_offers();
                self.collaborators.notifier.success(SAVED_MESSAGE, SAVED_TITLE);
                SubmitOutcome::Saved
            }
            Err(e) => {
                self.report_save_error(&e);
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn submit_purchase_form(&mut self) -> SubmitOutcome {
        let Some(request) = Self::validated_payload::<CreatePurchaseOfferRequest>(&mut self.purchase_form) else {
            return SubmitOutcome::Invalid;
        };

        match self.collaborators.purchase_offers.create(&request).await {
            Ok(offer) => {
                info!("✅ Created purchase offer {} for project {}", offer.id, self.project_id);
                self.collaborators.dialogs.close(Dialog::CreatePurchaseOffer);
                self.purchase_form = build_purchase_form(self.project_id);
                self.refresh_purchase_offers();
                self.collaborators.notifier.success(SAVED_MESSAGE, SAVED_TITLE);
                SubmitOutcome::Saved
            }
            Err(e) => {
                self.report_save_error(&e);
                SubmitOutcome::Failed
            }
        }
    }

    /// Buy from the selected sell offer. The buy form is kept as is on
    /// success; opening the dialog again builds a new one.
    pub async fn submit_buy_form(&mut self) -> SubmitOutcome {
        let Some(form) = self.buy_form.as_mut() else {
            warn!("Buy submitted without a selected sell offer");
            return SubmitOutcome::Invalid;
        };
        let Some(request) = Self::validated_payload::<BuyRequest>(form) else {
            return SubmitOutcome::Invalid;
        };

        match self.collaborators.sell_offers.buy(&request).await {
            Ok(_transaction) => {
                info!("💸 Bought {} tokens from sell offer {}", request.nb_tokens, request.sell_offer);
                self.refresh_session();
                self.collaborators.dialogs.dismiss_all();
                self.refresh_sell_offers();
                self.collaborators
                    .notifier
                    .success(TRANSACTION_COMPLETE_MESSAGE, TRANSACTION_COMPLETE_TITLE);
                SubmitOutcome::Saved
            }
            Err(e) => {
                self.report_save_error(&e);
                self.attach_quantity_error(&e);
                SubmitOutcome::Failed
            }
        }
    }

    /// Mark the form submitted and, if it passes validation, build its payload
    fn validated_payload<T: serde::de::DeserializeOwned>(form: &mut Form) -> Option<T> {
        form.mark_submitted();
        if !form.is_valid() {
            debug!("Form has validation errors, not submitting");
            return None;
        }
        match form.payload() {
            Ok(request) => Some(request),
            Err(e) => {
                warn!("Form value rejected: {}", e);
                None
            }
        }
    }

    fn report_save_error(&self, e: &ApiError) {
        error!("Failed to save data: {}", e);
        self.collaborators.notifier.error(SAVE_ERROR_MESSAGE, &e.to_string());
    }

    fn attach_quantity_error(&mut self, e: &ApiError) {
        let Some(message) = e.body().and_then(|body| joined_field_error(body, NB_TOKENS_SERVER_ERROR)) else {
            return;
        };
        if let Some(control) = self.buy_form.as_mut().and_then(|form| form.control_mut(NB_TOKENS).ok()) {
            debug!("Attaching server error to {}: {}", NB_TOKENS, message);
            control.set_errors(BTreeMap::from([(NB_TOKENS_SERVER_ERROR.to_string(), message)]));
        }
    }

    fn update_buy_total(&mut self) {
        let quantity = self
            .buy_form
            .as_ref()
            .and_then(|form| form.control(NB_TOKENS))
            .and_then(|control| match control.value() {
                Value::Number(n) => n.as_i64(),
                _ => None,
            });

        self.buy_total = match (quantity, &self.current_sell_offer_buying) {
            (Some(quantity), Some(offer)) => match offer.unit_price() {
                Ok(price) => {
                    let total = compute_total(quantity, price);
                    if total.is_none() {
                        warn!("Total of {} tokens at {} is out of range", quantity, price);
                    }
                    total
                }
                Err(e) => {
                    warn!("Sell offer {} has an unreadable price {:?}: {}",
                        offer.id, offer.sell_price_per_token, e);
                    None
                }
            },
            _ => None,
        };
    }

    fn load_project(&mut self) {
        let api = Arc::clone(&self.collaborators.projects);
        let slot = Arc::clone(&self.current_project);
        let project_id = self.project_id;
        self.spawn(async move {
            match api.get(project_id).await {
                Ok(project) => {
                    info!("📁 Loaded project {}", project_id);
                    *slot.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(project);
                }
                Err(e) => warn!("Failed to load project {}: {}", project_id, e),
            }
        });
    }

    fn refresh_session(&mut self) {
        let session = Arc::clone(&self.collaborators.session);
        self.spawn(async move {
            if let Err(e) = session.refresh_user().await {
                warn!("Failed to refresh user session: {}", e);
            }
        });
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.background.retain(|handle| !handle.is_finished());
        self.background.push(tokio::spawn(task));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_project_id() {
        assert_eq!(RouteParams::new().with("id", "42").project_id().unwrap(), 42);
        assert!(matches!(
            RouteParams::new().project_id(),
            Err(PageError::MissingRouteParam("id"))
        ));
        assert!(matches!(
            RouteParams::new().with("id", "abc").project_id(),
            Err(PageError::InvalidProjectId(_))
        ));
        assert!(RouteParams::new().with("id", "0").project_id().is_err());
    }
}
