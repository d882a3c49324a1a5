//! # Modal State
//!
//! Visibility flags for the auction page's modal dialogs.
//!
//! ## Purpose:
//! The page only asks for dialogs to be opened or closed; whoever renders
//! them reads these flags. Centralizing them keeps the buy dialog from
//! staying open on top of a creation dialog.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::services::traits::{Dialog, DialogController};

#[derive(Debug, Default)]
struct ModalFlags {
    /// Whether the create sell offer modal is visible
    show_sell_offer_modal: bool,

    /// Whether the create purchase offer modal is visible
    show_purchase_offer_modal: bool,

    /// Whether the buy tokens modal is visible
    show_buy_modal: bool,
}

impl ModalFlags {
    fn flag(&mut self, dialog: Dialog) -> &mut bool {
        match dialog {
            Dialog::CreateSellOffer => &mut self.show_sell_offer_modal,
            Dialog::CreatePurchaseOffer => &mut self.show_purchase_offer_modal,
            Dialog::BuyTokens => &mut self.show_buy_modal,
        }
    }
}

/// Shared modal visibility state
#[derive(Debug, Clone, Default)]
pub struct ModalState {
    flags: Arc<Mutex<ModalFlags>>,
}

impl ModalState {
    /// Create new modal state with all modals hidden
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, dialog: Dialog) -> bool {
        *self.lock().flag(dialog)
    }

    pub fn any_open(&self) -> bool {
        let flags = self.lock();
        flags.show_sell_offer_modal || flags.show_purchase_offer_modal || flags.show_buy_modal
    }

    fn lock(&self) -> MutexGuard<'_, ModalFlags> {
        self.flags.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DialogController for ModalState {
    fn open(&self, dialog: Dialog) {
        debug!("Opening {:?} dialog", dialog);
        *self.lock().flag(dialog) = true;
    }

    fn close(&self, dialog: Dialog) {
        debug!("Closing {:?} dialog", dialog);
        *self.lock().flag(dialog) = false;
    }

    /// Hide all modals
    fn dismiss_all(&self) {
        let mut flags = self.lock();
        flags.show_sell_offer_modal = false;
        flags.show_purchase_offer_modal = false;
        flags.show_buy_modal = false;
    }
}
