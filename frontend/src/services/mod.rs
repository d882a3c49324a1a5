pub mod api;
pub mod dialog;
pub mod notifications;
pub mod session;
pub mod traits;

pub use api::ApiClient;
pub use dialog::ModalState;
pub use notifications::{Toast, ToastLevel, ToastQueue};
pub use session::HttpSession;
pub use traits::{
    Dialog, DialogController, Notifier, ProjectApi, PurchaseOfferApi, SellOfferApi, SessionService,
};
