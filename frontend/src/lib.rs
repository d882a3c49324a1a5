//! Offer workflow for trading the tokens of a git project.
//!
//! The [`ProjectAuctionPage`] lists a project's sell offers and purchase
//! offers, creates new ones and buys from existing sell offers. It talks to
//! the outside world only through the traits in [`services::traits`].

pub mod config;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod page;
pub mod services;
pub mod state;

pub use config::AppConfig;
pub use errors::{ApiError, ConfigError, FormError, PageError};
pub use page::{AuctionTab, Collaborators, ProjectAuctionPage, RouteParams, SubmitOutcome};
