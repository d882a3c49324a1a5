//! Command-line driver: opens the auction page of a project and prints its
//! offer directory.
//!
//! Usage: `project-auction <project-id>`

use std::sync::Arc;

use anyhow::Context;
use project_auction::domain::pricing::format_price;
use project_auction::services::{ApiClient, HttpSession, ModalState, ToastQueue};
use project_auction::{AppConfig, Collaborators, ProjectAuctionPage, RouteParams};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // .env is optional
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    let project_id = std::env::args()
        .nth(1)
        .context("usage: project-auction <project-id>")?;

    info!("Starting project auction client against {}", config.api_base_url);

    let client = ApiClient::from_config(&config)?;
    let toasts = ToastQueue::new();
    let collaborators = Collaborators::over_http(
        client.clone(),
        HttpSession::new(client),
        Arc::new(toasts.clone()),
        Arc::new(ModalState::new()),
    );

    let route = RouteParams::new().with("id", project_id);
    let mut page = ProjectAuctionPage::new(&route, collaborators)?;
    page.init();
    page.settle().await;

    let project_name = page
        .current_project()
        .and_then(|project| project.name().map(str::to_string))
        .unwrap_or_else(|| format!("project {}", page.project_id()));
    println!("{}: {}", page.title(), project_name);

    match page.current_sales() {
        Some(sales) => {
            println!("\nSell offers ({})", sales.len());
            for offer in sales {
                println!("  #{:<6} {:>8} tokens at {}", offer.id, offer.number_of_tokens, price_label(&offer.sell_price_per_token));
            }
        }
        None => println!("\nSell offers could not be loaded"),
    }

    match page.current_purchase_offers() {
        Some(offers) => {
            println!("\nPurchase offers ({})", offers.len());
            for offer in offers {
                println!("  #{:<6} {:>8} tokens at {}", offer.id, offer.number_of_tokens, price_label(&offer.purchase_price_per_token));
            }
        }
        None => println!("\nPurchase offers could not be loaded"),
    }

    Ok(())
}

fn price_label(raw: &str) -> String {
    Decimal::from_str(raw.trim())
        .map(format_price)
        .unwrap_or_else(|_| raw.to_string())
}
