use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Numeric identifier of a git project on the trading platform
pub type ProjectId = u64;

/// Numeric identifier of a sell offer or purchase offer
pub type OfferId = u64;

/// A git project whose tokens are traded.
///
/// Only the id matters to the auction workflow; everything else the server
/// sends is kept verbatim in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Contributions embedded by the server, when it chooses to send them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributions: Option<Vec<Contribution>>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Project {
    /// Display name of the project, if the server sent one
    pub fn name(&self) -> Option<&str> {
        self.attributes
            .get("full_name")
            .or_else(|| self.attributes.get("name"))
            .and_then(Value::as_str)
    }
}

/// A contribution to a project. Read-only and opaque to the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Reference from an offer to its owning project.
///
/// Depending on the endpoint the server either sends the bare id or the
/// embedded project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectRef {
    Id(ProjectId),
    Embedded(Box<Project>),
}

impl ProjectRef {
    pub fn id(&self) -> ProjectId {
        match self {
            ProjectRef::Id(id) => *id,
            ProjectRef::Embedded(project) => project.id,
        }
    }
}

/// A listing offering tokens of a project at a unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellOffer {
    pub id: OfferId,
    pub number_of_tokens: u32,
    /// Unit price, kept as the server's decimal string
    pub sell_price_per_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
}

impl SellOffer {
    /// Parse the unit price into a decimal
    pub fn unit_price(&self) -> Result<Decimal, rust_decimal::Error> {
        Decimal::from_str(self.sell_price_per_token.trim())
    }
}

/// A listing of intent to buy tokens of a project at a unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOffer {
    pub id: OfferId,
    pub number_of_tokens: u32,
    /// Unit price, kept as the server's decimal string
    pub purchase_price_per_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
}

/// Payload for POST /api/sell-offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSellOfferRequest {
    pub number_of_tokens: i64,
    pub sell_price_per_token: Decimal,
    pub project: ProjectId,
}

/// Payload for POST /api/purchase-offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePurchaseOfferRequest {
    pub number_of_tokens: i64,
    pub purchase_price_per_token: Decimal,
    pub project: ProjectId,
}

/// Payload for POST /api/sell-offers/buy.
///
/// `nb_tokens` is not bounded client-side; the server checks it against the
/// tokens still available on the offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyRequest {
    pub nb_tokens: i64,
    pub sell_offer: OfferId,
}

/// Result of a completed buy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Authenticated user as returned by GET /api/users/me
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}
