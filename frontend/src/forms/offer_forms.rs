//! Builders for the three auction forms.
//!
//! Each builder returns a fresh form with its defaults restored; the page
//! rebuilds a form instead of clearing it field by field.

use serde_json::{json, Value};
use shared::{OfferId, ProjectId};

use super::{Form, FormControl, Validator};

pub const NUMBER_OF_TOKENS: &str = "number_of_tokens";
pub const SELL_PRICE_PER_TOKEN: &str = "sell_price_per_token";
pub const PURCHASE_PRICE_PER_TOKEN: &str = "purchase_price_per_token";
pub const PROJECT: &str = "project";
pub const NB_TOKENS: &str = "nb_tokens";
pub const SELL_OFFER: &str = "sell_offer";

/// Key under which server-side quantity errors are attached to `nb_tokens`
pub const NB_TOKENS_SERVER_ERROR: &str = "nbTokens";

fn quantity(default: i64) -> FormControl {
    FormControl::new(json!(default), vec![Validator::Required, Validator::Integer])
}

fn unit_price() -> FormControl {
    FormControl::new(json!(1), vec![Validator::Required, Validator::Decimal])
}

fn fixed_id(id: u64) -> FormControl {
    FormControl::fixed(Value::from(id), vec![Validator::Required])
}

/// Form creating a sell offer: 1 token at 1 per token for the project
pub fn build_sell_form(project_id: ProjectId) -> Form {
    Form::new()
        .with_control(NUMBER_OF_TOKENS, quantity(1))
        .with_control(SELL_PRICE_PER_TOKEN, unit_price())
        .with_control(PROJECT, fixed_id(project_id))
}

/// Form creating a purchase offer: 1 token at 1 per token for the project
pub fn build_purchase_form(project_id: ProjectId) -> Form {
    Form::new()
        .with_control(NUMBER_OF_TOKENS, quantity(1))
        .with_control(PURCHASE_PRICE_PER_TOKEN, unit_price())
        .with_control(PROJECT, fixed_id(project_id))
}

/// Form buying from a sell offer, starting at 0 tokens
pub fn build_buy_form(sell_offer_id: OfferId) -> Form {
    Form::new()
        .with_control(NB_TOKENS, quantity(0))
        .with_control(SELL_OFFER, fixed_id(sell_offer_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::{BuyRequest, CreatePurchaseOfferRequest, CreateSellOfferRequest};

    #[test]
    fn test_sell_form_defaults() {
        let form = build_sell_form(3);

        assert!(form.is_valid());
        assert!(!form.is_submitted());
        assert_eq!(form.control(NUMBER_OF_TOKENS).unwrap().value(), &json!(1));
        assert_eq!(form.control(SELL_PRICE_PER_TOKEN).unwrap().value(), &json!(1));
        assert_eq!(form.control(PROJECT).unwrap().value(), &json!(3));
        assert!(form.control(PROJECT).unwrap().is_read_only());

        let request: CreateSellOfferRequest = form.payload().unwrap();
        assert_eq!(
            request,
            CreateSellOfferRequest {
                number_of_tokens: 1,
                sell_price_per_token: Decimal::ONE,
                project: 3,
            }
        );
    }

    #[test]
    fn test_purchase_form_payload_after_input() {
        let mut form = build_purchase_form(5);
        form.set_input(NUMBER_OF_TOKENS, "12").unwrap();
        form.set_input(PURCHASE_PRICE_PER_TOKEN, "0.75").unwrap();

        let request: CreatePurchaseOfferRequest = form.payload().unwrap();
        assert_eq!(request.number_of_tokens, 12);
        assert_eq!(request.purchase_price_per_token, Decimal::new(75, 2));
        assert_eq!(request.project, 5);
    }

    #[test]
    fn test_buy_form_defaults_to_zero_tokens() {
        let form = build_buy_form(7);

        // zero passes the required check; the server judges the quantity
        assert!(form.is_valid());
        let request: BuyRequest = form.payload().unwrap();
        assert_eq!(request, BuyRequest { nb_tokens: 0, sell_offer: 7 });
    }

    #[test]
    fn test_buy_form_offer_is_fixed() {
        let mut form = build_buy_form(7);
        assert!(form.set_input(SELL_OFFER, "8").is_err());
        assert_eq!(form.value().get(SELL_OFFER), Some(&json!(7)));
    }
}
