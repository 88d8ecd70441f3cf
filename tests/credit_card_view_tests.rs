/// Tests for the credit card display model and delete dispatch
use rust_contratos_core::credit_card_view::{CardTone, CreditCardItem, CreditCardView};
use rust_contratos_core::models::UserCreditCard;
use serde_json::json;

fn card(status: &str) -> UserCreditCard {
    serde_json::from_value(json!({
        "id": "card_8f2a1c",
        "holder_name": "MARIA SOUZA",
        "brand": "visa",
        "first_six_digits": "123456",
        "last_four_digits": "7890",
        "exp_month": 3,
        "exp_year": 2026,
        "status": status,
        "billing_address": {
            "line_1": "Avenida Paulista, 1000, apto 12",
            "line_2": null,
            "city": "São Paulo",
            "state": "SP",
            "zip_code": "01310-100",
            "country": "BR"
        },
        "created_at": "2026-01-05T12:00:00Z",
        "updated_at": null
    }))
    .unwrap()
}

#[test]
fn test_masked_number() {
    let view = CreditCardView::render(&card("active"));
    assert_eq!(view.masked_number, "123456******7890");
}

#[test]
fn test_expiration() {
    let view = CreditCardView::render(&card("active"));
    assert_eq!(view.expiration, "03/2026");
}

#[test]
fn test_status_label_and_tone() {
    let active = CreditCardView::render(&card("active"));
    assert_eq!(active.status_label, "Active");
    assert_eq!(active.tone, CardTone::Active);

    for status in ["inactive", "blocked", "Active", ""] {
        let view = CreditCardView::render(&card(status));
        assert_eq!(view.status_label, "Inactive", "status {:?}", status);
        assert_eq!(view.tone, CardTone::Inactive);
    }
}

#[test]
fn test_billing_address_verbatim() {
    let view = CreditCardView::render(&card("active"));
    assert_eq!(view.address_line, "Avenida Paulista, 1000, apto 12");
    assert_eq!(view.city_state, "São Paulo - SP");
    assert_eq!(view.zip_code, "01310-100");
}

#[test]
fn test_render_is_pure() {
    let c = card("active");
    assert_eq!(CreditCardView::render(&c), CreditCardView::render(&c));
}

#[test]
fn test_delete_forwards_card_id_once() {
    let c = card("active");
    let mut calls: Vec<String> = Vec::new();

    {
        let mut item = CreditCardItem::new(&c, |id: &str| calls.push(id.to_string()));
        item.press_delete();
        assert_eq!(item.view().masked_number, "123456******7890");
    }

    assert_eq!(calls, vec!["card_8f2a1c".to_string()]);
}

#[test]
fn test_card_without_billing_address_rejected() {
    let result: Result<UserCreditCard, _> = serde_json::from_value(json!({
        "id": "card_1",
        "holder_name": "MARIA SOUZA",
        "brand": null,
        "first_six_digits": "123456",
        "last_four_digits": "7890",
        "exp_month": 3,
        "exp_year": 2026,
        "status": "active"
    }));
    assert!(result.is_err());
}
