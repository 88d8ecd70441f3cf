//! Display model of a saved credit card.
//!
//! Formatting is a pure function of the [`UserCreditCard`] record. Deletion
//! is only dispatched: the card id is forwarded to a callback supplied by the
//! caller, which owns the actual removal.

use crate::models::UserCreditCard;
use serde::Serialize;

/// Characters shown between the first six and last four digits.
pub const MASK: &str = "******";

pub const LABEL_ACTIVE: &str = "Active";
pub const LABEL_INACTIVE: &str = "Inactive";

/// Styling variant, derived from the same check as the status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTone {
    Active,
    Inactive,
}

/// Display strings of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditCardView {
    pub holder_name: String,
    pub brand: Option<String>,
    /// `123456******7890`
    pub masked_number: String,
    /// `MM/YYYY`
    pub expiration: String,
    pub status_label: &'static str,
    pub tone: CardTone,
    pub address_line: String,
    /// `City - UF`
    pub city_state: String,
    pub zip_code: String,
}

/// First six digits, the mask, then the last four digits.
pub fn masked_number(first_six_digits: &str, last_four_digits: &str) -> String {
    format!("{}{}{}", first_six_digits, MASK, last_four_digits)
}

/// Month padded to two digits, a slash, then the year.
pub fn expiration(exp_month: u32, exp_year: i32) -> String {
    format!("{:02}/{}", exp_month, exp_year)
}

impl CreditCardView {
    pub fn render(card: &UserCreditCard) -> Self {
        let active = card.is_active();
        let address = &card.billing_address;

        Self {
            holder_name: card.holder_name.clone(),
            brand: card.brand.clone(),
            masked_number: masked_number(&card.first_six_digits, &card.last_four_digits),
            expiration: expiration(card.exp_month, card.exp_year),
            status_label: if active { LABEL_ACTIVE } else { LABEL_INACTIVE },
            tone: if active {
                CardTone::Active
            } else {
                CardTone::Inactive
            },
            address_line: address.line_1.clone(),
            city_state: format!("{} - {}", address.city, address.state),
            zip_code: address.zip_code.clone(),
        }
    }
}

/// A card paired with the caller's delete handler.
pub struct CreditCardItem<'a, F>
where
    F: FnMut(&str),
{
    card: &'a UserCreditCard,
    on_delete: F,
}

impl<'a, F> CreditCardItem<'a, F>
where
    F: FnMut(&str),
{
    pub fn new(card: &'a UserCreditCard, on_delete: F) -> Self {
        Self { card, on_delete }
    }

    pub fn card(&self) -> &UserCreditCard {
        self.card
    }

    pub fn view(&self) -> CreditCardView {
        CreditCardView::render(self.card)
    }

    /// Forwards the card id to the delete handler.
    pub fn press_delete(&mut self) {
        tracing::debug!("Delete requested for card {}", self.card.id);
        (self.on_delete)(&self.card.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_number_layout() {
        assert_eq!(masked_number("123456", "7890"), "123456******7890");
    }

    #[test]
    fn test_expiration_padding() {
        assert_eq!(expiration(3, 2026), "03/2026");
        assert_eq!(expiration(12, 2030), "12/2030");
    }
}
