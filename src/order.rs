//! Order requests sent through WhatsApp.
//!
//! The site has no backend for orders. The order form collects a few fields,
//! renders them into a plain-text message, and hands the customer a
//! `wa.me` deep link with the message pre-filled.
//!
//! ```text
//! *NOVO PEDIDO - Lubô Confeitaria*
//! ------------------------
//!
//! *Nome:* Ana
//! *WhatsApp:* (11) 98765-4321
//! ...
//! ```

use crate::config::OrderConfig;
use chrono::NaiveDate;
use thiserror::Error;

/// Brazilian numbers: two-digit area code plus eight or nine digits.
pub const MAX_PHONE_DIGITS: usize = 11;

const SEPARATOR: &str = "------------------------";

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("event date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("phone number must have between 10 and {max} digits, got {got}")]
    InvalidPhone { got: usize, max: usize },
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Format a Brazilian phone number as the user types it.
///
/// Non-digits are dropped and input beyond eleven digits ignored. Up to ten
/// digits are laid out as a landline `(AA) BBBB-CCCC`; eleven as a mobile
/// `(AA) BBBBB-CCCC`. Partial input gets a partial mask.
pub fn format_phone(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_PHONE_DIGITS)
        .collect();

    match digits.len() {
        0 => String::new(),
        1..=2 => format!("({digits}"),
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        len => {
            let split = if len <= 10 { 6 } else { 7 };
            let (area, rest) = digits.split_at(2);
            let (first, second) = rest.split_at(split - 2);
            if second.is_empty() {
                format!("({area}) {first}")
            } else {
                format!("({area}) {first}-{second}")
            }
        }
    }
}

/// Fields of the order form.
#[derive(Debug, Clone, Default)]
pub struct OrderRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    /// `YYYY-MM-DD`, as submitted by a date input.
    pub event_date: String,
    pub servings: u32,
    pub details: String,
}

impl OrderRequest {
    fn parse_date(&self) -> Result<NaiveDate, OrderError> {
        NaiveDate::parse_from_str(self.event_date.trim(), "%Y-%m-%d")
            .map_err(|_| OrderError::InvalidDate(self.event_date.clone()))
    }

    fn check(&self) -> Result<(), OrderError> {
        if self.name.trim().is_empty() {
            return Err(OrderError::MissingField("name"));
        }
        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        if !(10..=MAX_PHONE_DIGITS).contains(&digits) {
            return Err(OrderError::InvalidPhone {
                got: digits,
                max: MAX_PHONE_DIGITS,
            });
        }
        Ok(())
    }

    /// Render the WhatsApp message body.
    pub fn message(&self, config: &OrderConfig) -> Result<String, OrderError> {
        self.check()?;
        let date = self.parse_date()?;
        Ok(format!(
            "*NOVO PEDIDO - {business}*\n\
             {SEPARATOR}\n\n\
             *Nome:* {name}\n\
             *WhatsApp:* {phone}\n\
             *E-mail:* {email}\n\
             *Data do evento:* {date}\n\
             *Número de pessoas:* {servings}\n\n\
             *Detalhes do pedido:*\n{details}\n\n\
             {SEPARATOR}\n\
             Mensagem enviada via site",
            business = config.business_name,
            name = self.name.trim(),
            phone = format_phone(&self.phone),
            email = self.email.trim(),
            date = date.format("%d/%m/%Y"),
            servings = self.servings,
            details = self.details.trim(),
        ))
    }

    /// `https://wa.me/<number>?text=<message>` with the message percent-encoded.
    pub fn deep_link(&self, config: &OrderConfig) -> Result<String, OrderError> {
        let message = self.message(config)?;
        Ok(format!(
            "https://wa.me/{}?text={}",
            config.whatsapp_number,
            urlencoding::encode(&message)
        ))
    }
}
