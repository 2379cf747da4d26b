//! Issuance requests: one line of a distribution batch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::stock::StockKey;

/// Calendar date format accepted on issuance lines and written to the report.
pub const ISSUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated issuance line: `quantity` units of one stock row handed to a
/// worker by a foreman on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRequest {
    pub date: NaiveDate,
    pub worker: String,
    pub foreman: String,
    pub item: String,
    pub item_type: String,
    pub size: String,
    pub quantity: i64,
}

impl IssuanceRequest {
    /// Build a request from loosely-typed boundary values.
    ///
    /// Names are trimmed. `item_type` may be blank (untyped items), every other
    /// text field is required.
    pub fn new(
        date: &str,
        worker: &str,
        foreman: &str,
        item: &str,
        item_type: &str,
        size: &str,
        quantity: i64,
    ) -> DomainResult<Self> {
        let date = parse_issue_date(date)?;
        let worker = required("name", worker)?;
        let foreman = required("foreman", foreman)?;
        let item = required("item", item)?;
        let size = required("size", size)?;

        if quantity <= 0 {
            return Err(DomainError::invalid_quantity(format!(
                "{quantity} for {item}/{}/{size}: must be a positive integer",
                item_type.trim()
            )));
        }

        Ok(Self {
            date,
            worker,
            foreman,
            item,
            item_type: item_type.trim().to_string(),
            size,
            quantity,
        })
    }

    pub fn key(&self) -> StockKey {
        StockKey::new(&self.item, &self.item_type, &self.size)
    }
}

/// Parse an issuance date in [`ISSUE_DATE_FORMAT`].
pub fn parse_issue_date(raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), ISSUE_DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(raw.to_string()))
}

/// Parse a quantity typed into a form field (`"3"`, `" 12 "`).
pub fn parse_quantity(raw: &str) -> DomainResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DomainError::invalid_quantity(format!("`{raw}` is not an integer")))
}

fn required(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("`{field}` cannot be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_trimmed_request() {
        let req =
            IssuanceRequest::new("2024-07-01", " Ivan ", "Petro", "T-shirt", "Red", "M", 2).unwrap();
        assert_eq!(req.worker, "Ivan");
        assert_eq!(req.date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(req.key(), StockKey::new("T-shirt", "Red", "M"));
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        for q in [0, -3] {
            let err = IssuanceRequest::new("2024-07-01", "Ivan", "Petro", "T-shirt", "Red", "M", q)
                .unwrap_err();
            assert!(matches!(err, DomainError::InvalidQuantity(_)));
        }
    }

    #[test]
    fn unparsable_date_is_rejected() {
        let err = IssuanceRequest::new("01.07.2024", "Ivan", "Petro", "T-shirt", "Red", "M", 1)
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidDate("01.07.2024".to_string()));
    }

    #[test]
    fn blank_worker_is_rejected() {
        let err =
            IssuanceRequest::new("2024-07-01", "  ", "Petro", "T-shirt", "Red", "M", 1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("name")));
    }

    #[test]
    fn blank_type_is_allowed() {
        let req = IssuanceRequest::new("2024-07-01", "Ivan", "Petro", "Cap", "", "M", 1).unwrap();
        assert_eq!(req.item_type, "");
    }

    #[test]
    fn quantity_text_parses() {
        assert_eq!(parse_quantity(" 12 ").unwrap(), 12);
        assert!(matches!(parse_quantity("two"), Err(DomainError::InvalidQuantity(_))));
    }
}
