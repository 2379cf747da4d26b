use serde::Deserialize;

use workwear_core::{parse_quantity, DomainError, DomainResult, IssuanceRequest};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub data: Vec<IssuanceLineDto>,
}

/// One form line. Fields are optional so a missing one is reported by name.
#[derive(Debug, Default, Deserialize)]
pub struct IssuanceLineDto {
    pub date: Option<String>,
    pub name: Option<String>,
    pub foreman: Option<String>,
    pub item: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<QuantityField>,
}

/// Quantity as sent by the form: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuantityField {
    Integer(i64),
    Text(String),
    Other(serde_json::Value),
}

impl QuantityField {
    fn parse(&self) -> DomainResult<i64> {
        match self {
            QuantityField::Integer(n) => Ok(*n),
            QuantityField::Text(raw) => parse_quantity(raw),
            QuantityField::Other(value) => Err(DomainError::invalid_quantity(format!(
                "{value} is not an integer"
            ))),
        }
    }
}

impl IssuanceLineDto {
    pub fn into_request(self, line: usize) -> DomainResult<IssuanceRequest> {
        let field = |value: &Option<String>, name: &str| -> DomainResult<String> {
            value
                .clone()
                .ok_or_else(|| DomainError::validation(format!("line {}: missing field {name}", line + 1)))
        };

        let quantity = self
            .quantity
            .as_ref()
            .ok_or_else(|| DomainError::validation(format!("line {}: missing field quantity", line + 1)))?
            .parse()?;

        IssuanceRequest::new(
            &field(&self.date, "date")?,
            &field(&self.name, "name")?,
            &field(&self.foreman, "foreman")?,
            &field(&self.item, "item")?,
            self.item_type.as_deref().unwrap_or_default(),
            &field(&self.size, "size")?,
            quantity,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}
