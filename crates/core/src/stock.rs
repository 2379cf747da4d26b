//! Stock vocabulary: the (item, type, size) triple and canonical sizes.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Garment size in canonical order.
///
/// The derived `Ord` follows declaration order, which is the order sizes are
/// laid out in the stock grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "S")]
    S,
    #[serde(rename = "M")]
    M,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "XL")]
    Xl,
    #[serde(rename = "XLL")]
    Xll,
    #[serde(rename = "XLLL")]
    Xlll,
}

impl Size {
    /// Every size, in the order rows are written to the grid.
    pub const CANONICAL: [Size; 6] = [Size::S, Size::M, Size::L, Size::Xl, Size::Xll, Size::Xlll];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::Xl => "XL",
            Size::Xll => "XLL",
            Size::Xlll => "XLLL",
        }
    }
}

impl core::fmt::Display for Size {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Size {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Size::CANONICAL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| DomainError::UnknownSize(label.to_string()))
    }
}

/// Identity of one stock row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockKey {
    pub item: String,
    pub item_type: String,
    pub size: String,
}

impl StockKey {
    pub fn new(
        item: impl Into<String>,
        item_type: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            item_type: item_type.into(),
            size: size.into(),
        }
    }
}

impl core::fmt::Display for StockKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}/{}", self.item, self.item_type, self.size)
    }
}

/// One stock row: quantity on hand for an (item, type, size) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub item: String,
    pub item_type: String,
    pub size: String,
    pub quantity: i64,
}

impl StockEntry {
    pub fn new(
        item: impl Into<String>,
        item_type: impl Into<String>,
        size: impl Into<String>,
        quantity: i64,
    ) -> Self {
        Self {
            item: item.into(),
            item_type: item_type.into(),
            size: size.into(),
            quantity,
        }
    }

    pub fn key(&self) -> StockKey {
        StockKey::new(&self.item, &self.item_type, &self.size)
    }
}
