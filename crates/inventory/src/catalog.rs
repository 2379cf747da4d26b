//! Picker catalog and name search.

use serde::Serialize;

use workwear_core::StockEntry;

/// An issuable size and its balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeQuantity {
    pub size: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogType {
    pub item_type: String,
    /// Sizes with a positive balance, store order.
    pub sizes: Vec<SizeQuantity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub item: String,
    pub types: Vec<CatalogType>,
}

/// What the issuance form can offer: items, their types (first-seen order) and
/// the sizes currently in stock.
///
/// Every type held in stock is listed, even when all of its sizes are at zero;
/// zero-balance sizes are never listed because they cannot be issued.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn from_stock(stock: &[StockEntry]) -> Self {
        let mut items: Vec<CatalogItem> = Vec::new();

        for entry in stock {
            let item_pos = match items.iter().position(|i| i.item == entry.item) {
                Some(pos) => pos,
                None => {
                    items.push(CatalogItem {
                        item: entry.item.clone(),
                        types: Vec::new(),
                    });
                    items.len() - 1
                }
            };
            let types = &mut items[item_pos].types;
            let type_pos = match types.iter().position(|t| t.item_type == entry.item_type) {
                Some(pos) => pos,
                None => {
                    types.push(CatalogType {
                        item_type: entry.item_type.clone(),
                        sizes: Vec::new(),
                    });
                    types.len() - 1
                }
            };

            if entry.quantity > 0 {
                types[type_pos].sizes.push(SizeQuantity {
                    size: entry.size.clone(),
                    quantity: entry.quantity,
                });
            }
        }

        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Labelled types of an item; blank (untyped) labels are left out.
    pub fn types_of(&self, item: &str) -> Vec<&str> {
        self.items
            .iter()
            .find(|i| i.item == item)
            .map(|i| {
                i.types
                    .iter()
                    .map(|t| t.item_type.as_str())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn sizes_of(&self, item: &str, item_type: &str) -> Option<&[SizeQuantity]> {
        self.items
            .iter()
            .find(|i| i.item == item)?
            .types
            .iter()
            .find(|t| t.item_type == item_type)
            .map(|t| t.sizes.as_slice())
    }
}

/// Case-insensitive substring search over `names`, keeping their order.
///
/// A blank query matches nothing.
pub fn search_names(names: &[String], query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    names
        .iter()
        .filter(|n| n.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> Vec<StockEntry> {
        vec![
            StockEntry::new("T-shirt", "Orange(worker)", "S", 10),
            StockEntry::new("T-shirt", "Orange(worker)", "M", 0),
            StockEntry::new("T-shirt", "Red(foreman)", "S", 0),
            StockEntry::new("Cap", "", "L", 2),
        ]
    }

    #[test]
    fn zero_balance_sizes_are_hidden() {
        let catalog = Catalog::from_stock(&stock());
        let sizes = catalog.sizes_of("T-shirt", "Orange(worker)").unwrap();
        assert_eq!(sizes, &[SizeQuantity { size: "S".to_string(), quantity: 10 }]);
        assert!(catalog.sizes_of("T-shirt", "Red(foreman)").unwrap().is_empty());
    }

    #[test]
    fn restocked_size_reappears() {
        let mut entries = stock();
        entries[1].quantity += 1;
        let catalog = Catalog::from_stock(&entries);
        let sizes = catalog.sizes_of("T-shirt", "Orange(worker)").unwrap();
        assert!(sizes.iter().any(|s| s.size == "M" && s.quantity == 1));
    }

    #[test]
    fn types_keep_first_seen_order_and_skip_blank_labels() {
        let catalog = Catalog::from_stock(&stock());
        assert_eq!(catalog.types_of("T-shirt"), vec!["Orange(worker)", "Red(foreman)"]);
        assert!(catalog.types_of("Cap").is_empty());
        assert_eq!(catalog.items()[1].item, "Cap");
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let names: Vec<String> = ["Ivan Petrenko", "Anna", "Oleksandr Ivanov"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(search_names(&names, "IVAN"), vec!["Ivan Petrenko", "Oleksandr Ivanov"]);
        assert!(search_names(&names, "  ").is_empty());
    }
}
