//! Stock grid codec.
//!
//! The stock worksheet is a matrix of strings:
//!
//! ```text
//!  row 0:  Item | T-shirt | (span) | (span) | Cap
//!  row 1:  Size | Orange  | Red    | Black  |
//!  row 2:  S    | 10      | 5      | 8      | 3
//!  row 3:  M    | 20      | 15     | 18     | 0
//!  ...
//! ```
//!
//! An item name covers every following column whose item cell is blank but
//! whose type cell is not (a merged cell exported cell by cell). Column position
//! is only a join key: [`ColumnIndex`] turns the two header rows into an
//! explicit column → (item, type) map once per decode or encode.

use std::collections::HashMap;

use tracing::warn;
use workwear_core::{DomainError, DomainResult, Size, StockEntry};

/// Row-major matrix of cell strings, as exchanged with the spreadsheet.
pub type Grid = Vec<Vec<String>>;

/// Corner label above the item names.
pub const ITEM_HEADER: &str = "Item";
/// Corner label above the size column.
pub const SIZE_HEADER: &str = "Size";

const HEADER_ROWS: usize = 2;

/// A1-style reference of a zero-based (row, column) position, e.g. `(2, 1)` → `B3`.
pub fn a1(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect::<String>() + &(row + 1).to_string()
}

/// Explicit column → (item, item_type) index built from the header rows.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnIndex {
    /// `columns[c]` describes grid column `c + 1` (column 0 holds size labels).
    columns: Vec<Option<(String, String)>>,
}

impl ColumnIndex {
    fn from_headers(items: &[String], types: &[String]) -> DomainResult<Self> {
        let width = items.len().max(types.len());
        let mut columns = Vec::with_capacity(width.saturating_sub(1));
        let mut current_item: Option<String> = None;

        for col in 1..width {
            let item_cell = cell(items, col);
            let type_cell = cell(types, col);

            let item = if !item_cell.is_empty() {
                current_item = Some(item_cell.to_string());
                current_item.clone()
            } else if !type_cell.is_empty() {
                match &current_item {
                    Some(item) => Some(item.clone()),
                    None => {
                        return Err(DomainError::malformed(format!(
                            "type label `{type_cell}` at {} has no item name to its left",
                            a1(1, col)
                        )));
                    }
                }
            } else {
                None
            };

            columns.push(item.map(|item| (item, type_cell.to_string())));
        }

        Ok(Self { columns })
    }

    /// Number of grid columns covered by the headers, size column included.
    fn width(&self) -> usize {
        self.columns.len() + 1
    }

    fn header(&self, col: usize) -> Option<&(String, String)> {
        col.checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .and_then(Option::as_ref)
    }
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(|c| c.trim()).unwrap_or("")
}

/// Decode a stock grid into stock entries.
///
/// Entries are emitted column by column (top to bottom within a column), so the
/// first-seen order of items and types follows the sheet's column order. Only
/// positive integer cells produce entries; empty, zero and non-numeric cells
/// are skipped. A data row shorter than the headers is read as if the missing
/// cells were empty.
///
/// Fails with [`DomainError::MalformedGrid`] when the grid has fewer than three
/// rows, when a non-empty cell sits in a column with no item header, or when a
/// quantity sits in a row with no size label.
pub fn decode(grid: &[Vec<String>]) -> DomainResult<Vec<StockEntry>> {
    if grid.len() < HEADER_ROWS + 1 {
        return Err(DomainError::malformed(format!(
            "expected item, type and at least one size row, found {} row(s)",
            grid.len()
        )));
    }

    let index = ColumnIndex::from_headers(&grid[0], &grid[1])?;
    let data = &grid[HEADER_ROWS..];

    for (offset, row) in data.iter().enumerate() {
        let row_idx = offset + HEADER_ROWS;
        for (col, value) in row.iter().enumerate().skip(1) {
            if !value.trim().is_empty() && index.header(col).is_none() {
                return Err(DomainError::malformed(format!(
                    "cell {} holds `{}` but its column has no item header",
                    a1(row_idx, col),
                    value.trim()
                )));
            }
        }
        if row.len() < index.width() && row.iter().skip(1).any(|c| !c.trim().is_empty()) {
            warn!(
                row = row_idx + 1,
                cells = row.len(),
                header_width = index.width(),
                "stock row shorter than header; missing cells read as empty"
            );
        }
    }

    let mut entries = Vec::new();
    for col in 1..index.width() {
        let Some((item, item_type)) = index.header(col) else {
            continue;
        };

        for (offset, row) in data.iter().enumerate() {
            let row_idx = offset + HEADER_ROWS;
            let Some(raw) = row.get(col) else {
                continue;
            };
            let Some(quantity) = parse_quantity_cell(raw, row_idx, col) else {
                continue;
            };

            let size = cell(row, 0);
            if size.is_empty() {
                return Err(DomainError::malformed(format!(
                    "cell {} holds a quantity but row {} has no size label",
                    a1(row_idx, col),
                    row_idx + 1
                )));
            }

            entries.push(StockEntry::new(item, item_type, size, quantity));
        }
    }

    Ok(entries)
}

fn parse_quantity_cell(raw: &str, row: usize, col: usize) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<i64>() {
        Ok(q) if q > 0 => Some(q),
        Ok(0) => None,
        Ok(q) => {
            warn!(cell = %a1(row, col), quantity = q, "negative stock cell skipped");
            None
        }
        Err(_) => {
            warn!(cell = %a1(row, col), value = trimmed, "non-numeric stock cell skipped");
            None
        }
    }
}

/// Encode stock entries into a grid.
///
/// Columns are grouped by item, then by type within the item, both in
/// first-seen order. One data row is written per canonical size
/// (S, M, L, XL, XLL, XLLL); combinations without an entry are written as `0`.
///
/// Fails with [`DomainError::UnknownSize`] if any entry carries a size outside
/// the canonical order, before anything is produced.
pub fn encode(entries: &[StockEntry]) -> DomainResult<Grid> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    let mut quantities: HashMap<(usize, usize, Size), i64> = HashMap::new();

    for entry in entries {
        let size: Size = entry.size.parse()?;

        let item_pos = match groups.iter().position(|(item, _)| *item == entry.item) {
            Some(pos) => pos,
            None => {
                groups.push((entry.item.clone(), Vec::new()));
                groups.len() - 1
            }
        };
        let types = &mut groups[item_pos].1;
        let type_pos = match types.iter().position(|t| *t == entry.item_type) {
            Some(pos) => pos,
            None => {
                types.push(entry.item_type.clone());
                types.len() - 1
            }
        };

        *quantities.entry((item_pos, type_pos, size)).or_insert(0) += entry.quantity;
    }

    let mut item_row = vec![ITEM_HEADER.to_string()];
    let mut type_row = vec![SIZE_HEADER.to_string()];
    for (item, types) in &groups {
        for (i, item_type) in types.iter().enumerate() {
            // Blank-typed columns repeat the item name, otherwise they would
            // read back as header-less columns.
            let label = if i == 0 || item_type.is_empty() { item.clone() } else { String::new() };
            item_row.push(label);
            type_row.push(item_type.clone());
        }
    }

    let mut grid = vec![item_row, type_row];
    for size in Size::CANONICAL {
        let mut row = vec![size.as_str().to_string()];
        for (item_pos, (_, types)) in groups.iter().enumerate() {
            for type_pos in 0..types.len() {
                let q = quantities.get(&(item_pos, type_pos, size)).copied().unwrap_or(0);
                row.push(q.to_string());
            }
        }
        grid.push(row);
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn g(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn matrix(entries: &[StockEntry]) -> BTreeMap<(String, String, String), i64> {
        entries
            .iter()
            .map(|e| ((e.item.clone(), e.item_type.clone(), e.size.clone()), e.quantity))
            .collect()
    }

    fn sample() -> Grid {
        g(&[
            &["Item", "T-shirt", "", "Cap"],
            &["Size", "Orange", "Red", ""],
            &["S", "10", "5", "3"],
            &["M", "20", "", "0"],
            &["L", "x", "25", ""],
        ])
    }

    #[test]
    fn a1_references() {
        assert_eq!(a1(0, 0), "A1");
        assert_eq!(a1(2, 1), "B3");
        assert_eq!(a1(9, 26), "AA10");
    }

    #[test]
    fn decode_reads_spanned_item_headers_column_by_column() {
        let entries = decode(&sample()).unwrap();
        assert_eq!(
            entries,
            vec![
                StockEntry::new("T-shirt", "Orange", "S", 10),
                StockEntry::new("T-shirt", "Orange", "M", 20),
                StockEntry::new("T-shirt", "Red", "S", 5),
                StockEntry::new("T-shirt", "Red", "L", 25),
                StockEntry::new("Cap", "", "S", 3),
            ]
        );
    }

    #[test]
    fn decode_requires_three_rows() {
        let err = decode(&g(&[&["Item", "T-shirt"], &["Size", "Red"]])).unwrap_err();
        assert!(matches!(err, DomainError::MalformedGrid(_)));
    }

    #[test]
    fn decode_rejects_quantity_without_header() {
        let grid = g(&[
            &["Item", "T-shirt"],
            &["Size", "Red"],
            &["S", "1", "7"],
        ]);
        let err = decode(&grid).unwrap_err();
        match err {
            DomainError::MalformedGrid(msg) => assert!(msg.contains("C3"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_type_without_item() {
        let grid = g(&[&["Item", ""], &["Size", "Red"], &["S", "1"]]);
        assert!(matches!(decode(&grid), Err(DomainError::MalformedGrid(_))));
    }

    #[test]
    fn decode_rejects_quantity_without_size_label() {
        let grid = g(&[&["Item", "Cap"], &["Size", ""], &["", "4"]]);
        assert!(matches!(decode(&grid), Err(DomainError::MalformedGrid(_))));
    }

    #[test]
    fn decode_tolerates_short_rows() {
        let grid = g(&[
            &["Item", "T-shirt", ""],
            &["Size", "Orange", "Red"],
            &["S", "4"],
            &["M", "1", "2"],
        ]);
        let entries = decode(&grid).unwrap();
        assert_eq!(
            entries,
            vec![
                StockEntry::new("T-shirt", "Orange", "S", 4),
                StockEntry::new("T-shirt", "Orange", "M", 1),
                StockEntry::new("T-shirt", "Red", "M", 2),
            ]
        );
    }

    #[test]
    fn encode_groups_by_first_seen_item_then_type() {
        let entries = vec![
            StockEntry::new("T-shirt", "Red", "M", 2),
            StockEntry::new("Cap", "", "S", 1),
            StockEntry::new("T-shirt", "Orange", "S", 3),
        ];
        let grid = encode(&entries).unwrap();
        assert_eq!(grid[0], vec!["Item", "T-shirt", "", "Cap"]);
        assert_eq!(grid[1], vec!["Size", "Red", "Orange", ""]);
        assert_eq!(grid[2], vec!["S", "0", "3", "1"]);
        assert_eq!(grid[3], vec!["M", "2", "0", "0"]);
        assert_eq!(grid.len(), 2 + Size::CANONICAL.len());
    }

    #[test]
    fn encode_writes_sizes_in_canonical_order() {
        let entries = vec![
            StockEntry::new("T-shirt", "Red", "XLLL", 1),
            StockEntry::new("T-shirt", "Red", "S", 1),
            StockEntry::new("T-shirt", "Red", "XL", 1),
        ];
        let grid = encode(&entries).unwrap();
        let labels: Vec<&str> = grid[2..].iter().map(|r| r[0].as_str()).collect();
        assert_eq!(labels, vec!["S", "M", "L", "XL", "XLL", "XLLL"]);
    }

    #[test]
    fn encode_rejects_unknown_size() {
        let entries = vec![StockEntry::new("T-shirt", "Red", "XXL", 1)];
        assert_eq!(
            encode(&entries).unwrap_err(),
            DomainError::UnknownSize("XXL".to_string())
        );
    }

    #[test]
    fn encode_repeats_item_name_over_blank_types() {
        let entries = vec![
            StockEntry::new("Cap", "Blue", "S", 1),
            StockEntry::new("Cap", "", "S", 2),
        ];
        let grid = encode(&entries).unwrap();
        assert_eq!(grid[0], vec!["Item", "Cap", "Cap"]);
        assert_eq!(matrix(&decode(&grid).unwrap()), matrix(&entries));
    }

    #[test]
    fn canonical_grid_round_trips() {
        let grid = encode(&decode(&sample()).unwrap()).unwrap();
        assert_eq!(encode(&decode(&grid).unwrap()).unwrap(), grid);
    }

    fn entries_strategy() -> impl Strategy<Value = Vec<StockEntry>> {
        let item = prop::sample::select(vec!["T-shirt", "Jacket", "Cap", "Gloves"]);
        let item_type = prop::sample::select(vec!["", "Red", "Orange(worker)", "Office(black)"]);
        let size = prop::sample::select(Size::CANONICAL.to_vec());
        prop::collection::vec((item, item_type, size, 1i64..500), 0..40).prop_map(|rows| {
            let mut seen = std::collections::HashSet::new();
            rows.into_iter()
                .filter(|(i, t, s, _)| seen.insert((*i, *t, *s)))
                .map(|(i, t, s, q)| StockEntry::new(i, t, s.as_str(), q))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: decode → encode → decode yields the same matrix.
        #[test]
        fn decode_encode_decode_is_stable(entries in entries_strategy()) {
            let first = decode(&encode(&entries).unwrap()).unwrap();
            let second = decode(&encode(&first).unwrap()).unwrap();
            prop_assert_eq!(matrix(&first), matrix(&entries));
            prop_assert_eq!(first, second);
        }

        /// Property: size rows always come out in canonical order.
        #[test]
        fn size_rows_are_canonical_whatever_the_input_order(mut entries in entries_strategy()) {
            entries.reverse();
            let grid = encode(&entries).unwrap();
            let labels: Vec<String> = grid[2..].iter().map(|r| r[0].clone()).collect();
            let expected: Vec<String> = Size::CANONICAL.iter().map(|s| s.to_string()).collect();
            prop_assert_eq!(labels, expected);
        }
    }
}
