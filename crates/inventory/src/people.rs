//! People worksheet: worker names in one column, foreman names in another.

/// Read a name column (header cell first): trimmed, blanks dropped, duplicates
/// removed keeping the first occurrence.
pub fn decode_name_column(column: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for raw in column.iter().skip(1) {
        let name = raw.trim();
        if name.is_empty() || names.iter().any(|n| n == name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

/// Decode the worker and foreman columns of the people worksheet.
pub fn decode_people(worker_column: &[String], foreman_column: &[String]) -> (Vec<String>, Vec<String>) {
    (
        decode_name_column(worker_column),
        decode_name_column(foreman_column),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_blanks_and_duplicates() {
        let column: Vec<String> = ["Name", "Ivan", " ", "Anna ", "Ivan"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(decode_name_column(&column), vec!["Ivan", "Anna"]);
    }

    #[test]
    fn columns_decode_independently() {
        let workers = vec!["Workers".to_string(), "Ivan".to_string()];
        let foremen = vec!["Foremen".to_string()];
        let (w, f) = decode_people(&workers, &foremen);
        assert_eq!(w, vec!["Ivan"]);
        assert!(f.is_empty());
    }
}
