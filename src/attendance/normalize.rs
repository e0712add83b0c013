//! Input clean-up shared by both generators.

/// Sort names case-insensitively. Equal keys keep their submitted order.
pub fn sort_names(mut names: Vec<String>) -> Vec<String> {
    names.sort_by_cached_key(|name| name.to_lowercase());
    names
}

/// Reorder a `YYYY-MM-DD` date to `DD/MM/YYYY`.
///
/// Any text with exactly three hyphen-separated parts is reordered without
/// checking the parts; anything else is returned as is.
pub fn normalize_date(raw: &str) -> String {
    let parts: Vec<&str> = raw.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}/{month}/{year}"),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        assert_eq!(sort_names(names(&["bob", "Alice"])), names(&["Alice", "bob"]));
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let sorted = sort_names(names(&["ana", "Bruno", "ANA", "Ana"]));
        assert_eq!(sorted, names(&["ana", "ANA", "Ana", "Bruno"]));
    }

    #[test]
    fn test_sort_keeps_untrimmed_values() {
        let sorted = sort_names(names(&["  zé", "Ana "]));
        assert_eq!(sorted, names(&["  zé", "Ana "]));
    }

    #[test]
    fn test_iso_date_is_reordered() {
        assert_eq!(normalize_date("2025-09-07"), "07/09/2025");
    }

    #[test]
    fn test_free_form_date_passes_through() {
        assert_eq!(normalize_date("03/08/2025 ÁS 17:00H"), "03/08/2025 ÁS 17:00H");
        assert_eq!(normalize_date("2025-09"), "2025-09");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn test_out_of_range_parts_are_not_validated() {
        assert_eq!(normalize_date("2025-13-40"), "40/13/2025");
    }
}
