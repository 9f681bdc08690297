//! Name filter for the displayed item list.

use crate::types::PantryItem;

/// Items whose name contains `term`, ignoring case, in snapshot order.
///
/// An empty term matches every item.
#[must_use]
pub fn filter_by_name<'a>(items: &'a [PantryItem], term: &str) -> Vec<&'a PantryItem> {
    let needle = term.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::ItemId;

    fn item(id: &str, name: &str) -> PantryItem {
        PantryItem {
            id: ItemId::new(id),
            name: name.to_string(),
            quantity: 1,
            expiration_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn names<'a>(items: &[&'a PantryItem]) -> Vec<&'a str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_milk_scenario() {
        let items = vec![PantryItem {
            id: ItemId::new("1"),
            name: "Milk".to_string(),
            quantity: 2,
            expiration_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }];

        let hits = filter_by_name(&items, "mi");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "1");

        assert!(filter_by_name(&items, "eggs").is_empty());
    }

    #[test]
    fn test_empty_term_matches_all() {
        let items = vec![item("1", "Rice"), item("2", "Beans")];
        assert_eq!(names(&filter_by_name(&items, "")), vec!["Rice", "Beans"]);
    }

    #[test]
    fn test_match_is_case_insensitive_both_ways() {
        let items = vec![item("1", "Peanut Butter"), item("2", "butter"), item("3", "Jam")];
        assert_eq!(
            names(&filter_by_name(&items, "BUTTER")),
            vec!["Peanut Butter", "butter"]
        );
    }

    #[test]
    fn test_substring_in_middle() {
        let items = vec![item("1", "Oat milk"), item("2", "Flour")];
        assert_eq!(names(&filter_by_name(&items, "t m")), vec!["Oat milk"]);
    }
}
