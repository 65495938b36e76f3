use serde::Deserialize;
use std::collections::BTreeSet;

use crate::models::CatalogItem;

/// One row of the catalog artifact as it appears on disk
///
/// Accepts the column names produced by the usual TMDb preprocessing
/// (`movie_id`, `genres`) as well as the canonical ones.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    #[serde(alias = "movie_id", alias = "id")]
    pub external_id: i64,
    pub title: String,
    #[serde(default, alias = "genres")]
    pub categories: Vec<String>,
}

/// The fixed, ordered set of recommendable movies
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Builds a catalog from artifact rows; each item's index is its row position
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        let items = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| CatalogItem {
                index,
                external_id: record.external_id,
                title: record.title,
                categories: record
                    .categories
                    .into_iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
            })
            .collect();

        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.title.as_str())
    }

    /// Distinct category names across the whole catalog, sorted
    pub fn categories(&self) -> BTreeSet<String> {
        self.items
            .iter()
            .flat_map(|item| item.categories.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, title: &str, categories: &[&str]) -> CatalogRecord {
        CatalogRecord {
            external_id: id,
            title: title.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_from_records_assigns_positional_index() {
        let catalog = Catalog::from_records(vec![
            record(19995, "Avatar", &["Action"]),
            record(285, "Pirates of the Caribbean: At World's End", &["Adventure"]),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().index, 0);
        assert_eq!(catalog.get(1).unwrap().index, 1);
        assert_eq!(catalog.get(1).unwrap().external_id, 285);
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn test_categories_are_trimmed_and_deduplicated() {
        let catalog = Catalog::from_records(vec![record(
            1,
            "Heat",
            &["Crime", " Crime ", "", "Drama"],
        )]);

        let item = catalog.get(0).unwrap();
        assert_eq!(item.categories.len(), 2);
        assert!(item.has_category("Crime"));
        assert!(item.has_category("Drama"));
    }

    #[test]
    fn test_catalog_categories_sorted_distinct() {
        let catalog = Catalog::from_records(vec![
            record(1, "A", &["Drama", "Action"]),
            record(2, "B", &["Action", "Comedy"]),
            record(3, "C", &[]),
        ]);

        let categories: Vec<String> = catalog.categories().into_iter().collect();
        assert_eq!(categories, vec!["Action", "Comedy", "Drama"]);
    }

    #[test]
    fn test_record_accepts_movie_id_and_genres_aliases() {
        let json = r#"{"movie_id": 19995, "title": "Avatar", "genres": ["Action", "Fantasy"]}"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.external_id, 19995);
        assert_eq!(record.categories, vec!["Action", "Fantasy"]);
    }

    #[test]
    fn test_record_categories_optional() {
        let json = r#"{"external_id": 7, "title": "Untagged"}"#;
        let record: CatalogRecord = serde_json::from_str(json).unwrap();
        assert!(record.categories.is_empty());
    }
}
