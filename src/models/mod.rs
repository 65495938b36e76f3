use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display};

/// A single recommendable movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    /// Zero-based position in the catalog; row/column into the similarity index
    pub index: usize,
    /// TMDb movie ID, used for metadata lookups
    pub external_id: i64,
    pub title: String,
    pub categories: BTreeSet<String>,
}

impl CatalogItem {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

/// Category restriction applied while ranking
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parses user input. `"All"` in any case, or a blank string, disables filtering.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(trimmed.to_string())
        }
    }

    pub fn accepts(&self, item: &CatalogItem) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => item.has_category(category),
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "All"),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

/// One ranked neighbour of the queried movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub index: usize,
    pub title: String,
    pub external_id: i64,
    pub score: f32,
}

/// A recommendation ready for display. `poster_url` is empty when no poster is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTuple {
    pub title: String,
    pub external_id: i64,
    pub poster_url: String,
}

/// How a query was matched to a catalog title
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    Exact,
    Fuzzy(f64),
}

impl MatchKind {
    pub fn score(&self) -> Option<f64> {
        match self {
            MatchKind::Exact => None,
            MatchKind::Fuzzy(score) => Some(*score),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Fuzzy(_) => "fuzzy",
        }
    }
}

/// Result of resolving free text to a catalog item
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub item: CatalogItem,
    pub match_kind: MatchKind,
}

/// Autocomplete candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleSuggestion {
    pub title: String,
    pub external_id: i64,
    pub score: f64,
}

/// Everything produced for one recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationOutcome {
    pub resolution: Resolution,
    pub filter: CategoryFilter,
    pub recommendations: Vec<DisplayTuple>,
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Subset of the TMDb `GET /3/movie/{id}` response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(categories: &[&str]) -> CatalogItem {
        CatalogItem {
            index: 0,
            external_id: 27205,
            title: "Inception".to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_category_filter_parse_all() {
        assert_eq!(CategoryFilter::parse("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("   "), CategoryFilter::All);
    }

    #[test]
    fn test_category_filter_parse_only_trims() {
        assert_eq!(
            CategoryFilter::parse(" Action "),
            CategoryFilter::Only("Action".to_string())
        );
    }

    #[test]
    fn test_category_filter_accepts() {
        let movie = item(&["Action", "ScienceFiction"]);
        assert!(CategoryFilter::All.accepts(&movie));
        assert!(CategoryFilter::Only("Action".to_string()).accepts(&movie));
        assert!(!CategoryFilter::Only("Comedy".to_string()).accepts(&movie));
        // Membership is case-sensitive
        assert!(!CategoryFilter::Only("action".to_string()).accepts(&movie));
    }

    #[test]
    fn test_category_filter_display() {
        assert_eq!(CategoryFilter::All.to_string(), "All");
        assert_eq!(CategoryFilter::Only("Drama".to_string()).to_string(), "Drama");
    }

    #[test]
    fn test_match_kind_accessors() {
        assert_eq!(MatchKind::Exact.score(), None);
        assert_eq!(MatchKind::Exact.label(), "exact");
        assert_eq!(MatchKind::Fuzzy(0.8).score(), Some(0.8));
        assert_eq!(MatchKind::Fuzzy(0.8).label(), "fuzzy");
    }

    #[test]
    fn test_tmdb_movie_deserialization() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
            "vote_average": 8.4
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, Some(27205));
        assert_eq!(
            movie.poster_path,
            Some("/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg".to_string())
        );
    }

    #[test]
    fn test_tmdb_movie_null_poster() {
        let movie: TmdbMovie = serde_json::from_str(r#"{"id": 1, "poster_path": null}"#).unwrap();
        assert_eq!(movie.poster_path, None);

        let movie: TmdbMovie = serde_json::from_str(r#"{"status_code": 34}"#).unwrap();
        assert_eq!(movie.poster_path, None);
    }
}
