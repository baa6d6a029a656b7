use serde::{Deserialize, Serialize};

/// One row of the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieRecord {
    /// Display name (not guaranteed unique)
    pub name: String,
    /// External identifier used for metadata lookups (e.g., "tt1375666")
    pub movie_id: String,
}

impl MovieRecord {
    pub fn new(name: impl Into<String>, movie_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            movie_id: movie_id.into(),
        }
    }
}

/// Feature vector for a catalog row, aligned with the catalog by position
pub type FeatureVector = Vec<f32>;

/// A recommended movie together with its distance from the query movie
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub movie: MovieRecord,
    pub distance: f32,
}

/// Result of resolving a movie name into its nearest neighbors
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationSet {
    /// The catalog row the name resolved to
    pub query: MovieRecord,
    /// Recommended movies, ascending by distance
    pub items: Vec<Recommendation>,
}
