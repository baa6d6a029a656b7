use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Recommendation, RecommendationSet},
    services::{
        artifacts::Artifacts,
        catalog::Catalog,
        neighbors::{NeighborIndex, VectorStore},
    },
};

/// Neighbors requested from the index per query, the query movie included
pub const NEIGHBOR_COUNT: usize = 10;

/// Movies returned per recommendation
pub const RECOMMENDATION_COUNT: usize = NEIGHBOR_COUNT - 1;

/// Resolves a movie name into its most similar catalog movies
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    vectors: Arc<VectorStore>,
    index: Arc<dyn NeighborIndex>,
}

impl Recommender {
    pub fn new(
        catalog: Arc<Catalog>,
        vectors: Arc<VectorStore>,
        index: Arc<dyn NeighborIndex>,
    ) -> Self {
        Self {
            catalog,
            vectors,
            index,
        }
    }

    pub fn from_artifacts(artifacts: &Artifacts) -> Self {
        Self::new(
            artifacts.catalog.clone(),
            artifacts.vectors.clone(),
            artifacts.index.clone(),
        )
    }

    /// Returns the nine nearest movies to `movie_name`, ascending by distance
    ///
    /// The name is matched case-insensitively and the first matching row wins.
    /// The index's first hit is always dropped as the query movie itself, even
    /// when a duplicate vector happens to sort ahead of it.
    pub fn recommend(&self, movie_name: &str) -> AppResult<RecommendationSet> {
        let (row, query) = self
            .catalog
            .find_by_name(movie_name)
            .ok_or_else(|| AppError::MovieNotFound(movie_name.to_string()))?;

        if self.catalog.len() < NEIGHBOR_COUNT {
            return Err(AppError::InsufficientData {
                requested: NEIGHBOR_COUNT,
                available: self.catalog.len(),
            });
        }

        let vector = self.vectors.get(row).ok_or_else(|| {
            AppError::Internal(format!("no feature vector for catalog row {}", row))
        })?;

        let neighbors = self.index.neighbors(vector, NEIGHBOR_COUNT)?;

        let items = neighbors
            .into_iter()
            .skip(1)
            .map(|neighbor| {
                self.catalog
                    .get(neighbor.row)
                    .map(|movie| Recommendation {
                        movie: movie.clone(),
                        distance: neighbor.distance,
                    })
                    .ok_or_else(|| {
                        AppError::Internal(format!("index returned unknown row {}", neighbor.row))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;

        tracing::info!(
            movie = %query.name,
            movie_id = %query.movie_id,
            row = row,
            results = items.len(),
            "Recommendations resolved"
        );

        Ok(RecommendationSet {
            query: query.clone(),
            items,
        })
    }
}
