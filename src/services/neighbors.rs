//! Nearest-neighbor lookup over the precomputed feature vectors
//!
//! The index is built offline; at runtime only its header (metric and shape)
//! is loaded and queries run as an exact brute-force scan over the vector store.
//! Results come back ascending by distance; equal distances keep ascending row
//! order, so a given query and artifact set always produce the same answer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::FeatureVector,
};

/// Immutable array of feature vectors, one per catalog row
#[derive(Debug, Clone)]
pub struct VectorStore {
    vectors: Vec<FeatureVector>,
    dimension: usize,
}

impl VectorStore {
    /// Creates a store, checking that every vector has the same non-zero length
    pub fn new(vectors: Vec<FeatureVector>) -> AppResult<Self> {
        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        if dimension == 0 {
            return Err(AppError::ArtifactLoad(
                "vector store is empty or has zero-length vectors".to_string(),
            ));
        }

        if let Some((row, vector)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimension)
        {
            return Err(AppError::ArtifactLoad(format!(
                "vector at row {} has dimension {}, expected {}",
                row,
                vector.len(),
                dimension
            )));
        }

        Ok(Self { vectors, dimension })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn get(&self, row: usize) -> Option<&[f32]> {
        self.vectors.get(row).map(Vec::as_slice)
    }
}

/// Distance function used by the index
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Also accepts "minkowski", the p = 2 default of common k-NN exporters
    #[default]
    #[serde(alias = "minkowski")]
    Euclidean,
    /// 1 - cosine similarity
    Cosine,
    Manhattan,
}

impl DistanceMetric {
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

        match self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
            DistanceMetric::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Cosine => 1.0 - cosine_similarity(a, b),
        }
    }
}

/// Returns a value in [-1, 1]; zero-norm vectors count as orthogonal
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// One nearest-neighbor hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Catalog row of the neighbor
    pub row: usize,
    pub distance: f32,
}

/// k-nearest-neighbor lookup over catalog rows
pub trait NeighborIndex: Send + Sync {
    /// Returns exactly `k` neighbors of `query`, ascending by distance
    ///
    /// Fails with `InsufficientData` when the index holds fewer than `k` rows.
    fn neighbors(&self, query: &[f32], k: usize) -> AppResult<Vec<Neighbor>>;

    /// Number of indexed rows
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expected query vector length
    fn dimension(&self) -> usize;
}

/// Exact k-NN by scanning every vector
pub struct BruteForceIndex {
    vectors: Arc<VectorStore>,
    metric: DistanceMetric,
}

impl BruteForceIndex {
    pub fn new(vectors: Arc<VectorStore>, metric: DistanceMetric) -> Self {
        Self { vectors, metric }
    }
}

impl NeighborIndex for BruteForceIndex {
    fn neighbors(&self, query: &[f32], k: usize) -> AppResult<Vec<Neighbor>> {
        if k == 0 {
            return Err(AppError::InvalidInput(
                "neighbor count must be at least 1".to_string(),
            ));
        }

        if query.len() != self.vectors.dimension() {
            return Err(AppError::InvalidInput(format!(
                "query vector has dimension {}, index expects {}",
                query.len(),
                self.vectors.dimension()
            )));
        }

        if k > self.vectors.len() {
            return Err(AppError::InsufficientData {
                requested: k,
                available: self.vectors.len(),
            });
        }

        let mut hits: Vec<Neighbor> = self
            .vectors
            .vectors
            .iter()
            .enumerate()
            .map(|(row, vector)| Neighbor {
                row,
                distance: self.metric.distance(query, vector),
            })
            .collect();

        // Stable sort: ties stay in row order
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);

        Ok(hits)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dimension(&self) -> usize {
        self.vectors.dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(vectors: Vec<Vec<f32>>, metric: DistanceMetric) -> BruteForceIndex {
        BruteForceIndex::new(Arc::new(VectorStore::new(vectors).unwrap()), metric)
    }

    #[test]
    fn test_vector_store_rejects_ragged_rows() {
        let result = VectorStore::new(vec![vec![1.0, 0.0], vec![1.0]]);
        assert!(matches!(result, Err(AppError::ArtifactLoad(_))));
    }

    #[test]
    fn test_vector_store_rejects_empty() {
        assert!(VectorStore::new(vec![]).is_err());
        assert!(VectorStore::new(vec![vec![]]).is_err());
    }

    #[test]
    fn test_euclidean_distance() {
        let d = DistanceMetric::Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_manhattan_distance() {
        let d = DistanceMetric::Manhattan.distance(&[1.0, -1.0], &[3.0, 2.0]);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_distance() {
        let same = DistanceMetric::Cosine.distance(&[1.0, 0.0], &[2.0, 0.0]);
        let orthogonal = DistanceMetric::Cosine.distance(&[1.0, 0.0], &[0.0, 1.0]);
        let zero = DistanceMetric::Cosine.distance(&[0.0, 0.0], &[0.0, 1.0]);
        assert!(same.abs() < 1e-6);
        assert!((orthogonal - 1.0).abs() < 1e-6);
        assert!((zero - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_neighbors_sorted_ascending() {
        let index = index(
            vec![vec![10.0, 0.0], vec![0.0, 0.0], vec![3.0, 0.0], vec![1.0, 0.0]],
            DistanceMetric::Euclidean,
        );

        let hits = index.neighbors(&[0.0, 0.0], 4).unwrap();
        let rows: Vec<usize> = hits.iter().map(|n| n.row).collect();
        assert_eq!(rows, vec![1, 3, 2, 0]);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_neighbors_respects_k() {
        let index = index(
            vec![vec![0.0], vec![1.0], vec![2.0]],
            DistanceMetric::Euclidean,
        );
        assert_eq!(index.neighbors(&[0.0], 2).unwrap().len(), 2);
    }

    #[test]
    fn test_ties_keep_row_order() {
        let index = index(
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0], vec![0.0, -1.0]],
            DistanceMetric::Euclidean,
        );

        let hits = index.neighbors(&[0.0, 0.0], 4).unwrap();
        let rows: Vec<usize> = hits.iter().map(|n| n.row).collect();
        assert_eq!(rows, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_k_larger_than_index_fails() {
        let index = index(vec![vec![0.0], vec![1.0]], DistanceMetric::Euclidean);
        let result = index.neighbors(&[0.0], 3);
        assert!(matches!(
            result,
            Err(AppError::InsufficientData {
                requested: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn test_dimension_mismatch_fails() {
        let index = index(vec![vec![0.0, 1.0]], DistanceMetric::Euclidean);
        assert!(matches!(
            index.neighbors(&[0.0], 1),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_k_fails() {
        let index = index(vec![vec![0.0]], DistanceMetric::Euclidean);
        assert!(index.neighbors(&[0.0], 0).is_err());
    }

    #[test]
    fn test_metric_deserialization() {
        let metric: DistanceMetric = serde_json::from_str("\"cosine\"").unwrap();
        assert_eq!(metric, DistanceMetric::Cosine);

        let metric: DistanceMetric = serde_json::from_str("\"minkowski\"").unwrap();
        assert_eq!(metric, DistanceMetric::Euclidean);
    }
}
