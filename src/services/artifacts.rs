//! Startup loading of the precomputed artifacts
//!
//! Three JSON files are expected in the artifacts directory:
//! - `catalog.json`: `[{ "name": ..., "movie_id": ... }, ...]`
//! - `vectors.json`: `[[f32, ...], ...]`, one vector per catalog row
//! - `neighbor_index.json`: `{ "algorithm", "metric", "n_samples", "dimension" }`
//!
//! Any failure here is fatal: the service cannot answer without all three.

use std::{fs, path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{FeatureVector, MovieRecord},
    services::{
        catalog::Catalog,
        neighbors::{BruteForceIndex, DistanceMetric, NeighborIndex, VectorStore},
    },
};

pub const CATALOG_FILE: &str = "catalog.json";
pub const VECTORS_FILE: &str = "vectors.json";
pub const INDEX_FILE: &str = "neighbor_index.json";

/// Algorithms an exported index may name; all answer exact k-NN queries
const KNOWN_ALGORITHMS: &[&str] = &["brute", "auto", "kd_tree", "ball_tree"];

/// Header describing the offline-built neighbor index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexHeader {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default)]
    pub metric: DistanceMetric,
    pub n_samples: usize,
    pub dimension: usize,
}

fn default_algorithm() -> String {
    "brute".to_string()
}

/// Read-only data shared by every session for the process lifetime
#[derive(Clone)]
pub struct Artifacts {
    pub catalog: Arc<Catalog>,
    pub vectors: Arc<VectorStore>,
    pub index: Arc<dyn NeighborIndex>,
    pub loaded_at: DateTime<Utc>,
}

impl Artifacts {
    /// Loads and cross-checks all artifacts from `dir`
    pub fn load(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref();

        let movies: Vec<MovieRecord> = read_json(&dir.join(CATALOG_FILE))?;
        let vectors: Vec<FeatureVector> = read_json(&dir.join(VECTORS_FILE))?;
        let header: IndexHeader = read_json(&dir.join(INDEX_FILE))?;

        if !KNOWN_ALGORITHMS.contains(&header.algorithm.as_str()) {
            return Err(AppError::ArtifactLoad(format!(
                "unsupported index algorithm '{}'",
                header.algorithm
            )));
        }

        let artifacts = Self::from_parts(movies, vectors, header.metric)?;

        if header.n_samples != artifacts.vectors.len()
            || header.dimension != artifacts.vectors.dimension()
        {
            return Err(AppError::ArtifactLoad(format!(
                "index was built for {} vectors of dimension {}, found {} of dimension {}",
                header.n_samples,
                header.dimension,
                artifacts.vectors.len(),
                artifacts.vectors.dimension()
            )));
        }

        tracing::info!(
            dir = %dir.display(),
            movies = artifacts.catalog.len(),
            dimension = artifacts.vectors.dimension(),
            algorithm = %header.algorithm,
            metric = ?header.metric,
            "Artifacts loaded"
        );

        Ok(artifacts)
    }

    /// Builds artifacts from in-memory data with the same consistency checks as `load`
    pub fn from_parts(
        movies: Vec<MovieRecord>,
        vectors: Vec<FeatureVector>,
        metric: DistanceMetric,
    ) -> AppResult<Self> {
        if movies.len() != vectors.len() {
            return Err(AppError::ArtifactLoad(format!(
                "catalog has {} rows but vector store has {}",
                movies.len(),
                vectors.len()
            )));
        }

        let vectors = Arc::new(VectorStore::new(vectors)?);
        let index = BruteForceIndex::new(vectors.clone(), metric);

        Ok(Self {
            catalog: Arc::new(Catalog::new(movies)),
            vectors,
            index: Arc::new(index),
            loaded_at: Utc::now(),
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::ArtifactLoad(format!("{}: {}", path.display(), e)))?;

    serde_json::from_str(&raw)
        .map_err(|e| AppError::ArtifactLoad(format!("{}: malformed JSON: {}", path.display(), e)))
}
