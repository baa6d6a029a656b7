pub mod artifacts;
pub mod catalog;
pub mod metadata;
pub mod neighbors;
pub mod recommendations;

pub use artifacts::Artifacts;
pub use catalog::Catalog;
pub use metadata::{MetadataGateway, MetadataProvider, OmdbProvider};
pub use neighbors::{BruteForceIndex, DistanceMetric, Neighbor, NeighborIndex, VectorStore};
pub use recommendations::Recommender;
