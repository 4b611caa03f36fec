//! Geohash-bucketed marker index with exact radius queries.
//!
//! ```rust
//! use geomarker::MarkerIndex;
//!
//! let mut index = MarkerIndex::new();
//! index.insert(40.7128, -74.0060, "New York", 7)?;
//! index.insert(40.7306, -73.9352, "Brooklyn", 7)?;
//! index.insert(51.5074, -0.1278, "London", 7)?;
//!
//! let nearby = index.query_radius(40.7128, -74.0060, 10.0, 7)?;
//! let labels: Vec<&str> = nearby.iter().map(|r| r.label()).collect();
//! assert_eq!(labels, ["New York", "Brooklyn"]);
//! # Ok::<(), geomarker::GeoMarkerError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod index;
pub mod query;

#[cfg(feature = "sync")]
pub mod sync;

pub use builder::IndexBuilder;
pub use config::IndexConfig;
pub use error::{GeoMarkerError, Result};
pub use index::{Bucket, BucketStats, IndexStats, MarkerIndex};
pub use query::{CandidateStrategy, QueryResult, QueryStats};

#[cfg(feature = "sync")]
pub use sync::SyncIndex;

pub use compute::{
    Coverage, Direction, EARTH_RADIUS_KM, MAX_PRECISION, Neighbors, cell_dimensions,
    cell_position, covering_cells, decode, decode_bounds, distance_km, encode, neighbor,
    neighbors,
};

pub use geomarker_types::bbox::CellBounds;
pub use geomarker_types::marker::Marker;
pub use geomarker_types::point::Coordinate;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{GeoMarkerError, IndexBuilder, IndexConfig, MarkerIndex, Result};

    pub use crate::{Coordinate, Marker, QueryResult};

    pub use crate::compute::{covering_cells, distance_km, encode};

    #[cfg(feature = "sync")]
    pub use crate::SyncIndex;
}
