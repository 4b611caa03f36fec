//! Compute layer: geohash codec, cell coverage, distance and validation.
//!
//! Everything here is pure and independent of the bucket storage in
//! [`crate::index`], which builds on these functions.

pub mod codec;
pub mod coverage;
pub mod distance;
pub mod validation;

pub use codec::{
    Direction, MAX_PRECISION, Neighbors, cell_dimensions, cell_position, decode, decode_bounds,
    encode, neighbor, neighbors,
};
pub use coverage::{Coverage, covering_cells, covering_cells_with_limit};
pub use distance::{EARTH_RADIUS_KM, destination, distance_between, distance_km};
