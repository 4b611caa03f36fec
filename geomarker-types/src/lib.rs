//! # geomarker-types
//!
//! Value types shared by the geomarker index:
//!
//! - **Coordinates**: `Coordinate`, a latitude/longitude pair backed by `geo::Point`
//! - **Markers**: `Marker`, an immutable labelled coordinate
//! - **Cell bounds**: `CellBounds`, the rectangle a geohash cell covers
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geomarker_types::marker::Marker;
//!
//! let marker = Marker::new(40.7128, -74.0060, "New York");
//! assert_eq!(marker.label(), "New York");
//! assert_eq!(marker.latitude(), 40.7128);
//! ```

pub mod bbox;
pub mod marker;
pub mod point;
