//! Geohash encoding and decoding.
//!
//! A geohash of precision `p` carries `5 * p` bits that alternately halve the
//! longitude and latitude intervals, starting with longitude. Every 5 bits map
//! to one character of the base-32 alphabet, most significant bit first.
//!
//! Because bits alternate, a cell at precision `p` is the leaf of a regular
//! grid: `ceil(5p / 2)` bits split longitude into columns and `floor(5p / 2)`
//! bits split latitude into rows. [`cell_position`] exposes those integer grid
//! indices; the coverage calculator and neighbor lookup work on them.
//!
//! | Precision | Cell size (lat x lon) | Approx. at equator |
//! |-----------|-----------------------|--------------------|
//! | 1         | 45° x 45°             | 5000km x 5000km    |
//! | 3         | 1.41° x 1.41°         | 156km x 156km      |
//! | 5         | 0.044° x 0.044°       | 4.9km x 4.9km      |
//! | 7         | 0.0014° x 0.0014°     | 153m x 153m        |
//! | 9         | 0.000043° x 0.000043° | 4.8m x 4.8m        |
//! | 12        | 1.7e-7° x 3.4e-7°     | 1.9cm x 3.7cm      |

use crate::compute::validation::{validate_coordinate, validate_geohash, validate_precision};
use crate::error::Result;
use geomarker_types::bbox::CellBounds;
use geomarker_types::point::Coordinate;

/// The geohash alphabet: digits and lower-case letters without `a`, `i`, `l`, `o`.
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Bits carried by one geohash character.
pub const BITS_PER_CHAR: usize = 5;

/// Longest supported geohash.
pub const MAX_PRECISION: usize = 12;

/// Encode a coordinate as a geohash of `precision` characters.
///
/// # Errors
///
/// `InvalidCoordinate` for out-of-range or non-finite input, `InvalidPrecision`
/// unless `1 <= precision <= 12`.
///
/// # Examples
///
/// ```
/// use geomarker::compute::codec::encode;
///
/// assert_eq!(encode(57.64911, 10.40744, 11)?, "u4pruydqqvj");
/// assert_eq!(encode(22.618423, 33.751244, 7)?, "su008j8");
/// # Ok::<(), geomarker::GeoMarkerError>(())
/// ```
pub fn encode(latitude: f64, longitude: f64, precision: usize) -> Result<String> {
    validate_coordinate(latitude, longitude)?;
    validate_precision(precision)?;
    Ok(encode_unchecked(latitude, longitude, precision))
}

/// Encode without validating. Callers guarantee a valid coordinate and precision.
pub(crate) fn encode_unchecked(latitude: f64, longitude: f64, precision: usize) -> String {
    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);
    let mut hash = String::with_capacity(precision);

    let mut even = true;
    let mut bit = 0;
    let mut ch = 0usize;

    for _ in 0..precision * BITS_PER_CHAR {
        let (range, value) = if even {
            (&mut lon_range, longitude)
        } else {
            (&mut lat_range, latitude)
        };

        let mid = (range.0 + range.1) / 2.0;
        if value > mid {
            ch |= 1 << (BITS_PER_CHAR - 1 - bit);
            range.0 = mid;
        } else {
            range.1 = mid;
        }
        even = !even;

        bit += 1;
        if bit == BITS_PER_CHAR {
            hash.push(BASE32[ch] as char);
            bit = 0;
            ch = 0;
        }
    }

    hash
}

/// Recover the bounding box a geohash represents.
///
/// This reverses the interval halving of [`encode`]; any coordinate encoded at
/// the hash's length lands inside the returned bounds.
///
/// # Examples
///
/// ```
/// use geomarker::compute::codec::{decode_bounds, encode};
/// use geomarker::Coordinate;
///
/// let hash = encode(22.618423, 33.751244, 7)?;
/// let bounds = decode_bounds(&hash)?;
/// assert!(bounds.contains(&Coordinate::new(22.618423, 33.751244)));
/// # Ok::<(), geomarker::GeoMarkerError>(())
/// ```
pub fn decode_bounds(hash: &str) -> Result<CellBounds> {
    validate_geohash(hash)?;

    let mut lat_range = (-90.0_f64, 90.0_f64);
    let mut lon_range = (-180.0_f64, 180.0_f64);
    let mut even = true;

    for value in char_values(hash) {
        for shift in (0..BITS_PER_CHAR).rev() {
            let range = if even {
                &mut lon_range
            } else {
                &mut lat_range
            };
            let mid = (range.0 + range.1) / 2.0;
            if (value >> shift) & 1 == 1 {
                range.0 = mid;
            } else {
                range.1 = mid;
            }
            even = !even;
        }
    }

    Ok(CellBounds::new(lat_range, lon_range))
}

/// Decode a geohash to the center of its cell.
pub fn decode(hash: &str) -> Result<Coordinate> {
    Ok(decode_bounds(hash)?.center())
}

/// Number of `(latitude, longitude)` bits at a precision.
#[inline]
pub(crate) fn grid_bits(precision: usize) -> (u32, u32) {
    let total = (precision * BITS_PER_CHAR) as u32;
    let lat_bits = total / 2;
    (lat_bits, total - lat_bits)
}

/// Number of `(rows, columns)` in the grid at a precision.
#[inline]
pub(crate) fn grid_size(precision: usize) -> (u64, u64) {
    let (lat_bits, lon_bits) = grid_bits(precision);
    (1u64 << lat_bits, 1u64 << lon_bits)
}

/// Size of one cell in degrees, as `(latitude, longitude)`.
///
/// # Examples
///
/// ```
/// use geomarker::compute::codec::cell_dimensions;
///
/// assert_eq!(cell_dimensions(1)?, (45.0, 45.0));
/// assert_eq!(cell_dimensions(2)?, (5.625, 11.25));
/// # Ok::<(), geomarker::GeoMarkerError>(())
/// ```
pub fn cell_dimensions(precision: usize) -> Result<(f64, f64)> {
    validate_precision(precision)?;
    let (rows, cols) = grid_size(precision);
    Ok((180.0 / rows as f64, 360.0 / cols as f64))
}

/// Integer grid position `(row, column)` of a geohash cell.
///
/// Rows count northwards from -90°, columns eastwards from -180°.
pub fn cell_position(hash: &str) -> Result<(u64, u64)> {
    validate_geohash(hash)?;

    let mut row = 0u64;
    let mut col = 0u64;
    let mut even = true;

    for value in char_values(hash) {
        for shift in (0..BITS_PER_CHAR).rev() {
            let bit = u64::from((value >> shift) & 1);
            if even {
                col = (col << 1) | bit;
            } else {
                row = (row << 1) | bit;
            }
            even = !even;
        }
    }

    Ok((row, col))
}

/// Build the geohash for a grid position. Inverse of [`cell_position`].
pub(crate) fn encode_position(row: u64, col: u64, precision: usize) -> String {
    let (lat_bits, lon_bits) = grid_bits(precision);
    let mut lat_left = lat_bits;
    let mut lon_left = lon_bits;
    let mut hash = String::with_capacity(precision);
    let mut even = true;

    for _ in 0..precision {
        let mut ch = 0usize;
        for _ in 0..BITS_PER_CHAR {
            let bit = if even {
                lon_left -= 1;
                (col >> lon_left) & 1
            } else {
                lat_left -= 1;
                (row >> lat_left) & 1
            };
            ch = (ch << 1) | bit as usize;
            even = !even;
        }
        hash.push(BASE32[ch] as char);
    }

    hash
}

/// Compass direction of an adjacent cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// `(row, column)` step for this direction.
    fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }
}

/// The eight cells around a geohash.
///
/// Longitude wraps at the antimeridian, so `east` and `west` are always
/// present. Cells past a pole do not exist and are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbors {
    pub n: Option<String>,
    pub ne: Option<String>,
    pub e: Option<String>,
    pub se: Option<String>,
    pub s: Option<String>,
    pub sw: Option<String>,
    pub w: Option<String>,
    pub nw: Option<String>,
}

impl Neighbors {
    /// Look up the neighbor in a direction.
    pub fn get(&self, direction: Direction) -> Option<&str> {
        let cell = match direction {
            Direction::North => &self.n,
            Direction::NorthEast => &self.ne,
            Direction::East => &self.e,
            Direction::SouthEast => &self.se,
            Direction::South => &self.s,
            Direction::SouthWest => &self.sw,
            Direction::West => &self.w,
            Direction::NorthWest => &self.nw,
        };
        cell.as_deref()
    }

    /// Iterate over the neighbors that exist, clockwise from north.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        Direction::ALL.into_iter().filter_map(|d| self.get(d))
    }
}

/// The adjacent cell of `hash` in `direction`, at the same precision.
///
/// # Examples
///
/// ```
/// use geomarker::compute::codec::{Direction, neighbor};
///
/// assert_eq!(neighbor("dr5regw", Direction::North)?.as_deref(), Some("dr5regy"));
/// // Nothing lies north of the top row.
/// assert_eq!(neighbor("zzz", Direction::North)?, None);
/// # Ok::<(), geomarker::GeoMarkerError>(())
/// ```
pub fn neighbor(hash: &str, direction: Direction) -> Result<Option<String>> {
    let (row, col) = cell_position(hash)?;
    let precision = hash.len();
    let (rows, cols) = grid_size(precision);
    let (d_row, d_col) = direction.offset();

    let row = row as i64 + d_row;
    if row < 0 || row >= rows as i64 {
        return Ok(None);
    }
    let col = (col as i64 + d_col).rem_euclid(cols as i64);

    Ok(Some(encode_position(row as u64, col as u64, precision)))
}

/// All eight neighbors of a geohash.
pub fn neighbors(hash: &str) -> Result<Neighbors> {
    Ok(Neighbors {
        n: neighbor(hash, Direction::North)?,
        ne: neighbor(hash, Direction::NorthEast)?,
        e: neighbor(hash, Direction::East)?,
        se: neighbor(hash, Direction::SouthEast)?,
        s: neighbor(hash, Direction::South)?,
        sw: neighbor(hash, Direction::SouthWest)?,
        w: neighbor(hash, Direction::West)?,
        nw: neighbor(hash, Direction::NorthWest)?,
    })
}

/// 5-bit values of a validated geohash. Upper case is folded to lower case.
fn char_values(hash: &str) -> impl Iterator<Item = u8> + '_ {
    hash.bytes().map(|b| {
        let b = b.to_ascii_lowercase();
        BASE32.iter().position(|&c| c == b).unwrap_or_default() as u8
    })
}
