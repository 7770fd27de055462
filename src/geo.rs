//! Geohash decoding into coordinates.
//!
//! A thin, validating wrapper over the `geohash` crate. The crate happily
//! decodes an empty string to the centre of the world; here that is an error.

use std::fmt;

use crate::error::DecodeError;

/// Base-32 alphabet used by geohashes (no `a`, `i`, `l`, `o`).
const ALPHABET: &str = "0123456789bcdefghjkmnpqrstuvwxyz";

/// Longest geohash the codec resolves; further characters are ignored.
pub const MAX_PRECISION: usize = 12;

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// Decode a geohash to the centre of its cell.
///
/// Upper-case input is accepted and normalised. Hashes longer than
/// [`MAX_PRECISION`] decode to the cell of their prefix.
pub fn decode(hash: &str) -> Result<GeoCoordinate, DecodeError> {
    let hash = hash.trim().to_ascii_lowercase();

    if hash.is_empty() {
        return Err(DecodeError::Empty);
    }
    if let Some(character) = hash.chars().find(|c| !ALPHABET.contains(*c)) {
        return Err(DecodeError::InvalidCharacter { hash, character });
    }

    // All ASCII past the alphabet check, so byte slicing is safe.
    let cell = &hash[..hash.len().min(MAX_PRECISION)];
    let (centre, _, _) =
        ::geohash::decode(cell).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    Ok(GeoCoordinate::new(centre.y, centre.x))
}

/// Encode a coordinate at the given precision (1..=12 characters).
pub fn encode(coordinate: GeoCoordinate, precision: usize) -> Result<String, DecodeError> {
    let coord = ::geohash::Coord {
        x: coordinate.longitude,
        y: coordinate.latitude,
    };
    ::geohash::encode(coord, precision).map_err(|e| DecodeError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_aalborg() {
        let coord = decode("u4pruydqqvj").unwrap();
        assert!((coord.latitude - 57.64).abs() < 0.02, "lat {}", coord.latitude);
        assert!((coord.longitude - 10.41).abs() < 0.02, "lng {}", coord.longitude);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_decode_uppercase() {
        assert_eq!(decode("U4PRUY").unwrap(), decode("u4pruy").unwrap());
    }

    #[test]
    fn test_round_trip_stays_in_cell() {
        for hash in ["u", "9q", "u4pr", "9q8yy", "u4pruydqqvj", "s00000000000", "zzzzzzzzzzzz", "0"] {
            let coord = decode(hash).unwrap();
            let encoded = encode(coord, hash.len()).unwrap();
            assert_eq!(encoded, hash, "round trip of {}", hash);
        }
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert_eq!(decode(""), Err(DecodeError::Empty));
        assert_eq!(decode("   "), Err(DecodeError::Empty));
    }

    #[test]
    fn test_decode_rejects_bad_alphabet() {
        for hash in ["u4pa", "iiii", "u4pr!", "lo", "ü"] {
            assert!(
                matches!(decode(hash), Err(DecodeError::InvalidCharacter { .. })),
                "{} should be rejected",
                hash
            );
        }
    }

    #[test]
    fn test_long_hash_decodes_to_prefix_cell() {
        let prefix = decode("u4pruydqqvju").unwrap();
        assert_eq!(decode("u4pruydqqvjuu").unwrap(), prefix);
        assert_eq!(decode("u4pruydqqvjuuzzzzz").unwrap(), prefix);

        assert!(matches!(
            decode("u4pruydqqvjuua"),
            Err(DecodeError::InvalidCharacter { character: 'a', .. })
        ));
    }
}
