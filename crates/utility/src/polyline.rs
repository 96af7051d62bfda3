//! Encoded polyline format as used by the Google Maps APIs.
//!
//! A polyline is a sequence of coordinates stored as fixed point integers
//! (five decimal places). Every value is the zig-zag encoded delta to the
//! previous point, split into 5-bit groups. Each group is offset by 63 so
//! that it lands in the printable ASCII range, and all but the last group of
//! a value carry the continuation bit `0x20`.
//!
//! See <https://developers.google.com/maps/documentation/utilities/polylinealgorithm>

use std::{error, fmt};

use crate::geo::Coordinate;

const PRECISION: f64 = 1e5;
const OFFSET: u8 = 63;
const CONTINUATION_BIT: u64 = 0x20;
const GROUP_MASK: u64 = 0x1F;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended inside a value or between latitude and longitude.
    UnexpectedEnd { position: usize },
    /// A byte outside of the polyline alphabet (`?` to `~`).
    InvalidCharacter { byte: u8, position: usize },
    /// A value does not fit into 64 bits.
    Overflow { position: usize },
}

impl error::Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::UnexpectedEnd { position } => {
                write!(f, "Polyline ends unexpectedly at position {}.", position)
            }
            DecodeError::InvalidCharacter { byte, position } => write!(
                f,
                "Invalid polyline character 0x{:02x} at position {}.",
                byte, position
            ),
            DecodeError::Overflow { position } => {
                write!(f, "Polyline value overflows at position {}.", position)
            }
        }
    }
}

/// Decodes an encoded polyline into the coordinates it describes.
///
/// The whole input has to be consumed. Truncated input is rejected instead of
/// being cut off at the last complete point.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut cursor = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut coordinates = Vec::new();

    while cursor < bytes.len() {
        latitude = accumulate(latitude, next_value(bytes, &mut cursor)?, cursor)?;
        longitude = accumulate(longitude, next_value(bytes, &mut cursor)?, cursor)?;
        coordinates.push(Coordinate::new(
            latitude as f64 / PRECISION,
            longitude as f64 / PRECISION,
        ));
    }

    Ok(coordinates)
}

/// Encodes coordinates into a polyline, rounding to five decimal places.
///
/// Coordinates are expected to be valid (see [`Coordinate::validate`]). Values
/// outside of the 64-bit fixed point range saturate and do not decode back to
/// the input.
pub fn encode(coordinates: &[Coordinate]) -> String {
    let mut encoded = String::new();
    let mut previous_latitude: i64 = 0;
    let mut previous_longitude: i64 = 0;

    for coordinate in coordinates {
        let latitude = (coordinate.latitude * PRECISION).round() as i64;
        let longitude = (coordinate.longitude * PRECISION).round() as i64;
        push_value(&mut encoded, latitude.wrapping_sub(previous_latitude));
        push_value(&mut encoded, longitude.wrapping_sub(previous_longitude));
        previous_latitude = latitude;
        previous_longitude = longitude;
    }

    encoded
}

/// Reads one zig-zag encoded value starting at `cursor` and advances the
/// cursor past its last group.
fn next_value(bytes: &[u8], cursor: &mut usize) -> Result<i64, DecodeError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let position = *cursor;
        let byte = *bytes
            .get(position)
            .ok_or(DecodeError::UnexpectedEnd { position })?;
        if !(OFFSET..=b'~').contains(&byte) {
            return Err(DecodeError::InvalidCharacter { byte, position });
        }

        let chunk = u64::from(byte - OFFSET);
        let bits = chunk & GROUP_MASK;
        if shift >= u64::BITS || (bits << shift) >> shift != bits {
            return Err(DecodeError::Overflow { position });
        }
        result |= bits << shift;
        shift += 5;
        *cursor += 1;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let magnitude = (result >> 1) as i64;
    if result & 1 == 1 {
        Ok(!magnitude)
    } else {
        Ok(magnitude)
    }
}

fn accumulate(total: i64, delta: i64, position: usize) -> Result<i64, DecodeError> {
    total
        .checked_add(delta)
        .ok_or(DecodeError::Overflow { position })
}

fn push_value(encoded: &mut String, value: i64) {
    let mut rest = ((value << 1) ^ (value >> 63)) as u64;
    while rest >= CONTINUATION_BIT {
        encoded.push(group_char((rest & GROUP_MASK) | CONTINUATION_BIT));
        rest >>= 5;
    }
    encoded.push(group_char(rest));
}

fn group_char(group: u64) -> char {
    // groups are at most 0x3F, so the result stays within `?`..=`~`
    char::from(group as u8 + OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[Coordinate], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?}");
        for (point, (latitude, longitude)) in actual.iter().zip(expected) {
            assert!(
                (point.latitude - latitude).abs() < 1e-9
                    && (point.longitude - longitude).abs() < 1e-9,
                "expected ({latitude}, {longitude}), got {point:?}"
            );
        }
    }

    #[test]
    fn decode_empty() {
        assert_eq!(decode(""), Ok(vec![]));
    }

    #[test]
    fn decode_single_point() {
        let points = decode("_p~iF~ps|U").unwrap();
        assert_close(&points, &[(38.5, -120.2)]);
    }

    #[test]
    fn decode_reference_path() {
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_close(
            &points,
            &[(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)],
        );
    }

    #[test]
    fn decode_zero_deltas() {
        // "?" encodes a zero delta
        let points = decode("????").unwrap();
        assert_close(&points, &[(0.0, 0.0), (0.0, 0.0)]);
    }

    #[test]
    fn decode_is_deterministic() {
        let encoded = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";
        assert_eq!(decode(encoded), decode(encoded));
    }

    #[test]
    fn decode_lone_continuation_group() {
        assert_eq!(
            decode("_"),
            Err(DecodeError::UnexpectedEnd { position: 1 })
        );
    }

    #[test]
    fn decode_missing_longitude() {
        assert_eq!(
            decode("_p~iF"),
            Err(DecodeError::UnexpectedEnd { position: 5 })
        );
    }

    #[test]
    fn decode_truncated_second_point() {
        assert_eq!(
            decode("_p~iF~ps|U_ul"),
            Err(DecodeError::UnexpectedEnd { position: 13 })
        );
    }

    #[test]
    fn decode_invalid_character() {
        assert_eq!(
            decode("_p~iF ps|U"),
            Err(DecodeError::InvalidCharacter {
                byte: b' ',
                position: 5
            })
        );
        assert!(matches!(
            decode("_p~iF~ps|Ü"),
            Err(DecodeError::InvalidCharacter { position: 9, .. })
        ));
    }

    #[test]
    fn decode_overflow() {
        let encoded = "~".repeat(20);
        assert!(matches!(
            decode(&encoded),
            Err(DecodeError::Overflow { .. })
        ));
    }

    #[test]
    fn encode_reference_path() {
        let path = [
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ];
        assert_eq!(encode(&path), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn encode_saturated_values() {
        let path = [Coordinate::new(1e300, 0.0), Coordinate::new(-1e300, 0.0)];
        let encoded = encode(&path);
        assert!(!encoded.is_empty());
        assert!(encoded.bytes().all(|byte| (OFFSET..=b'~').contains(&byte)));
    }

    #[test]
    fn decode_restores_encoded_route() {
        // Kiel central station to Raisdorf via Preetzer Chaussee
        let route = [
            Coordinate::new(54.31474, 10.13197),
            Coordinate::new(54.30862, 10.15341),
            Coordinate::new(54.29918, 10.18512),
            Coordinate::new(54.28135, 10.22776),
            Coordinate::new(54.27749, 10.24532),
        ];
        let decoded = decode(&encode(&route)).unwrap();
        assert_eq!(decoded.len(), route.len());
        for (decoded, original) in decoded.iter().zip(route.iter()) {
            assert!((decoded.latitude - original.latitude).abs() <= 1e-5);
            assert!((decoded.longitude - original.longitude).abs() <= 1e-5);
        }
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            DecodeError::UnexpectedEnd { position: 3 }.to_string(),
            "Polyline ends unexpectedly at position 3."
        );
        assert_eq!(
            DecodeError::InvalidCharacter {
                byte: b' ',
                position: 0
            }
            .to_string(),
            "Invalid polyline character 0x20 at position 0."
        );
    }
}
