//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// Field order follows the command-line literal `[min_lon, max_lon, min_lat, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    /// Parse a bounding box literal: `[min_lon, max_lon, min_lat, max_lat]`.
    ///
    /// Square brackets or parentheses are accepted, as is a bare
    /// comma-separated list.
    pub fn from_literal(s: &str) -> Result<Self, BboxParseError> {
        let parts =
            split_literal(s).ok_or_else(|| BboxParseError::InvalidFormat(s.to_string()))?;
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0_f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            let value: f64 = part
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
            if !value.is_finite() {
                return Err(BboxParseError::InvalidNumber(part.to_string()));
            }
            *slot = value;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    /// Latitude label slice `(start, stop)`.
    ///
    /// Latitude is sliced from `max_lat` down to `min_lat`, which selects rows
    /// on the usual north-to-south grids.
    pub fn lat_slice(&self) -> (f64, f64) {
        (self.max_lat, self.min_lat)
    }

    /// Longitude label slice `(start, stop)`.
    pub fn lon_slice(&self) -> (f64, f64) {
        (self.min_lon, self.max_lon)
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.min_lon, self.max_lon, self.min_lat, self.max_lat
        )
    }
}

/// Split a list literal such as `[1, 2, 3]` or `(1, 2)` into trimmed items.
///
/// A single trailing comma is tolerated. Returns `None` for unbalanced
/// delimiters or empty items.
pub fn split_literal(s: &str) -> Option<Vec<&str>> {
    let trimmed = s.trim();
    let inner = match (trimmed.chars().next(), trimmed.chars().last()) {
        (Some('['), Some(']')) | (Some('('), Some(')')) => &trimmed[1..trimmed.len() - 1],
        (Some('[' | '('), _) | (_, Some(']' | ')')) => return None,
        _ => trimmed,
    };

    let inner = inner.trim();
    let inner = inner.strip_suffix(',').unwrap_or(inner);
    if inner.trim().is_empty() {
        return None;
    }

    let items: Vec<&str> = inner.split(',').map(str::trim).collect();
    if items.iter().any(|item| item.is_empty()) {
        return None;
    }
    Some(items)
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bounding box format: {0}. Expected '[min_lon, max_lon, min_lat, max_lat]'")]
    InvalidFormat(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bracketed_literal() {
        let bbox = BoundingBox::from_literal("[-10.5, 5, 40, 50.25]").unwrap();
        assert_eq!(bbox.min_lon, -10.5);
        assert_eq!(bbox.max_lon, 5.0);
        assert_eq!(bbox.min_lat, 40.0);
        assert_eq!(bbox.max_lat, 50.25);
    }

    #[test]
    fn test_parse_tuple_and_bare_literal() {
        let a = BoundingBox::from_literal("(1, 2, 3, 4)").unwrap();
        let b = BoundingBox::from_literal("1,2,3,4").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert!(matches!(
            BoundingBox::from_literal("[1, 2, 3]"),
            Err(BboxParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_number() {
        assert!(matches!(
            BoundingBox::from_literal("[1, 2, x, 4]"),
            Err(BboxParseError::InvalidNumber(_))
        ));
        assert!(BoundingBox::from_literal("[1, 2, nan, 4]").is_err());
    }

    #[test]
    fn test_slices_follow_descending_latitude() {
        let bbox = BoundingBox::new(0.0, 10.0, -5.0, 5.0);
        assert_eq!(bbox.lat_slice(), (5.0, -5.0));
        assert_eq!(bbox.lon_slice(), (0.0, 10.0));
    }

    #[test]
    fn test_split_literal_edge_cases() {
        assert_eq!(split_literal("[2010, 2011,]"), Some(vec!["2010", "2011"]));
        assert_eq!(split_literal("2010"), Some(vec!["2010"]));
        assert_eq!(split_literal("[]"), None);
        assert_eq!(split_literal("[1, 2"), None);
        assert_eq!(split_literal("[1,,2]"), None);
    }
}
