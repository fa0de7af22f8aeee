//! Point geometry construction
//!
//! All stored geometry shares one spatial reference (WGS 84). Sales
//! locations travel as EWKT text until they reach the store; coordinate
//! range is not validated here, the geography column rejects out-of-range
//! points at write time.

/// Spatial reference identifier applied to all stored geometry.
pub const SRID: i32 = 4326;

/// Build an EWKT point literal from a coordinate pair.
pub fn point_ewkt(longitude: f64, latitude: f64) -> String {
    format!("SRID={};POINT({} {})", SRID, longitude, latitude)
}

/// Build a point only when both coordinates are present.
///
/// A half-present pair is no geometry; the caller decides whether that
/// drops the row.
pub fn point_from_parts(longitude: Option<f64>, latitude: Option<f64>) -> Option<String> {
    match (longitude, latitude) {
        (Some(lng), Some(lat)) => Some(point_ewkt(lng, lat)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ewkt_format() {
        assert_eq!(point_ewkt(-77.436, 37.5407), "SRID=4326;POINT(-77.436 37.5407)");
        assert_eq!(point_ewkt(0.0, 0.0), "SRID=4326;POINT(0 0)");
    }

    #[test]
    fn test_point_requires_both_coordinates() {
        assert!(point_from_parts(Some(-77.0), Some(37.0)).is_some());
        assert_eq!(point_from_parts(Some(-77.0), None), None);
        assert_eq!(point_from_parts(None, Some(37.0)), None);
        assert_eq!(point_from_parts(None, None), None);
    }

    #[test]
    fn test_out_of_range_passes_through() {
        // Range enforcement belongs to the store, not the builder.
        assert_eq!(point_ewkt(200.0, 95.0), "SRID=4326;POINT(200 95)");
    }
}
