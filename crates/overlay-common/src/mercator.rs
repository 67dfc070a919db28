//! Spherical Web Mercator (EPSG:3857) conversions.
//!
//! Tile manifests from the offline conversion pipeline carry bounding boxes
//! in Web Mercator meters; map widgets want geographic degrees. Only the
//! spherical form is needed here (matching EPSG:3857 exactly).

use crate::BoundingBox;

/// WGS84 semi-major axis (meters), the sphere radius used by EPSG:3857.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Half-extent of the Web Mercator world square (meters).
pub const WEB_MERCATOR_MAX: f64 = 20_037_508.342_789_244;

/// Latitude limit of the Mercator valid band (degrees).
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// Project geographic (lon, lat) degrees to Web Mercator (x, y) meters.
///
/// Latitude is clamped to the Mercator valid band first.
pub fn geographic_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
    let x = EARTH_RADIUS_M * lon.to_radians();
    let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0)
        .tan()
        .ln();
    (x, y)
}

/// Unproject Web Mercator (x, y) meters to geographic (lon, lat) degrees.
pub fn mercator_to_geographic(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (y / EARTH_RADIUS_M).sinh().atan().to_degrees();
    (lon, lat)
}

/// Reproject a Web Mercator bounding box to geographic degrees.
pub fn bbox_to_geographic(bbox: &BoundingBox) -> BoundingBox {
    let (min_lon, min_lat) = mercator_to_geographic(bbox.min_x, bbox.min_y);
    let (max_lon, max_lat) = mercator_to_geographic(bbox.max_x, bbox.max_y);
    BoundingBox::from_corners(min_lon, min_lat, max_lon, max_lat)
}
