//! Geographic to UTM projection for shoreline surveys.
//!
//! Shoreline vertices delivered in WGS84 longitude/latitude must be brought
//! into meters before a beach-profile grid can be laid out. The transverse
//! Mercator series below is accurate to well under a meter within a zone.
//!
//! # Example
//!
//! ```ignore
//! use shoreline_coupler::io::{CoordinateProjection, UtmProjection};
//!
//! // Cape Hatteras lies in zone 18N
//! let proj = UtmProjection::for_lon_lat(-75.53, 35.25);
//! let (x, y) = proj.geo_to_xy(35.25, -75.53);
//! let (lat, lon) = proj.xy_to_geo(x, y);
//! ```

use std::f64::consts::PI;
use std::fmt;

/// WGS84 equatorial radius in meters
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// Scale factor on the central meridian
const UTM_K0: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Trait for coordinate projections.
pub trait CoordinateProjection {
    /// Convert geographic coordinates (lat, lon) to projected (x, y) in meters.
    fn geo_to_xy(&self, lat: f64, lon: f64) -> (f64, f64);

    /// Convert projected coordinates (x, y) to geographic (lat, lon).
    fn xy_to_geo(&self, x: f64, y: f64) -> (f64, f64);
}

/// Universal Transverse Mercator projection for one zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmProjection {
    zone: u8,
    northern: bool,
    /// Central meridian in degrees
    central_meridian: f64,
}

impl UtmProjection {
    /// Create a UTM projection for a given zone (1-60) and hemisphere.
    pub fn new(zone: u8, northern: bool) -> Self {
        assert!((1..=60).contains(&zone), "UTM zone must be 1-60");
        Self {
            zone,
            northern,
            central_meridian: zone as f64 * 6.0 - 183.0,
        }
    }

    /// Projection for the zone containing a point.
    pub fn for_lon_lat(lon: f64, lat: f64) -> Self {
        Self::new(zone_for_lon(lon), lat >= 0.0)
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn is_northern(&self) -> bool {
        self.northern
    }

    pub fn central_meridian(&self) -> f64 {
        self.central_meridian
    }

    fn false_northing(&self) -> f64 {
        if self.northern {
            0.0
        } else {
            UTM_FALSE_NORTHING_SOUTH
        }
    }
}

impl fmt::Display for UtmProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UTM {}{}", self.zone, if self.northern { 'N' } else { 'S' })
    }
}

/// UTM zone number containing a longitude, wrapping at the antimeridian.
pub fn zone_for_lon(lon: f64) -> u8 {
    let wrapped = (lon + 180.0).rem_euclid(360.0);
    ((wrapped / 6.0).floor() as u8).min(59) + 1
}

/// First eccentricity squared and second eccentricity squared.
#[inline]
fn eccentricities() -> (f64, f64) {
    let e2 = 2.0 * WGS84_F - WGS84_F * WGS84_F;
    (e2, e2 / (1.0 - e2))
}

impl CoordinateProjection for UtmProjection {
    fn geo_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let (e2, ep2) = eccentricities();
        let (sin_phi, cos_phi, tan_phi) = (phi.sin(), phi.cos(), phi.tan());

        let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let a = (lon - self.central_meridian).to_radians() * cos_phi;

        // Meridian arc length
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let m = WGS84_A
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

        let x = UTM_K0
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
            + UTM_FALSE_EASTING;

        let y = UTM_K0
            * (m + n
                * tan_phi
                * (a * a / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0))
            + self.false_northing();

        (x, y)
    }

    fn xy_to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x - UTM_FALSE_EASTING;
        let y = y - self.false_northing();
        let (e2, ep2) = eccentricities();
        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let mu = y / UTM_K0 / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2.powi(3) / 256.0));

        // Footpoint latitude
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let sin1 = phi1.sin();
        let n1 = WGS84_A / (1.0 - e2 * sin1 * sin1).sqrt();
        let t1 = phi1.tan().powi(2);
        let c1 = ep2 * phi1.cos().powi(2);
        let r1 = WGS84_A * (1.0 - e2) / (1.0 - e2 * sin1 * sin1).powf(1.5);
        let d = x / (n1 * UTM_K0);

        let lat = phi1
            - (n1 * phi1.tan() / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let dlon = (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d.powi(5)
                / 120.0)
            / phi1.cos();

        (lat * 180.0 / PI, self.central_meridian + dlon * 180.0 / PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_lookup() {
        assert_eq!(zone_for_lon(-75.53), 18);
        assert_eq!(zone_for_lon(-180.0), 1);
        assert_eq!(zone_for_lon(179.9), 60);
        assert_eq!(zone_for_lon(180.0), 1);
        assert_eq!(zone_for_lon(3.0), 31);

        let proj = UtmProjection::for_lon_lat(-75.53, 35.25);
        assert_eq!(proj.zone(), 18);
        assert!(proj.is_northern());
        assert_eq!(proj.central_meridian(), -75.0);
        assert_eq!(proj.to_string(), "UTM 18N");
    }

    #[test]
    fn test_cape_hatteras() {
        let proj = UtmProjection::new(18, true);
        let (x, y) = proj.geo_to_xy(35.25, -75.53);
        // ~48 km west of the central meridian
        assert!((x - 451_800.0).abs() < 1_000.0, "easting: {}", x);
        assert!((y - 3_901_000.0).abs() < 10_000.0, "northing: {}", y);

        let (lat, lon) = proj.xy_to_geo(x, y);
        assert!((lat - 35.25).abs() < 1e-5, "lat roundtrip: {}", lat);
        assert!((lon + 75.53).abs() < 1e-5, "lon roundtrip: {}", lon);
    }

    #[test]
    fn test_southern_hemisphere_roundtrip() {
        let proj = UtmProjection::for_lon_lat(151.2, -33.9);
        assert!(!proj.is_northern());

        let (x, y) = proj.geo_to_xy(-33.9, 151.2);
        assert!(y > 6_000_000.0 && y < UTM_FALSE_NORTHING_SOUTH);

        let (lat, lon) = proj.xy_to_geo(x, y);
        assert!((lat + 33.9).abs() < 1e-5);
        assert!((lon - 151.2).abs() < 1e-5);
    }

    #[test]
    fn test_central_meridian_easting() {
        let proj = UtmProjection::new(18, true);
        let (x, _) = proj.geo_to_xy(30.0, -75.0);
        assert!((x - UTM_FALSE_EASTING).abs() < 1e-6);
    }
}
