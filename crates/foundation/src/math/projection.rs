//! Web Mercator projection into the host map's normalized world cube.
//!
//! World space is `[0, 1] x [0, 1]` horizontally, x growing east and y growing
//! south, with z measured in the same units scaled at the point's latitude.

use serde::{Deserialize, Serialize};

use super::Vec3;

/// Mean Earth radius the host renderer uses for its world units (meters).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Equatorial circumference for `EARTH_RADIUS_M` (meters).
pub const EARTH_CIRCUMFERENCE_M: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS_M;

/// Latitude limit of the square Web Mercator world (degrees).
pub const MAX_MERCATOR_LAT_DEG: f64 = 85.051_128_779_806_59;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Finite and inside the projectable Mercator square.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && self.lng.abs() <= 180.0
            && self.lat.abs() <= MAX_MERCATOR_LAT_DEG
    }

    /// Arithmetic midpoint in degree space (not the geodesic midpoint).
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.lng + other.lng) * 0.5, (self.lat + other.lat) * 0.5)
    }

    pub fn as_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

/// Ground-anchored world position plus the local meters-to-world scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectedPoint {
    pub world: Vec3,
    pub meters_to_world_unit: f64,
}

/// Pure geographic-to-world projection used at load time and per frame.
pub trait CoordinateProjector {
    fn project(&self, lng_lat: LngLat) -> ProjectedPoint;
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MercatorProjector;

impl CoordinateProjector for MercatorProjector {
    fn project(&self, lng_lat: LngLat) -> ProjectedPoint {
        project(lng_lat.lng, lng_lat.lat)
    }
}

pub fn mercator_x_from_lng(lng: f64) -> f64 {
    (180.0 + lng) / 360.0
}

pub fn mercator_y_from_lat(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (180.0
        - (180.0 / std::f64::consts::PI)
            * (std::f64::consts::FRAC_PI_4 + lat_rad * 0.5).tan().ln())
        / 360.0
}

/// Meters to world units at `lat`; grows with `1 / cos(lat)` away from the equator.
pub fn meters_to_world_unit(lat: f64) -> f64 {
    1.0 / (EARTH_CIRCUMFERENCE_M * lat.to_radians().cos())
}

/// Projects `(lng, lat)` at zero elevation.
pub fn project(lng: f64, lat: f64) -> ProjectedPoint {
    ProjectedPoint {
        world: Vec3::new(mercator_x_from_lng(lng), mercator_y_from_lat(lat), 0.0),
        meters_to_world_unit: meters_to_world_unit(lat),
    }
}

/// Uniform render scale making an object of `native_height` appear `height_m` tall.
pub fn render_scale(height_m: f64, meters_to_world_unit: f64, native_height: f64) -> f64 {
    height_m * meters_to_world_unit / native_height
}

/// Ground placement for a vertically centered object: lifted by half its scaled height.
pub fn lifted_position(point: &ProjectedPoint, native_height: f64, scale: f64) -> Vec3 {
    point.world + Vec3::new(0.0, 0.0, native_height * scale * 0.5)
}

#[cfg(test)]
mod tests {
    use super::{
        EARTH_CIRCUMFERENCE_M, LngLat, lifted_position, meters_to_world_unit, project,
        render_scale,
    };

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_projects_to_world_center() {
        let p = project(0.0, 0.0);
        assert_close(p.world.x, 0.5, 1e-12);
        assert_close(p.world.y, 0.5, 1e-12);
        assert_eq!(p.world.z, 0.0);
        assert_close(p.meters_to_world_unit, 1.0 / EARTH_CIRCUMFERENCE_M, 1e-18);
    }

    #[test]
    fn antimeridian_and_north_are_edges() {
        assert_close(project(-180.0, 0.0).world.x, 0.0, 1e-12);
        assert_close(project(180.0, 0.0).world.x, 1.0, 1e-12);
        // North is up: y shrinks toward the pole.
        assert!(project(0.0, 60.0).world.y < project(0.0, 10.0).world.y);
    }

    #[test]
    fn ground_elevation_is_zero_everywhere() {
        for (lng, lat) in [(127.38, 36.35), (-74.0, 40.7), (151.2, -33.9), (0.0, 80.0)] {
            let p = project(lng, lat);
            assert_eq!(p.world.z, 0.0);
            assert!(p.meters_to_world_unit > 0.0);
        }
    }

    #[test]
    fn scale_grows_monotonically_with_latitude() {
        let mut prev = meters_to_world_unit(0.0);
        for lat in [10.0, 20.0, 36.35, 50.0, 70.0, 85.0] {
            let m = meters_to_world_unit(lat);
            assert!(m > prev, "{lat}: {m} <= {prev}");
            assert_close(m, meters_to_world_unit(-lat), 1e-18);
            prev = m;
        }
    }

    #[test]
    fn render_scale_lifts_base_to_ground() {
        let p = project(127.38, 36.35);
        let native = 2.5;
        let scale = render_scale(35.0, p.meters_to_world_unit, native);
        // Scaled height is exactly 35 m in world units regardless of native height.
        assert_close(native * scale, 35.0 * p.meters_to_world_unit, 1e-18);
        let pos = lifted_position(&p, native, scale);
        assert_close(pos.z - native * scale * 0.5, 0.0, 1e-18);
    }

    #[test]
    fn midpoint_is_arithmetic() {
        let m = LngLat::new(127.38, 36.35).midpoint(LngLat::new(127.39, 36.36));
        assert_close(m.lng, 127.385, 1e-9);
        assert_close(m.lat, 36.355, 1e-9);
    }

    #[test]
    fn validity_rejects_non_finite_and_polar() {
        assert!(LngLat::new(127.38, 36.35).is_valid());
        assert!(!LngLat::new(f64::NAN, 36.35).is_valid());
        assert!(!LngLat::new(0.0, 89.0).is_valid());
        assert!(!LngLat::new(181.0, 0.0).is_valid());
    }
}
