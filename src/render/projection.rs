//! Coordinate transforms between the composite's polar-stereographic plane,
//! WGS84, and the Web Mercator display projection.
//!
//! The composite grid sits on a polar-stereographic projection over a sphere
//! of radius 6370.04 km, true at 60°N, centered on 9°E, with the lower-left
//! corner of the national 900x900 km domain at 3.5889°E / 46.9526°N and 1 km
//! cells. Only coordinates are transformed; cell values pass through
//! untouched.

const EARTH_RADIUS_KM: f64 = 6370.04;
const REF_LON_DEG: f64 = 9.0;
const REF_LAT_DEG: f64 = 60.0;
const CORNER_LAT_DEG: f64 = 46.9526;
const CORNER_LON_DEG: f64 = 3.5889;

const WEB_MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// A point on the Web Mercator plane, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorPoint {
    pub x: f64,
    pub y: f64,
}

/// Rectangular display frame on the Web Mercator plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Forward projection: WGS84 degrees to polar-stereographic km.
pub fn wgs84_to_polar_stereo(lat_deg: f64, lon_deg: f64) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let lat0 = REF_LAT_DEG.to_radians();
    let lon0 = REF_LON_DEG.to_radians();

    let m = (1.0 + lat0.sin()) / (1.0 + lat.sin());
    let x = EARTH_RADIUS_KM * m * lat.cos() * (lon - lon0).sin();
    let y = -EARTH_RADIUS_KM * m * lat.cos() * (lon - lon0).cos();
    (x, y)
}

/// Inverse projection: polar-stereographic km back to WGS84 degrees.
pub fn polar_stereo_to_wgs84(x_km: f64, y_km: f64) -> (f64, f64) {
    let lat0 = REF_LAT_DEG.to_radians();
    let k = EARTH_RADIUS_KM * EARTH_RADIUS_KM * (1.0 + lat0.sin()) * (1.0 + lat0.sin());
    let d2 = x_km * x_km + y_km * y_km;

    let lat = ((k - d2) / (k + d2)).asin();
    let lon = REF_LON_DEG.to_radians() + x_km.atan2(-y_km);
    (lat.to_degrees(), lon.to_degrees())
}

/// WGS84 degrees to Web Mercator meters.
pub fn wgs84_to_mercator(lat_deg: f64, lon_deg: f64) -> MercatorPoint {
    let x = WEB_MERCATOR_RADIUS_M * lon_deg.to_radians();
    let y = WEB_MERCATOR_RADIUS_M
        * (std::f64::consts::FRAC_PI_4 + lat_deg.to_radians() / 2.0)
            .tan()
            .ln();
    MercatorPoint { x, y }
}

/// The fixed display frame: 4–16°E and 46–56°N reprojected to Web Mercator.
pub fn germany_view() -> ViewBounds {
    let lower_left = wgs84_to_mercator(46.0, 4.0);
    let upper_right = wgs84_to_mercator(56.0, 16.0);
    ViewBounds {
        x_min: lower_left.x,
        x_max: upper_right.x,
        y_min: lower_left.y,
        y_max: upper_right.y,
    }
}

/// Geometry of a composite grid on the polar-stereographic plane.
///
/// Rows are counted from the north (matching the value layout of
/// [`crate::CompositeGrid`]); the stored origin is the lower-left corner.
#[derive(Debug, Clone, Copy)]
pub struct GridGeometry {
    width: usize,
    height: usize,
    x_origin_km: f64,
    y_origin_km: f64,
}

impl GridGeometry {
    pub fn new(width: usize, height: usize) -> Self {
        let (x_origin_km, y_origin_km) = wgs84_to_polar_stereo(CORNER_LAT_DEG, CORNER_LON_DEG);
        Self {
            width,
            height,
            x_origin_km,
            y_origin_km,
        }
    }

    /// Mercator-space corner quad of the cell at `col` across, `row` down
    /// from the north-west, ordered counter-clockwise from the south-west
    /// corner.
    pub fn cell_corners(&self, col: usize, row: usize) -> [MercatorPoint; 4] {
        debug_assert!(col < self.width && row < self.height);
        let x0 = self.x_origin_km + col as f64;
        let x1 = x0 + 1.0;
        let y0 = self.y_origin_km + (self.height - row - 1) as f64;
        let y1 = y0 + 1.0;

        [
            self.to_mercator(x0, y0),
            self.to_mercator(x1, y0),
            self.to_mercator(x1, y1),
            self.to_mercator(x0, y1),
        ]
    }

    fn to_mercator(&self, x_km: f64, y_km: f64) -> MercatorPoint {
        let (lat, lon) = polar_stereo_to_wgs84(x_km, y_km);
        wgs84_to_mercator(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_stereo_round_trips_the_domain_corner() {
        let (x, y) = wgs84_to_polar_stereo(CORNER_LAT_DEG, CORNER_LON_DEG);
        let (lat, lon) = polar_stereo_to_wgs84(x, y);
        assert!((lat - CORNER_LAT_DEG).abs() < 1e-9);
        assert!((lon - CORNER_LON_DEG).abs() < 1e-9);
    }

    #[test]
    fn projection_center_maps_onto_negative_y_axis() {
        let (x, y) = wgs84_to_polar_stereo(REF_LAT_DEG, REF_LON_DEG);
        assert!(x.abs() < 1e-9);
        // At the reference latitude the scale factor is one.
        assert!((y + EARTH_RADIUS_KM * REF_LAT_DEG.to_radians().cos()).abs() < 1e-6);
    }

    #[test]
    fn mercator_of_the_origin_is_the_origin() {
        let p = wgs84_to_mercator(0.0, 0.0);
        assert!(p.x.abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn mercator_antimeridian_is_the_known_bound() {
        let p = wgs84_to_mercator(0.0, 180.0);
        assert!((p.x - 20_037_508.34).abs() < 1.0);
    }

    #[test]
    fn germany_view_is_a_proper_rectangle() {
        let view = germany_view();
        assert!(view.x_min < view.x_max);
        assert!(view.y_min < view.y_max);
    }

    #[test]
    fn northern_rows_map_above_southern_rows() {
        let geometry = GridGeometry::new(900, 900);
        let north = geometry.cell_corners(450, 0);
        let south = geometry.cell_corners(450, 899);
        assert!(north[0].y > south[0].y);
    }
}
