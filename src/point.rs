use std::fmt;

/// A position on the ellipsoid, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeodeticPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeodeticPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<geo::Point> for GeodeticPoint {
    fn from(point: geo::Point) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<GeodeticPoint> for geo::Point {
    fn from(point: GeodeticPoint) -> Self {
        geo::Point::new(point.lon, point.lat)
    }
}

impl fmt::Display for GeodeticPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// A displacement from a start point: great-ellipse distance in
/// kilometers along an azimuth in degrees clockwise from north.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolarOffset {
    pub distance_km: f64,
    pub azimuth_deg: f64,
}

impl PolarOffset {
    pub fn new(distance_km: f64, azimuth_deg: f64) -> Self {
        Self {
            distance_km,
            azimuth_deg,
        }
    }
}

/// Wraps degrees into `[0, 360)`.
pub(crate) fn wrap_360(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wraps degrees into `(-180, 180]`.
pub(crate) fn wrap_180(deg: f64) -> f64 {
    let wrapped = wrap_360(deg);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn geo_point_axes() {
        let p = GeodeticPoint::new(38.649, -90.305);
        let g: geo::Point = p.into();
        assert_eq!(g.x(), -90.305);
        assert_eq!(g.y(), 38.649);
        assert_eq!(GeodeticPoint::from(g), p);
    }

    #[test]
    fn wrapping() {
        assert_eq!(wrap_360(-30.0), 330.0);
        assert_eq!(wrap_360(720.0), 0.0);
        assert_eq!(wrap_360(-1e-20), 0.0);
        assert_eq!(wrap_180(180.0), 180.0);
        assert_eq!(wrap_180(-180.0), 180.0);
        assert_eq!(wrap_180(190.0), -170.0);
        assert_eq!(wrap_180(-190.0), 170.0);
    }
}
