//! Reference ellipsoid given as `[equatorial_radius_km, flattening]`.

use crate::error::{GeodesyError, Result};

/// An oblate reference ellipsoid.
///
/// Always holds a finite, positive equatorial radius and a finite
/// flattening below one, so the polar radius `a * (1 - f)` is positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    radius_km: f64,
    flattening: f64,
}

impl Ellipsoid {
    /// WGS-84: `a = 6378.137 km`, `f = 1/298.257223563`.
    pub const WGS84: Ellipsoid = Ellipsoid {
        radius_km: 6378.137,
        flattening: 1.0 / 298.257_223_563,
    };

    pub fn new(radius_km: f64, flattening: f64) -> Result<Self> {
        if !radius_km.is_finite() || !flattening.is_finite() {
            return Err(GeodesyError::InvalidEllipsoid(format!(
                "parameters must be finite, got [{radius_km}, {flattening}]"
            )));
        }
        if radius_km <= 0.0 {
            return Err(GeodesyError::InvalidEllipsoid(format!(
                "equatorial radius must be positive, got {radius_km} km"
            )));
        }
        if flattening >= 1.0 {
            return Err(GeodesyError::InvalidEllipsoid(format!(
                "flattening must be less than 1, got {flattening}"
            )));
        }
        Ok(Self {
            radius_km,
            flattening,
        })
    }

    /// Equatorial radius in kilometers.
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn flattening(&self) -> f64 {
        self.flattening
    }

    /// Semi-major axis `a` in meters.
    pub fn semi_major_m(&self) -> f64 {
        self.radius_km * 1000.0
    }

    /// Semi-minor axis `b = a(1 - f)` in meters.
    pub fn semi_minor_m(&self) -> f64 {
        self.semi_major_m() * (1.0 - self.flattening)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

impl TryFrom<&[f64]> for Ellipsoid {
    type Error = GeodesyError;

    fn try_from(params: &[f64]) -> Result<Self> {
        match *params {
            [radius_km, flattening] => Self::new(radius_km, flattening),
            _ => Err(GeodesyError::InvalidEllipsoid(format!(
                "expected [radius_km, flattening], got {} values",
                params.len()
            ))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wgs84_axes() {
        let e = Ellipsoid::default();
        assert_relative_eq!(e.semi_major_m(), 6_378_137.0);
        assert_relative_eq!(e.semi_minor_m(), 6_356_752.314_245_179, epsilon = 0.001);
    }

    #[test]
    fn flattening_at_or_above_one_is_rejected() {
        assert!(matches!(
            Ellipsoid::new(6378.137, 1.0),
            Err(GeodesyError::InvalidEllipsoid(_))
        ));
        #[allow(clippy::excessive_precision)]
        let rounds_to_one = 0.999_999_999_999_999_999_f64;
        assert!(matches!(
            Ellipsoid::new(6378.137, rounds_to_one),
            Err(GeodesyError::InvalidEllipsoid(_))
        ));
        assert!(Ellipsoid::new(6378.137, 0.9999).is_ok());
    }

    #[test]
    fn non_finite_and_non_positive_radius_are_rejected() {
        assert!(Ellipsoid::new(f64::NAN, 0.0).is_err());
        assert!(Ellipsoid::new(6378.137, f64::INFINITY).is_err());
        assert!(Ellipsoid::new(0.0, 0.0).is_err());
        assert!(Ellipsoid::new(-6378.137, 0.0).is_err());
    }

    #[test]
    fn pair_must_have_exactly_two_values() {
        let ok = Ellipsoid::try_from(&[6371.0, 0.0][..]).unwrap();
        assert_eq!(ok.radius_km(), 6371.0);
        assert_eq!(ok.flattening(), 0.0);
        assert!(Ellipsoid::try_from(&[6371.0][..]).is_err());
        assert!(Ellipsoid::try_from(&[6371.0, 0.0, 1.0][..]).is_err());
    }
}
