use crate::{
    error::{GeodesyError, Result},
    geodesic::{check_latitude, Kernel, SolveOptions},
    point::{wrap_180, GeodeticPoint, PolarOffset},
};
use tracing::trace;

/// Points visited by walking a sequence of legs, each leg starting where
/// the previous one ended.
#[derive(Clone, Debug, PartialEq)]
pub struct Traverse {
    /// The start followed by one point per leg.
    pub points: Vec<GeodeticPoint>,
    /// Back-azimuth at the end of each leg.
    pub back_azimuths: Vec<f64>,
}

impl Traverse {
    /// Absolute `(lat, lon)` difference in degrees between the last and the
    /// first point.
    pub fn misclosure_deg(&self) -> (f64, f64) {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (
                (last.lat - first.lat).abs(),
                wrap_180(last.lon - first.lon).abs(),
            ),
            _ => (0.0, 0.0),
        }
    }

    /// Whether the traverse returns to its start within `eps_deg` on both
    /// axes.
    pub fn is_closed(&self, eps_deg: f64) -> bool {
        let (dlat, dlon) = self.misclosure_deg();
        dlat <= eps_deg && dlon <= eps_deg
    }
}

/// Walks `legs` from `start`.
pub fn traverse(
    start: GeodeticPoint,
    legs: &[PolarOffset],
    options: &SolveOptions,
) -> Result<Traverse> {
    options.validate()?;
    if legs.is_empty() {
        return Err(GeodesyError::EmptyInput("legs"));
    }
    check_latitude(0, start.lat)?;

    let kernel = Kernel::new(options);
    let mut points = Vec::with_capacity(legs.len() + 1);
    let mut back_azimuths = Vec::with_capacity(legs.len());
    points.push(start);
    let mut here = start;
    for (idx, leg) in legs.iter().enumerate() {
        let (next, back_azimuth) =
            kernel.solve(idx, here.lat, here.lon, leg.distance_km, leg.azimuth_deg)?;
        trace!(
            "leg {idx}: {} km at {}° -> lat = {}, lon = {}",
            leg.distance_km,
            leg.azimuth_deg,
            next.lat,
            next.lon
        );
        points.push(next);
        back_azimuths.push(back_azimuth);
        here = next;
    }

    Ok(Traverse {
        points,
        back_azimuths,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geodesic::destination;
    use approx::assert_abs_diff_eq;

    #[test]
    fn there_and_back() {
        let start = GeodeticPoint::new(39.603480, -84.151764);
        let options = SolveOptions::default();
        let (_, baz) = destination(start, PolarOffset::new(0.1425, 269.329), &options).unwrap();
        let walk = traverse(
            start,
            &[
                PolarOffset::new(0.1425, 269.329),
                PolarOffset::new(0.1425, baz),
            ],
            &options,
        )
        .unwrap();
        assert_eq!(walk.points.len(), 3);
        assert_eq!(walk.back_azimuths.len(), 2);
        assert!(walk.is_closed(1e-9), "{:?}", walk.misclosure_deg());
    }

    #[test]
    fn legs_chain_from_previous_destination() {
        let start = GeodeticPoint::new(10.0, 20.0);
        let options = SolveOptions::default();
        let legs = [PolarOffset::new(50.0, 0.0), PolarOffset::new(50.0, 90.0)];
        let walk = traverse(start, &legs, &options).unwrap();
        let (first, _) = destination(start, legs[0], &options).unwrap();
        let (second, second_baz) = destination(first, legs[1], &options).unwrap();
        assert_eq!(walk.points, vec![start, first, second]);
        assert_eq!(walk.back_azimuths[1], second_baz);
    }

    #[test]
    fn open_traverse_reports_misclosure() {
        let walk = traverse(
            GeodeticPoint::new(0.0, 179.9),
            &[PolarOffset::new(111.32, 90.0)],
            &SolveOptions::default(),
        )
        .unwrap();
        let (dlat, dlon) = walk.misclosure_deg();
        assert_abs_diff_eq!(dlat, 0.0, epsilon = 1e-12);
        // Measured across the antimeridian, not the long way round.
        assert_abs_diff_eq!(dlon, 1.0, epsilon = 1e-3);
        assert!(!walk.is_closed(0.5));
    }

    #[test]
    fn empty_legs_fail() {
        assert_eq!(
            traverse(GeodeticPoint::default(), &[], &SolveOptions::default()).unwrap_err(),
            GeodesyError::EmptyInput("legs")
        );
    }
}
