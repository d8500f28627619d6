//! Vincenty's direct solution of the geodesic problem on an ellipsoid.
//!
//! # References
//!
//! 1. T. Vincenty, "Direct and Inverse Solutions of Geodesics on the
//!    Ellipsoid with Application of Nested Equations", Survey Review
//!    XXIII (176), 1975.

use crate::{
    broadcast::{self, Resolved},
    ellipsoid::Ellipsoid,
    error::{GeodesyError, Result},
    point::{wrap_180, wrap_360, GeodeticPoint, PolarOffset},
};
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use rayon::prelude::*;
use std::f64::consts::PI;
use tracing::{debug, trace};

/// Default angular convergence threshold, in radians.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Default cap on fixed-point rounds per element.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Parameters shared by every element of a solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveOptions {
    pub ellipsoid: Ellipsoid,
    /// Convergence threshold on successive values of the arc length on
    /// the auxiliary sphere, in radians.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolveOptions {
    pub fn with_ellipsoid(mut self, ellipsoid: Ellipsoid) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && (0.0..=PI).contains(&self.tolerance)) {
            return Err(GeodesyError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// Destinations and back-azimuths, both in the broadcast shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub destinations: ArrayD<GeodeticPoint>,
    /// Bearing from each destination back toward its start, degrees in
    /// `[0, 360)`.
    pub back_azimuths: ArrayD<f64>,
}

/// Solves the forward problem for every broadcast pair of start point and
/// offset.
///
/// A single start is replicated over all offsets and vice versa; see
/// [`solve_components`] for the full replication rules.
///
/// # Example
///
/// ```
/// use ndarray::arr1;
/// use vincenty_fwd::{solve, GeodeticPoint, PolarOffset, SolveOptions};
///
/// let st_louis = arr1(&[GeodeticPoint::new(38.649, -90.305)]).into_dyn();
/// let offsets = arr1(&[PolarOffset::new(5000.0, -30.0)]).into_dyn();
/// let solution = solve(st_louis.view(), offsets.view(), &SolveOptions::default())?;
/// assert!((solution.destinations[[0]].lat - 66.933_360).abs() < 1e-6);
/// # Ok::<(), vincenty_fwd::GeodesyError>(())
/// ```
pub fn solve(
    starts: ArrayViewD<'_, GeodeticPoint>,
    offsets: ArrayViewD<'_, PolarOffset>,
    options: &SolveOptions,
) -> Result<Solution> {
    solve_components(
        starts.map(|p| p.lat).view(),
        starts.map(|p| p.lon).view(),
        offsets.map(|o| o.distance_km).view(),
        offsets.map(|o| o.azimuth_deg).view(),
        options,
    )
}

/// Solves the forward problem from four component arrays: start latitude
/// and longitude in degrees, distance in kilometers and azimuth in degrees.
///
/// The components are brought to one shape before solving:
///
/// 1. If the start (`lat`, `lon`) is a single point it is replicated to the
///    shape of the offsets.
/// 2. Otherwise if the offset (`distance_km`, `azimuth_deg`) is a single
///    pair it is replicated to the shape of the starts.
/// 3. Any remaining one-element component is replicated to the shape of the
///    others.
///
/// # Errors
///
/// [`GeodesyError::InvalidTolerance`], [`GeodesyError::EmptyInput`],
/// [`GeodesyError::ShapeMismatch`] and [`GeodesyError::LatitudeOutOfRange`]
/// are raised before any element is solved. [`GeodesyError::ConvergenceFailure`]
/// aborts the whole batch if any one element fails to converge.
pub fn solve_components(
    lat: ArrayViewD<'_, f64>,
    lon: ArrayViewD<'_, f64>,
    distance_km: ArrayViewD<'_, f64>,
    azimuth_deg: ArrayViewD<'_, f64>,
    options: &SolveOptions,
) -> Result<Solution> {
    options.validate()?;
    let resolved = broadcast::resolve(lat, lon, distance_km, azimuth_deg)?;
    for (index, &value) in resolved.lat.iter().enumerate() {
        check_latitude(index, value)?;
    }

    debug!(
        "solving {} elements of shape {:?}",
        resolved.len(),
        resolved.shape
    );
    let kernel = Kernel::new(options);
    let Resolved {
        shape,
        lat,
        lon,
        distance_km,
        azimuth_deg,
    } = resolved;
    let results = (0..lat.len())
        .into_par_iter()
        .map(|i| kernel.solve(i, lat[i], lon[i], distance_km[i], azimuth_deg[i]))
        .collect::<Result<Vec<_>>>()?;

    let mut destinations = ArrayD::from_elem(IxDyn(&shape), GeodeticPoint::default());
    let mut back_azimuths = ArrayD::zeros(IxDyn(&shape));
    for ((dest, baz), (point, back_azimuth)) in destinations
        .iter_mut()
        .zip(back_azimuths.iter_mut())
        .zip(results)
    {
        *dest = point;
        *baz = back_azimuth;
    }

    Ok(Solution {
        destinations,
        back_azimuths,
    })
}

/// Solves a single start point and offset, returning the destination and
/// back-azimuth.
pub fn destination(
    start: GeodeticPoint,
    offset: PolarOffset,
    options: &SolveOptions,
) -> Result<(GeodeticPoint, f64)> {
    options.validate()?;
    check_latitude(0, start.lat)?;
    Kernel::new(options).solve(0, start.lat, start.lon, offset.distance_km, offset.azimuth_deg)
}

pub(crate) fn check_latitude(index: usize, value: f64) -> Result<()> {
    // Written to reject NaN as well.
    if !(value.abs() <= 90.0) {
        return Err(GeodesyError::LatitudeOutOfRange { index, value });
    }
    Ok(())
}

/// Ellipsoid constants hoisted out of the per-element solve.
pub(crate) struct Kernel {
    /// Flattening.
    f: f64,
    /// Semi-minor axis in meters.
    b: f64,
    /// `(a² - b²) / b²`, the second eccentricity squared.
    ep2: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl Kernel {
    /// `options` must already be validated.
    pub(crate) fn new(options: &SolveOptions) -> Self {
        let a = options.ellipsoid.semi_major_m();
        let b = options.ellipsoid.semi_minor_m();
        let (a2, b2) = (a * a, b * b);
        Self {
            f: options.ellipsoid.flattening(),
            b,
            ep2: (a2 - b2) / b2,
            tolerance: options.tolerance,
            max_iterations: options.max_iterations,
        }
    }

    /// Returns the destination and back-azimuth of one element. `index` is
    /// only used to label errors.
    pub(crate) fn solve(
        &self,
        index: usize,
        lat1: f64,
        lon1: f64,
        distance_km: f64,
        azimuth_deg: f64,
    ) -> Result<(GeodeticPoint, f64)> {
        let lon1 = lon1.rem_euclid(360.0);

        if distance_km == 0.0 {
            trace!("element {index}: zero distance");
            return Ok((
                GeodeticPoint::new(lat1, wrap_180(lon1)),
                wrap_360(azimuth_deg + 180.0),
            ));
        }

        let Self { f, b, ep2, .. } = *self;
        let s = distance_km * 1000.0;

        // Reduced latitude on the auxiliary sphere.
        let tan_u1 = (1.0 - f) * lat1.to_radians().tan();
        let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
        let sin_u1 = tan_u1 * cos_u1;

        let (sin_alpha1, cos_alpha1) = azimuth_deg.to_radians().sin_cos();
        let sigma1 = tan_u1.atan2(cos_alpha1);
        let sin_alpha = cos_u1 * sin_alpha1;
        let cos2_alpha = 1.0 - sin_alpha * sin_alpha;

        let u2 = cos2_alpha * ep2;
        let big_a = 1.0 + u2 / 16384.0 * (4096.0 + u2 * (-768.0 + u2 * (320.0 - 175.0 * u2)));
        let big_b = u2 / 1024.0 * (256.0 + u2 * (-128.0 + u2 * (74.0 - 47.0 * u2)));

        let sigma0 = s / (b * big_a);
        let mut iteration = SigmaIteration::new(sigma0);
        while !iteration.converged {
            if iteration.rounds == self.max_iterations {
                return Err(GeodesyError::ConvergenceFailure {
                    index,
                    iterations: iteration.rounds,
                });
            }
            let sigma = iteration.sigma;
            let cos_2sm = (2.0 * sigma1 + sigma).cos();
            let (sin_sigma, cos_sigma) = sigma.sin_cos();
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sm
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)
                            - big_b / 6.0
                                * cos_2sm
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos_2sm * cos_2sm)));
            iteration.advance(sigma0 + delta_sigma, self.tolerance);
        }
        trace!("element {index}: converged in {} rounds", iteration.rounds);

        let sigma = iteration.sigma;
        let cos_2sm = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();

        let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
        let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
            .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());

        let lambda =
            (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
        let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
        let l = lambda
            - (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sm + c * cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)));

        let lon2 = wrap_180(lon1 + l.to_degrees());
        let alpha2 = sin_alpha.atan2(-sin_u1 * sin_sigma + cos_u1 * cos_sigma * cos_alpha1);
        let back_azimuth = wrap_360(180.0 + alpha2.to_degrees());

        Ok((GeodeticPoint::new(lat2.to_degrees(), lon2), back_azimuth))
    }
}

/// Fixed-point state for one element: `σ = s/(bA) + Δσ(σ)`.
struct SigmaIteration {
    sigma: f64,
    rounds: usize,
    converged: bool,
}

impl SigmaIteration {
    fn new(sigma0: f64) -> Self {
        Self {
            sigma: sigma0,
            rounds: 0,
            converged: false,
        }
    }

    fn advance(&mut self, next: f64, tolerance: f64) {
        // NaN never compares below tolerance, so a poisoned element keeps
        // iterating until the cap.
        self.converged = (next - self.sigma).abs() <= tolerance;
        self.sigma = next;
        self.rounds += 1;
    }
}
