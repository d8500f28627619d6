//! Forward (direct) geodesic solutions on a reference ellipsoid.
//!
//! Given start points and `(distance, azimuth)` offsets, computes the
//! destination points and back-azimuths with Vincenty's iterative
//! formulation. Inputs are n-dimensional arrays which are broadcast
//! against each other before solving; every element is solved
//! independently and in parallel.
//!
//! Units: latitude, longitude and azimuths in degrees, distances in
//! kilometers, convergence tolerance in radians.

mod bearing;
mod broadcast;
mod ellipsoid;
mod error;
mod geodesic;
pub mod input;
mod point;
mod traverse;

pub use crate::{
    bearing::{Bearing, FaceDir, TurnDir},
    ellipsoid::Ellipsoid,
    error::{GeodesyError, Result},
    geodesic::{
        destination, solve, solve_components, Solution, SolveOptions, DEFAULT_MAX_ITERATIONS,
        DEFAULT_TOLERANCE,
    },
    point::{GeodeticPoint, PolarOffset},
    traverse::{traverse, Traverse},
};
