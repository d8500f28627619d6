use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeodesyError {
    #[error("invalid ellipsoid: {0}")]
    InvalidEllipsoid(String),

    #[error("invalid tolerance {0}: must be a finite value in [0, pi]")]
    InvalidTolerance(f64),

    #[error("empty input: the {0} array has no elements")]
    EmptyInput(&'static str),

    #[error(
        "shape mismatch after broadcasting: lat {:?}, lon {:?}, distance {:?}, azimuth {:?}",
        .shapes[0], .shapes[1], .shapes[2], .shapes[3]
    )]
    ShapeMismatch { shapes: [Vec<usize>; 4] },

    #[error("latitude {value} at element {index} is outside [-90, 90]")]
    LatitudeOutOfRange { index: usize, value: f64 },

    #[error("element {index} did not converge after {iterations} iterations")]
    ConvergenceFailure { index: usize, iterations: usize },

    #[error("invalid bearing '{0}'")]
    InvalidBearing(String),
}

pub type Result<T, E = GeodesyError> = std::result::Result<T, E>;
