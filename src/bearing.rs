//! Surveyor's quadrant bearings, e.g. `S 78 03 13 E`.

use crate::{
    error::{GeodesyError, Result},
    point::wrap_360,
};
use itertools::Itertools;
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceDir {
    N,
    S,
}

impl FromStr for FaceDir {
    type Err = GeodesyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "N" => Ok(FaceDir::N),
            "S" => Ok(FaceDir::S),
            _ => Err(GeodesyError::InvalidBearing(format!(
                "invalid face direction '{s}'"
            ))),
        }
    }
}

impl fmt::Display for FaceDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir_str = match self {
            FaceDir::N => "N",
            FaceDir::S => "S",
        };
        f.write_str(dir_str)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDir {
    E,
    W,
}

impl FromStr for TurnDir {
    type Err = GeodesyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "E" => Ok(TurnDir::E),
            "W" => Ok(TurnDir::W),
            _ => Err(GeodesyError::InvalidBearing(format!(
                "invalid turn direction '{s}'"
            ))),
        }
    }
}

impl fmt::Display for TurnDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir_str = match self {
            TurnDir::E => "E",
            TurnDir::W => "W",
        };
        f.write_str(dir_str)
    }
}

/// An angle of up to 90° measured from north or south toward east or west.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bearing {
    pub face: FaceDir,
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub turn: TurnDir,
}

impl Bearing {
    /// The angle off the north/south line in decimal degrees.
    pub fn angle_deg(&self) -> f64 {
        self.degrees + self.minutes / 60.0 + self.seconds / 3600.0
    }

    /// Azimuth clockwise from north in `[0, 360)`.
    pub fn azimuth_deg(&self) -> f64 {
        let angle = self.angle_deg();
        let az = match (self.face, self.turn) {
            (FaceDir::N, TurnDir::E) => angle,
            (FaceDir::N, TurnDir::W) => -angle,
            (FaceDir::S, TurnDir::E) => 180.0 - angle,
            (FaceDir::S, TurnDir::W) => 180.0 + angle,
        };
        wrap_360(az)
    }
}

impl FromStr for Bearing {
    type Err = GeodesyError;

    /// Parses `<N|S> <deg> <min> <sec> <E|W>`.
    fn from_str(s: &str) -> Result<Self> {
        let Some((face, deg, min, sec, turn)) = s.split_whitespace().collect_tuple() else {
            return Err(GeodesyError::InvalidBearing(format!(
                "expected '<N|S> <deg> <min> <sec> <E|W>', got '{s}'"
            )));
        };
        let bearing = Bearing {
            face: face.parse()?,
            degrees: parse_component(deg, "degrees")?,
            minutes: parse_component(min, "minutes")?,
            seconds: parse_component(sec, "seconds")?,
            turn: turn.parse()?,
        };
        if bearing.minutes >= 60.0 || bearing.seconds >= 60.0 || bearing.angle_deg() > 90.0 {
            return Err(GeodesyError::InvalidBearing(format!(
                "'{s}' is not a quadrant bearing"
            )));
        }
        Ok(bearing)
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}° {}′ {}″ {}",
            self.face, self.degrees, self.minutes, self.seconds, self.turn
        )
    }
}

fn parse_component(s: &str, what: &str) -> Result<f64> {
    match s.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(GeodesyError::InvalidBearing(format!("invalid {what} '{s}'"))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quadrants() {
        let az = |s: &str| s.parse::<Bearing>().unwrap().azimuth_deg();
        assert_relative_eq!(az("N 30 00 00 E"), 30.0);
        assert_relative_eq!(az("N 30 00 00 W"), 330.0);
        assert_relative_eq!(az("S 30 00 00 E"), 150.0);
        assert_relative_eq!(az("S 30 00 00 W"), 210.0);
        assert_eq!(az("N 0 0 0 W"), 0.0);
    }

    #[test]
    fn minutes_and_seconds() {
        let bearing: Bearing = "S 78 03 13 E".parse().unwrap();
        assert_eq!(bearing.face, FaceDir::S);
        assert_eq!(bearing.turn, TurnDir::E);
        assert_relative_eq!(bearing.angle_deg(), 78.053_611_111_111_11, epsilon = 1e-12);
        assert_relative_eq!(bearing.azimuth_deg(), 101.946_388_888_888_89, epsilon = 1e-12);
    }

    #[test]
    fn rejects_malformed() {
        for s in [
            "",
            "N 30 00 00",
            "E 30 00 00 N",
            "N thirty 00 00 E",
            "N 30 75 00 E",
            "N 91 00 00 E",
            "N -5 00 00 E",
            "N 30 00 00 E extra",
        ] {
            assert!(
                matches!(s.parse::<Bearing>(), Err(GeodesyError::InvalidBearing(_))),
                "{s}"
            );
        }
    }
}
