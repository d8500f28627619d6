//! Start-location and leg files for traverses.
//!
//! A start file holds a single line, `<lat> <lon> <name>`. A leg file holds
//! one leg per line, either as a quadrant bearing
//!
//! ```text
//! S 78 03 13 E 1.71 Corner 18
//! ```
//!
//! or as a decimal azimuth
//!
//! ```text
//! 101.9464 1.71 Corner 18
//! ```
//!
//! with the distance in kilometers. Blank lines and lines starting with `#`
//! are skipped. Names may contain spaces.

use crate::{
    bearing::Bearing,
    point::{GeodeticPoint, PolarOffset},
};
use anyhow::{bail, Context};
use itertools::Itertools;
use std::{
    fs::{self, File},
    io::{BufRead, BufReader},
    path::Path,
};
use tracing::trace;

#[derive(Clone, Debug, PartialEq)]
pub struct NamedPoint {
    pub point: GeodeticPoint,
    pub name: String,
}

impl NamedPoint {
    pub fn new(point: GeodeticPoint, name: String) -> Self {
        Self { point, name }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NamedLeg {
    pub offset: PolarOffset,
    pub name: String,
}

/// Splits `data` on ASCII whitespace into at most `times` parts. The last
/// part is the untouched remainder of the line.
pub fn split_whitespace_n(data: &str, times: usize) -> SplitWhitespaceN<'_> {
    SplitWhitespaceN::new(data, times)
}

pub struct SplitWhitespaceN<'a> {
    remaining: &'a str,
    times: usize,
}

impl<'a> SplitWhitespaceN<'a> {
    fn new(data: &'a str, times: usize) -> SplitWhitespaceN<'a> {
        Self {
            remaining: data.trim_start_matches(|c: char| c.is_ascii_whitespace()),
            times,
        }
    }
}

impl<'a> Iterator for SplitWhitespaceN<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.times == 0 || self.remaining.is_empty() {
            return None;
        }
        self.times -= 1;
        if self.times == 0 {
            return Some(self.remaining);
        }
        let end = self
            .remaining
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(self.remaining.len());
        let (next, rest) = self.remaining.split_at(end);
        self.remaining = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        Some(next)
    }
}

pub fn read_start(path: &Path) -> anyhow::Result<NamedPoint> {
    let start = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let start = parse_start(start.trim())
        .with_context(|| format!("invalid start location in '{}'", path.display()))?;
    trace!(
        "starting point named {} at ({}, {})",
        start.name,
        start.point.lat,
        start.point.lon
    );
    Ok(start)
}

pub fn parse_start(line: &str) -> anyhow::Result<NamedPoint> {
    let Some((lat, lon, name)) = split_whitespace_n(line, 3).collect_tuple() else {
        bail!("expected '<lat> <lon> <name>', got '{line}'");
    };
    let lat = lat
        .parse::<f64>()
        .with_context(|| format!("invalid latitude '{lat}'"))?;
    let lon = lon
        .parse::<f64>()
        .with_context(|| format!("invalid longitude '{lon}'"))?;
    Ok(NamedPoint::new(GeodeticPoint::new(lat, lon), name.to_string()))
}

pub fn read_legs(path: &Path) -> anyhow::Result<Vec<NamedLeg>> {
    let file =
        File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
    let reader = BufReader::new(file);

    let mut legs = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read '{}'", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let leg = parse_leg(line)
            .with_context(|| format!("{}:{}: invalid leg", path.display(), idx + 1))?;
        trace!(
            "az = {}°, dist = {} km, name = {}",
            leg.offset.azimuth_deg,
            leg.offset.distance_km,
            leg.name
        );
        legs.push(leg);
    }

    Ok(legs)
}

pub fn parse_leg(line: &str) -> anyhow::Result<NamedLeg> {
    let quadrant = matches!(split_whitespace_n(line, 2).next(), Some("N" | "S"));
    let (azimuth_deg, dist, name) = if quadrant {
        let Some((face, deg, min, sec, turn, dist, name)) =
            split_whitespace_n(line, 7).collect_tuple()
        else {
            bail!("expected '<N|S> <deg> <min> <sec> <E|W> <dist_km> <name>', got '{line}'");
        };
        let bearing: Bearing = [face, deg, min, sec, turn].join(" ").parse()?;
        trace!("{bearing}");
        (bearing.azimuth_deg(), dist, name)
    } else {
        let Some((az, dist, name)) = split_whitespace_n(line, 3).collect_tuple() else {
            bail!("expected '<azimuth> <dist_km> <name>', got '{line}'");
        };
        let az = az
            .parse::<f64>()
            .with_context(|| format!("invalid azimuth '{az}'"))?;
        (az, dist, name)
    };
    let distance_km = dist
        .parse::<f64>()
        .with_context(|| format!("invalid distance '{dist}'"))?;

    Ok(NamedLeg {
        offset: PolarOffset::new(distance_km, azimuth_deg),
        name: name.to_string(),
    })
}
