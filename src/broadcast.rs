//! Scalar expansion of the four input components (start latitude, start
//! longitude, distance, azimuth) into one common shape.
//!
//! The replication order is fixed:
//!
//! 1. A single start point is replicated to the shape of the offsets.
//! 2. Otherwise a single offset is replicated to the shape of the starts.
//! 3. If shapes still differ, every one-element component is replicated to
//!    the shape of the first component that has more than one element.
//! 4. Anything still differing is a [`GeodesyError::ShapeMismatch`].

use crate::error::{GeodesyError, Result};
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use tracing::trace;

/// Four equal-length component sequences in logical (row-major) order,
/// plus the shape they came from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Resolved {
    pub shape: Vec<usize>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub distance_km: Vec<f64>,
    pub azimuth_deg: Vec<f64>,
}

impl Resolved {
    pub fn len(&self) -> usize {
        self.lat.len()
    }
}

pub(crate) fn resolve(
    lat: ArrayViewD<'_, f64>,
    lon: ArrayViewD<'_, f64>,
    distance_km: ArrayViewD<'_, f64>,
    azimuth_deg: ArrayViewD<'_, f64>,
) -> Result<Resolved> {
    if lat.is_empty() || lon.is_empty() {
        return Err(GeodesyError::EmptyInput("starts"));
    }
    if distance_km.is_empty() || azimuth_deg.is_empty() {
        return Err(GeodesyError::EmptyInput("offsets"));
    }

    let mut parts = [
        lat.to_owned(),
        lon.to_owned(),
        distance_km.to_owned(),
        azimuth_deg.to_owned(),
    ];
    let (starts, offsets) = parts.split_at_mut(2);

    if is_single(starts) {
        let target = leading_shape(offsets);
        trace!("replicating single start point to shape {:?}", target);
        replicate(starts, &target);
    } else if is_single(offsets) {
        let target = leading_shape(starts);
        trace!("replicating single offset to shape {:?}", target);
        replicate(offsets, &target);
    }

    if !same_shape(&parts) {
        let target = leading_shape(&parts);
        trace!("expanding scalar components to shape {:?}", target);
        replicate(&mut parts, &target);
    }

    if !same_shape(&parts) {
        return Err(GeodesyError::ShapeMismatch {
            shapes: parts.clone().map(|p| p.shape().to_vec()),
        });
    }

    let shape = parts[0].shape().to_vec();
    let [lat, lon, distance_km, azimuth_deg] =
        parts.map(|p| p.iter().copied().collect::<Vec<_>>());
    Ok(Resolved {
        shape,
        lat,
        lon,
        distance_km,
        azimuth_deg,
    })
}

fn is_single(parts: &[ArrayD<f64>]) -> bool {
    parts.iter().all(|p| p.len() == 1)
}

/// Shape of the first part with more than one element, or of the first
/// part when all of them are single-valued.
fn leading_shape(parts: &[ArrayD<f64>]) -> Vec<usize> {
    parts
        .iter()
        .find(|p| p.len() != 1)
        .or(parts.first())
        .map(|p| p.shape().to_vec())
        .unwrap_or_default()
}

/// Replaces every single-element part with a copy of its value in `shape`.
fn replicate(parts: &mut [ArrayD<f64>], shape: &[usize]) {
    for part in parts.iter_mut().filter(|p| p.len() == 1) {
        if let Some(&value) = part.iter().next() {
            *part = ArrayD::from_elem(IxDyn(shape), value);
        }
    }
}

fn same_shape(parts: &[ArrayD<f64>]) -> bool {
    parts.windows(2).all(|w| w[0].shape() == w[1].shape())
}
