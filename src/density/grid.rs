//! Grid-form risk surface
//!
//! Strikes are binned into a `bins × bins` histogram over the region, blurred
//! with a separable Gaussian and min-max normalized, so 0 means no observed
//! strikes and 1 the densest cell.

use crate::coord::{linspace, Coordinates, RegionBounds};
use crate::error::{Error, Result};
use crate::raster::{Sample, ScalarField};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gaussian kernel half-width in standard deviations
const TRUNCATE: f64 = 4.0;

/// How samples outside the region are answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Outside the region is `OutOfBounds`, same as the raster path
    #[default]
    Unavailable,
    /// Snap to the nearest boundary cell
    Clamp,
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::Clamp => write!(f, "clamp"),
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unavailable" => Ok(Self::Unavailable),
            "clamp" => Ok(Self::Clamp),
            other => Err(format!(
                "Unknown boundary mode '{}' (expected unavailable or clamp)",
                other
            )),
        }
    }
}

/// Normalized strike density over the region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityGrid {
    bounds: RegionBounds,
    bins: usize,
    /// `bins + 1` ascending latitude edges
    lat_edges: Vec<f64>,
    /// `bins + 1` ascending longitude edges
    lon_edges: Vec<f64>,
    /// Row-major, rows are latitude bins
    values: Vec<f64>,
}

impl DensityGrid {
    /// Build a risk surface from strike positions
    ///
    /// # Arguments
    /// * `points` - Strike positions; those outside `bounds` are ignored
    /// * `bounds` - Region the grid spans
    /// * `bins` - Cells per axis
    /// * `sigma` - Gaussian standard deviation in cells (`<= 0` disables smoothing)
    pub fn build(
        points: &[Coordinates],
        bounds: &RegionBounds,
        bins: usize,
        sigma: f64,
    ) -> Result<Self> {
        if bins == 0 {
            return Err(Error::Config("Density grid needs at least one bin".to_string()));
        }
        bounds.validate()?;

        let lat_edges = linspace(bounds.lat_min, bounds.lat_max, bins + 1);
        let lon_edges = linspace(bounds.lon_min, bounds.lon_max, bins + 1);

        let counts = histogram(points, &lat_edges, &lon_edges);
        let smoothed = if sigma.is_finite() && sigma > 0.0 {
            gaussian_filter(&counts, bins, bins, sigma)
        } else {
            counts
        };

        Ok(Self {
            bounds: *bounds,
            bins,
            lat_edges,
            lon_edges,
            values: normalize(smoothed),
        })
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn bounds(&self) -> &RegionBounds {
        &self.bounds
    }

    pub fn lat_edges(&self) -> &[f64] {
        &self.lat_edges
    }

    pub fn lon_edges(&self) -> &[f64] {
        &self.lon_edges
    }

    /// Cell value by (latitude row, longitude column)
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.bins + col]
    }

    /// All values, row-major
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Risk at a coordinate
    pub fn sample(&self, point: Coordinates, mode: BoundaryMode) -> Sample {
        if !point.lat.is_finite() || !point.lon.is_finite() {
            return Sample::OutOfBounds;
        }
        if mode == BoundaryMode::Unavailable && !self.bounds.contains(point) {
            return Sample::OutOfBounds;
        }
        let row = edge_index(&self.lat_edges, point.lat, self.bins);
        let col = edge_index(&self.lon_edges, point.lon, self.bins);
        Sample::Value(self.value(row, col))
    }
}

/// A risk grid paired with its boundary policy
#[derive(Debug, Clone, Copy)]
pub struct RiskField<'a> {
    pub grid: &'a DensityGrid,
    pub mode: BoundaryMode,
}

impl ScalarField for RiskField<'_> {
    fn sample_at(&self, point: Coordinates) -> Sample {
        self.grid.sample(point, self.mode)
    }
}

/// Number of edges strictly below `v`, minus one, clamped to a cell index
fn edge_index(edges: &[f64], v: f64, bins: usize) -> usize {
    edges
        .partition_point(|e| *e < v)
        .saturating_sub(1)
        .min(bins - 1)
}

/// 2D histogram with half-open cells, the last one closed on both axes
pub fn histogram(points: &[Coordinates], lat_edges: &[f64], lon_edges: &[f64]) -> Vec<f64> {
    let rows = lat_edges.len() - 1;
    let cols = lon_edges.len() - 1;
    let mut counts = vec![0.0; rows * cols];
    for p in points {
        if let (Some(r), Some(c)) = (bin_of(lat_edges, p.lat), bin_of(lon_edges, p.lon)) {
            counts[r * cols + c] += 1.0;
        }
    }
    counts
}

fn bin_of(edges: &[f64], v: f64) -> Option<usize> {
    let first = *edges.first()?;
    let last = *edges.last()?;
    if !(v >= first && v <= last) {
        return None;
    }
    let bins = edges.len() - 1;
    if v == last {
        return Some(bins - 1);
    }
    Some(edges.partition_point(|e| *e <= v).saturating_sub(1).min(bins - 1))
}

/// Separable Gaussian blur with reflected borders
pub fn gaussian_filter(values: &[f64], rows: usize, cols: usize, sigma: f64) -> Vec<f64> {
    let kernel = gaussian_kernel(sigma);
    let along_rows = convolve_axis(values, rows, cols, &kernel, Axis::Row);
    convolve_axis(&along_rows, rows, cols, &kernel, Axis::Col)
}

/// Normalized weights for offsets `-r..=r`, `r = round(4σ)`
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

#[derive(Clone, Copy)]
enum Axis {
    Row,
    Col,
}

fn convolve_axis(values: &[f64], rows: usize, cols: usize, kernel: &[f64], axis: Axis) -> Vec<f64> {
    let radius = (kernel.len() / 2) as isize;
    let mut out = vec![0.0; values.len()];
    for r in 0..rows {
        for c in 0..cols {
            let mut acc = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let offset = k as isize - radius;
                let (rr, cc) = match axis {
                    Axis::Row => (reflect(r as isize + offset, rows), c),
                    Axis::Col => (r, reflect(c as isize + offset, cols)),
                };
                acc += w * values[rr * cols + cc];
            }
            out[r * cols + c] = acc;
        }
    }
    out
}

/// Mirror an index into `0..n`, repeating the edge sample (`d c b a | a b c d`)
fn reflect(mut i: isize, n: usize) -> usize {
    let n = n as isize;
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - i - 1;
        } else {
            return i as usize;
        }
    }
}

/// Min-max scale into [0, 1]; a flat input becomes all zeros
pub fn normalize(values: Vec<f64>) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max > min) {
        return vec![0.0; values.len()];
    }
    let range = max - min;
    values.into_iter().map(|v| (v - min) / range).collect()
}
