//! Georeferenced scalar rasters
//!
//! A raster is a row-major grid plus a six-parameter affine transform in GDAL
//! order, mapping pixel `(col, row)` to geographic `x = lon, y = lat`.
//! Loaders exist for GeoTIFF and Esri ASCII grids.

pub mod ascii;
pub mod geotiff;

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outcome of a point lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Sample {
    Value(f64),
    /// The coordinate is outside the grid
    OutOfBounds,
    /// The cell holds the no-data sentinel or NaN
    NoData,
}

impl Sample {
    /// The value, or `None` when unavailable
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::OutOfBounds | Self::NoData => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// Anything that can be sampled at a coordinate
pub trait ScalarField {
    fn sample_at(&self, point: Coordinates) -> Sample;
}

/// Affine pixel-to-world transform: `[x0, dx, rx, y0, ry, dy]`
///
/// `x = x0 + col * dx + row * rx`, `y = y0 + col * ry + row * dy`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform(pub [f64; 6]);

impl GeoTransform {
    /// North-up transform from the top-left corner and pixel size
    pub fn north_up(x0: f64, y0: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self([x0, pixel_width, 0.0, y0, 0.0, -pixel_height.abs()])
    }

    fn determinant(&self) -> f64 {
        let [_, dx, rx, _, ry, dy] = self.0;
        dx * dy - rx * ry
    }

    /// World coordinate of a fractional pixel position
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let [x0, dx, rx, y0, ry, dy] = self.0;
        (x0 + col * dx + row * rx, y0 + col * ry + row * dy)
    }

    /// Fractional `(row, col)` of a world coordinate
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        let [x0, dx, rx, y0, ry, dy] = self.0;
        let det = self.determinant();
        let (u, v) = (x - x0, y - y0);
        let col = (dy * u - rx * v) / det;
        let row = (dx * v - ry * u) / det;
        (row, col)
    }
}

/// A single-band scalar grid
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<f64>,
    transform: GeoTransform,
    nodata: Option<f64>,
}

impl Raster {
    /// Create a raster, checking the data size and that the transform is invertible
    pub fn new(
        width: usize,
        height: usize,
        data: Vec<f64>,
        transform: GeoTransform,
        nodata: Option<f64>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Raster("Raster has no cells".to_string()));
        }
        if data.len() != width * height {
            return Err(Error::Raster(format!(
                "Raster data has {} cells, expected {}x{}",
                data.len(),
                width,
                height
            )));
        }
        let det = transform.determinant();
        if !det.is_finite() || det == 0.0 {
            return Err(Error::Raster("Raster transform is not invertible".to_string()));
        }
        Ok(Self {
            width,
            height,
            data,
            transform,
            nodata,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    fn is_nodata(&self, v: f64) -> bool {
        v.is_nan() || self.nodata == Some(v)
    }

    /// Value of the cell containing `point`
    pub fn sample(&self, point: Coordinates) -> Sample {
        let (row, col) = self.transform.invert(point.lon, point.lat);
        let (row, col) = (row.floor(), col.floor());
        if !(row >= 0.0 && col >= 0.0 && row < self.height as f64 && col < self.width as f64) {
            return Sample::OutOfBounds;
        }
        let v = self.data[row as usize * self.width + col as usize];
        if self.is_nodata(v) {
            Sample::NoData
        } else {
            Sample::Value(v)
        }
    }

    /// Minimum and maximum over all valid cells, or `None` if there are none
    pub fn valid_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !self.is_nodata(*v))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl ScalarField for Raster {
    fn sample_at(&self, point: Coordinates) -> Sample {
        self.sample(point)
    }
}

/// Load a raster, choosing the format by file extension
///
/// `.asc` is read as an Esri ASCII grid, everything else as GeoTIFF.
pub fn load_raster(path: &Path) -> Result<Raster> {
    let is_ascii = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("asc"));

    if is_ascii {
        ascii::load(path)
    } else {
        geotiff::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// 4x3 grid over lon -9..-7, lat 42..43.5 with 0.5 degree cells
    fn sample_raster() -> Raster {
        let data = vec![
            1.0, 2.0, 3.0, 4.0, //
            5.0, -9999.0, 7.0, 8.0, //
            9.0, 10.0, f64::NAN, 12.0,
        ];
        Raster::new(4, 3, data, GeoTransform::north_up(-9.0, 43.5, 0.5, 0.5), Some(-9999.0))
            .unwrap()
    }

    #[test]
    fn test_sample_values() {
        let raster = sample_raster();
        assert_eq!(raster.sample(Coordinates::new(43.4, -8.9)), Sample::Value(1.0));
        assert_eq!(raster.sample(Coordinates::new(42.1, -7.1)), Sample::Value(12.0));
        assert_eq!(raster.sample(Coordinates::new(42.9, -7.6)), Sample::Value(7.0));
    }

    #[test]
    fn test_sample_unavailable() {
        let raster = sample_raster();
        assert_eq!(raster.sample(Coordinates::new(42.9, -8.4)), Sample::NoData);
        assert_eq!(raster.sample(Coordinates::new(42.2, -7.9)), Sample::NoData);
        assert_eq!(raster.sample(Coordinates::new(44.0, -8.0)), Sample::OutOfBounds);
        assert_eq!(raster.sample(Coordinates::new(42.5, -6.9)), Sample::OutOfBounds);
        assert_eq!(raster.sample(Coordinates::new(41.99, -8.0)), Sample::OutOfBounds);
        assert!(raster.sample(Coordinates::new(42.9, -8.4)).value().is_none());
    }

    #[test]
    fn test_top_left_corner_is_inside() {
        let raster = sample_raster();
        assert_eq!(raster.sample(Coordinates::new(43.5, -9.0)), Sample::Value(1.0));
    }

    #[test]
    fn test_valid_range_skips_nodata() {
        assert_eq!(sample_raster().valid_range(), Some((1.0, 12.0)));

        let empty = Raster::new(1, 1, vec![f64::NAN], GeoTransform::north_up(0.0, 1.0, 1.0, 1.0), None)
            .unwrap();
        assert_eq!(empty.valid_range(), None);
    }

    #[test]
    fn test_transform_round_trip_with_rotation() {
        let t = GeoTransform([10.0, 0.5, 0.1, 50.0, 0.05, -0.5]);
        let (x, y) = t.apply(3.25, 7.5);
        let (row, col) = t.invert(x, y);
        assert_abs_diff_eq!(row, 7.5, epsilon = 1e-9);
        assert_abs_diff_eq!(col, 3.25, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let t = GeoTransform::north_up(0.0, 1.0, 1.0, 1.0);
        assert!(Raster::new(2, 2, vec![1.0; 3], t, None).is_err());
        assert!(Raster::new(0, 2, Vec::new(), t, None).is_err());
        assert!(Raster::new(1, 1, vec![1.0], GeoTransform([0.0; 6]), None).is_err());
    }
}
