//! Universal Transverse Mercator projection (WGS84)
//!
//! Distances between strikes, turbines and candidate sites are measured in a
//! locally Euclidean metric grid rather than raw degrees. The default zone 29N
//! covers Galicia (EPSG:32629, interchangeable with ETRS89 EPSG:25829 at this
//! scale).
//!
//! Uses the Krüger series truncated at third order in `n`, which is accurate
//! to well under a millimeter within the zone.

use crate::constants::geo::{
    UTM_FALSE_EASTING, UTM_FALSE_NORTHING_SOUTH, UTM_K0, WGS84_A, WGS84_F,
};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A projected position in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmPoint {
    pub easting: f64,
    pub northing: f64,
}

impl UtmPoint {
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }

    /// Euclidean distance in meters
    pub fn distance(&self, other: &UtmPoint) -> f64 {
        (self.easting - other.easting).hypot(self.northing - other.northing)
    }

    /// `[x, y]` pair for spatial indexing
    pub fn xy(&self) -> [f64; 2] {
        [self.easting, self.northing]
    }
}

/// UTM projection for a single zone
#[derive(Debug, Clone)]
pub struct UtmProjection {
    /// Zone number (1..=60)
    pub zone: u8,
    /// Southern hemisphere (adds the 10,000 km false northing)
    pub south: bool,
    /// Central meridian in radians
    lon0: f64,
    /// Third flattening
    n: f64,
    /// Rectifying radius scaled by k0
    k0_a: f64,
    /// Forward series coefficients
    alpha: [f64; 3],
    /// Inverse series coefficients
    beta: [f64; 3],
    /// Conformal-to-geodetic latitude coefficients
    delta: [f64; 3],
}

impl UtmProjection {
    /// Create a projection for a northern or southern zone
    pub fn new(zone: u8, south: bool) -> Result<Self> {
        if !(1..=60).contains(&zone) {
            return Err(Error::Config(format!(
                "UTM zone {} is out of range [1, 60]",
                zone
            )));
        }

        let n = WGS84_F / (2.0 - WGS84_F);
        let n2 = n * n;
        let n3 = n2 * n;
        let rectifying = WGS84_A / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);

        Ok(Self {
            zone,
            south,
            lon0: (zone as f64 * 6.0 - 183.0).to_radians(),
            n,
            k0_a: UTM_K0 * rectifying,
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
                61.0 * n3 / 240.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
                n2 / 48.0 + n3 / 15.0,
                17.0 * n3 / 480.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
                56.0 * n3 / 15.0,
            ],
        })
    }

    /// Northern-hemisphere zone
    pub fn north(zone: u8) -> Result<Self> {
        Self::new(zone, false)
    }

    /// Central meridian in degrees
    pub fn central_meridian(&self) -> f64 {
        self.lon0.to_degrees()
    }

    /// Project geographic coordinates to easting/northing
    pub fn forward(&self, coords: Coordinates) -> UtmPoint {
        let phi = coords.lat.to_radians();
        let lam = coords.lon.to_radians() - self.lon0;

        let e = 2.0 * self.n.sqrt() / (1.0 + self.n);
        let t = (phi.sin().atanh() - e * (e * phi.sin()).atanh()).sinh();
        let xi_p = t.atan2(lam.cos());
        let eta_p = (lam.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi += a * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += a * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        let false_northing = if self.south {
            UTM_FALSE_NORTHING_SOUTH
        } else {
            0.0
        };
        UtmPoint::new(
            UTM_FALSE_EASTING + self.k0_a * eta,
            false_northing + self.k0_a * xi,
        )
    }

    /// Unproject easting/northing back to geographic coordinates
    pub fn inverse(&self, point: UtmPoint) -> Coordinates {
        let false_northing = if self.south {
            UTM_FALSE_NORTHING_SOUTH
        } else {
            0.0
        };
        let xi = (point.northing - false_northing) / self.k0_a;
        let eta = (point.easting - UTM_FALSE_EASTING) / self.k0_a;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut phi = chi;
        for (j, d) in self.delta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            phi += d * (k * chi).sin();
        }
        let lam = self.lon0 + eta_p.sinh().atan2(xi_p.cos());

        Coordinates::new(phi.to_degrees(), lam.to_degrees())
    }
}
