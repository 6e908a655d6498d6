//! Earth-fixed and geodetic coordinates, WGS84 ellipsoid.
use log::error;

use crate::{
    constants::{
        EARTH_ECCENTRICITY_SQUARED_WGS84 as E2, EARTH_SEMI_MAJOR_AXIS_WGS84_KM as A_KM,
        EARTH_SEMI_MINOR_AXIS_WGS84_KM as B_KM, LATITUDE_TOLERANCE_RAD, MAX_LATITUDE_ITERATIONS,
    },
    prelude::{Error, Vector3},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Horizontal distance below which a point is considered to sit on the polar axis (km).
const POLAR_AXIS_THRESHOLD_KM: f64 = 1.0E-9;

/// Prime vertical radius of curvature (km) at given geodetic latitude.
fn prime_vertical_radius_km(lat_rad: f64) -> f64 {
    A_KM / (1.0 - E2 * lat_rad.sin().powi(2)).sqrt()
}

/// Position in the Earth-Centered Earth-Fixed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EarthFixedPosition {
    /// ECEF coordinates in kilometers
    pub ecef_km: Vector3<f64>,
}

impl EarthFixedPosition {
    /// Builds new [EarthFixedPosition] from ECEF coordinates in kilometers.
    pub fn from_km(x_km: f64, y_km: f64, z_km: f64) -> Self {
        Self {
            ecef_km: Vector3::new(x_km, y_km, z_km),
        }
    }

    /// Builds new [EarthFixedPosition] from ECEF coordinates in meters.
    /// Meters are only accepted at this boundary, everything else runs in kilometers.
    pub fn from_m(x_m: f64, y_m: f64, z_m: f64) -> Self {
        Self::from_km(x_m / 1.0E3, y_m / 1.0E3, z_m / 1.0E3)
    }

    /// Distance to other [EarthFixedPosition] in kilometers.
    pub fn distance_km(&self, rhs: &Self) -> f64 {
        (self.ecef_km - rhs.ecef_km).norm()
    }

    /// Solves the [GeodeticPosition] of this point.
    ///
    /// Latitude results from a fixed point iteration seeded by
    /// the spherical approximation, stopping when two iterates differ by less
    /// than [LATITUDE_TOLERANCE_RAD]. Exceeding [MAX_LATITUDE_ITERATIONS]
    /// is reported as [Error::ConvergenceFailure].
    pub fn to_geodetic(&self) -> Result<GeodeticPosition, Error> {
        let (x, y, z) = (self.ecef_km[0], self.ecef_km[1], self.ecef_km[2]);

        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(Error::InvalidCoordinates);
        }

        let lon = y.atan2(x);
        let p = (x.powi(2) + y.powi(2)).sqrt();

        if p < POLAR_AXIS_THRESHOLD_KM {
            // on the polar axis: longitude is arbitrary
            let lat = if z >= 0.0 { 90.0 } else { -90.0 };
            return Ok(GeodeticPosition {
                latitude_deg: lat,
                longitude_deg: lon.to_degrees(),
                height_km: z.abs() - B_KM,
            });
        }

        let mut lat = z.atan2(p * (1.0 - E2));
        let mut converged = false;

        for _ in 0..MAX_LATITUDE_ITERATIONS {
            let n = prime_vertical_radius_km(lat);
            let next = (z + E2 * n * lat.sin()).atan2(p);
            let delta = (next - lat).abs();
            lat = next;
            if delta < LATITUDE_TOLERANCE_RAD {
                converged = true;
                break;
            }
        }

        if !converged {
            error!(
                "geodetic latitude did not converge for ecef={:?} (km)",
                (x, y, z)
            );
            return Err(Error::ConvergenceFailure {
                iterations: MAX_LATITUDE_ITERATIONS,
            });
        }

        let height_km = p / lat.cos() - prime_vertical_radius_km(lat);

        Ok(GeodeticPosition {
            latitude_deg: lat.to_degrees(),
            longitude_deg: lon.to_degrees(),
            height_km,
        })
    }
}

/// Geodetic coordinates on the WGS84 ellipsoid
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticPosition {
    /// Latitude in decimal degrees
    pub latitude_deg: f64,
    /// Longitude in decimal degrees
    pub longitude_deg: f64,
    /// Height above the ellipsoid in kilometers
    pub height_km: f64,
}

impl GeodeticPosition {
    /// Builds new [GeodeticPosition] from
    /// - latitude (ddeg)
    /// - longitude (ddeg)
    /// - height above ellipsoid (km)
    pub fn new(latitude_deg: f64, longitude_deg: f64, height_km: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            height_km,
        }
    }

    /// Closed form conversion to [EarthFixedPosition].
    pub fn to_earth_fixed(&self) -> EarthFixedPosition {
        let (lat, lon) = (
            self.latitude_deg.to_radians(),
            self.longitude_deg.to_radians(),
        );

        let n = prime_vertical_radius_km(lat);

        EarthFixedPosition::from_km(
            (n + self.height_km) * lat.cos() * lon.cos(),
            (n + self.height_km) * lat.cos() * lon.sin(),
            (n * (1.0 - E2) + self.height_km) * lat.sin(),
        )
    }
}
