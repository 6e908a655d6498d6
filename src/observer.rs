use nalgebra::Matrix3;

use crate::{
    position::{EarthFixedPosition, GeodeticPosition},
    prelude::Error,
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// [Observer] is the receiver location for which availability is predicted.
/// It is immutable once built: its Earth-fixed coordinates and local
/// rotation are derived at construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Observer {
    /// [GeodeticPosition]
    geodetic: GeodeticPosition,

    /// [EarthFixedPosition] derived from geodetic coordinates
    earth_fixed: EarthFixedPosition,

    /// ECEF to NEU rotation matrix
    rotation: Matrix3<f64>,
}

impl Observer {
    /// Builds new [Observer] from
    /// - latitude (ddeg) within [-90, 90]
    /// - longitude (ddeg)
    /// - height above the WGS84 ellipsoid (km)
    pub fn new(latitude_deg: f64, longitude_deg: f64, height_km: f64) -> Result<Self, Error> {
        Self::from_geodetic(GeodeticPosition::new(
            latitude_deg,
            longitude_deg,
            height_km,
        ))
    }

    /// Builds new [Observer] from [GeodeticPosition].
    pub fn from_geodetic(geodetic: GeodeticPosition) -> Result<Self, Error> {
        let finite = geodetic.latitude_deg.is_finite()
            && geodetic.longitude_deg.is_finite()
            && geodetic.height_km.is_finite();

        if !finite || geodetic.latitude_deg.abs() > 90.0 {
            return Err(Error::InvalidCoordinates);
        }

        let (lat, lon) = (
            geodetic.latitude_deg.to_radians(),
            geodetic.longitude_deg.to_radians(),
        );

        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        // rows: local north, east and up axes expressed in ECEF
        let rotation = Matrix3::new(
            -sin_lat * cos_lon,
            -sin_lat * sin_lon,
            cos_lat,
            -sin_lon,
            cos_lon,
            0.0,
            cos_lat * cos_lon,
            cos_lat * sin_lon,
            sin_lat,
        );

        Ok(Self {
            geodetic,
            earth_fixed: geodetic.to_earth_fixed(),
            rotation,
        })
    }

    /// Builds new [Observer] from an [EarthFixedPosition].
    pub fn from_earth_fixed(earth_fixed: &EarthFixedPosition) -> Result<Self, Error> {
        let geodetic = earth_fixed.to_geodetic()?;
        Self::from_geodetic(geodetic)
    }

    /// Returns [GeodeticPosition] of this [Observer].
    pub fn geodetic(&self) -> GeodeticPosition {
        self.geodetic
    }

    /// Returns [EarthFixedPosition] of this [Observer].
    pub fn earth_fixed(&self) -> EarthFixedPosition {
        self.earth_fixed
    }

    /// ECEF to NEU rotation matrix.
    pub fn ecef_to_neu(&self) -> Matrix3<f64> {
        self.rotation
    }

    /// NEU to ECEF rotation matrix. The local rotation being orthonormal,
    /// this is the transpose of [Self::ecef_to_neu].
    pub fn neu_to_ecef(&self) -> Matrix3<f64> {
        self.rotation.transpose()
    }
}
