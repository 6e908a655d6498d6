//! Local tangent plane (NEU) and horizon (azimuth, elevation) coordinates
use crate::{
    observer::Observer,
    position::EarthFixedPosition,
    prelude::{Error, Vector3},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position in the local North East Up frame of one [Observer]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TopocentricPosition {
    /// North component (km)
    pub north_km: f64,
    /// East component (km)
    pub east_km: f64,
    /// Up component (km)
    pub up_km: f64,
}

impl TopocentricPosition {
    /// Projects [EarthFixedPosition] onto the local frame of [Observer].
    pub fn from_earth_fixed(position: &EarthFixedPosition, observer: &Observer) -> Self {
        let delta_km = position.ecef_km - observer.earth_fixed().ecef_km;
        let neu = observer.ecef_to_neu() * delta_km;
        Self {
            north_km: neu[0],
            east_km: neu[1],
            up_km: neu[2],
        }
    }

    /// Converts back to [EarthFixedPosition], exact inverse of [Self::from_earth_fixed].
    pub fn to_earth_fixed(&self, observer: &Observer) -> EarthFixedPosition {
        let neu = Vector3::new(self.north_km, self.east_km, self.up_km);
        EarthFixedPosition {
            ecef_km: observer.earth_fixed().ecef_km + observer.neu_to_ecef() * neu,
        }
    }

    /// Observer to target distance (km)
    pub fn range_km(&self) -> f64 {
        (self.north_km.powi(2) + self.east_km.powi(2) + self.up_km.powi(2)).sqrt()
    }

    /// Converts to [HorizonAngles].
    ///
    /// When the horizontal distance is null (target at local zenith or nadir),
    /// elevation is ±90° and azimuth is arbitrary (reported as 0°).
    pub fn to_horizon(&self) -> HorizonAngles {
        let horizontal_km = self.north_km.hypot(self.east_km);

        let azimuth_deg = if horizontal_km == 0.0 {
            0.0
        } else {
            let az = self.east_km.atan2(self.north_km).to_degrees();
            if az < 0.0 {
                // tiny negative angles round up to 360.0
                (az + 360.0) % 360.0
            } else {
                az
            }
        };

        HorizonAngles {
            azimuth_deg,
            elevation_deg: self.up_km.atan2(horizontal_km).to_degrees(),
        }
    }
}

/// Horizon angles as seen from one [Observer]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HorizonAngles {
    /// Azimuth, clockwise from North, within [0, 360) degrees
    pub azimuth_deg: f64,
    /// Elevation above the local horizon, within [-90, 90] degrees
    pub elevation_deg: f64,
}

impl HorizonAngles {
    /// Builds [TopocentricPosition] at given slant range (km).
    pub fn to_topocentric(&self, range_km: f64) -> TopocentricPosition {
        let (sin_az, cos_az) = self.azimuth_deg.to_radians().sin_cos();
        let (sin_el, cos_el) = self.elevation_deg.to_radians().sin_cos();
        TopocentricPosition {
            north_km: range_km * cos_el * cos_az,
            east_km: range_km * cos_el * sin_az,
            up_km: range_km * sin_el,
        }
    }

    /// Back-projects these [HorizonAngles] to an approximate [EarthFixedPosition],
    /// assuming the satellite sits at `orbit_altitude_km`. The slant range is
    /// the nominal altitude minus the observer height, so this is only good enough
    /// to recover the line of sight: never use it as a satellite position.
    pub fn back_project(
        &self,
        observer: &Observer,
        orbit_altitude_km: f64,
    ) -> Result<EarthFixedPosition, Error> {
        let range_km = orbit_altitude_km - observer.geodetic().height_km;
        if range_km <= 0.0 {
            return Err(Error::NegativeSlantRange);
        }
        Ok(self.to_topocentric(range_km).to_earth_fixed(observer))
    }
}
