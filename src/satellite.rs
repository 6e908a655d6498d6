use log::debug;

use crate::{
    frame::{inertial_to_earth_fixed, EarthFixedState, InertialState},
    observer::Observer,
    prelude::{Constellation, Epoch, SV},
    topocentric::{HorizonAngles, TopocentricPosition},
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// [SatelliteRecord] gathers every representation of one satellite
/// resolved for one (epoch, observer) evaluation. It is only valid within that evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SatelliteRecord {
    /// Catalog or PRN identifier
    pub id: String,
    /// [EarthFixedState]
    pub earth_fixed: EarthFixedState,
    /// [TopocentricPosition] relative to the [Observer]
    pub topocentric: TopocentricPosition,
    /// [HorizonAngles] as seen from the [Observer]
    pub horizon: HorizonAngles,
}

impl SatelliteRecord {
    /// Runs the frame pipeline (inertial, Earth-fixed, topocentric, horizon)
    /// for this satellite.
    pub fn resolve(id: &str, state: &InertialState, epoch: Epoch, observer: &Observer) -> Self {
        let earth_fixed = inertial_to_earth_fixed(state, epoch);
        let topocentric = TopocentricPosition::from_earth_fixed(&earth_fixed.position, observer);
        let horizon = topocentric.to_horizon();

        debug!(
            "{}({}) - azimuth={:.3}° elevation={:.3}°",
            epoch, id, horizon.azimuth_deg, horizon.elevation_deg
        );

        Self {
            id: id.to_string(),
            earth_fixed,
            topocentric,
            horizon,
        }
    }

    /// Observer to satellite slant range (km)
    pub fn range_km(&self) -> f64 {
        self.topocentric.range_km()
    }

    /// Elevation angle (ddeg)
    pub fn elevation_deg(&self) -> f64 {
        self.horizon.elevation_deg
    }

    /// Azimuth angle (ddeg)
    pub fn azimuth_deg(&self) -> f64 {
        self.horizon.azimuth_deg
    }
}

/// Extracts the GPS [SV] from a catalog name that carries
/// a "PRN nn" tag, like "GPS BIIR-11 (PRN 19)".
pub fn prn_from_catalog_name(name: &str) -> Option<SV> {
    let offset = name.find("PRN")?;
    let tail = name[offset + 3..].trim_start();

    let digits = tail
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>();

    let prn = digits.parse::<u8>().ok()?;
    if prn == 0 {
        return None;
    }

    Some(SV::new(Constellation::GPS, prn))
}

/// Returns the PRN identifier ("G19") of a catalog name, or the trimmed
/// catalog name itself when it carries no PRN tag.
pub fn identifier_from_catalog_name(name: &str) -> String {
    match prn_from_catalog_name(name) {
        Some(sv) => sv.to_string(),
        None => name.trim().to_string(),
    }
}
