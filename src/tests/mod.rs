
use log::LevelFilter;
use std::sync::Once;

use crate::{
    constants::NOMINAL_GPS_ORBIT_ALTITUDE_KM,
    prelude::{
        gmst_deg, inertial_to_earth_fixed_rotation, Epoch, HorizonAngles, InertialState,
        Observer, PropagatedSatellite,
    },
};

use rstest::*;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Bangkok, on the ellipsoid
#[fixture]
pub fn observer() -> Observer {
    Observer::new(13.683529, 100.619786, 0.0).unwrap()
}

#[fixture]
pub fn epoch() -> Epoch {
    Epoch::from_gregorian_utc(2024, 12, 22, 12, 25, 0, 0)
}

/// Builds the [InertialState] of a satellite seen at (azimuth, elevation)
/// from the observer, at given altitude. The Earth-fixed position is
/// rotated back to the inertial frame at this epoch.
pub fn inertial_state(
    observer: &Observer,
    epoch: Epoch,
    azimuth_deg: f64,
    elevation_deg: f64,
    altitude_km: f64,
) -> InertialState {
    let angles = HorizonAngles {
        azimuth_deg,
        elevation_deg,
    };

    let ecef = angles.back_project(observer, altitude_km).unwrap();
    let rot = inertial_to_earth_fixed_rotation(gmst_deg(epoch));
    let eci = rot.transpose() * ecef.ecef_km;

    InertialState::from_position_km(eci[0], eci[1], eci[2])
}

/// Builds one satellite ("G01", "G02"..) per (azimuth, elevation) pair,
/// on the nominal GPS orbit.
pub fn constellation(
    observer: &Observer,
    epoch: Epoch,
    horizon: &[(f64, f64)],
) -> Vec<PropagatedSatellite> {
    horizon
        .iter()
        .enumerate()
        .map(|(i, (az, el))| {
            PropagatedSatellite::from_state(
                &format!("G{:02}", i + 1),
                inertial_state(observer, epoch, *az, *el, NOMINAL_GPS_ORBIT_ALTITUDE_KM),
            )
        })
        .collect()
}

/// Five satellites: one near zenith and four evenly spread at 40°
pub const SPREAD_5: [(f64, f64); 5] = [
    (0.0, 70.0),
    (72.0, 40.0),
    (144.0, 40.0),
    (216.0, 40.0),
    (288.0, 40.0),
];

/// Five satellites clustered in the eastern sky.
/// Excluding G03 leaves a poor geometry (DOP ≈ 6.79).
pub const CLUSTERED_5: [(f64, f64); 5] = [
    (90.0, 48.0),
    (213.0, 38.0),
    (131.0, 38.0),
    (133.0, 58.0),
    (108.0, 43.0),
];

/// [CLUSTERED_5] completed by one western satellite
pub const CLUSTERED_6: [(f64, f64); 6] = [
    (90.0, 48.0),
    (213.0, 38.0),
    (131.0, 38.0),
    (133.0, 58.0),
    (108.0, 43.0),
    (300.0, 30.0),
];
