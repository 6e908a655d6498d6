//! Inertial to Earth-fixed frame rotation
use log::debug;
use nalgebra::Matrix3;

use crate::{
    constants::EARTH_ANGULAR_VEL_RAD,
    position::EarthFixedPosition,
    prelude::{Epoch, Vector3},
    time::{gmst_deg, to_utc},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Satellite state in an Earth-Centered Inertial frame, valid
/// only at the [Epoch] it was propagated for.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InertialState {
    /// Position in kilometers
    pub position_km: Vector3<f64>,
    /// Velocity in km/s, if provided by the propagator
    pub velocity_km_s: Option<Vector3<f64>>,
}

impl InertialState {
    /// Builds new [InertialState] from position only (km).
    pub fn from_position_km(x_km: f64, y_km: f64, z_km: f64) -> Self {
        Self {
            position_km: Vector3::new(x_km, y_km, z_km),
            velocity_km_s: None,
        }
    }

    /// True when position, and velocity if any, are finite.
    pub fn is_finite(&self) -> bool {
        self.position_km.iter().all(|v| v.is_finite())
            && self
                .velocity_km_s
                .map_or(true, |vel| vel.iter().all(|v| v.is_finite()))
    }

    /// Copies and returns [InertialState] with velocity (km/s).
    pub fn with_velocity_km_s(&self, vx: f64, vy: f64, vz: f64) -> Self {
        let mut s = *self;
        s.velocity_km_s = Some(Vector3::new(vx, vy, vz));
        s
    }
}

/// Satellite state in the Earth-Centered Earth-Fixed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EarthFixedState {
    /// [EarthFixedPosition]
    pub position: EarthFixedPosition,
    /// Velocity relative to the rotating Earth, in km/s
    pub velocity_km_s: Option<Vector3<f64>>,
}

/// Single axis rotation (about the polar axis) from the inertial
/// frame to the Earth-fixed frame, at Greenwich Mean Sidereal Time.
pub fn inertial_to_earth_fixed_rotation(gmst_deg: f64) -> Matrix3<f64> {
    let (sin_theta, cos_theta) = gmst_deg.to_radians().sin_cos();
    Matrix3::new(
        cos_theta, sin_theta, 0.0, -sin_theta, cos_theta, 0.0, 0.0, 0.0, 1.0,
    )
}

/// Converts an [InertialState] to [EarthFixedState] at [Epoch].
/// The epoch is normalized to UTC first. Only the GMST rotation is applied:
/// polar motion, precession and nutation are ignored.
pub fn inertial_to_earth_fixed(state: &InertialState, epoch: Epoch) -> EarthFixedState {
    let t = to_utc(epoch);
    let gmst = gmst_deg(t);
    let rot = inertial_to_earth_fixed_rotation(gmst);

    debug!("{} - gmst={:.9}°", t, gmst);

    let position_km = rot * state.position_km;

    let velocity_km_s = state.velocity_km_s.map(|vel_km_s| {
        let omega = Vector3::new(0.0, 0.0, EARTH_ANGULAR_VEL_RAD);
        rot * vel_km_s - omega.cross(&position_km)
    });

    EarthFixedState {
        position: EarthFixedPosition { ecef_km: position_km },
        velocity_km_s,
    }
}

#[cfg(test)]
mod test {
    use super::{inertial_to_earth_fixed, inertial_to_earth_fixed_rotation, InertialState};
    use crate::prelude::Epoch;
    use nalgebra::Matrix3;

    #[test]
    fn finite_states() {
        let state = InertialState::from_position_km(15600.0, 7540.0, 20140.0);
        assert!(state.is_finite());
        assert!(state.with_velocity_km_s(-2.5, 0.5, 2.7).is_finite());
        assert!(!state.with_velocity_km_s(f64::NAN, 0.5, 2.7).is_finite());
        assert!(!InertialState::from_position_km(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!InertialState::from_position_km(0.0, f64::INFINITY, 0.0).is_finite());
    }

    #[test]
    fn rotation_is_orthonormal() {
        for gmst in [0.0, 45.0, 123.456, 280.46061837, 359.999] {
            let rot = inertial_to_earth_fixed_rotation(gmst);
            assert!((rot * rot.transpose() - Matrix3::identity()).norm() < 1.0E-14);
        }
    }

    #[test]
    fn polar_axis_is_invariant() {
        let t = Epoch::from_gregorian_utc(2024, 12, 22, 12, 25, 0, 0);
        let state = InertialState::from_position_km(0.0, 0.0, 26560.0);
        let ecef = inertial_to_earth_fixed(&state, t);
        assert!(ecef.position.ecef_km[0].abs() < 1.0E-9);
        assert!(ecef.position.ecef_km[1].abs() < 1.0E-9);
        assert_eq!(ecef.position.ecef_km[2], 26560.0);
        assert!(ecef.velocity_km_s.is_none());
    }

    #[test]
    fn j2000_rotation_angle() {
        // at J2000 noon GMST is 280.46061837°: the inertial x axis
        // projects onto (cos θ, -sin θ) in the Earth-fixed frame
        let t = Epoch::from_gregorian_utc(2000, 1, 1, 12, 0, 0, 0);
        let state = InertialState::from_position_km(1.0, 0.0, 0.0);
        let ecef = inertial_to_earth_fixed(&state, t);
        let theta = 280.46061837_f64.to_radians();
        assert!((ecef.position.ecef_km[0] - theta.cos()).abs() < 1.0E-12);
        assert!((ecef.position.ecef_km[1] + theta.sin()).abs() < 1.0E-12);
    }

    #[test]
    fn geostationary_velocity_vanishes() {
        // an inertial circular equatorial orbit rotating with the Earth
        // is at rest in the Earth-fixed frame
        let t = Epoch::from_gregorian_utc(2024, 12, 22, 12, 25, 0, 0);
        let r_km = 42164.0;
        let v_km_s = r_km * crate::constants::EARTH_ANGULAR_VEL_RAD;
        let state =
            InertialState::from_position_km(r_km, 0.0, 0.0).with_velocity_km_s(0.0, v_km_s, 0.0);
        let ecef = inertial_to_earth_fixed(&state, t);
        let vel = ecef.velocity_km_s.unwrap();
        assert!(vel.norm() < 1.0E-12, "residual velocity {}", vel);
    }
}
