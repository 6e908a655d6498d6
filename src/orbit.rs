use crate::{frame::InertialState, prelude::Epoch};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of the orbit propagation of one satellite, at one [Epoch].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Propagation {
    /// Propagator resolved this [InertialState]
    State(InertialState),
    /// Propagator could not produce a state at this [Epoch]
    /// (decayed orbit, diverging elements..). The reason is kept for reporting.
    Failure(String),
}

/// [PropagatedSatellite] is one satellite, as handed over by the
/// orbit propagator, for one evaluation [Epoch].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PropagatedSatellite {
    /// Catalog or PRN identifier, unique within one evaluation
    pub id: String,
    /// [Propagation] outcome
    pub propagation: Propagation,
}

impl PropagatedSatellite {
    /// Builds new [PropagatedSatellite] from inertial position (km).
    pub fn from_position_km(id: &str, x_km: f64, y_km: f64, z_km: f64) -> Self {
        Self {
            id: id.to_string(),
            propagation: Propagation::State(InertialState::from_position_km(x_km, y_km, z_km)),
        }
    }

    /// Builds new [PropagatedSatellite] from an [InertialState].
    pub fn from_state(id: &str, state: InertialState) -> Self {
        Self {
            id: id.to_string(),
            propagation: Propagation::State(state),
        }
    }

    /// Builds new [PropagatedSatellite] that failed to propagate.
    pub fn failure(id: &str, reason: &str) -> Self {
        Self {
            id: id.to_string(),
            propagation: Propagation::Failure(reason.to_string()),
        }
    }
}

/// Any orbit propagator (for example an SGP4 engine fed with two-line elements)
/// should implement the [OrbitSource] trait to feed the availability prediction.
pub trait OrbitSource {
    /// Provide the [Propagation] of satellite `id` at requested [Epoch].
    ///
    /// The state must be expressed in an Earth-Centered Inertial frame,
    /// in kilometers (and km/s). The [Epoch] is always expressed in UTC.
    fn state_at(&self, epoch: Epoch, id: &str) -> Propagation;
}
