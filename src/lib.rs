#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod cfg;
mod dop;
mod error;
mod frame;
mod observer;
mod orbit;
mod position;
mod raim;
mod route;
mod satellite;
mod subset;
mod time;
mod topocentric;
mod visibility;

pub mod constants;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, Error as ConfigError, FaultDepth, GeometrySource};
    pub use crate::dop::{simplified_dop, DilutionOfPrecision, GeometryMatrix};
    pub use crate::error::Error;
    pub use crate::frame::{
        inertial_to_earth_fixed, inertial_to_earth_fixed_rotation, EarthFixedState,
        InertialState,
    };
    pub use crate::observer::Observer;
    pub use crate::orbit::{OrbitSource, PropagatedSatellite, Propagation};
    pub use crate::position::{EarthFixedPosition, GeodeticPosition};
    pub use crate::raim::{Raim, RankedSubset, StageStatus, Verdict};
    pub use crate::route::{evaluate_route, RouteReport, Waypoint, WaypointVerdict};
    pub use crate::satellite::{
        identifier_from_catalog_name, prn_from_catalog_name, SatelliteRecord,
    };
    pub use crate::subset::{
        enumerate as enumerate_subsets, exclude_one, exclude_two, FaultHypothesis,
        SatelliteSubset,
    };
    pub use crate::time::{from_local_civil, gmst_deg, julian_day, to_utc};
    pub use crate::topocentric::{HorizonAngles, TopocentricPosition};
    pub use crate::visibility::{SkyPlotPoint, Visibility};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
