use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::NOMINAL_GPS_ORBIT_ALTITUDE_KM;

/// Configuration Error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown fault depth \"{0}\"")]
    UnknownFaultDepth(String),
    #[error("unknown geometry source \"{0}\"")]
    UnknownGeometrySource(String),
}

/// Deepest fault hypothesis to evaluate
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FaultDepth {
    /// One faulty satellite at most: Fault Detection only
    #[cfg_attr(feature = "serde", serde(alias = "single", alias = "fd"))]
    Single,
    /// Up to two faulty satellites: Fault Detection and Exclusion
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "dual", alias = "fde"))]
    Dual,
}

impl std::str::FromStr for FaultDepth {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "single" | "fd" => Ok(Self::Single),
            "2" | "dual" | "fde" => Ok(Self::Dual),
            _ => Err(Error::UnknownFaultDepth(s.to_string())),
        }
    }
}

impl std::fmt::Display for FaultDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "FD"),
            Self::Dual => write!(f, "FDE"),
        }
    }
}

/// Where the line of sight geometry comes from
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GeometrySource {
    /// Use the true Earth-fixed satellite positions
    #[default]
    EarthFixed,
    /// Re-derive positions from horizon angles only, back-projecting
    /// every satellite onto a nominal orbit altitude (km)
    NominalRange { orbit_altitude_km: f64 },
}

impl GeometrySource {
    /// [GeometrySource::NominalRange] at the nominal GPS altitude
    pub fn nominal_gps() -> Self {
        Self::NominalRange {
            orbit_altitude_km: NOMINAL_GPS_ORBIT_ALTITUDE_KM,
        }
    }
}

impl std::str::FromStr for GeometrySource {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ecef" | "earth-fixed" => Ok(Self::EarthFixed),
            "nominal" | "nominal-range" | "azel" => Ok(Self::nominal_gps()),
            _ => Err(Error::UnknownGeometrySource(s.to_string())),
        }
    }
}

fn default_elevation_mask() -> f64 {
    10.0
}

fn default_dop_threshold() -> f64 {
    6.0
}

fn default_max_subsets() -> Option<usize> {
    None
}

/// Availability prediction [Config]uration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Minimal elevation (ddeg) for a satellite to be considered in view.
    /// Satellites must lie strictly above it.
    #[cfg_attr(feature = "serde", serde(default = "default_elevation_mask"))]
    pub elevation_mask_deg: f64,

    /// DOP threshold: a geometry is usable when its DOP is strictly below it
    #[cfg_attr(feature = "serde", serde(default = "default_dop_threshold"))]
    pub dop_threshold: f64,

    /// [FaultDepth]
    #[cfg_attr(feature = "serde", serde(default))]
    pub fault_depth: FaultDepth,

    /// [GeometrySource]
    #[cfg_attr(feature = "serde", serde(default))]
    pub geometry_source: GeometrySource,

    /// Maximal number of fault hypothesis subsets to evaluate, per evaluation.
    /// A stage that would exceed it is reported as truncated (not available).
    #[cfg_attr(feature = "serde", serde(default = "default_max_subsets"))]
    pub max_subsets: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            elevation_mask_deg: default_elevation_mask(),
            dop_threshold: default_dop_threshold(),
            fault_depth: FaultDepth::default(),
            geometry_source: GeometrySource::default(),
            max_subsets: default_max_subsets(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with updated elevation mask (ddeg)
    pub fn with_elevation_mask_deg(&self, mask_deg: f64) -> Self {
        let mut s = self.clone();
        s.elevation_mask_deg = mask_deg;
        s
    }

    /// Copies and returns [Config] with updated DOP threshold
    pub fn with_dop_threshold(&self, threshold: f64) -> Self {
        let mut s = self.clone();
        s.dop_threshold = threshold;
        s
    }

    /// Copies and returns [Config] with updated [FaultDepth]
    pub fn with_fault_depth(&self, depth: FaultDepth) -> Self {
        let mut s = self.clone();
        s.fault_depth = depth;
        s
    }

    /// Copies and returns [Config] with updated [GeometrySource]
    pub fn with_geometry_source(&self, source: GeometrySource) -> Self {
        let mut s = self.clone();
        s.geometry_source = source;
        s
    }

    /// Copies and returns [Config] with a cap on subset enumeration
    pub fn with_max_subsets(&self, max: usize) -> Self {
        let mut s = self.clone();
        s.max_subsets = Some(max);
        s
    }
}
