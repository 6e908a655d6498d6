//! Availability along a route of waypoints
use log::info;

use crate::{
    observer::Observer,
    orbit::PropagatedSatellite,
    prelude::{Epoch, Error},
    raim::{Raim, Verdict},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One [Waypoint] of a route
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    /// Readable name, like an ICAO fix
    pub name: String,
    /// Geodetic latitude (ddeg)
    pub latitude_deg: f64,
    /// Longitude (ddeg)
    pub longitude_deg: f64,
    /// Height above the ellipsoid (km)
    #[cfg_attr(feature = "serde", serde(default))]
    pub height_km: f64,
}

impl Waypoint {
    /// Builds new [Waypoint] on the ellipsoid
    pub fn new(name: &str, latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude_deg,
            longitude_deg,
            height_km: 0.0,
        }
    }

    /// Copies and returns [Waypoint] with updated height (km)
    pub fn with_height_km(&self, height_km: f64) -> Self {
        let mut s = self.clone();
        s.height_km = height_km;
        s
    }

    /// [Observer] standing at this [Waypoint]
    pub fn observer(&self) -> Result<Observer, Error> {
        Observer::new(self.latitude_deg, self.longitude_deg, self.height_km)
    }
}

/// [Verdict] at one [Waypoint]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct WaypointVerdict {
    /// [Waypoint]
    pub waypoint: Waypoint,
    /// [Verdict]
    pub verdict: Verdict,
}

/// [RouteReport] gathers the [Verdict]s of every [Waypoint], in route order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RouteReport {
    pub waypoints: Vec<WaypointVerdict>,
}

impl RouteReport {
    /// True when position is available at every [Waypoint]
    pub fn position_available(&self) -> bool {
        self.waypoints.iter().all(|wp| wp.verdict.position_available)
    }

    /// True when FD is available at every [Waypoint]
    pub fn fd_available(&self) -> bool {
        self.waypoints.iter().all(|wp| wp.verdict.fd_available)
    }

    /// True when FDE is available at every [Waypoint]
    pub fn fde_available(&self) -> bool {
        self.waypoints.iter().all(|wp| wp.verdict.fde_available)
    }

    /// Waypoints where FD is not available
    pub fn fd_outages(&self) -> impl Iterator<Item = &Waypoint> + '_ {
        self.waypoints
            .iter()
            .filter(|wp| !wp.verdict.fd_available)
            .map(|wp| &wp.waypoint)
    }
}

/// Evaluates every [Waypoint] of a route at the same [Epoch] and against
/// the same propagated satellites. The evaluation stops on the first global
/// input error (invalid waypoint coordinates, duplicate satellites).
pub fn evaluate_route(
    raim: &Raim,
    epoch: Epoch,
    route: &[Waypoint],
    satellites: &[PropagatedSatellite],
) -> Result<RouteReport, Error> {
    let mut report = RouteReport::default();

    for waypoint in route.iter() {
        let observer = waypoint.observer()?;
        let verdict = raim.evaluate(epoch, &observer, satellites)?;

        info!(
            "{} - {}: position={} fd={} fde={}",
            epoch,
            waypoint.name,
            verdict.position_available,
            verdict.fd_available,
            verdict.fde_available
        );

        report.waypoints.push(WaypointVerdict {
            waypoint: waypoint.clone(),
            verdict,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod test {
    use super::{RouteReport, Waypoint};

    #[test]
    fn waypoint_observer() {
        let wp = Waypoint::new("VTBS", 13.69, 100.75).with_height_km(0.005);
        let observer = wp.observer().unwrap();
        let geo = observer.geodetic();
        assert_eq!(geo.latitude_deg, 13.69);
        assert_eq!(geo.longitude_deg, 100.75);
        assert_eq!(geo.height_km, 0.005);

        assert!(Waypoint::new("bad", 91.0, 0.0).observer().is_err());
    }

    #[test]
    fn empty_route() {
        let report = RouteReport::default();
        assert!(report.position_available());
        assert!(report.fd_available());
        assert!(report.fde_available());
        assert_eq!(report.fd_outages().count(), 0);
    }
}
