use std::cmp::Ordering;

use crate::satellite::SatelliteRecord;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One point of a sky plot
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SkyPlotPoint {
    /// Satellite identifier
    pub id: String,
    /// Azimuth (ddeg)
    pub azimuth_deg: f64,
    /// Elevation (ddeg)
    pub elevation_deg: f64,
}

/// [Visibility] partitions the satellites of one evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Visibility {
    /// Elevation mask (ddeg) that was applied
    pub elevation_mask_deg: f64,
    /// Every satellite that could be resolved, whatever its elevation,
    /// in input order
    pub total: Vec<SatelliteRecord>,
    /// Identifiers of the satellites strictly above the elevation mask,
    /// in input order
    pub in_view: Vec<String>,
    /// Identifiers of the satellites the propagator could not resolve
    pub propagation_failures: Vec<String>,
}

impl Visibility {
    /// Partitions resolved [SatelliteRecord]s with an elevation mask (ddeg).
    /// Satellites that failed to propagate never reach this stage,
    /// they are only reported.
    pub fn new(
        records: Vec<SatelliteRecord>,
        propagation_failures: Vec<String>,
        elevation_mask_deg: f64,
    ) -> Self {
        let in_view = records
            .iter()
            .filter(|rec| rec.elevation_deg() > elevation_mask_deg)
            .map(|rec| rec.id.clone())
            .collect();

        Self {
            elevation_mask_deg,
            total: records,
            in_view,
            propagation_failures,
        }
    }

    /// Number of satellites in view
    pub fn count_in_view(&self) -> usize {
        self.in_view.len()
    }

    /// Number of resolved satellites
    pub fn count_total(&self) -> usize {
        self.total.len()
    }

    /// Returns [SatelliteRecord] by identifier
    pub fn record(&self, id: &str) -> Option<&SatelliteRecord> {
        self.total.iter().find(|rec| rec.id == id)
    }

    /// Iterates over the [SatelliteRecord]s in view, in stable order.
    pub fn in_view_records(&self) -> impl Iterator<Item = &SatelliteRecord> + '_ {
        self.total
            .iter()
            .filter(move |rec| rec.elevation_deg() > self.elevation_mask_deg)
    }

    /// Sky plot of every satellite above the local horizon
    /// (not only above the mask), sorted by azimuth.
    pub fn sky_plot(&self) -> Vec<SkyPlotPoint> {
        let mut points = self
            .total
            .iter()
            .filter(|rec| rec.elevation_deg() > 0.0)
            .map(|rec| SkyPlotPoint {
                id: rec.id.clone(),
                azimuth_deg: rec.azimuth_deg(),
                elevation_deg: rec.elevation_deg(),
            })
            .collect::<Vec<_>>();

        points.sort_by(|a, b| {
            a.azimuth_deg
                .partial_cmp(&b.azimuth_deg)
                .unwrap_or(Ordering::Equal)
        });

        points
    }
}

#[cfg(test)]
mod test {
    use super::Visibility;
    use crate::{
        frame::EarthFixedState, position::EarthFixedPosition, satellite::SatelliteRecord,
        topocentric::HorizonAngles,
    };

    fn record(id: &str, azimuth_deg: f64, elevation_deg: f64) -> SatelliteRecord {
        let horizon = HorizonAngles {
            azimuth_deg,
            elevation_deg,
        };
        SatelliteRecord {
            id: id.to_string(),
            earth_fixed: EarthFixedState {
                position: EarthFixedPosition::default(),
                velocity_km_s: None,
            },
            topocentric: horizon.to_topocentric(20200.0),
            horizon,
        }
    }

    #[test]
    fn mask_is_strict() {
        let records = vec![
            record("G01", 10.0, 45.0),
            record("G02", 350.0, 10.0),
            record("G03", 120.0, 10.000001),
            record("G04", 200.0, -3.0),
        ];

        let visibility = Visibility::new(records, vec!["G05".to_string()], 10.0);
        assert_eq!(visibility.in_view, vec!["G01", "G03"]);
        assert_eq!(visibility.count_in_view(), 2);
        assert_eq!(visibility.count_total(), 4);
        assert_eq!(visibility.propagation_failures, vec!["G05"]);

        let in_view = visibility
            .in_view_records()
            .map(|rec| rec.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(in_view, vec!["G01", "G03"]);

        assert_eq!(visibility.record("G04").map(|rec| rec.elevation_deg()), Some(-3.0));
        assert!(visibility.record("G05").is_none());
    }

    #[test]
    fn sky_plot() {
        let records = vec![
            record("G01", 300.0, 5.0),
            record("G02", 15.0, 80.0),
            record("G03", 120.0, 0.0),
            record("G04", 200.0, -3.0),
            record("G05", 90.0, 30.0),
        ];

        let visibility = Visibility::new(records, Vec::new(), 10.0);
        let plot = visibility.sky_plot();

        // above the horizon, not only above the mask
        let ids = plot.iter().map(|pt| pt.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["G02", "G05", "G01"]);

        for pt in plot.iter() {
            assert!(pt.elevation_deg > 0.0);
        }
    }
}
