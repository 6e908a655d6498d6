//! Receiver Autonomous Integrity Monitoring availability prediction
use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use crate::{
    cfg::{Config, FaultDepth, GeometrySource},
    constants::{MIN_SV_FD, MIN_SV_FDE, MIN_SV_POSITION, RANKED_SUBSETS},
    dop::{DilutionOfPrecision, GeometryMatrix},
    observer::Observer,
    orbit::{OrbitSource, PropagatedSatellite, Propagation},
    position::EarthFixedPosition,
    prelude::{Epoch, Error},
    satellite::SatelliteRecord,
    subset::{enumerate, FaultHypothesis, SatelliteSubset},
    time::to_utc,
    visibility::Visibility,
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Outcome of one stage of the evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum StageStatus {
    /// Every geometry of this stage is below the DOP threshold
    Available,
    /// At least one geometry reached the DOP threshold
    DopTooHigh,
    /// Not enough satellites in view for this stage
    Insufficient { in_view: usize, required: usize },
    /// At least one geometry of this stage is rank deficient
    Degenerate,
    /// Stage not requested by the [FaultDepth]
    NotEvaluated,
    /// Stage skipped: its subsets would exceed the enumeration budget
    Truncated,
}

impl StageStatus {
    /// True when this stage concluded to availability
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::DopTooHigh => write!(f, "not available (DOP too high)"),
            Self::Insufficient { in_view, required } => write!(
                f,
                "not available ({} in view, {} required)",
                in_view, required
            ),
            Self::Degenerate => write!(f, "not available (degenerate geometry)"),
            Self::NotEvaluated => write!(f, "not evaluated"),
            Self::Truncated => write!(f, "not available (enumeration budget exceeded)"),
        }
    }
}

/// One fault geometry and its DOP
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RankedSubset {
    /// Simplified position DOP
    pub dop: f64,
    /// [SatelliteSubset]
    pub subset: SatelliteSubset,
}

/// [Verdict] of one (epoch, observer) evaluation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Verdict {
    /// Evaluation [Epoch], in UTC
    pub epoch: Epoch,
    /// True when a position can be predicted
    pub position_available: bool,
    /// True when Fault Detection is available
    pub fd_available: bool,
    /// True when Fault Detection and Exclusion is available
    pub fde_available: bool,
    /// Position [StageStatus]
    pub position: StageStatus,
    /// Fault Detection [StageStatus]
    pub fd: StageStatus,
    /// Fault Detection and Exclusion [StageStatus]
    pub fde: StageStatus,
    /// DOP of every satellite in view, when defined
    pub baseline_dop: Option<DilutionOfPrecision>,
    /// Number of satellites in view
    pub count_in_view: usize,
    /// Number of satellites resolved, whatever their elevation
    pub count_total: usize,
    /// Satellites the propagator could not resolve
    pub propagation_failures: Vec<String>,
    /// Number of fault hypothesis subsets with undefined DOP
    pub degenerate_subsets: usize,
    /// Three best fault geometries, ascending DOP
    pub lowest_3: Vec<RankedSubset>,
    /// Three worst fault geometries, ascending DOP
    pub highest_3: Vec<RankedSubset>,
    /// [Visibility] this verdict was built on
    pub visibility: Visibility,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - in view={}/{} position: {} fd: {} fde: {}",
            self.epoch, self.count_in_view, self.count_total, self.position, self.fd, self.fde,
        )?;
        if let Some(dop) = self.baseline_dop {
            write!(f, " dop={:.3}", dop.position)?;
        }
        Ok(())
    }
}

/// Geometry (line of sight) of every satellite in view
struct InViewGeometry {
    observer: EarthFixedPosition,
    positions: HashMap<String, EarthFixedPosition>,
}

impl InViewGeometry {
    fn new(
        visibility: &Visibility,
        observer: &Observer,
        source: GeometrySource,
    ) -> Result<Self, Error> {
        let mut positions = HashMap::with_capacity(visibility.count_in_view());

        for rec in visibility.in_view_records() {
            let position = match source {
                GeometrySource::EarthFixed => rec.earth_fixed.position,
                GeometrySource::NominalRange { orbit_altitude_km } => {
                    rec.horizon.back_project(observer, orbit_altitude_km)?
                },
            };
            positions.insert(rec.id.clone(), position);
        }

        Ok(Self {
            observer: observer.earth_fixed(),
            positions,
        })
    }

    fn matrix(&self, satellites: &[String]) -> Result<GeometryMatrix, Error> {
        let pairs = satellites
            .iter()
            .map(|id| match self.positions.get(id) {
                Some(pos) => Ok((id.as_str(), pos)),
                None => Err(Error::UnknownSatellite(id.clone())),
            })
            .collect::<Result<Vec<_>, Error>>()?;

        GeometryMatrix::new(pairs, &self.observer)
    }

    fn dop(&self, subset: &SatelliteSubset) -> Result<f64, Error> {
        self.matrix(&subset.satellites)?.simplified_dop()
    }
}

/// Outcome of one fault detection stage
struct StageOutcome {
    status: StageStatus,
    ranked: Vec<RankedSubset>,
    degenerate: usize,
    evaluated: usize,
}

impl StageOutcome {
    fn skipped(status: StageStatus) -> Self {
        Self {
            status,
            ranked: Vec::new(),
            degenerate: 0,
            evaluated: 0,
        }
    }
}

/// Number of subsets formed by excluding k satellites out of n
fn num_subsets(n: usize, k: usize) -> usize {
    match k {
        0 => 1,
        1 => n,
        _ => n * n.saturating_sub(1) / 2,
    }
}

/// [Raim] predicts position, FD and FDE availability.
/// It holds no state other than its [Config]: every evaluation is a pure
/// function of (satellites, epoch, observer).
#[derive(Debug, Clone, Default)]
pub struct Raim {
    /// [Config]
    pub cfg: Config,
}

impl Raim {
    /// Builds new [Raim] engine
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    /// Resolves every [PropagatedSatellite] for this [Observer] and partitions
    /// them with the elevation mask.
    pub fn visibility(
        &self,
        epoch: Epoch,
        observer: &Observer,
        satellites: &[PropagatedSatellite],
    ) -> Result<Visibility, Error> {
        let t = to_utc(epoch);

        let mut identities = HashSet::with_capacity(satellites.len());
        let mut records = Vec::with_capacity(satellites.len());
        let mut failures = Vec::new();

        for sat in satellites.iter() {
            if !identities.insert(sat.id.as_str()) {
                return Err(Error::DuplicateSatellite(sat.id.clone()));
            }

            match &sat.propagation {
                Propagation::State(state) if state.is_finite() => {
                    records.push(SatelliteRecord::resolve(&sat.id, state, t, observer));
                },
                Propagation::State(_) => {
                    warn!("{}({}) - propagation failure: non finite state", t, sat.id);
                    failures.push(sat.id.clone());
                },
                Propagation::Failure(reason) => {
                    warn!("{}({}) - propagation failure: {}", t, sat.id, reason);
                    failures.push(sat.id.clone());
                },
            }
        }

        Ok(Visibility::new(
            records,
            failures,
            self.cfg.elevation_mask_deg,
        ))
    }

    /// Runs one fault detection stage over every subset of given hypothesis.
    fn fault_stage(
        &self,
        t: Epoch,
        in_view: &[String],
        geometry: &InViewGeometry,
        hypothesis: FaultHypothesis,
        budget: Option<usize>,
    ) -> StageOutcome {
        let required = match hypothesis {
            FaultHypothesis::ExcludeTwo => MIN_SV_FDE,
            _ => MIN_SV_FD,
        };

        if in_view.len() < required {
            return StageOutcome::skipped(StageStatus::Insufficient {
                in_view: in_view.len(),
                required,
            });
        }

        let total = num_subsets(in_view.len(), hypothesis.excluded());

        if let Some(budget) = budget {
            if total > budget {
                warn!(
                    "{} - {}: {} subsets exceed remaining budget ({})",
                    t, hypothesis, total, budget
                );
                return StageOutcome::skipped(StageStatus::Truncated);
            }
        }

        let mut ranked = Vec::with_capacity(total);
        let mut degenerate = 0;
        let mut max_dop = 0.0_f64;

        for subset in enumerate(in_view, hypothesis) {
            match geometry.dop(&subset) {
                Ok(dop) => {
                    debug!("{} - {} {:?}: dop={:.3}", t, hypothesis, subset.excluded, dop);
                    max_dop = max_dop.max(dop);
                    ranked.push(RankedSubset { dop, subset });
                },
                Err(e) => {
                    warn!("{} - {} {:?}: {}", t, hypothesis, subset.excluded, e);
                    degenerate += 1;
                },
            }
        }

        let status = if degenerate > 0 {
            StageStatus::Degenerate
        } else if max_dop < self.cfg.dop_threshold {
            StageStatus::Available
        } else {
            StageStatus::DopTooHigh
        };

        StageOutcome {
            status,
            ranked,
            degenerate,
            evaluated: total,
        }
    }

    /// Evaluates position, FD and FDE availability for this [Observer]
    /// at this [Epoch], from the propagated satellites.
    ///
    /// Per satellite (propagation) and per subset (degenerate geometry) failures
    /// are reported in the [Verdict]. Only global input errors (duplicate identifiers,
    /// impossible back-projection) are returned as [Error].
    pub fn evaluate(
        &self,
        epoch: Epoch,
        observer: &Observer,
        satellites: &[PropagatedSatellite],
    ) -> Result<Verdict, Error> {
        let t = to_utc(epoch);
        let visibility = self.visibility(t, observer, satellites)?;
        let in_view = visibility.in_view.clone();
        let count_in_view = in_view.len();

        let fde_skipped = match self.cfg.fault_depth {
            FaultDepth::Single => StageStatus::NotEvaluated,
            FaultDepth::Dual => StageStatus::Insufficient {
                in_view: count_in_view,
                required: MIN_SV_FDE,
            },
        };

        if count_in_view < MIN_SV_POSITION {
            info!(
                "{} - {} satellites in view: position not available",
                t, count_in_view
            );
            return Ok(Self::verdict(
                t,
                StageStatus::Insufficient {
                    in_view: count_in_view,
                    required: MIN_SV_POSITION,
                },
                None,
                StageOutcome::skipped(StageStatus::Insufficient {
                    in_view: count_in_view,
                    required: MIN_SV_FD,
                }),
                StageOutcome::skipped(fde_skipped),
                visibility,
            ));
        }

        let geometry = InViewGeometry::new(&visibility, observer, self.cfg.geometry_source)?;

        let (position, baseline_dop) = match geometry
            .matrix(&in_view)
            .and_then(|g| DilutionOfPrecision::new(&g, observer))
        {
            Ok(dop) => {
                debug!("{} - baseline {:?}", t, dop);
                if dop.position < self.cfg.dop_threshold {
                    (StageStatus::Available, Some(dop))
                } else {
                    (StageStatus::DopTooHigh, Some(dop))
                }
            },
            Err(e) => {
                warn!("{} - baseline geometry: {}", t, e);
                (StageStatus::Degenerate, None)
            },
        };

        let fd = self.fault_stage(
            t,
            &in_view,
            &geometry,
            FaultHypothesis::ExcludeOne,
            self.cfg.max_subsets,
        );

        let fde = match self.cfg.fault_depth {
            FaultDepth::Single => StageOutcome::skipped(StageStatus::NotEvaluated),
            FaultDepth::Dual => {
                let budget = self
                    .cfg
                    .max_subsets
                    .map(|max| max.saturating_sub(fd.evaluated));
                self.fault_stage(t, &in_view, &geometry, FaultHypothesis::ExcludeTwo, budget)
            },
        };

        let verdict = Self::verdict(t, position, baseline_dop, fd, fde, visibility);
        info!("{}", verdict);
        Ok(verdict)
    }

    /// Pulls the state of every identifier from the [OrbitSource]
    /// and runs [Self::evaluate].
    pub fn evaluate_with_source<S: OrbitSource>(
        &self,
        epoch: Epoch,
        observer: &Observer,
        source: &S,
        ids: &[&str],
    ) -> Result<Verdict, Error> {
        let t = to_utc(epoch);

        let satellites = ids
            .iter()
            .map(|id| PropagatedSatellite {
                id: id.to_string(),
                propagation: source.state_at(t, id),
            })
            .collect::<Vec<_>>();

        self.evaluate(t, observer, &satellites)
    }

    fn verdict(
        epoch: Epoch,
        position: StageStatus,
        baseline_dop: Option<DilutionOfPrecision>,
        fd: StageOutcome,
        fde: StageOutcome,
        visibility: Visibility,
    ) -> Verdict {
        let degenerate_subsets = fd.degenerate + fde.degenerate;

        let mut ranked = fd.ranked;
        ranked.extend(fde.ranked);

        // stable: equal DOPs keep their enumeration order
        ranked.sort_by(|a, b| a.dop.total_cmp(&b.dop));

        let lowest_3 = ranked.iter().take(RANKED_SUBSETS).cloned().collect();

        let highest_3 = ranked
            .iter()
            .skip(ranked.len().saturating_sub(RANKED_SUBSETS))
            .cloned()
            .collect();

        Verdict {
            epoch,
            position_available: position.is_available(),
            fd_available: fd.status.is_available(),
            fde_available: fde.status.is_available(),
            position,
            fd: fd.status,
            fde: fde.status,
            baseline_dop,
            count_in_view: visibility.count_in_view(),
            count_total: visibility.count_total(),
            propagation_failures: visibility.propagation_failures.clone(),
            degenerate_subsets,
            lowest_3,
            highest_3,
            visibility,
        }
    }
}
