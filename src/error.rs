use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The geometry matrix is rank deficient: fewer than 3 independent
    /// line of sight directions were proposed (less than 3 satellites,
    /// or all of them colinear as seen from the observer).
    #[error("degenerate geometry: (GᵀG) is not invertible")]
    DegenerateGeometry,

    /// A satellite sits at the observer location, its line of sight is undefined.
    #[error("degenerate geometry: zero range to {0}")]
    ZeroRange(String),

    /// The geodetic latitude fixed point did not converge.
    /// This never happens for physical Earth-fixed coordinates and
    /// is a defect whenever it does.
    #[error("geodetic latitude did not converge after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },

    /// Coordinates are not finite, or latitude lies outside [-90°, 90°].
    #[error("invalid coordinates")]
    InvalidCoordinates,

    /// Back-projection from horizon angles requires the nominal orbit
    /// to sit above the observer.
    #[error("nominal orbit lies below observer: negative slant range")]
    NegativeSlantRange,

    /// Satellite is not part of the satellites in view.
    #[error("unknown satellite {0}")]
    UnknownSatellite(String),

    /// Calendar date or time does not exist.
    #[error("invalid epoch")]
    InvalidEpoch,

    /// Two satellites of the same evaluation share the same identifier.
    #[error("duplicate satellite identifier {0}")]
    DuplicateSatellite(String),
}
