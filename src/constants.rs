/// WGS84 Earth Frame Ellipsoid semi-major axis (kilometers)
pub const EARTH_SEMI_MAJOR_AXIS_WGS84_KM: f64 = 6378.137;

/// WGS84 Earth Frame Ellipsoid flattening
pub const EARTH_FLATTENING_WGS84: f64 = 1.0 / 298.257223563;

/// WGS84 first eccentricity, squared
pub const EARTH_ECCENTRICITY_SQUARED_WGS84: f64 =
    EARTH_FLATTENING_WGS84 * (2.0 - EARTH_FLATTENING_WGS84);

/// WGS84 Earth Frame Ellipsoid semi-minor axis (kilometers)
pub const EARTH_SEMI_MINOR_AXIS_WGS84_KM: f64 =
    EARTH_SEMI_MAJOR_AXIS_WGS84_KM * (1.0 - EARTH_FLATTENING_WGS84);

/// Earth angular velocity, in WGS84 frame rad/s
pub const EARTH_ANGULAR_VEL_RAD: f64 = 7.2921151467E-5;

/// J2000 reference epoch, as a Julian Date
pub const J2000_JD: f64 = 2451545.0;

/// Days per Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;

/// Convergence criterion of the geodetic latitude fixed point (radians)
pub const LATITUDE_TOLERANCE_RAD: f64 = 1.0E-10;

/// Maximal number of iterations of the geodetic latitude fixed point.
/// Reaching it is a defect, never a normal outcome.
pub const MAX_LATITUDE_ITERATIONS: usize = 50;

/// Nominal GPS orbit altitude above the ellipsoid (kilometers),
/// used when back-projecting horizon angles.
pub const NOMINAL_GPS_ORBIT_ALTITUDE_KM: f64 = 20_200.0;

/// Minimal number of satellites in view to predict a position.
pub const MIN_SV_POSITION: usize = 4;

/// Minimal number of satellites in view for Fault Detection.
pub const MIN_SV_FD: usize = 5;

/// Minimal number of satellites in view for Fault Detection and Exclusion.
pub const MIN_SV_FDE: usize = 6;

/// Number of best and worst fault geometries reported.
pub const RANKED_SUBSETS: usize = 3;
