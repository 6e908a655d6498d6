//! Epoch normalization and sidereal time
use crate::{
    constants::{DAYS_PER_JULIAN_CENTURY, J2000_JD},
    prelude::{Duration, Epoch, Error, TimeScale},
};

/// Normalizes any [Epoch] to [TimeScale::UTC]. Every frame
/// transformation runs on UTC epochs only.
pub fn to_utc(epoch: Epoch) -> Epoch {
    if epoch.time_scale == TimeScale::UTC {
        epoch
    } else {
        epoch.to_time_scale(TimeScale::UTC)
    }
}

/// Builds an UTC [Epoch] from a civil local date and time,
/// observed in a time zone offset by `utc_offset_hours` from UTC
/// (for example +7.0 in Bangkok). Day, month and year roll-backs are handled.
/// Dates that do not exist (like February 30th) are [Error::InvalidEpoch].
pub fn from_local_civil(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    utc_offset_hours: f64,
) -> Result<Epoch, Error> {
    if !utc_offset_hours.is_finite() {
        return Err(Error::InvalidEpoch);
    }

    let local = Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, 0)
        .map_err(|_| Error::InvalidEpoch)?;

    Ok(local - Duration::from_seconds(utc_offset_hours * 3600.0))
}

/// Returns the Julian Day at 0h UTC of this [Epoch] (always ending in .5)
/// and the fraction of day elapsed since then.
pub fn julian_day(epoch: Epoch) -> (f64, f64) {
    let (year, month, day, hour, minute, second, nanos) = to_utc(epoch).to_gregorian_utc();

    let (year, month) = (year as f64, month as f64);

    let jd = 367.0 * year - ((7.0 * (year + ((month + 9.0) / 12.0).floor())) * 0.25).floor()
        + (275.0 * month / 9.0).floor()
        + day as f64
        + 1721013.5;

    let seconds =
        hour as f64 * 3600.0 + minute as f64 * 60.0 + second as f64 + nanos as f64 * 1.0E-9;

    (jd, seconds / 86400.0)
}

/// Greenwich Mean Sidereal Time (degrees, within [0, 360)) at this [Epoch].
/// Polar motion, precession and nutation are not modeled.
pub fn gmst_deg(epoch: Epoch) -> f64 {
    let (jd, fraction) = julian_day(epoch);
    let days = jd + fraction - J2000_JD;
    let t = days / DAYS_PER_JULIAN_CENTURY;

    let gmst = 280.46061837 + 360.98564736629 * days + 0.000387933 * t.powi(2)
        - t.powi(3) / 38710000.0;

    gmst.rem_euclid(360.0)
}

#[cfg(test)]
mod test {
    use super::{from_local_civil, gmst_deg, julian_day, to_utc};
    use crate::prelude::{Duration, Epoch, Error, TimeScale};
    use std::str::FromStr;

    #[test]
    fn j2000_julian_day() {
        let t = Epoch::from_gregorian_utc(2000, 1, 1, 12, 0, 0, 0);
        let (jd, fr) = julian_day(t);
        assert_eq!(jd, 2451544.5);
        assert_eq!(fr, 0.5);
    }

    #[test]
    fn j2000_gmst() {
        let t = Epoch::from_gregorian_utc(2000, 1, 1, 12, 0, 0, 0);
        let gmst = gmst_deg(t);
        assert!((gmst - 280.46061837).abs() < 1.0E-9, "gmst={}", gmst);
    }

    #[test]
    fn gmst_range() {
        let mut t = Epoch::from_gregorian_utc(2024, 12, 22, 0, 0, 0, 0);
        for _ in 0..96 {
            let gmst = gmst_deg(t);
            assert!((0.0..360.0).contains(&gmst), "gmst={}", gmst);
            t = t + Duration::from_seconds(900.0);
        }
    }

    #[test]
    fn local_civil_day_rollback() {
        // 2024-12-01 05:00 in UTC+7 is 2024-11-30 22:00 UTC
        let t = from_local_civil(2024, 12, 1, 5, 0, 0, 7.0).unwrap();
        assert_eq!(t, Epoch::from_gregorian_utc(2024, 11, 30, 22, 0, 0, 0));

        let t = from_local_civil(2025, 1, 1, 3, 30, 0, 7.0).unwrap();
        assert_eq!(t, Epoch::from_gregorian_utc(2024, 12, 31, 20, 30, 0, 0));
    }

    #[test]
    fn local_civil_invalid_dates() {
        assert_eq!(
            from_local_civil(2024, 2, 30, 5, 0, 0, 7.0),
            Err(Error::InvalidEpoch)
        );
        assert_eq!(
            from_local_civil(2023, 13, 1, 0, 0, 0, 7.0),
            Err(Error::InvalidEpoch)
        );
        assert_eq!(
            from_local_civil(2024, 3, 1, 25, 0, 0, 7.0),
            Err(Error::InvalidEpoch)
        );
        assert_eq!(
            from_local_civil(2024, 3, 1, 5, 0, 0, f64::NAN),
            Err(Error::InvalidEpoch)
        );

        // leap year
        assert!(from_local_civil(2024, 2, 29, 5, 0, 0, 7.0).is_ok());
    }

    #[test]
    fn normalization() {
        let t = Epoch::from_str("2024-12-22T12:25:00 GPST").unwrap();
        let utc = to_utc(t);
        assert_eq!(utc.time_scale, TimeScale::UTC);
        assert_eq!(to_utc(utc).time_scale, TimeScale::UTC);
    }
}
