use chrono::{DateTime, Utc};
use hifitime::Epoch;

use crate::artemis_errors::ArtemisError;
use crate::constants::{DPI, MJD, SECONDS_PER_DAY, T2000};

/// Fractional Unix seconds of an instant.
pub fn unix_seconds(instant: &DateTime<Utc>) -> f64 {
    instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1e-9
}

/// Whole Unix seconds of an instant, rounded half to even.
///
/// This is the value written on the wire for every event timestamp.
pub fn rounded_unix_seconds(instant: &DateTime<Utc>) -> i64 {
    let secs = instant.timestamp();
    let nanos = instant.timestamp_subsec_nanos();
    match nanos.cmp(&500_000_000) {
        std::cmp::Ordering::Less => secs,
        std::cmp::Ordering::Greater => secs + 1,
        std::cmp::Ordering::Equal => secs + (secs & 1),
    }
}

/// Convert an instant into a hifitime [`Epoch`] on the UTC time scale.
pub fn instant_to_epoch(instant: &DateTime<Utc>) -> Epoch {
    Epoch::from_unix_seconds(unix_seconds(instant))
}

/// Transformation from an instant to a modified julian date (MJD) in the UTC frame
///
/// Argument
/// --------
/// * `instant`: a UTC instant
///
/// Return
/// ------
/// * a float representing the instant in modified julian date (MJD), UTC frame
pub fn instant_to_mjd_utc(instant: &DateTime<Utc>) -> MJD {
    instant_to_epoch(instant).to_mjd_utc_days()
}

/// Transformation from a modified julian date (MJD) in the UTC frame back to an instant
///
/// Argument
/// --------
/// * `mjd`: a modified julian date in the UTC frame
///
/// Return
/// ------
/// * the corresponding instant, truncated to the nanosecond
/// * an error if the date is outside the range an instant can represent
pub fn mjd_utc_to_instant(mjd: MJD) -> Result<DateTime<Utc>, ArtemisError> {
    let secs = Epoch::from_mjd_utc(mjd).to_unix_seconds();
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
        .ok_or_else(|| ArtemisError::InstantOutOfRange(format!("MJD {mjd}")))
}

/// Transformation from a modified julian date (MJD) in the UTC frame to the TT frame
///
/// Argument
/// --------
/// * `mjd_utc`: a modified julian date in the UTC frame
///
/// Return
/// ------
/// * the same date expressed in the TT frame, as used by the analytic solar and lunar theories
pub fn mjd_utc_to_tt(mjd_utc: MJD) -> MJD {
    Epoch::from_mjd_utc(mjd_utc).to_mjd_tt_days()
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982/2000 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # Details
/// The GMST is computed in two steps:
/// 1. Use a cubic polynomial (coefficients C0–C3) to get GMST at 0h UT1
///    in seconds for the given date.
/// 2. Add the contribution of Earth's rotation during the fractional day
///    using the factor `RAP`, which converts solar days to sidereal days.
///
/// The server feeds UTC here: |UT1 − UTC| stays below 0.9 s, far under the
/// whole-second resolution of the replies.
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: f64) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    // Extract the integer MJD (0h UT1) and compute centuries since J2000.0
    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    // GMST at 0h UT1, seconds → radians
    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;

    // Earth rotation during the elapsed fraction of the day
    let h = tjm.fract() * DPI;

    (gmst0 + h * RAP).rem_euclid(DPI)
}
