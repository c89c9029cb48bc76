//! Geocentric position of the Sun.
//!
//! Low-precision theory of Meeus, *Astronomical Algorithms* (2nd ed.), chapter 25:
//! a Keplerian orbit with secular terms and the equation of the centre. Good to about
//! 0.01° in longitude for several centuries around J2000.

use crate::constants::{ArcSec, AU, ABERRATION_ARCSEC, DAYS_PER_CENTURY, MJD, RADEG, RADSEC, T2000};
use crate::earth_orientation::nutn80;
use crate::ref_system::EclipticPosition;

/// Solar elements at a given instant, all angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarElements {
    /// Geometric mean longitude L0
    pub mean_longitude: f64,
    /// Mean anomaly M
    pub mean_anomaly: f64,
    /// Eccentricity of the Earth's orbit
    pub eccentricity: f64,
    /// Equation of the centre C
    pub equation_of_centre: f64,
    /// Radius vector R in AU
    pub radius: f64,
}

impl SolarElements {
    /// True geometric longitude ☉ = L0 + C, in degrees within [0, 360).
    pub fn true_longitude(&self) -> f64 {
        (self.mean_longitude + self.equation_of_centre).rem_euclid(360.0)
    }
}

/// Compute the solar elements at `tjm` (MJD, TT).
pub fn solar_elements(tjm: MJD) -> SolarElements {
    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    let mean_longitude = (280.46646 + t * (36000.76983 + t * 0.0003032)).rem_euclid(360.0);
    let mean_anomaly = (357.52911 + t * (35999.05029 - t * 0.0001537)).rem_euclid(360.0);
    let eccentricity = 0.016708634 - t * (0.000042037 + t * 0.0000001267);

    let m = mean_anomaly * RADEG;
    let equation_of_centre = (1.914602 - t * (0.004817 + t * 0.000014)) * m.sin()
        + (0.019993 - t * 0.000101) * (2. * m).sin()
        + 0.000289 * (3. * m).sin();

    let true_anomaly = (mean_anomaly + equation_of_centre) * RADEG;
    let radius = 1.000001018 * (1. - eccentricity * eccentricity)
        / (1. + eccentricity * true_anomaly.cos());

    SolarElements {
        mean_longitude,
        mean_anomaly,
        eccentricity,
        equation_of_centre,
        radius,
    }
}

/// Geometric ecliptic position of the Sun, mean equinox of date.
pub fn geometric_position(tjm: MJD) -> EclipticPosition {
    let elements = solar_elements(tjm);
    EclipticPosition {
        longitude: elements.true_longitude() * RADEG,
        latitude: 0.0,
        distance: elements.radius * AU,
    }
}

/// Apparent ecliptic position of the Sun, true equinox of date.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT).
/// * `dpsi`: nutation in longitude at `tjm` \[arcsec\].
///
/// Returns
/// --------
/// * The geometric position corrected for nutation and annual aberration.
pub fn apparent_position_with_nutation(tjm: MJD, dpsi: ArcSec) -> EclipticPosition {
    let geometric = geometric_position(tjm);
    let aberration = -ABERRATION_ARCSEC / (geometric.distance / AU);
    geometric.shifted((dpsi + aberration) * RADSEC)
}

/// Apparent ecliptic position of the Sun at `tjm` (MJD, TT).
pub fn apparent_position(tjm: MJD) -> EclipticPosition {
    let (dpsi, _) = nutn80(tjm);
    apparent_position_with_nutation(tjm, dpsi)
}
