//! Geocentric position of the Moon.
//!
//! Meeus, *Astronomical Algorithms* (2nd ed.), chapter 47: the main periodic terms of
//! ELP-2000/82 (tables 47.A and 47.B) plus the additive planetary and flattening terms.
//! Accuracy is about 10″ in longitude and 4″ in latitude.

use crate::constants::{ArcSec, DAYS_PER_CENTURY, DPI, MJD, RADEG, RADSEC, T2000};
use crate::earth_orientation::nutn80;
use crate::ref_system::EclipticPosition;

/// Mean equatorial radius used by the lunar theory for the horizontal parallax \[km\].
pub const THEORY_EARTH_RADIUS_KM: f64 = 6378.14;

/// Multipliers of (D, M, M', F), then the sine coefficient of Σl (1e-6 degree) and the
/// cosine coefficient of Σr (1e-3 km).
#[rustfmt::skip]
const LONGITUDE_DISTANCE_TERMS: [([i8; 4], i32, i32); 60] = [
    ([0, 0, 1, 0], 6288774, -20905355),
    ([2, 0, -1, 0], 1274027, -3699111),
    ([2, 0, 0, 0], 658314, -2955968),
    ([0, 0, 2, 0], 213618, -569925),
    ([0, 1, 0, 0], -185116, 48888),
    ([0, 0, 0, 2], -114332, -3149),
    ([2, 0, -2, 0], 58793, 246158),
    ([2, -1, -1, 0], 57066, -152138),
    ([2, 0, 1, 0], 53322, -170733),
    ([2, -1, 0, 0], 45758, -204586),
    ([0, 1, -1, 0], -40923, -129620),
    ([1, 0, 0, 0], -34720, 108743),
    ([0, 1, 1, 0], -30383, 104755),
    ([2, 0, 0, -2], 15327, 10321),
    ([0, 0, 1, 2], -12528, 0),
    ([0, 0, 1, -2], 10980, 79661),
    ([4, 0, -1, 0], 10675, -34782),
    ([0, 0, 3, 0], 10034, -23210),
    ([4, 0, -2, 0], 8548, -21636),
    ([2, 1, -1, 0], -7888, 24208),
    ([2, 1, 0, 0], -6766, 30824),
    ([1, 0, -1, 0], -5163, -8379),
    ([1, 1, 0, 0], 4987, -16675),
    ([2, -1, 1, 0], 4036, -12831),
    ([2, 0, 2, 0], 3994, -10445),
    ([4, 0, 0, 0], 3861, -11650),
    ([2, 0, -3, 0], 3665, 14403),
    ([0, 1, -2, 0], -2689, -7003),
    ([2, 0, -1, 2], -2602, 0),
    ([2, -1, -2, 0], 2390, 10056),
    ([1, 0, 1, 0], -2348, 6322),
    ([2, -2, 0, 0], 2236, -9884),
    ([0, 1, 2, 0], -2120, 5751),
    ([0, 2, 0, 0], -2069, 0),
    ([2, -2, -1, 0], 2048, -4950),
    ([2, 0, 1, -2], -1773, 4130),
    ([2, 0, 0, 2], -1595, 0),
    ([4, -1, -1, 0], 1215, -3958),
    ([0, 0, 2, 2], -1110, 0),
    ([3, 0, -1, 0], -892, 3258),
    ([2, 1, 1, 0], -810, 2616),
    ([4, -1, -2, 0], 759, -1897),
    ([0, 2, -1, 0], -713, -2117),
    ([2, 2, -1, 0], -700, 2354),
    ([2, 1, -2, 0], 691, 0),
    ([2, -1, 0, -2], 596, 0),
    ([4, 0, 1, 0], 549, -1423),
    ([0, 0, 4, 0], 537, -1117),
    ([4, -1, 0, 0], 520, -1571),
    ([1, 0, -2, 0], -487, -1739),
    ([2, 1, 0, -2], -399, 0),
    ([0, 0, 2, -2], -381, -4421),
    ([1, 1, 1, 0], 351, 0),
    ([3, 0, -2, 0], -340, 0),
    ([4, 0, -3, 0], 330, 0),
    ([2, -1, 2, 0], 327, 0),
    ([0, 2, 1, 0], -323, 1165),
    ([1, 1, -1, 0], 299, 0),
    ([2, 0, 3, 0], 294, 0),
    ([2, 0, -1, -2], 0, 8752),
];

/// Multipliers of (D, M, M', F), then the sine coefficient of Σb (1e-6 degree).
#[rustfmt::skip]
const LATITUDE_TERMS: [([i8; 4], i32); 60] = [
    ([0, 0, 0, 1], 5128122),
    ([0, 0, 1, 1], 280602),
    ([0, 0, 1, -1], 277693),
    ([2, 0, 0, -1], 173237),
    ([2, 0, -1, 1], 55413),
    ([2, 0, -1, -1], 46271),
    ([2, 0, 0, 1], 32573),
    ([0, 0, 2, 1], 17198),
    ([2, 0, 1, -1], 9266),
    ([0, 0, 2, -1], 8822),
    ([2, -1, 0, -1], 8216),
    ([2, 0, -2, -1], 4324),
    ([2, 0, 1, 1], 4200),
    ([2, 1, 0, -1], -3359),
    ([2, -1, -1, 1], 2463),
    ([2, -1, 0, 1], 2211),
    ([2, -1, -1, -1], 2065),
    ([0, 1, -1, -1], -1870),
    ([4, 0, -1, -1], 1828),
    ([0, 1, 0, 1], -1794),
    ([0, 0, 0, 3], -1749),
    ([0, 1, -1, 1], -1565),
    ([1, 0, 0, 1], -1491),
    ([0, 1, 1, 1], -1475),
    ([0, 1, 1, -1], -1410),
    ([0, 1, 0, -1], -1344),
    ([1, 0, 0, -1], -1335),
    ([0, 0, 3, 1], 1107),
    ([4, 0, 0, -1], 1021),
    ([4, 0, -1, 1], 833),
    ([0, 0, 1, -3], 777),
    ([4, 0, -2, 1], 671),
    ([2, 0, 0, -3], 607),
    ([2, 0, 2, -1], 596),
    ([2, -1, 1, -1], 491),
    ([2, 0, -2, 1], -451),
    ([0, 0, 3, -1], 439),
    ([2, 0, 2, 1], 422),
    ([2, 0, -3, -1], 421),
    ([2, 1, -1, 1], -366),
    ([2, 1, 0, 1], -351),
    ([4, 0, 0, 1], 331),
    ([2, -1, 1, 1], 315),
    ([2, -2, 0, -1], 302),
    ([0, 0, 1, 3], -283),
    ([2, 1, 1, -1], -229),
    ([1, 1, 0, -1], 223),
    ([1, 1, 0, 1], 223),
    ([0, 1, -2, -1], -220),
    ([2, 1, -1, -1], -220),
    ([1, 0, 1, 1], -185),
    ([2, -1, -2, -1], 181),
    ([0, 1, 2, 1], -177),
    ([4, 0, -2, -1], 176),
    ([4, -1, -1, -1], 166),
    ([1, 0, 1, -1], -164),
    ([4, 0, 1, -1], 132),
    ([1, 0, -1, -1], -119),
    ([4, -1, 0, -1], 115),
    ([2, -2, 0, 1], 107),
];

/// Mean arguments of the lunar theory, in radians.
struct Arguments {
    /// Mean longitude L'
    mean_longitude: f64,
    /// Mean elongation D, Sun mean anomaly M, Moon mean anomaly M', argument of latitude F
    dmmf: [f64; 4],
    a1: f64,
    a2: f64,
    a3: f64,
    /// Decrease of the Earth's orbital eccentricity, applied to terms in M
    e: f64,
}

impl Arguments {
    fn at(t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;
        let rad = |deg: f64| deg.rem_euclid(360.0) * RADEG;

        Arguments {
            mean_longitude: rad(218.3164477 + 481267.88123421 * t - 0.0015786 * t2
                + t3 / 538841.0
                - t4 / 65194000.0),
            dmmf: [
                rad(297.8501921 + 445267.1114034 * t - 0.0018819 * t2 + t3 / 545868.0
                    - t4 / 113065000.0),
                rad(357.5291092 + 35999.0502909 * t - 0.0001536 * t2 + t3 / 24490000.0),
                rad(134.9633964 + 477198.8675055 * t + 0.0087414 * t2 + t3 / 69699.0
                    - t4 / 14712000.0),
                rad(93.2720950 + 483202.0175233 * t - 0.0036539 * t2 - t3 / 3526000.0
                    + t4 / 863310000.0),
            ],
            a1: rad(119.75 + 131.849 * t),
            a2: rad(53.09 + 479264.290 * t),
            a3: rad(313.45 + 481266.484 * t),
            e: 1.0 - 0.002516 * t - 0.0000074 * t2,
        }
    }

    /// Argument of a periodic term and its eccentricity factor.
    fn term(&self, multipliers: &[i8; 4]) -> (f64, f64) {
        let arg: f64 = multipliers
            .iter()
            .zip(self.dmmf.iter())
            .map(|(k, a)| f64::from(*k) * a)
            .sum();
        let factor = self.e.powi(i32::from(multipliers[1].abs()));
        (arg, factor)
    }
}

/// Geometric ecliptic position of the Moon, mean equinox of date.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT).
///
/// Returns
/// --------
/// * Longitude and latitude in radians, geocentric distance of the centres in km.
pub fn geometric_position(tjm: MJD) -> EclipticPosition {
    let t = (tjm - T2000) / DAYS_PER_CENTURY;
    let args = Arguments::at(t);
    let (m_prime, f) = (args.dmmf[2], args.dmmf[3]);

    let (mut sum_l, sum_r) = LONGITUDE_DISTANCE_TERMS.iter().fold(
        (0.0, 0.0),
        |(sum_l, sum_r), (multipliers, l, r)| {
            let (arg, factor) = args.term(multipliers);
            (
                sum_l + factor * f64::from(*l) * arg.sin(),
                sum_r + factor * f64::from(*r) * arg.cos(),
            )
        },
    );

    let mut sum_b: f64 = LATITUDE_TERMS
        .iter()
        .map(|(multipliers, b)| {
            let (arg, factor) = args.term(multipliers);
            factor * f64::from(*b) * arg.sin()
        })
        .sum();

    // Venus, Jupiter and the Earth's flattening
    let lp = args.mean_longitude;
    sum_l += 3958.0 * args.a1.sin() + 1962.0 * (lp - f).sin() + 318.0 * args.a2.sin();
    sum_b += -2235.0 * lp.sin()
        + 382.0 * args.a3.sin()
        + 175.0 * (args.a1 - f).sin()
        + 175.0 * (args.a1 + f).sin()
        + 127.0 * (lp - m_prime).sin()
        - 115.0 * (lp + m_prime).sin();

    EclipticPosition {
        longitude: (lp + sum_l * 1e-6 * RADEG).rem_euclid(DPI),
        latitude: sum_b * 1e-6 * RADEG,
        distance: 385000.56 + sum_r * 1e-3,
    }
}

/// Apparent ecliptic position of the Moon (nutation in longitude applied).
pub fn apparent_position_with_nutation(tjm: MJD, dpsi: ArcSec) -> EclipticPosition {
    geometric_position(tjm).shifted(dpsi * RADSEC)
}

/// Apparent ecliptic position of the Moon at `tjm` (MJD, TT).
pub fn apparent_position(tjm: MJD) -> EclipticPosition {
    let (dpsi, _) = nutn80(tjm);
    apparent_position_with_nutation(tjm, dpsi)
}

/// Equatorial horizontal parallax of the Moon at the given distance \[rad\].
pub fn horizontal_parallax(distance_km: f64) -> f64 {
    (THEORY_EARTH_RADIUS_KM / distance_km).asin()
}
