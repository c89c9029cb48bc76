use crate::constants::{ArcSec, Radian, DAYS_PER_CENTURY, RADEG, RADSEC, T2000, MJD};

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// This function returns the mean obliquity angle ε, defined as the angle between
/// the Earth's equator and the ecliptic plane, using the standard IAU 1976 polynomial model.
/// The result is expressed in radians and is valid for dates within a few millennia
/// of the J2000 epoch.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// Formula
/// -------
/// ```text
/// ε(t) = ε₀ + ε₁·T + ε₂·T² + ε₃·T³
/// ```
/// with `T = (tjm - T2000) / 36525.0`, evaluated with Horner's method.
///
/// # See also
/// * [`true_obliquity`] – adds the nutation in obliquity to this value
pub fn obleq(tjm: MJD) -> Radian {
    // Obliquity coefficients
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// One periodic term of the nutation series.
///
/// Multipliers of the fundamental arguments (D, M, M', F, Ω), then the sine
/// coefficient of Δψ and the cosine coefficient of Δε in units of 0.0001″,
/// each with its secular rate per Julian century.
struct NutationTerm {
    args: [f64; 5],
    psi: (f64, f64),
    eps: (f64, f64),
}

const fn term(args: [f64; 5], psi: (f64, f64), eps: (f64, f64)) -> NutationTerm {
    NutationTerm { args, psi, eps }
}

/// Leading terms of the IAU 1980 series, sorted by amplitude.
///
/// Truncating after these keeps Δψ within about 0.1″ of the full 106-term
/// theory, well below what rise/set and eclipse timing can resolve.
const NUTATION_TERMS: [NutationTerm; 13] = [
    term([0., 0., 0., 0., 1.], (-171996.0, -174.2), (92025.0, 8.9)),
    term([-2., 0., 0., 2., 2.], (-13187.0, -1.6), (5736.0, -3.1)),
    term([0., 0., 0., 2., 2.], (-2274.0, -0.2), (977.0, -0.5)),
    term([0., 0., 0., 0., 2.], (2062.0, 0.2), (-895.0, 0.5)),
    term([0., 1., 0., 0., 0.], (1426.0, -3.4), (54.0, -0.1)),
    term([0., 0., 1., 0., 0.], (712.0, 0.1), (-7.0, 0.0)),
    term([-2., 1., 0., 2., 2.], (-517.0, 1.2), (224.0, -0.6)),
    term([0., 0., 0., 2., 1.], (-386.0, -0.4), (200.0, 0.0)),
    term([0., 0., 1., 2., 2.], (-301.0, 0.0), (129.0, -0.1)),
    term([-2., -1., 0., 2., 2.], (217.0, -0.5), (-95.0, 0.3)),
    term([-2., 0., 1., 0., 0.], (-158.0, 0.0), (0.0, 0.0)),
    term([-2., 0., 0., 2., 1.], (129.0, 0.1), (-70.0, 0.0)),
    term([0., 0., -1., 2., 2.], (123.0, 0.0), (-53.0, 0.0)),
];

/// Compute the nutation angles in longitude and obliquity using the leading
/// terms of the IAU 1980 (Wahr) model.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (in TT time scale).
///
/// Returns
/// --------
/// * A tuple `(Δψ, Δε)`:
///     - `Δψ`: nutation in longitude \[arcseconds\]
///     - `Δε`: nutation in obliquity \[arcseconds\]
///
/// Description
/// -----------
/// The five fundamental arguments are the mean elongation of the Moon from the Sun (D),
/// the mean anomaly of the Sun (M), the mean anomaly of the Moon (M'), the Moon's
/// argument of latitude (F) and the longitude of the Moon's ascending node (Ω), all
/// cubic polynomials in Julian centuries T since J2000. Each series term is a linear
/// combination of those arguments.
///
/// # See also
/// * [`equequ`] – equation of the equinoxes built from Δψ
/// * [`true_obliquity`] – obliquity corrected by Δε
pub fn nutn80(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = (tjm - T2000) / DAYS_PER_CENTURY;
    let t2 = t * t;
    let t3 = t2 * t;

    let fundamentals = [
        297.85036 + 445267.111480 * t - 0.0019142 * t2 + t3 / 189474.0,
        357.52772 + 35999.050340 * t - 0.0001603 * t2 - t3 / 300000.0,
        134.96298 + 477198.867398 * t + 0.0086972 * t2 + t3 / 56250.0,
        93.27191 + 483202.017538 * t - 0.0036825 * t2 + t3 / 327270.0,
        125.04452 - 1934.136261 * t + 0.0020708 * t2 + t3 / 450000.0,
    ]
    .map(|deg: f64| deg.rem_euclid(360.0) * RADEG);

    let (dpsi, deps) = NUTATION_TERMS.iter().fold((0.0, 0.0), |(dpsi, deps), term| {
        let arg: f64 = term
            .args
            .iter()
            .zip(fundamentals.iter())
            .map(|(k, a)| k * a)
            .sum();
        (
            dpsi + (term.psi.0 + term.psi.1 * t) * arg.sin(),
            deps + (term.eps.0 + term.eps.1 * t) * arg.cos(),
        )
    });

    // 0.0001 arcseconds → arcseconds
    (dpsi * 1e-4, deps * 1e-4)
}

/// True obliquity of the ecliptic (mean obliquity plus nutation in obliquity), in radians.
pub fn true_obliquity(tjm: MJD) -> Radian {
    let (_, deps) = nutn80(tjm);
    obleq(tjm) + deps * RADSEC
}

/// Compute the equation of the equinoxes (nutation correction) in radians.
///
/// This term accounts for the small difference between apparent sidereal time
/// and mean sidereal time due to the nutation of Earth's rotation axis.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, TT or TDB time scale)
///
/// # Returns
/// * Equation of the equinoxes in **radians**.
///
/// # Details
/// ```text
/// Eq_eq = Δψ * cos(ε)
/// ```
///
/// # See also
/// * [`obleq`] – Computes the mean obliquity of the ecliptic.
/// * [`nutn80`] – Computes the nutation angles (Δψ and Δε).
pub fn equequ(tjm: MJD) -> Radian {
    let oblm = obleq(tjm);
    let (dpsi, _deps) = nutn80(tjm);
    RADSEC * dpsi * oblm.cos()
}
