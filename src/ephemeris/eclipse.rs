//! Earth shadow geometry at full moon.
//!
//! The umbra and penumbra are cones whose apparent radii at the Moon's distance follow
//! from the parallaxes of both bodies and the Sun's semi-diameter. The atmosphere makes
//! the shadow slightly larger than the geometric cone, modelled by a 2% enlargement.
//!
//! ```text
//! umbra     = 1.02 × (0.998340·π_moon − s_sun + π_sun)
//! penumbra  = 1.02 × (0.998340·π_moon + s_sun + π_sun)
//! ```
//!
//! The eclipse kind then depends on how far the Moon's centre is from the shadow axis,
//! compared with these radii widened or narrowed by the Moon's own semi-diameter.

use std::fmt;

use crate::constants::{Radian, AU, MOON_RADIUS_KM, RADSEC, SUN_RADIUS_KM};
use crate::ephemeris::lunar::horizontal_parallax;
use crate::ref_system::EclipticPosition;

/// Solar horizontal parallax at 1 AU \[arcsec\]
const SOLAR_PARALLAX_ARCSEC: f64 = 8.794;

/// Reduction of the lunar parallax to the mean latitude of the shadow edge
const PARALLAX_REDUCTION: f64 = 0.998340;

const SHADOW_ENLARGEMENT: f64 = 1.02;

/// Kind of lunar eclipse, from the deepest shadow the Moon enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EclipseKind {
    Penumbral,
    Partial,
    Total,
}

impl fmt::Display for EclipseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EclipseKind::Penumbral => "Penumbral",
            EclipseKind::Partial => "Partial",
            EclipseKind::Total => "Total",
        };
        write!(f, "{label}")
    }
}

/// Apparent sizes involved in a lunar eclipse, all in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowGeometry {
    pub umbra_radius: Radian,
    pub penumbra_radius: Radian,
    pub moon_semi_diameter: Radian,
}

impl ShadowGeometry {
    /// Shadow geometry for the given geocentric positions of the Sun and the Moon.
    pub fn new(sun: &EclipticPosition, moon: &EclipticPosition) -> Self {
        let sun_au = sun.distance / AU;

        let moon_parallax = horizontal_parallax(moon.distance);
        let sun_parallax = SOLAR_PARALLAX_ARCSEC / sun_au * RADSEC;
        let sun_semi_diameter = (SUN_RADIUS_KM / sun.distance).asin();

        let reduced = PARALLAX_REDUCTION * moon_parallax + sun_parallax;
        ShadowGeometry {
            umbra_radius: SHADOW_ENLARGEMENT * (reduced - sun_semi_diameter),
            penumbra_radius: SHADOW_ENLARGEMENT * (reduced + sun_semi_diameter),
            moon_semi_diameter: (MOON_RADIUS_KM / moon.distance).asin(),
        }
    }

    /// Classify an eclipse from the distance between the Moon's centre and the shadow
    /// axis, or `None` when the Moon misses the penumbra entirely.
    pub fn classify(&self, separation: Radian) -> Option<EclipseKind> {
        if separation < self.umbra_radius - self.moon_semi_diameter {
            Some(EclipseKind::Total)
        } else if separation < self.umbra_radius + self.moon_semi_diameter {
            Some(EclipseKind::Partial)
        } else if separation < self.penumbra_radius + self.moon_semi_diameter {
            Some(EclipseKind::Penumbral)
        } else {
            None
        }
    }
}

/// Angular distance between the Moon and the antisolar point \[rad\].
pub fn shadow_axis_separation(sun: &EclipticPosition, moon: &EclipticPosition) -> Radian {
    let anti_sun = -sun.to_cartesian();
    let moon = moon.to_cartesian();
    // atan2 keeps precision for the small angles that matter here
    moon.cross(&anti_sun).norm().atan2(moon.dot(&anti_sun))
}
