//! # Analytic ephemeris
//!
//! [`AnalyticEphemeris`] answers every [`Ephemeris`] request from closed-form solar and
//! lunar theories, so the server runs without any ephemeris file.
//!
//! ## Pipeline
//!
//! ```text
//! DateTime<Utc> ──hifitime──▶ MJD (UTC, TT)
//!        │
//!        ├─ solar / lunar theory (TT) ──▶ apparent ecliptic position of date
//!        │        └─ true obliquity ──▶ equatorial of date
//!        │
//!        └─ GMST (UTC) + equation of the equinoxes ──▶ apparent sidereal time
//!                 └─ Observer::altitude ──▶ topocentric altitude
//! ```
//!
//! Rise and set instants are the sign changes of `altitude - horizon`, sampled hourly and
//! refined by bisection. Lunar eclipses are looked for at each full moon: the instant of
//! closest approach to the shadow axis is found by a golden-section search, then
//! classified with [`ShadowGeometry`].

use chrono::{DateTime, Utc};
use tracing::debug;

use super::eclipse::{shadow_axis_separation, EclipseKind, ShadowGeometry};
use super::search::{find_discrete, golden_section_minimum};
use super::{lunar, solar, Body, Ephemeris, Horizon, SearchWindow};
use crate::artemis_errors::ArtemisError;
use crate::constants::{Degree, MJD};
use crate::earth_orientation::{equequ, nutn80};
use crate::event::Event;
use crate::observers::Observer;
use crate::ref_system::{ecliptic_to_equatorial, EclipticPosition};
use crate::time::{gmst, instant_to_mjd_utc, mjd_utc_to_instant, mjd_utc_to_tt};

/// Sampling step of the rise/set search: one hour.
const RISE_SET_STEP: f64 = 1.0 / 24.0;

/// Sampling step of the moon phase quarter search: one day.
const PHASE_STEP: f64 = 1.0;

/// Half-width of the bracket searched for the eclipse maximum around a full moon \[day\].
const ECLIPSE_BRACKET: f64 = 0.3;

/// Refinement precision of both searches: about 0.1 s.
const PRECISION: f64 = 1e-6;

/// Ephemeris computed from truncated analytic theories.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        AnalyticEphemeris
    }

    /// Apparent positions of the Sun and the Moon at `mjd_utc`, sharing one nutation
    /// evaluation.
    fn apparent_sun_and_moon(&self, mjd_utc: MJD) -> (EclipticPosition, EclipticPosition) {
        let tjm = mjd_utc_to_tt(mjd_utc);
        let (dpsi, _) = nutn80(tjm);
        (
            solar::apparent_position_with_nutation(tjm, dpsi),
            lunar::apparent_position_with_nutation(tjm, dpsi),
        )
    }

    /// Phase angle (Moon minus Sun apparent longitude) at `mjd_utc`, in [0, 360).
    fn phase_at(&self, mjd_utc: MJD) -> Degree {
        let (sun, moon) = self.apparent_sun_and_moon(mjd_utc);
        let phase = (moon.longitude - sun.longitude).to_degrees().rem_euclid(360.0);
        // rem_euclid(-0.0) is -0.0, and 360 - ε can round up to 360
        if phase >= 360.0 || phase == 0.0 {
            0.0
        } else {
            phase
        }
    }

    /// Topocentric altitude of `body` seen from `site` at `mjd_utc`, in degrees.
    pub fn altitude(&self, body: Body, site: &Observer, mjd_utc: MJD) -> Degree {
        let tjm = mjd_utc_to_tt(mjd_utc);
        let ecliptic = match body {
            Body::Sun => solar::apparent_position(tjm),
            Body::Moon => lunar::apparent_position(tjm),
        };
        let equatorial = ecliptic_to_equatorial(&ecliptic.to_cartesian(), tjm);
        let gast = gmst(mjd_utc) + equequ(tjm);
        site.altitude(&equatorial, gast).to_degrees()
    }

    /// Instant of greatest eclipse near the full moon at `full_moon`, with its kind.
    fn eclipse_near(&self, full_moon: MJD) -> Option<(MJD, EclipseKind)> {
        let separation = |mjd: MJD| {
            let (sun, moon) = self.apparent_sun_and_moon(mjd);
            shadow_axis_separation(&sun, &moon)
        };

        let greatest = golden_section_minimum(
            full_moon - ECLIPSE_BRACKET,
            full_moon + ECLIPSE_BRACKET,
            PRECISION,
            separation,
        );

        let (sun, moon) = self.apparent_sun_and_moon(greatest);
        let kind = ShadowGeometry::new(&sun, &moon).classify(shadow_axis_separation(&sun, &moon))?;
        Some((greatest, kind))
    }
}

fn window_mjd(window: &SearchWindow) -> (MJD, MJD) {
    (
        instant_to_mjd_utc(&window.start),
        instant_to_mjd_utc(&window.end),
    )
}

impl Ephemeris for AnalyticEphemeris {
    fn risings_and_settings(
        &self,
        body: Body,
        site: &Observer,
        window: &SearchWindow,
    ) -> Result<Vec<Event<Horizon>>, ArtemisError> {
        let (start, end) = window_mjd(window);
        let horizon = body.horizon_altitude();

        let transitions = find_discrete(start, end, RISE_SET_STEP, PRECISION, |mjd| {
            self.altitude(body, site, mjd) > horizon
        });
        debug!(%body, count = transitions.len(), "horizon crossings found");

        transitions
            .into_iter()
            .map(|transition| {
                let label = if transition.after {
                    Horizon::Rise
                } else {
                    Horizon::Set
                };
                Ok(Event::new(mjd_utc_to_instant(transition.at)?, label))
            })
            .collect()
    }

    fn moon_phase(&self, instant: DateTime<Utc>) -> Result<Degree, ArtemisError> {
        Ok(self.phase_at(instant_to_mjd_utc(&instant)))
    }

    fn lunar_eclipses(
        &self,
        window: &SearchWindow,
    ) -> Result<Vec<Event<EclipseKind>>, ArtemisError> {
        let (start, end) = window_mjd(window);

        // quarter 1 → 2 is the full moon
        let full_moons: Vec<MJD> = find_discrete(start, end, PHASE_STEP, PRECISION, |mjd| {
            (self.phase_at(mjd) / 90.0).floor() as u8
        })
        .into_iter()
        .filter(|transition| transition.before == 1 && transition.after == 2)
        .map(|transition| transition.at)
        .collect();
        debug!(count = full_moons.len(), "full moons found");

        full_moons
            .into_iter()
            .filter_map(|full_moon| self.eclipse_near(full_moon))
            .filter(|(mjd, _)| (start..=end).contains(mjd))
            .map(|(mjd, kind)| Ok(Event::new(mjd_utc_to_instant(mjd)?, kind)))
            .collect()
    }
}
