//! # Query resolver
//!
//! One operation per query family. Each one:
//!
//! 1. picks a **witness** instant: the reference real instant itself, or its image on the
//!    world clock for [`TimeDomain::World`] queries,
//! 2. asks the [`Ephemeris`] for every event inside a fixed window around the witness,
//! 3. keeps the nearest past and future events with [`nearest_events`],
//! 4. maps the chosen instants back to real time.
//!
//! The ephemeris is not aware of the world clock: a world-domain query is the same
//! real-domain computation evaluated at a different witness, with its results read as
//! world instants and converted back.
//!
//! Windows are never widened: a side left empty is reported as
//! [`ArtemisError::NoEventInRange`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::artemis_errors::ArtemisError;
use crate::clock::{RealInstant, TimeDomain, WorldInstant};
use crate::constants::{
    Degree, ECLIPSE_PAIR_HALF_WINDOW, NEAREST_ECLIPSE_HALF_WINDOW, RISE_SET_HALF_WINDOW,
};
use crate::ephemeris::{Body, EclipseKind, Ephemeris, Horizon, SearchWindow};
use crate::event::{nearest_events, Event, NearestPair};
use crate::observers::Observer;

/// Nearest rises and sets around the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiseSetTimes<T> {
    pub rises: NearestPair<T>,
    pub sets: NearestPair<T>,
}

impl<T> RiseSetTimes<T> {
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<RiseSetTimes<U>, E> {
        Ok(RiseSetTimes {
            rises: self.rises.try_map(&mut f)?,
            sets: self.sets.try_map(&mut f)?,
        })
    }

    /// Past rise, future rise, past set, future set.
    pub fn in_reply_order(&self) -> [&T; 4] {
        [
            &self.rises.past,
            &self.rises.future,
            &self.sets.past,
            &self.sets.future,
        ]
    }
}

/// A lunar eclipse at its greatest instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eclipse<T> {
    pub instant: T,
    pub kind: EclipseKind,
}

impl<T> Eclipse<T> {
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Eclipse<U>, E> {
        Ok(Eclipse {
            instant: f(self.instant)?,
            kind: self.kind,
        })
    }
}

impl From<Event<EclipseKind>> for Eclipse<DateTime<Utc>> {
    fn from(event: Event<EclipseKind>) -> Self {
        Eclipse {
            instant: event.instant,
            kind: event.label,
        }
    }
}

/// Last and next lunar eclipses.
pub type EclipsePair<T> = NearestPair<Eclipse<T>>;

/// Resolves astronomical queries against a shared [`Ephemeris`].
///
/// Cheap to share: the resolver is immutable and holds the ephemeris behind an [`Arc`].
#[derive(Debug)]
pub struct QueryResolver<E> {
    ephemeris: Arc<E>,
    site: Observer,
}

impl<E: Ephemeris> QueryResolver<E> {
    /// Arguments
    /// -----------------
    /// * `ephemeris`: the oracle every query is answered from.
    /// * `site`: observing site used by [`Self::sun_rise_set`] and [`Self::moon_rise_set`].
    pub fn new(ephemeris: Arc<E>, site: Observer) -> Self {
        QueryResolver { ephemeris, site }
    }

    pub fn site(&self) -> &Observer {
        &self.site
    }

    /// Moon phase angle in degrees within `[0, 360)`.
    ///
    /// Arguments
    /// -----------------
    /// * `domain`: clock the phase is evaluated on.
    /// * `at`: reference real instant, `None` for now.
    pub fn moon_phase(&self, domain: TimeDomain, at: Option<RealInstant>) -> Result<Degree, ArtemisError> {
        let witness = witness(domain, at)?;
        self.ephemeris.moon_phase(witness)
    }

    /// Nearest past and future rises and sets of `body` seen from `site`, searched within
    /// ±5 days of the witness.
    pub fn rise_set(
        &self,
        body: Body,
        site: &Observer,
        domain: TimeDomain,
        at: Option<RealInstant>,
    ) -> Result<RiseSetTimes<RealInstant>, ArtemisError> {
        let witness = witness(domain, at)?;
        let window = SearchWindow::around(witness, RISE_SET_HALF_WINDOW)?;
        let events = self.ephemeris.risings_and_settings(body, site, &window)?;
        debug!(%body, ?domain, %witness, count = events.len(), "rise/set candidates");

        let (rises, sets): (Vec<_>, Vec<_>) = events
            .into_iter()
            .partition(|event| event.label == Horizon::Rise);

        let (rise_family, set_family) = match body {
            Body::Sun => ("sunrise", "sunset"),
            Body::Moon => ("moonrise", "moonset"),
        };

        let times = RiseSetTimes {
            rises: nearest_events(witness, rises).require(rise_family)?,
            sets: nearest_events(witness, sets).require(set_family)?,
        };

        times.try_map(|event| to_real(domain, event.instant))
    }

    /// [`Self::rise_set`] for the Sun at the default site.
    pub fn sun_rise_set(
        &self,
        domain: TimeDomain,
        at: Option<RealInstant>,
    ) -> Result<RiseSetTimes<RealInstant>, ArtemisError> {
        self.rise_set(Body::Sun, &self.site, domain, at)
    }

    /// [`Self::rise_set`] for the Moon at the default site.
    pub fn moon_rise_set(
        &self,
        domain: TimeDomain,
        at: Option<RealInstant>,
    ) -> Result<RiseSetTimes<RealInstant>, ArtemisError> {
        self.rise_set(Body::Moon, &self.site, domain, at)
    }

    /// The lunar eclipse closest to the witness, past or future, searched within ±5 years.
    ///
    /// When the last and the next eclipse are equally far, the earlier one wins.
    pub fn nearest_lunar_eclipse(
        &self,
        domain: TimeDomain,
        at: Option<RealInstant>,
    ) -> Result<Eclipse<RealInstant>, ArtemisError> {
        let witness = witness(domain, at)?;
        let window = SearchWindow::around(witness, NEAREST_ECLIPSE_HALF_WINDOW)?;
        let eclipses = self.ephemeris.lunar_eclipses(&window)?;
        debug!(?domain, %witness, count = eclipses.len(), "eclipse candidates");

        let nearest = nearest_events(witness, eclipses);
        let closest = match (nearest.past, nearest.future) {
            (Some(past), Some(future)) => {
                if future.instant - witness < witness - past.instant {
                    future
                } else {
                    past
                }
            }
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => return Err(ArtemisError::NoEventInRange("lunar eclipse")),
        };

        Eclipse::from(closest).try_map(|instant| to_real(domain, instant))
    }

    /// The last and the next lunar eclipse around the witness, searched within ±10 years.
    pub fn lunar_eclipses(
        &self,
        domain: TimeDomain,
        at: Option<RealInstant>,
    ) -> Result<EclipsePair<RealInstant>, ArtemisError> {
        let witness = witness(domain, at)?;
        let window = SearchWindow::around(witness, ECLIPSE_PAIR_HALF_WINDOW)?;
        let eclipses = self.ephemeris.lunar_eclipses(&window)?;
        debug!(?domain, %witness, count = eclipses.len(), "eclipse candidates");

        nearest_events(witness, eclipses)
            .require("lunar eclipse")?
            .try_map(|event| Eclipse::from(event).try_map(|instant| to_real(domain, instant)))
    }
}

/// Instant handed to the ephemeris for a query evaluated on `domain`.
///
/// `None` reads the wall clock now, at every call.
fn witness(domain: TimeDomain, at: Option<RealInstant>) -> Result<DateTime<Utc>, ArtemisError> {
    let reference = at.unwrap_or_else(RealInstant::now);
    match domain {
        TimeDomain::Real => Ok(reference.instant()),
        TimeDomain::World => Ok(reference.to_world()?.instant()),
    }
}

/// Read an ephemeris instant on `domain` and bring it back to real time.
fn to_real(domain: TimeDomain, instant: DateTime<Utc>) -> Result<RealInstant, ArtemisError> {
    match domain {
        TimeDomain::Real => Ok(RealInstant::new(instant)),
        TimeDomain::World => WorldInstant::new(instant).to_real(),
    }
}

#[cfg(test)]
mod query_test {
    use super::*;
    use chrono::TimeDelta;
    use std::sync::Mutex;

    /// Ephemeris serving events at fixed offsets from whatever window it is asked about,
    /// recording the windows it saw.
    #[derive(Default)]
    struct ScriptedEphemeris {
        horizon_offsets: Vec<(i64, Horizon)>,
        eclipse_offsets: Vec<(i64, EclipseKind)>,
        windows: Mutex<Vec<SearchWindow>>,
    }

    impl ScriptedEphemeris {
        fn center(&self, window: &SearchWindow) -> DateTime<Utc> {
            if let Ok(mut seen) = self.windows.lock() {
                seen.push(*window);
            }
            window.start + (window.end - window.start) / 2
        }
    }

    impl Ephemeris for ScriptedEphemeris {
        fn risings_and_settings(
            &self,
            _body: Body,
            _site: &Observer,
            window: &SearchWindow,
        ) -> Result<Vec<Event<Horizon>>, ArtemisError> {
            let center = self.center(window);
            Ok(self
                .horizon_offsets
                .iter()
                .map(|(secs, label)| Event::new(center + TimeDelta::seconds(*secs), *label))
                .collect())
        }

        fn moon_phase(&self, instant: DateTime<Utc>) -> Result<Degree, ArtemisError> {
            Ok((instant.timestamp() % 360) as f64)
        }

        fn lunar_eclipses(
            &self,
            window: &SearchWindow,
        ) -> Result<Vec<Event<EclipseKind>>, ArtemisError> {
            let center = self.center(window);
            Ok(self
                .eclipse_offsets
                .iter()
                .map(|(secs, kind)| Event::new(center + TimeDelta::seconds(*secs), *kind))
                .collect())
        }
    }

    fn resolver(ephem: ScriptedEphemeris) -> QueryResolver<ScriptedEphemeris> {
        QueryResolver::new(Arc::new(ephem), Observer::san_francisco())
    }

    fn real(secs: i64) -> RealInstant {
        RealInstant::new(DateTime::from_timestamp(secs, 0).unwrap())
    }

    const REFERENCE: i64 = 1_700_000_000;

    #[test]
    fn test_rise_set_picks_nearest_of_each_kind() {
        let resolver = resolver(ScriptedEphemeris {
            horizon_offsets: vec![
                (-90_000, Horizon::Rise),
                (-3_000, Horizon::Rise),
                (-1_000, Horizon::Set),
                (40_000, Horizon::Set),
                (80_000, Horizon::Rise),
                (120_000, Horizon::Set),
            ],
            ..Default::default()
        });

        let times = resolver
            .sun_rise_set(TimeDomain::Real, Some(real(REFERENCE)))
            .unwrap();
        let secs: Vec<i64> = times
            .in_reply_order()
            .iter()
            .map(|t| t.instant().timestamp() - REFERENCE)
            .collect();
        assert_eq!(secs, vec![-3_000, 80_000, -1_000, 40_000]);
    }

    #[test]
    fn test_rise_set_window_is_ten_days() {
        let ephem = ScriptedEphemeris {
            horizon_offsets: vec![(-1, Horizon::Rise), (1, Horizon::Rise), (-1, Horizon::Set), (1, Horizon::Set)],
            ..Default::default()
        };
        let resolver = resolver(ephem);
        resolver
            .moon_rise_set(TimeDomain::Real, Some(real(REFERENCE)))
            .unwrap();

        let windows = resolver.ephemeris.windows.lock().unwrap();
        assert_eq!(windows[0].end - windows[0].start, TimeDelta::days(10));
        assert_eq!(windows[0].start, real(REFERENCE - 5 * 86_400).instant());
    }

    #[test]
    fn test_missing_side_is_a_value_error() {
        let resolver = resolver(ScriptedEphemeris {
            horizon_offsets: vec![(-10, Horizon::Rise), (10, Horizon::Rise), (-5, Horizon::Set)],
            ..Default::default()
        });
        let err = resolver
            .moon_rise_set(TimeDomain::Real, Some(real(REFERENCE)))
            .unwrap_err();
        assert_eq!(err, ArtemisError::NoEventInRange("moonset"));
        assert!(err.is_value_error());
    }

    #[test]
    fn test_nearest_eclipse_prefers_closest_then_earliest() {
        let closest_future = resolver(ScriptedEphemeris {
            eclipse_offsets: vec![(-500, EclipseKind::Total), (300, EclipseKind::Partial)],
            ..Default::default()
        });
        let eclipse = closest_future
            .nearest_lunar_eclipse(TimeDomain::Real, Some(real(REFERENCE)))
            .unwrap();
        assert_eq!(eclipse.kind, EclipseKind::Partial);
        assert_eq!(eclipse.instant, real(REFERENCE + 300));

        let tie = resolver(ScriptedEphemeris {
            eclipse_offsets: vec![(400, EclipseKind::Partial), (-400, EclipseKind::Penumbral)],
            ..Default::default()
        });
        let eclipse = tie
            .nearest_lunar_eclipse(TimeDomain::Real, Some(real(REFERENCE)))
            .unwrap();
        assert_eq!(eclipse.kind, EclipseKind::Penumbral);
    }

    #[test]
    fn test_nearest_eclipse_one_sided_and_empty() {
        let one_sided = resolver(ScriptedEphemeris {
            eclipse_offsets: vec![(9_000, EclipseKind::Total)],
            ..Default::default()
        });
        assert!(one_sided
            .nearest_lunar_eclipse(TimeDomain::Real, Some(real(REFERENCE)))
            .is_ok());
        assert_eq!(
            one_sided
                .lunar_eclipses(TimeDomain::Real, Some(real(REFERENCE)))
                .unwrap_err(),
            ArtemisError::NoEventInRange("lunar eclipse")
        );

        let empty = resolver(ScriptedEphemeris::default());
        assert_eq!(
            empty
                .nearest_lunar_eclipse(TimeDomain::Real, Some(real(REFERENCE)))
                .unwrap_err(),
            ArtemisError::NoEventInRange("lunar eclipse")
        );
    }

    #[test]
    fn test_world_domain_wraps_real_computation() {
        let ephem = ScriptedEphemeris {
            eclipse_offsets: vec![(-86_400, EclipseKind::Penumbral), (8 * 3_600, EclipseKind::Total)],
            ..Default::default()
        };
        let resolver = resolver(ephem);
        let reference = real(REFERENCE);

        let pair = resolver
            .lunar_eclipses(TimeDomain::World, Some(reference))
            .unwrap();

        // the oracle was queried around the world image of the reference
        let world = reference.to_world().unwrap();
        {
            let windows = resolver.ephemeris.windows.lock().unwrap();
            assert_eq!(windows[0].start + ECLIPSE_PAIR_HALF_WINDOW, world.instant());
        }

        // and its answers were mapped back: 8 world hours are one real hour
        assert_eq!(pair.future.instant, real(REFERENCE + 3_600));
        assert_eq!(pair.past.instant, real(REFERENCE - 10_800));
        assert_eq!(pair.past.kind, EclipseKind::Penumbral);
    }

    #[test]
    fn test_default_site_drives_rise_set() {
        let ephem = ScriptedEphemeris {
            horizon_offsets: vec![(-1, Horizon::Rise), (1, Horizon::Rise), (-1, Horizon::Set), (1, Horizon::Set)],
            ..Default::default()
        };
        let resolver = resolver(ephem);
        assert_eq!(resolver.site(), &Observer::san_francisco());

        let default_site = resolver.sun_rise_set(TimeDomain::Real, Some(real(REFERENCE))).unwrap();
        let explicit = resolver
            .rise_set(Body::Sun, resolver.site(), TimeDomain::Real, Some(real(REFERENCE)))
            .unwrap();
        assert_eq!(default_site, explicit);
    }

    #[test]
    fn test_moon_phase_in_both_domains() {
        let resolver = resolver(ScriptedEphemeris::default());
        let reference = real(REFERENCE);

        let phase = resolver.moon_phase(TimeDomain::Real, Some(reference)).unwrap();
        assert_eq!(phase, (REFERENCE % 360) as f64);

        let world = reference.to_world().unwrap().instant().timestamp();
        let phase = resolver.moon_phase(TimeDomain::World, Some(reference)).unwrap();
        assert_eq!(phase, world.rem_euclid(360) as f64);
    }
}
