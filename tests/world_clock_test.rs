mod common;

use artemis::query::Eclipse;
use artemis::{ArtemisError, RealInstant, TimeDomain, WorldInstant};
use chrono::DateTime;
use common::{resolver, GridEphemeris};
use proptest::prelude::*;

fn real(secs: i64) -> RealInstant {
    RealInstant::new(DateTime::from_timestamp(secs, 0).unwrap())
}

/// Evaluate a real-domain query at the world image of `reference`, then read its answer
/// back as a world instant.
fn through_world_clock(
    reference: RealInstant,
    query: impl FnOnce(RealInstant) -> Result<Eclipse<RealInstant>, ArtemisError>,
) -> Result<Eclipse<RealInstant>, ArtemisError> {
    let witness = RealInstant::new(reference.to_world()?.instant());
    query(witness)?.try_map(|instant| WorldInstant::new(instant.instant()).to_real())
}

#[test]
fn test_world_clock_landmarks() {
    let world = |secs| real(secs).to_world().unwrap().instant().to_rfc3339();
    assert_eq!(world(1_620_903_200), "2229-01-01T00:00:00+00:00");
    // one real day is eight world days
    assert_eq!(world(1_620_903_200 + 86_400), "2229-01-09T00:00:00+00:00");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn nearest_eclipse_world_query_is_wrapped_real_query(
        secs in 1_500_000_000i64..1_900_000_000i64,
    ) {
        let resolver = resolver(GridEphemeris::default());
        let reference = real(secs);

        let world = resolver.nearest_lunar_eclipse(TimeDomain::World, Some(reference));
        let wrapped = through_world_clock(reference, |witness| {
            resolver.nearest_lunar_eclipse(TimeDomain::Real, Some(witness))
        });
        prop_assert_eq!(world, wrapped);
    }

    #[test]
    fn eclipse_pair_world_query_is_wrapped_real_query(
        secs in 1_500_000_000i64..1_900_000_000i64,
    ) {
        let resolver = resolver(GridEphemeris::default());
        let reference = real(secs);

        let world = resolver.lunar_eclipses(TimeDomain::World, Some(reference));
        let wrapped = reference.to_world().and_then(|image| {
            resolver
                .lunar_eclipses(TimeDomain::Real, Some(RealInstant::new(image.instant())))?
                .try_map(|eclipse| {
                    eclipse.try_map(|instant| WorldInstant::new(instant.instant()).to_real())
                })
        });
        prop_assert_eq!(world, wrapped);
    }

    #[test]
    fn world_answers_straddle_the_reference(
        secs in 1_500_000_000i64..1_900_000_000i64,
    ) {
        let resolver = resolver(GridEphemeris::default());
        let reference = real(secs);

        // a world instant on Feb 29 has no real counterpart; only successful answers
        // are checked
        if let Ok(pair) = resolver.lunar_eclipses(TimeDomain::World, Some(reference)) {
            prop_assert!(pair.past.instant <= reference);
            prop_assert!(pair.future.instant > reference);
        }
        if let Ok(times) = resolver.sun_rise_set(TimeDomain::World, Some(reference)) {
            prop_assert!(times.rises.past <= reference);
            prop_assert!(times.sets.future > reference);
        }
    }
}
