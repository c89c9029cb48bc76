use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use artemis::ephemeris::{Body, Ephemeris, Horizon, SearchWindow};
use artemis::event::{nearest_events, Event};
use artemis::observers::Observer;
use artemis::AnalyticEphemeris;

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 20, 18, 0, 0).unwrap()
}

/// Random events within ±5 days of the reference, in no particular order.
fn random_events(rng: &mut StdRng, count: usize) -> Vec<Event<Horizon>> {
    (0..count)
        .map(|_| {
            let offset = rng.random_range(-432_000..=432_000);
            let label = if rng.random::<bool>() {
                Horizon::Rise
            } else {
                Horizon::Set
            };
            Event::new(reference() + TimeDelta::seconds(offset), label)
        })
        .collect()
}

fn bench_nearest_events(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);

    c.bench_function("nearest_events/1000_unsorted", |b| {
        b.iter_batched(
            || random_events(&mut rng, 1_000),
            |events| black_box(nearest_events(black_box(reference()), events)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_rise_set(c: &mut Criterion) {
    let ephem = AnalyticEphemeris::new();
    let site = Observer::san_francisco();
    let window = SearchWindow {
        start: reference(),
        end: reference() + TimeDelta::days(10),
    };

    let mut group = c.benchmark_group("risings_and_settings/10_days");
    group.sample_size(10);
    for body in [Body::Sun, Body::Moon] {
        group.bench_function(body.to_string(), |b| {
            b.iter(|| {
                ephem
                    .risings_and_settings(black_box(body), &site, black_box(&window))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_moon_phase(c: &mut Criterion) {
    let ephem = AnalyticEphemeris::new();
    let mut rng = StdRng::seed_from_u64(0xBADF00D);

    c.bench_function("moon_phase", |b| {
        b.iter_batched(
            || reference() + TimeDelta::seconds(rng.random_range(0..31_536_000)),
            |instant| ephem.moon_phase(black_box(instant)).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_nearest_events, bench_rise_set, bench_moon_phase);
criterion_main!(benches);
