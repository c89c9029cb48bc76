//! Searches over sampled functions of time.
//!
//! Time is a Modified Julian Date throughout. Both searches assume the function varies
//! slowly compared to the sampling step: at most one state change between two samples,
//! a single minimum inside the bracket.

use itertools::Itertools;

use crate::constants::MJD;

/// A state change located by [`find_discrete`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<S> {
    /// Instant of the change, within the requested precision.
    pub at: MJD,
    pub before: S,
    pub after: S,
}

/// Find every instant in `[start, end]` where a discrete state function changes value.
///
/// Arguments
/// -----------------
/// * `start`, `end`: search interval (MJD).
/// * `step`: sampling step in days. Changes closer together than this can be missed.
/// * `precision`: width in days below which a bracketed change is considered located.
/// * `state`: the function to scan.
///
/// Return
/// ----------
/// * The transitions in time order. Each one is refined by bisection between the two
///   samples that bracket it and reported at the bracket midpoint.
pub fn find_discrete<S, F>(
    start: MJD,
    end: MJD,
    step: f64,
    precision: f64,
    state: F,
) -> Vec<Transition<S>>
where
    S: PartialEq + Copy,
    F: Fn(MJD) -> S,
{
    if end <= start || step <= 0.0 {
        return Vec::new();
    }

    let n_steps = ((end - start) / step).ceil().max(1.0) as usize;
    let dt = (end - start) / n_steps as f64;

    (0..=n_steps)
        .map(|i| {
            let t = start + i as f64 * dt;
            (t, state(t))
        })
        .tuple_windows()
        .filter(|((_, before), (_, after))| before != after)
        .map(|((mut lo, before), (mut hi, after))| {
            while hi - lo > precision {
                let mid = 0.5 * (lo + hi);
                if state(mid) == before {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            Transition {
                at: 0.5 * (lo + hi),
                before,
                after,
            }
        })
        .collect()
}

/// Locate the minimum of a unimodal function on `[lo, hi]` by golden-section search.
///
/// Return
/// ----------
/// * The abscissa of the minimum, within `tolerance`.
pub fn golden_section_minimum<F>(mut lo: f64, mut hi: f64, tolerance: f64, f: F) -> f64
where
    F: Fn(f64) -> f64,
{
    // 1/φ
    const INV_PHI: f64 = 0.618_033_988_749_894_9;

    let mut x1 = hi - INV_PHI * (hi - lo);
    let mut x2 = lo + INV_PHI * (hi - lo);
    let mut f1 = f(x1);
    let mut f2 = f(x2);

    while hi - lo > tolerance {
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - INV_PHI * (hi - lo);
            f1 = f(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + INV_PHI * (hi - lo);
            f2 = f(x2);
        }
    }

    0.5 * (lo + hi)
}
