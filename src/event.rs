//! # Timestamped events and nearest-event selection
//!
//! Every query family boils down to the same question: among the events an ephemeris
//! found inside a search window, which one happened last and which one comes next?
//! [`nearest_events`] answers it with a single linear scan.

use chrono::{DateTime, TimeDelta, Utc};

use crate::artemis_errors::ArtemisError;

/// An instant paired with a label from a small closed set (rise/set, eclipse kind, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event<L> {
    pub instant: DateTime<Utc>,
    pub label: L,
}

impl<L> Event<L> {
    pub fn new(instant: DateTime<Utc>, label: L) -> Self {
        Event { instant, label }
    }
}

/// Closest event on each side of a reference instant.
///
/// A side is `None` when no candidate was supplied for it. This is only the tightest bound
/// among the supplied candidates, not a global one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow<L> {
    pub past: Option<Event<L>>,
    pub future: Option<Event<L>>,
}

impl<L> EventWindow<L> {
    /// Require both sides, failing with [`ArtemisError::NoEventInRange`] otherwise.
    ///
    /// Arguments
    /// -----------------
    /// * `family`: what was searched for, used in the error message (`"sunrise"`, …).
    pub fn require(self, family: &'static str) -> Result<NearestPair<Event<L>>, ArtemisError> {
        match (self.past, self.future) {
            (Some(past), Some(future)) => Ok(NearestPair { past, future }),
            _ => Err(ArtemisError::NoEventInRange(family)),
        }
    }
}

/// A past value and a future value, both present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearestPair<T> {
    pub past: T,
    pub future: T,
}

impl<T> NearestPair<T> {
    /// Apply a fallible conversion to both sides.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<NearestPair<U>, E> {
        Ok(NearestPair {
            past: f(self.past)?,
            future: f(self.future)?,
        })
    }
}

/// Pick the closest past and the closest future event around `reference`.
///
/// Arguments
/// -----------------
/// * `reference`: the instant the query is evaluated at.
/// * `events`: candidates in any order.
///
/// Return
/// ----------
/// * An [`EventWindow`]. An event exactly at `reference` counts as past. On equal distances
///   the first candidate seen is kept.
pub fn nearest_events<L>(
    reference: DateTime<Utc>,
    events: impl IntoIterator<Item = Event<L>>,
) -> EventWindow<L> {
    let mut past: Option<(TimeDelta, Event<L>)> = None;
    let mut future: Option<(TimeDelta, Event<L>)> = None;

    for event in events {
        let delta = (event.instant - reference).abs();
        let side = if event.instant <= reference {
            &mut past
        } else {
            &mut future
        };

        if side.as_ref().is_none_or(|(best, _)| delta < *best) {
            *side = Some((delta, event));
        }
    }

    EventWindow {
        past: past.map(|(_, event)| event),
        future: future.map(|(_, event)| event),
    }
}
