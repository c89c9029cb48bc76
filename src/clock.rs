//! # Real and world clocks
//!
//! The MOO world runs its own calendar: starting from a fixed real anchor instant, world
//! time advances [`WORLD_RATE`] times faster than real time, and its year field is shifted
//! [`WORLD_YEAR_OFFSET`] years ahead.
//!
//! ```text
//! raw   = 1970-01-01T00:00:00Z + (real - anchor) × 8
//! world = raw with year + 259
//! ```
//!
//! The reverse direction undoes each step in the opposite order. The year shift is a
//! calendar operation, not a duration: a raw instant on February 29th has no counterpart
//! in the shifted (non-leap) year, and the conversion fails with
//! [`ArtemisError::NonexistentDate`]. Since the offset is odd, this happens for every
//! Feb 29 in both directions.
//!
//! Both instants are UTC. [`RealInstant`] and [`WorldInstant`] are distinct types so the
//! two domains can only meet through [`RealInstant::to_world`] and [`WorldInstant::to_real`].

use std::fmt;

use chrono::{DateTime, Datelike, TimeDelta, Utc};

use crate::artemis_errors::ArtemisError;
use crate::constants::{WORLD_ANCHOR_UNIX, WORLD_RATE, WORLD_YEAR_OFFSET};

/// Which clock a query is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeDomain {
    /// Ordinary wall-clock time.
    Real,
    /// The accelerated, shifted MOO clock.
    World,
}

/// An instant on the real (wall) clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RealInstant(DateTime<Utc>);

/// An instant on the MOO world clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorldInstant(DateTime<Utc>);

impl RealInstant {
    pub fn new(instant: DateTime<Utc>) -> Self {
        RealInstant(instant)
    }

    /// Current wall-clock time, read at every call.
    pub fn now() -> Self {
        RealInstant(Utc::now())
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Map this instant onto the world clock.
    ///
    /// Return
    /// ------
    /// * The world instant, or
    /// * [`ArtemisError::NonexistentDate`] when the accelerated instant falls on a Feb 29
    ///   and the shifted year has none,
    /// * [`ArtemisError::InstantOutOfRange`] when the result leaves chrono's range.
    pub fn to_world(self) -> Result<WorldInstant, ArtemisError> {
        let out_of_range = || ArtemisError::InstantOutOfRange(format!("world time of {}", self.0));

        let raw = (self.0 - anchor())
            .checked_mul(WORLD_RATE)
            .and_then(|scaled| DateTime::<Utc>::UNIX_EPOCH.checked_add_signed(scaled))
            .ok_or_else(out_of_range)?;

        shift_year(raw, WORLD_YEAR_OFFSET).map(WorldInstant)
    }
}

impl WorldInstant {
    pub fn new(instant: DateTime<Utc>) -> Self {
        WorldInstant(instant)
    }

    /// Current world time.
    pub fn now() -> Result<Self, ArtemisError> {
        RealInstant::now().to_world()
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Map this instant back onto the real clock.
    ///
    /// Exact inverse of [`RealInstant::to_world`]: the division by the clock rate truncates
    /// to the nanosecond, so `to_real(to_world(r)) == r` for every convertible `r`.
    pub fn to_real(self) -> Result<RealInstant, ArtemisError> {
        let raw = shift_year(self.0, -WORLD_YEAR_OFFSET)?;

        let elapsed = (raw - DateTime::<Utc>::UNIX_EPOCH) / WORLD_RATE;

        anchor()
            .checked_add_signed(elapsed)
            .map(RealInstant)
            .ok_or_else(|| ArtemisError::InstantOutOfRange(format!("real time of {}", self.0)))
    }
}

impl fmt::Display for RealInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (real)", self.0.to_rfc3339())
    }
}

impl fmt::Display for WorldInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (world)", self.0.to_rfc3339())
    }
}

fn anchor() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(WORLD_ANCHOR_UNIX)
}

/// Replace the year field, keeping month, day and time of day.
fn shift_year(instant: DateTime<Utc>, years: i32) -> Result<DateTime<Utc>, ArtemisError> {
    let target = instant
        .year()
        .checked_add(years)
        .ok_or_else(|| ArtemisError::InstantOutOfRange(instant.to_rfc3339()))?;

    instant.with_year(target).ok_or_else(|| {
        ArtemisError::NonexistentDate(format!(
            "{:02}-{:02} does not exist in year {target}",
            instant.month(),
            instant.day()
        ))
    })
}
