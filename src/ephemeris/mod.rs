//! # Ephemeris oracle
//!
//! The query layer never computes astronomy itself: it asks an [`Ephemeris`] for every
//! rise, set and eclipse inside a bounded [`SearchWindow`], or for the Moon's phase at an
//! instant, and then picks the events it needs.
//!
//! ## Implementations
//!
//! * [`AnalyticEphemeris`](crate::ephemeris::analytic::AnalyticEphemeris) – self-contained
//!   solar and lunar theories, no data file needed.
//! * Test doubles implementing [`Ephemeris`] with canned events.
//!
//! ## Submodules
//!
//! * [`search`] – discrete-event and minimum search on sampled functions of time.
//! * [`solar`], [`lunar`] – apparent geocentric positions of the Sun and the Moon.
//! * [`eclipse`] – Earth shadow geometry and eclipse classification.
//! * [`analytic`] – the [`Ephemeris`] built on the modules above.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

use crate::artemis_errors::ArtemisError;
use crate::constants::Degree;
use crate::event::Event;
use crate::observers::Observer;

pub mod analytic;
pub mod eclipse;
pub mod lunar;
pub mod search;
pub mod solar;

pub use eclipse::EclipseKind;

/// Bodies that rise and set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Moon,
}

impl Body {
    /// Geometric altitude of the body's centre at the instant of rising or setting.
    ///
    /// For the Sun this folds in standard refraction (34′) and the solar semi-diameter
    /// (16′). The Moon's altitude is computed topocentrically, so only refraction is left.
    pub fn horizon_altitude(&self) -> Degree {
        match self {
            Body::Sun => -0.8333,
            Body::Moon => -34.0 / 60.0,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Sun => write!(f, "Sun"),
            Body::Moon => write!(f, "Moon"),
        }
    }
}

/// Horizon crossing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    Rise,
    Set,
}

/// Closed interval of time an ephemeris is asked to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SearchWindow {
    /// Symmetric window `[center - half_width, center + half_width]`.
    pub fn around(center: DateTime<Utc>, half_width: TimeDelta) -> Result<Self, ArtemisError> {
        let out_of_range = || {
            ArtemisError::InstantOutOfRange(format!("search window of ±{half_width} around {center}"))
        };
        Ok(SearchWindow {
            start: center.checked_sub_signed(half_width).ok_or_else(out_of_range)?,
            end: center.checked_add_signed(half_width).ok_or_else(out_of_range)?,
        })
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        (self.start..=self.end).contains(instant)
    }
}

/// Source of raw astronomical events.
///
/// Implementations are shared read-only between every connection, hence `Send + Sync`.
/// Instants are taken at face value: the caller decides which clock they belong to.
pub trait Ephemeris: Send + Sync {
    /// Every rising and setting of `body` seen from `site` inside `window`, in time order.
    fn risings_and_settings(
        &self,
        body: Body,
        site: &Observer,
        window: &SearchWindow,
    ) -> Result<Vec<Event<Horizon>>, ArtemisError>;

    /// Elongation of the Moon from the Sun in ecliptic longitude, in degrees within
    /// `[0, 360)`: 0 at new moon, 180 at full moon.
    fn moon_phase(&self, instant: DateTime<Utc>) -> Result<Degree, ArtemisError>;

    /// Every lunar eclipse whose maximum falls inside `window`, in time order.
    fn lunar_eclipses(
        &self,
        window: &SearchWindow,
    ) -> Result<Vec<Event<EclipseKind>>, ArtemisError>;
}
