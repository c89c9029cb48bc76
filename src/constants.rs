//! # Constants and type definitions for Artemis
//!
//! This module centralizes the **physical constants**, **conversion factors**, the
//! **clock mapping parameters** of the MOO world clock, and the **type aliases** used
//! throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants (Earth, Sun and Moon radii, AU)
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians, days ↔ seconds)
//! - World clock anchor, rate and calendar year offset
//! - Search windows used by the query resolver
//! - Protocol defaults (port, reply terminator)

use chrono::TimeDelta;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36525.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters (GRS1980/WGS84)
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3;

/// Earth equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = EARTH_MAJOR_AXIS / 1000.;

/// Solar radius in kilometers (IAU nominal)
pub const SUN_RADIUS_KM: f64 = 695_700.0;

/// Mean lunar radius in kilometers
pub const MOON_RADIUS_KM: f64 = 1_737.4;

/// Constant of annual aberration in arcseconds (at 1 AU)
pub const ABERRATION_ARCSEC: f64 = 20.4898;

// -------------------------------------------------------------------------------------------------
// World (MOO) clock
// -------------------------------------------------------------------------------------------------

/// Real Unix second at which the world clock started running at its own pace
pub const WORLD_ANCHOR_UNIX: i64 = 1_620_903_200;

/// How many world seconds elapse per real second
pub const WORLD_RATE: i32 = 8;

/// Calendar shift applied to the year field of the accelerated clock
pub const WORLD_YEAR_OFFSET: i32 = 259;

// -------------------------------------------------------------------------------------------------
// Search windows
// -------------------------------------------------------------------------------------------------

/// Half-width of the rise/set search window
pub const RISE_SET_HALF_WINDOW: TimeDelta = TimeDelta::days(5);

/// Half-width of the nearest lunar eclipse search window
pub const NEAREST_ECLIPSE_HALF_WINDOW: TimeDelta = TimeDelta::days(5 * 365);

/// Half-width of the past/future lunar eclipse search window
pub const ECLIPSE_PAIR_HALF_WINDOW: TimeDelta = TimeDelta::days(10 * 365);

// -------------------------------------------------------------------------------------------------
// Protocol
// -------------------------------------------------------------------------------------------------

/// Default TCP port of the server
pub const DEFAULT_PORT: u16 = 30025;

/// Appended to every reply body: the body's own line end, then a lone `.` line
pub const REPLY_TERMINATOR: &str = "\n.\n";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;

/// Modified Julian Date (days)
pub type MJD = f64;
