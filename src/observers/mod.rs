//! # Observing site geometry
//!
//! This module provides the [`Observer`](crate::observers::Observer) type: a ground site
//! described by its geodetic longitude, latitude and elevation, stored together with its
//! **geocentric parallax coordinates** (ρ·cosφ, ρ·sinφ). Rise and set searches use it to
//! turn a geocentric body position into a **topocentric altitude**.
//!
//! ## Frames & conventions
//!
//! ```text
//! Body-fixed (Greenwich meridian)  --(apparent sidereal time about Z)-->  Equatorial of date
//! ```
//!
//! - Longitudes: **degrees**, east positive.
//! - Latitudes: **degrees**, geodetic.
//! - Elevation: **meters** above the WGS84 ellipsoid.
//! - Parallax coordinates: **Earth radii**.
//! - Body-fixed position: **kilometers**.
//!
//! ## See also
//! ------------
//! * [`geodetic_to_parallax`](crate::observers::geodetic_to_parallax) – Geodetic latitude/elevation → (ρ·cosφ, ρ·sinφ).
//! * [`rotmt`](crate::ref_system::rotmt) – Earth rotation about the polar axis.
//! * [`gmst`](crate::time::gmst), [`equequ`](crate::earth_orientation::equequ) – Apparent sidereal time.

use nalgebra::Vector3;

use crate::artemis_errors::ArtemisError;
use crate::constants::{Degree, Meter, Radian, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS, EARTH_RADIUS_KM};
use crate::ref_system::rotmt;

/// A ground observing site.
///
/// See also
/// ------------
/// * [`Observer::new`] – Construct from geodetic longitude/latitude/elevation.
/// * [`Observer::altitude`] – Topocentric altitude of a body seen from this site.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    /// Optional human-readable site name.
    pub name: Option<String>,

    /// Geodetic longitude in **degrees** east of Greenwich.
    pub longitude: Degree,

    /// Geodetic latitude in **degrees**.
    pub latitude: Degree,

    /// Height above the reference ellipsoid in **meters**.
    pub elevation: Meter,

    /// ρ·cosφ (geocentric latitude φ), in **Earth radii**.
    pub rho_cos_phi: f64,

    /// ρ·sinφ (geocentric latitude φ), in **Earth radii**.
    pub rho_sin_phi: f64,
}

impl Observer {
    /// Create a new observer from geodetic coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `longitude`: Geodetic longitude in **degrees** (east positive), within [-180, 180].
    /// * `latitude`: Geodetic latitude in **degrees**, within [-90, 90].
    /// * `elevation`: Height above the reference ellipsoid in **meters**.
    /// * `name`: Optional site name.
    ///
    /// Return
    /// ----------
    /// * A constructed [`Observer`], or [`ArtemisError::InvalidConfig`] when a coordinate is
    ///   not finite or out of range.
    pub fn new(
        longitude: Degree,
        latitude: Degree,
        elevation: Meter,
        name: Option<String>,
    ) -> Result<Observer, ArtemisError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ArtemisError::InvalidConfig(format!(
                "longitude {longitude} is outside [-180, 180] degrees"
            )));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ArtemisError::InvalidConfig(format!(
                "latitude {latitude} is outside [-90, 90] degrees"
            )));
        }
        if !elevation.is_finite() {
            return Err(ArtemisError::InvalidConfig(format!(
                "elevation {elevation} is not a finite number of meters"
            )));
        }

        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(latitude, elevation);

        Ok(Observer {
            name,
            longitude,
            latitude,
            elevation,
            rho_cos_phi,
            rho_sin_phi,
        })
    }

    /// The default site of the world: San Francisco, 37.7775° N, 122.416389° W, 16 m.
    pub fn san_francisco() -> Observer {
        let (latitude, longitude, elevation) = (37.7775, -122.416389, 16.0);
        let (rho_cos_phi, rho_sin_phi) = geodetic_to_parallax(latitude, elevation);
        Observer {
            name: Some("San Francisco".to_string()),
            longitude,
            latitude,
            elevation,
            rho_cos_phi,
            rho_sin_phi,
        }
    }

    /// Position of the site in the Earth-fixed frame, in kilometers.
    pub fn body_fixed_coord(&self) -> Vector3<f64> {
        let lon_radians = self.longitude.to_radians();

        Vector3::new(
            EARTH_RADIUS_KM * self.rho_cos_phi * lon_radians.cos(),
            EARTH_RADIUS_KM * self.rho_cos_phi * lon_radians.sin(),
            EARTH_RADIUS_KM * self.rho_sin_phi,
        )
    }

    /// Unit normal to the ellipsoid at the site (the local zenith) in the Earth-fixed frame.
    pub fn body_fixed_zenith(&self) -> Vector3<f64> {
        let (sin_lon, cos_lon) = self.longitude.to_radians().sin_cos();
        let (sin_lat, cos_lat) = self.latitude.to_radians().sin_cos();
        Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Compute the topocentric altitude of a body seen from this site.
    ///
    /// Arguments
    /// ---------
    /// * `geocentric`: geocentric position of the body in the **true equatorial frame of date** \[km\].
    /// * `gast`: Greenwich apparent sidereal time \[rad\].
    ///
    /// Returns
    /// --------
    /// * Altitude above the geodetic horizon \[rad\], without refraction.
    ///
    /// Remarks
    /// -------
    /// * The site position is subtracted from the body position, so the Moon's diurnal
    ///   parallax (up to ~1°) is taken into account.
    pub fn altitude(&self, geocentric: &Vector3<f64>, gast: Radian) -> Radian {
        let earth_rotation = rotmt(gast, 2);
        let site = earth_rotation * self.body_fixed_coord();
        let zenith = earth_rotation * self.body_fixed_zenith();

        let topocentric = geocentric - site;
        let norm = topocentric.norm();
        if norm == 0.0 {
            return std::f64::consts::FRAC_PI_2;
        }
        (zenith.dot(&topocentric) / norm).clamp(-1.0, 1.0).asin()
    }
}

/// Convert geodetic latitude and height into normalized parallax coordinates
/// on the Earth.
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude of the observer in **radians**.
/// * `height` - Observer's altitude above the reference ellipsoid in **meters**.
///
/// Returns
/// -------
/// A tuple `(rho_cos_phi, rho_sin_phi)` in units of the equatorial radius.
///
/// Details
/// -------
/// ```text
/// u = atan( (sin φ * (b/a)) / cos φ )
/// ρ_sinφ = (b/a) * sin u + (h/a) * sin φ
/// ρ_cosφ = cos u + (h/a) * cos φ
/// ```
pub fn lat_alt_to_parallax(lat: f64, height: f64) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Same as [`lat_alt_to_parallax`] with the latitude given in **degrees**.
pub fn geodetic_to_parallax(lat: f64, height: f64) -> (f64, f64) {
    lat_alt_to_parallax(lat.to_radians(), height)
}
