use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Kilometer, Radian, DPI};
use crate::earth_orientation::true_obliquity;

/// Construct a rotation matrix around one of the principal axes (X, Y, or Z).
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians (positive = counter-clockwise when looking along the axis toward the origin).
/// * `k`: index of the rotation axis:
///     - `0` → X-axis
///     - `1` → Y-axis
///     - `2` → Z-axis
///
/// Returns
/// --------
/// * A 3×3 orthonormal rotation matrix `R` such that `v_rot = R · v`.
///
/// # Panics
///
/// Panics if `k > 2`, as only axes 0–2 are valid.
///
/// # See also
/// * [`ecliptic_to_equatorial`] – rotation about X by the true obliquity
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Spherical ecliptic coordinates referred to the mean equinox of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    /// Ecliptic longitude \[rad\]
    pub longitude: Radian,
    /// Ecliptic latitude \[rad\]
    pub latitude: Radian,
    /// Geocentric distance \[km\]
    pub distance: Kilometer,
}

impl EclipticPosition {
    /// Cartesian geocentric vector of this position, in kilometers.
    pub fn to_cartesian(&self) -> Vector3<f64> {
        let (sin_lon, cos_lon) = self.longitude.sin_cos();
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        self.distance * Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Same position with the longitude shifted by `delta` radians and wrapped to [0, 2π).
    pub fn shifted(&self, delta: Radian) -> Self {
        EclipticPosition {
            longitude: (self.longitude + delta).rem_euclid(DPI),
            ..*self
        }
    }
}

/// Rotate an ecliptic-of-date vector into the true equatorial frame of date.
///
/// Arguments
/// ---------
/// * `ecliptic`: cartesian vector in the ecliptic frame of date (any length unit).
/// * `tjm`: Modified Julian Date (TT), used for the true obliquity.
///
/// Returns
/// --------
/// * The same vector in the equatorial frame of date.
pub fn ecliptic_to_equatorial(ecliptic: &Vector3<f64>, tjm: f64) -> Vector3<f64> {
    rotmt(true_obliquity(tjm), 0) * ecliptic
}
