//! Celestial coordinates to scene space.
//!
//! Convention: `x = cos(dec)cos(ra)`, `y = cos(dec)sin(ra)`, `z = sin(dec)`,
//! angles in degrees. No frame rotation or precession is applied.

use catalog::RaDec;
use foundation::math::Vec3;

/// Proportionality constant of the transverse-distance approximation
/// (Mpc per unit redshift per radian).
pub const MPC_PER_REDSHIFT_RADIAN: f64 = 3000.0;

pub fn project_unit(ra_deg: f64, dec_deg: f64) -> Vec3 {
    let a = ra_deg.to_radians();
    let d = dec_deg.to_radians();
    Vec3::new(d.cos() * a.cos(), d.cos() * a.sin(), d.sin())
}

pub fn project(ra_deg: f64, dec_deg: f64, radius: f64) -> Vec3 {
    project_unit(ra_deg, dec_deg).scale(radius)
}

pub fn project_radec(pos: RaDec, radius: f64) -> Vec3 {
    project(pos.ra_deg, pos.dec_deg, radius)
}

/// Rough projected separation in Mpc: `arcmin → rad × 3000 × z`.
///
/// This is a linear small-angle placeholder, not a cosmological angular
/// diameter distance. Returns `None` when either input is unknown.
pub fn approx_transverse_distance(
    separation_arcmin: Option<f64>,
    redshift: Option<f64>,
) -> Option<f64> {
    let arcmin = separation_arcmin?;
    let z = redshift?;
    let rad = arcmin * std::f64::consts::PI / (180.0 * 60.0);
    Some(rad * (MPC_PER_REDSHIFT_RADIAN * z))
}
