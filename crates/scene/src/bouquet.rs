//! Focus-mode "bouquet" layout.
//!
//! The supernova sits at the origin; each host candidate is pushed out along
//! its sky direction relative to the anchor and fanned around that axis.
//! Every pseudo-random choice comes from [`hash01`] keyed by the record
//! index, so a layout is reproducible bit for bit.

use catalog::Record;
use foundation::math::Vec3;
use serde::Deserialize;

use crate::projection::project_unit;

/// Below this squared length a member is treated as coincident with the anchor.
pub const DEGENERATE_DIRECTION_EPS: f64 = 1e-10;

const SEED_DIR_AZIMUTH: f64 = 123.4;
const SEED_DIR_Z: f64 = 987.6;
const SEED_ANGLE: f64 = 17.0;
const SEED_RADIAL: f64 = 91.0;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BouquetParams {
    /// Forward distance per unit of chord length between anchor and member.
    pub forward_scale: f64,
    pub forward_base: f64,
    pub radial_base: f64,
    pub radial_per_arcmin: f64,
    /// Clamp applied to a known separation before it drives the radial offset.
    pub separation_min: f64,
    pub separation_max: f64,
    /// Stand-in separation range when a member has none.
    pub fallback_separation_min: f64,
    pub fallback_separation_span: f64,
}

impl Default for BouquetParams {
    fn default() -> Self {
        Self {
            forward_scale: 2200.0,
            forward_base: 400.0,
            radial_base: 180.0,
            radial_per_arcmin: 140.0,
            separation_min: 0.2,
            separation_max: 6.0,
            fallback_separation_min: 0.8,
            fallback_separation_span: 5.0,
        }
    }
}

/// Sine hash in `[0, 1)`.
///
/// Kept exactly as `fract(sin(n * 999.123 + 0.12345) * 43758.5453)`: stored
/// layouts depend on these values.
pub fn hash01(n: f64) -> f64 {
    let x = (n * 999.123 + 0.12345).sin() * 43758.5453;
    x - x.floor()
}

/// Stable pseudo-random unit vector for a record seed.
fn hashed_direction(seed: f64) -> Vec3 {
    let t0 = hash01(seed + SEED_DIR_AZIMUTH);
    let t1 = hash01(seed + SEED_DIR_Z);
    let azimuth = t0 * std::f64::consts::TAU;
    let z = t1 * 2.0 - 1.0;
    let rxy = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(azimuth.cos() * rxy, azimuth.sin() * rxy, z)
}

/// Orthonormal `(right, up)` perpendicular to `forward`.
fn basis(forward: Vec3) -> (Vec3, Vec3) {
    let reference = if forward.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
    let right = forward.cross(reference).normalize().unwrap_or(Vec3::X);
    let up = right.cross(forward).normalize().unwrap_or(Vec3::Y);
    (right, up)
}

/// Position of `member` around an anchor whose unit sky vector is `anchor_unit`.
///
/// Returns `None` for members without coordinates.
pub fn bouquet_position(anchor_unit: Vec3, member: &Record, params: &BouquetParams) -> Option<Vec3> {
    let pos = member.position?;
    let seed = member.index.0 as f64;

    let mut dir = project_unit(pos.ra_deg, pos.dec_deg) - anchor_unit;
    if dir.length_squared() < DEGENERATE_DIRECTION_EPS {
        // The anchor itself (or a duplicate position) still gets a visible spot.
        dir = hashed_direction(seed);
    }

    let forward_distance = dir.length() * params.forward_scale + params.forward_base;
    let angle = hash01(seed + SEED_ANGLE) * std::f64::consts::TAU;

    let separation = match member.finite_separation() {
        Some(sep) => sep.clamp(params.separation_min, params.separation_max),
        None => {
            params.fallback_separation_min
                + params.fallback_separation_span * hash01(seed + SEED_RADIAL)
        }
    };
    let radial = params.radial_base + separation * params.radial_per_arcmin;

    let forward = dir.normalize().unwrap_or(Vec3::Z);
    let (right, up) = basis(forward);

    Some(
        Vec3::ZERO
            .add_scaled(forward, forward_distance)
            .add_scaled(right, angle.cos() * radial)
            .add_scaled(up, angle.sin() * radial),
    )
}
