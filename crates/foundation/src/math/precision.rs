//! Precision policies.
//!
//! - A deterministic float ordering (`stable_total_cmp_f64`) for
//!   nearest-hit selection and sorted keys.
//! - Camera-relative `f32` conversion for handing positions to a renderer.

use core::cmp::Ordering;

use super::Vec3;

/// Renderer-facing, camera-relative position in `f32`.
pub type CameraRelativeF32 = [f32; 3];

/// Convert a world-space point (f64) to an `f32` offset from `origin`.
///
/// Scene coordinates reach several thousand units; subtracting the eye first
/// keeps sub-unit detail after the cast.
#[inline]
pub fn camera_relative_f32(world: Vec3, origin: Vec3) -> CameraRelativeF32 {
    let d = world - origin;
    [d.x as f32, d.y as f32, d.z as f32]
}

/// Canonicalize a floating-point value for deterministic ordering.
///
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}
