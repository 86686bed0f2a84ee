//! The two camera-control schemes.
//!
//! - [`OrbitControls`]: drag rotates the camera around a target on a sphere,
//!   wheel dollies along the view axis. Available in both modes.
//! - [`LookControls`]: pointer-lock free look; rotates the camera in place.
//!   Only ever engaged in Sky.
//!
//! Neither scheme owns the camera; both act on a `&mut Camera` passed in by
//! the viewer, which also decides which scheme is live.

use foundation::math::Vec3;
use scene::Camera;
use serde::Deserialize;
use std::f64::consts::{FRAC_PI_2, PI};

/// Keeps the orbit off the poles, where azimuth is undefined.
const POLAR_EPS: f64 = 1e-6;

/// Radians of look rotation per pixel of pointer movement at speed 1.
const LOOK_RADIANS_PER_PX: f64 = 0.002;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitParams {
    pub min_distance: f64,
    pub max_distance: f64,
    pub zoom_speed: f64,
    pub rotate_speed: f64,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            min_distance: 400.0,
            max_distance: 7000.0,
            zoom_speed: 0.8,
            rotate_speed: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    pub target: Vec3,
    params: OrbitParams,
}

impl OrbitControls {
    pub fn new(params: OrbitParams) -> Self {
        Self {
            enabled: false,
            target: Vec3::ZERO,
            params,
        }
    }

    pub fn params(&self) -> &OrbitParams {
        &self.params
    }

    /// Multiplier applied to the orbit radius per wheel notch towards the
    /// target.
    pub fn zoom_scale(&self) -> f64 {
        0.95f64.powf(self.params.zoom_speed)
    }

    fn offset(&self, camera: &Camera) -> Vec3 {
        let offset = camera.position - self.target;
        if offset.length_squared() > 0.0 { offset } else { Vec3::Z }
    }

    fn place(&self, camera: &mut Camera, radius: f64, theta: f64, phi: f64) {
        let radius = radius.clamp(self.params.min_distance, self.params.max_distance);
        let phi = phi.clamp(POLAR_EPS, PI - POLAR_EPS);
        let (sp, cp) = phi.sin_cos();
        let (st, ct) = theta.sin_cos();
        camera.position = self.target + Vec3::new(sp * st, cp, sp * ct).scale(radius);
        camera.look_at(self.target);
    }

    fn spherical(&self, camera: &Camera) -> (f64, f64, f64) {
        let offset = self.offset(camera);
        let radius = offset.length();
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        (radius, theta, phi)
    }

    /// Re-applies the distance limits and aims the camera at the target.
    /// No-op while disabled.
    pub fn update(&self, camera: &mut Camera) {
        if !self.enabled {
            return;
        }
        let (radius, theta, phi) = self.spherical(camera);
        self.place(camera, radius, theta, phi);
    }

    /// A full viewport-height drag turns the camera by `2π × rotate_speed`.
    pub fn rotate(&self, camera: &mut Camera, dx_px: f64, dy_px: f64, viewport_height: f64) {
        if !self.enabled || !dx_px.is_finite() || !dy_px.is_finite() {
            return;
        }
        let h = viewport_height.max(1.0);
        let k = 2.0 * PI * self.params.rotate_speed / h;
        let (radius, theta, phi) = self.spherical(camera);
        self.place(camera, radius, theta - dx_px * k, phi - dy_px * k);
    }

    /// Negative `delta_y` (wheel away from the user) moves towards the target.
    pub fn dolly(&self, camera: &mut Camera, delta_y: f64) {
        if !self.enabled || !delta_y.is_finite() || delta_y == 0.0 {
            return;
        }
        let scale = if delta_y < 0.0 {
            self.zoom_scale()
        } else {
            1.0 / self.zoom_scale()
        };
        let (radius, theta, phi) = self.spherical(camera);
        self.place(camera, radius * scale, theta, phi);
    }
}

/// Pointer-lock state. Engaging while engaged and releasing while released
/// are both no-ops.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LookControls {
    locked: bool,
    pointer_speed: f64,
}

impl LookControls {
    pub fn new(pointer_speed: f64) -> Self {
        Self {
            locked: false,
            pointer_speed,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns `true` if this call changed the state.
    pub fn lock(&mut self) -> bool {
        !std::mem::replace(&mut self.locked, true)
    }

    /// Returns `true` if this call changed the state.
    pub fn unlock(&mut self) -> bool {
        std::mem::replace(&mut self.locked, false)
    }

    pub fn apply_movement(&self, camera: &mut Camera, movement_x: f64, movement_y: f64) {
        if !self.locked || !movement_x.is_finite() || !movement_y.is_finite() {
            return;
        }
        let k = LOOK_RADIANS_PER_PX * self.pointer_speed;
        camera.yaw_rad -= movement_x * k;
        camera.pitch_rad = (camera.pitch_rad - movement_y * k).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

#[cfg(test)]
mod tests {
    use super::{LookControls, OrbitControls, OrbitParams};
    use foundation::math::Vec3;
    use scene::Camera;

    fn orbit() -> OrbitControls {
        let mut o = OrbitControls::new(OrbitParams::default());
        o.enabled = true;
        o
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-6
    }

    #[test]
    fn update_clamps_distance_and_faces_target() {
        let o = orbit();
        let mut cam = Camera::default();
        o.update(&mut cam);
        assert!(close(cam.position, Vec3::new(0.0, 0.0, 400.0)));
        assert!(close(cam.forward(), Vec3::new(0.0, 0.0, -1.0)));

        cam.position = Vec3::new(0.0, 0.0, 9000.0);
        o.update(&mut cam);
        assert!((cam.position.length() - 7000.0).abs() < 1e-6);
    }

    #[test]
    fn disabled_orbit_leaves_camera_alone() {
        let o = OrbitControls::new(OrbitParams::default());
        let mut cam = Camera::default();
        let before = cam;
        o.update(&mut cam);
        o.rotate(&mut cam, 100.0, 50.0, 720.0);
        o.dolly(&mut cam, -1.0);
        assert_eq!(cam, before);
    }

    #[test]
    fn rotate_keeps_radius_and_target_in_view() {
        let o = orbit();
        let mut cam = Camera {
            position: Vec3::new(0.0, 0.0, 3200.0),
            ..Camera::default()
        };
        o.rotate(&mut cam, 180.0, -60.0, 720.0);
        assert!((cam.position.length() - 3200.0).abs() < 1e-6);
        let to_target = (Vec3::ZERO - cam.position).normalize().expect("dir");
        assert!(close(cam.forward(), to_target));
        assert!(cam.position.x < 0.0);
    }

    #[test]
    fn non_finite_input_leaves_camera_alone() {
        let o = orbit();
        let mut cam = Camera {
            position: Vec3::new(0.0, 0.0, 3200.0),
            ..Camera::default()
        };
        o.update(&mut cam);
        let before = cam;
        o.rotate(&mut cam, f64::NAN, 10.0, 720.0);
        o.dolly(&mut cam, f64::NAN);
        o.dolly(&mut cam, f64::INFINITY);

        let mut look = LookControls::new(1.0);
        look.lock();
        look.apply_movement(&mut cam, f64::NAN, 5.0);
        look.apply_movement(&mut cam, 5.0, f64::NEG_INFINITY);
        assert_eq!(cam, before);
    }

    #[test]
    fn dolly_direction_and_limits() {
        let o = orbit();
        let mut cam = Camera {
            position: Vec3::new(0.0, 0.0, 3200.0),
            ..Camera::default()
        };
        o.dolly(&mut cam, -100.0);
        let closer = cam.position.length();
        assert!((closer - 3200.0 * o.zoom_scale()).abs() < 1e-6);
        o.dolly(&mut cam, 100.0);
        assert!((cam.position.length() - 3200.0).abs() < 1e-6);

        for _ in 0..200 {
            o.dolly(&mut cam, -1.0);
        }
        assert!((cam.position.length() - 400.0).abs() < 1e-6);
    }

    #[test]
    fn lock_and_unlock_report_changes_only() {
        let mut look = LookControls::new(1.0);
        assert!(look.lock());
        assert!(!look.lock());
        assert!(look.is_locked());
        assert!(look.unlock());
        assert!(!look.unlock());
    }

    #[test]
    fn look_rotates_only_while_locked() {
        let mut look = LookControls::new(1.0);
        let mut cam = Camera::default();
        look.apply_movement(&mut cam, 100.0, 0.0);
        assert_eq!(cam.yaw_rad, 0.0);

        look.lock();
        look.apply_movement(&mut cam, 100.0, -50.0);
        assert!((cam.yaw_rad + 0.2).abs() < 1e-12);
        assert!((cam.pitch_rad - 0.1).abs() < 1e-12);

        look.apply_movement(&mut cam, 0.0, -10_000.0);
        assert!((cam.pitch_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
