use foundation::math::{Vec2, Vec3};

use crate::picking::Ray;

/// Perspective camera.
///
/// Orientation is yaw (about +Y) then pitch (about the camera's right axis);
/// `yaw = pitch = 0` looks down `-Z` with `+Y` up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub fov_y_deg: f64,
    /// Viewport width / height.
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 0.001),
            yaw_rad: 0.0,
            pitch_rad: 0.0,
            fov_y_deg: 65.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 8000.0,
        }
    }
}

impl Camera {
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw_rad.sin_cos();
        let (sp, cp) = self.pitch_rad.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    pub fn right(&self) -> Vec3 {
        let (sy, cy) = self.yaw_rad.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Points the camera at `target` without moving it. No-op when the
    /// target coincides with the camera.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(d) = (target - self.position).normalize() else {
            return;
        };
        self.pitch_rad = d.y.clamp(-1.0, 1.0).asin();
        self.yaw_rad = (-d.x).atan2(-d.z);
    }

    pub fn set_aspect(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    fn half_extents(&self) -> (f64, f64) {
        let ty = (self.fov_y_deg.to_radians() * 0.5).tan();
        (ty * self.aspect, ty)
    }

    /// Ray from the eye through a point in normalized device coordinates
    /// (`x, y` in `[-1, 1]`, `+y` up).
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let (tx, ty) = self.half_extents();
        let dir = self
            .forward()
            .add_scaled(self.right(), ndc.x * tx)
            .add_scaled(self.up(), ndc.y * ty);
        Ray::new(self.position, dir.normalize().unwrap_or(self.forward()))
    }

    /// Inverse of [`Camera::ray_through_ndc`]; `None` behind the eye.
    pub fn project_to_ndc(&self, world: Vec3) -> Option<Vec2> {
        let v = world - self.position;
        let depth = v.dot(self.forward());
        if depth <= 0.0 {
            return None;
        }
        let (tx, ty) = self.half_extents();
        Some(Vec2::new(
            v.dot(self.right()) / (depth * tx),
            v.dot(self.up()) / (depth * ty),
        ))
    }
}

/// Pixel position inside a viewport to normalized device coordinates.
pub fn screen_to_ndc(px: Vec2, width: f64, height: f64) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new((px.x / w) * 2.0 - 1.0, -((px.y / h) * 2.0 - 1.0))
}
