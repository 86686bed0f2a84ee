//! Ray intersection against point clouds, sprite markers and line segments.
//!
//! Ordering contract for every `pick_*` function:
//! - The hit closest to the ray origin wins.
//! - Equal distances go to the lower element index.

use catalog::RecordIndex;
use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::build::{LinkSegment, PointCloud, SupernovaMarker};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin.add_scaled(self.dir, t)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub near: f64,
    pub far: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: 1.0e30,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointHit {
    pub vertex: usize,
    /// Resolved through the cloud's own index map.
    pub record: RecordIndex,
    /// Distance from the ray origin to the closest point on the ray.
    pub distance: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ElementHit {
    pub index: usize,
    pub distance: f64,
}

fn closer(candidate: (f64, usize), best: Option<(f64, usize)>) -> bool {
    match best {
        None => true,
        Some((bd, bi)) => stable_total_cmp_f64(candidate.0, bd)
            .then_with(|| candidate.1.cmp(&bi))
            .is_lt(),
    }
}

fn unit_ray(ray: Ray) -> Option<Ray> {
    Some(Ray::new(ray.origin, ray.dir.normalize()?))
}

/// Nearest cloud vertex within `threshold` of the ray.
pub fn pick_points(cloud: &PointCloud, ray: Ray, threshold: f64, opts: PickOptions) -> Option<PointHit> {
    let ray = unit_ray(ray)?;
    let threshold_sq = threshold * threshold;

    let mut best: Option<(f64, usize)> = None;
    for (vertex, &p) in cloud.positions().iter().enumerate() {
        let t = (p - ray.origin).dot(ray.dir);
        if t < opts.near || t > opts.far {
            continue;
        }
        if (ray.at(t) - p).length_squared() > threshold_sq {
            continue;
        }
        if closer((t, vertex), best) {
            best = Some((t, vertex));
        }
    }

    let (distance, vertex) = best?;
    Some(PointHit {
        vertex,
        record: cloud.record_at(vertex)?,
        distance,
    })
}

/// Nearest marker whose bounding sphere (radius `size / 2`) the ray enters.
pub fn pick_markers(markers: &[SupernovaMarker], ray: Ray, opts: PickOptions) -> Option<ElementHit> {
    let ray = unit_ray(ray)?;

    let mut best: Option<(f64, usize)> = None;
    for (index, m) in markers.iter().enumerate() {
        let Some(t) = ray_sphere_entry(ray, m.position, m.size * 0.5) else {
            continue;
        };
        if t < opts.near || t > opts.far {
            continue;
        }
        if closer((t, index), best) {
            best = Some((t, index));
        }
    }

    best.map(|(distance, index)| ElementHit { index, distance })
}

/// Nearest segment passing within `threshold` of the ray.
pub fn pick_segments(
    segments: &[LinkSegment],
    ray: Ray,
    threshold: f64,
    opts: PickOptions,
) -> Option<ElementHit> {
    let ray = unit_ray(ray)?;
    let threshold_sq = threshold * threshold;

    let mut best: Option<(f64, usize)> = None;
    for (index, s) in segments.iter().enumerate() {
        let (dist_sq, t) = ray_segment_closest(ray, s.start, s.end);
        if dist_sq > threshold_sq || t < opts.near || t > opts.far {
            continue;
        }
        if closer((t, index), best) {
            best = Some((t, index));
        }
    }

    best.map(|(distance, index)| ElementHit { index, distance })
}

/// Entry distance along a unit ray; `0` when the origin is inside.
fn ray_sphere_entry(ray: Ray, center: Vec3, radius: f64) -> Option<f64> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Squared distance between a unit ray and segment `a..b`, with the ray
/// parameter of the closest approach.
fn ray_segment_closest(ray: Ray, a: Vec3, b: Vec3) -> (f64, f64) {
    let d2 = b - a;
    let r = ray.origin - a;
    let e = d2.length_squared();
    let c = ray.dir.dot(r);

    if e <= 1e-12 {
        let t = (-c).max(0.0);
        return ((ray.at(t) - a).length_squared(), t);
    }

    let bb = ray.dir.dot(d2);
    let f = d2.dot(r);
    let denom = e - bb * bb;

    let mut t = if denom > 1e-12 {
        ((bb * f - c * e) / denom).max(0.0)
    } else {
        0.0
    };
    let mut s = (bb * t + f) / e;
    if s < 0.0 {
        s = 0.0;
        t = (-c).max(0.0);
    } else if s > 1.0 {
        s = 1.0;
        t = (bb - c).max(0.0);
    }

    let on_segment = a.add_scaled(d2, s);
    ((ray.at(t) - on_segment).length_squared(), t)
}

#[cfg(test)]
mod tests {
    use super::{PickOptions, Ray, pick_markers, pick_points, pick_segments, ray_segment_closest};
    use crate::build::{LinkSegment, PointCloud, SupernovaMarker};
    use catalog::RecordIndex;
    use foundation::math::Vec3;

    fn x_ray() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0))
    }

    #[test]
    fn points_pick_nearest_within_threshold() {
        let mut cloud = PointCloud::new();
        cloud.push(Vec3::new(100.0, 30.0, 0.0), RecordIndex(7));
        cloud.push(Vec3::new(50.0, 20.0, 0.0), RecordIndex(3));
        cloud.push(Vec3::new(10.0, 80.0, 0.0), RecordIndex(9));

        let hit = pick_points(&cloud, x_ray(), 35.0, PickOptions::default()).expect("hit");
        assert_eq!(hit.vertex, 1);
        assert_eq!(hit.record, RecordIndex(3));
        assert!((hit.distance - 50.0).abs() < 1e-9);

        assert!(pick_points(&cloud, x_ray(), 5.0, PickOptions::default()).is_none());
    }

    #[test]
    fn points_behind_the_origin_are_ignored() {
        let mut cloud = PointCloud::new();
        cloud.push(Vec3::new(-40.0, 0.0, 0.0), RecordIndex(0));
        assert!(pick_points(&cloud, x_ray(), 35.0, PickOptions::default()).is_none());
    }

    #[test]
    fn equal_distance_ties_break_by_lower_index() {
        let mut cloud = PointCloud::new();
        cloud.push(Vec3::new(10.0, 1.0, 0.0), RecordIndex(5));
        cloud.push(Vec3::new(10.0, -1.0, 0.0), RecordIndex(4));
        let hit = pick_points(&cloud, x_ray(), 2.0, PickOptions::default()).expect("hit");
        assert_eq!(hit.vertex, 0);
    }

    #[test]
    fn markers_hit_by_bounding_sphere() {
        let markers = vec![
            SupernovaMarker {
                group: "far".into(),
                position: Vec3::new(500.0, 0.0, 0.0),
                size: 90.0,
            },
            SupernovaMarker {
                group: "near".into(),
                position: Vec3::new(200.0, 40.0, 0.0),
                size: 90.0,
            },
            SupernovaMarker {
                group: "miss".into(),
                position: Vec3::new(100.0, 100.0, 0.0),
                size: 90.0,
            },
        ];
        let hit = pick_markers(&markers, x_ray(), PickOptions::default()).expect("hit");
        assert_eq!(hit.index, 1);
        assert!(hit.distance > 150.0 && hit.distance < 200.0);
    }

    #[test]
    fn segments_use_closest_approach() {
        let link = |end: Vec3| LinkSegment {
            start: Vec3::new(0.0, 0.0, -100.0),
            end,
            record: RecordIndex(0),
            distance_mpc: None,
        };
        // Passes through the ray at x = 150.
        let crossing = link(Vec3::new(300.0, 0.0, 100.0));
        let (d2, t) = ray_segment_closest(x_ray_unit(), crossing.start, crossing.end);
        assert!(d2 < 1e-9);
        assert!((t - 150.0).abs() < 1e-9);

        let segments = vec![link(Vec3::new(0.0, 500.0, -100.0)), crossing];
        let hit = pick_segments(&segments, x_ray(), 1.0, PickOptions::default()).expect("hit");
        assert_eq!(hit.index, 1);
        assert!(pick_segments(&segments[..1], x_ray(), 1.0, PickOptions::default()).is_none());
    }

    fn x_ray_unit() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::X)
    }

    #[test]
    fn degenerate_ray_picks_nothing() {
        let mut cloud = PointCloud::new();
        cloud.push(Vec3::ZERO, RecordIndex(0));
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(pick_points(&cloud, ray, 35.0, PickOptions::default()).is_none());
    }
}
