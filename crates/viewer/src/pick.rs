//! Pointer-to-entity resolution.
//!
//! Priority per scene:
//! - Focus: the galaxy cloud only. The origin marker is drawn but is not a
//!   pick target.
//! - Sky: the galaxy cloud, then the supernova markers.
//!
//! Sets hidden by the layer selector are skipped.

use catalog::{GroupId, RecordIndex};
use scene::picking::{PickOptions, Ray, pick_markers, pick_points};
use scene::{LayerVisibility, Scene};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    Galaxy(RecordIndex),
    SupernovaGroup(GroupId),
}

pub fn resolve_pick(
    scene: &Scene,
    layers: LayerVisibility,
    ray: Ray,
    point_threshold: f64,
    opts: PickOptions,
) -> Option<Pick> {
    match scene {
        Scene::Empty => None,
        Scene::Focus(focus) => {
            if !layers.shows_galaxies() {
                return None;
            }
            pick_points(&focus.galaxies, ray, point_threshold, opts).map(|hit| Pick::Galaxy(hit.record))
        }
        Scene::Sky(sky) => {
            if layers.shows_galaxies() {
                if let Some(hit) = pick_points(&sky.galaxies, ray, point_threshold, opts) {
                    return Some(Pick::Galaxy(hit.record));
                }
            }
            if !layers.shows_supernovae() {
                return None;
            }
            let hit = pick_markers(&sky.supernovae, ray, opts)?;
            sky.supernovae
                .get(hit.index)
                .map(|m| Pick::SupernovaGroup(m.group.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Pick, resolve_pick};
    use catalog::{Catalog, GroupId, RecordIndex};
    use foundation::math::Vec3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use scene::picking::{PickOptions, Ray};
    use scene::{LayerVisibility, Scene, SceneParams, SkyFilter, build_focus, build_sky};

    // Both supernovae sit at the south celestial pole, on the -Z axis. SN-A's
    // host has an r magnitude and lands in the galaxy cloud; SN-B's does not.
    fn catalog() -> Catalog {
        Catalog::from_json_str(
            r#"{"records": [
                {"cid": "SN-A", "ra": 0.0, "dec": -90.0, "separation_arcmin": 1.0, "r": 18.0},
                {"cid": "SN-B", "ra": 0.0, "dec": -90.0, "separation_arcmin": 1.0}
            ]}"#,
        )
        .expect("catalog")
    }

    fn sky() -> Scene {
        let mut rng = StdRng::seed_from_u64(0);
        Scene::Sky(build_sky(&catalog(), &SkyFilter::default(), &SceneParams::default(), &mut rng))
    }

    fn down_z() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 400.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn sky_prefers_galaxies_over_markers() {
        let pick = resolve_pick(&sky(), LayerVisibility::Both, down_z(), 35.0, PickOptions::default());
        assert_eq!(pick, Some(Pick::Galaxy(RecordIndex(0))));
    }

    #[test]
    fn sky_falls_back_to_markers_when_galaxies_hidden() {
        let pick = resolve_pick(
            &sky(),
            LayerVisibility::Supernovae,
            down_z(),
            35.0,
            PickOptions::default(),
        );
        // Both markers overlap exactly; the lower index wins.
        assert_eq!(pick, Some(Pick::SupernovaGroup(GroupId::from("SN-A"))));

        let sideways = Ray::new(Vec3::ZERO, Vec3::X);
        let none = resolve_pick(&sky(), LayerVisibility::Galaxies, sideways, 35.0, PickOptions::default());
        assert_eq!(none, None);
    }

    #[test]
    fn focus_never_returns_the_origin_marker() {
        let focus = build_focus(&catalog(), &"SN-B".into(), &SceneParams::default()).expect("focus");
        let scene = Scene::Focus(focus);
        // Straight through the origin, away from every bouquet point.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3200.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = resolve_pick(&scene, LayerVisibility::Both, ray, 1.0, PickOptions::default());
        assert!(!matches!(hit, Some(Pick::SupernovaGroup(_))));
    }

    #[test]
    fn focus_galaxy_resolves_through_index_map() {
        let focus = build_focus(&catalog(), &"SN-B".into(), &SceneParams::default()).expect("focus");
        let target = focus.galaxies.positions()[0];
        let expected = focus.galaxies.index_map()[0];
        let origin = Vec3::new(0.0, 0.0, 5000.0);
        let ray = Ray::new(origin, target - origin);
        let scene = Scene::Focus(focus);

        let hit = resolve_pick(&scene, LayerVisibility::Both, ray, 35.0, PickOptions::default());
        assert_eq!(hit, Some(Pick::Galaxy(expected)));
        let hidden = resolve_pick(&scene, LayerVisibility::Supernovae, ray, 35.0, PickOptions::default());
        assert_eq!(hidden, None);
    }
}
