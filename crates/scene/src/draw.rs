//! Render-ready flattening of a [`Scene`].
//!
//! The renderer itself lives outside this workspace; it receives a
//! [`DrawList`] per frame. Positions are camera-relative `f32`, and layer
//! visibility has already been applied.

use foundation::math::Vec3;
use foundation::math::precision::{CameraRelativeF32, camera_relative_f32};
use serde::Deserialize;

use crate::build::{PointCloud, Scene};
use crate::layers::LayerVisibility;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DrawParams {
    pub background_radius: f64,
    pub sky_point_size_px: f32,
    pub focus_point_size_px: f32,
    pub dash_size: f32,
    pub gap_size: f32,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            background_radius: 5000.0,
            sky_point_size_px: 34.0,
            focus_point_size_px: 56.0,
            dash_size: 32.0,
            gap_size: 18.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Texture {
    Background,
    Galaxy,
    Supernova,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    /// Inside-out sphere centred on the world origin.
    Background {
        center: CameraRelativeF32,
        radius: f32,
    },
    Points {
        positions: Vec<CameraRelativeF32>,
        size_px: f32,
        texture: Texture,
    },
    Sprite {
        position: CameraRelativeF32,
        size: f32,
        texture: Texture,
    },
    DashedLine {
        from: CameraRelativeF32,
        to: CameraRelativeF32,
        dash: f32,
        gap: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub items: Vec<DrawItem>,
}

impl DrawList {
    pub fn build(scene: &Scene, layers: LayerVisibility, eye: Vec3, params: &DrawParams) -> Self {
        let rel = |p: Vec3| camera_relative_f32(p, eye);
        let mut items = vec![DrawItem::Background {
            center: rel(Vec3::ZERO),
            radius: params.background_radius as f32,
        }];

        let points = |cloud: &PointCloud, size_px: f32| DrawItem::Points {
            positions: cloud.positions().iter().map(|&p| rel(p)).collect(),
            size_px,
            texture: Texture::Galaxy,
        };

        match scene {
            Scene::Empty => {}
            Scene::Sky(sky) => {
                if layers.shows_galaxies() {
                    items.push(points(&sky.galaxies, params.sky_point_size_px));
                }
                if layers.shows_supernovae() {
                    items.extend(sky.supernovae.iter().map(|m| DrawItem::Sprite {
                        position: rel(m.position),
                        size: m.size as f32,
                        texture: Texture::Supernova,
                    }));
                }
            }
            Scene::Focus(focus) => {
                if layers.shows_supernovae() {
                    items.push(DrawItem::Sprite {
                        position: rel(focus.origin.position),
                        size: focus.origin.size as f32,
                        texture: Texture::Supernova,
                    });
                }
                if layers.shows_galaxies() {
                    items.push(points(&focus.galaxies, params.focus_point_size_px));
                }
                if layers.shows_links() {
                    items.extend(focus.links.iter().map(|l| DrawItem::DashedLine {
                        from: rel(l.start),
                        to: rel(l.end),
                        dash: params.dash_size,
                        gap: params.gap_size,
                    }));
                }
            }
        }

        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawItem, DrawList, DrawParams};
    use crate::build::{SceneParams, Scene, build_focus};
    use crate::layers::LayerVisibility;
    use catalog::Catalog;
    use foundation::math::Vec3;

    fn focus_scene() -> Scene {
        let catalog = Catalog::from_json_str(
            r#"{"records": [
                {"cid": "A", "ra": 1.0, "dec": 1.0, "separation_arcmin": 0.3},
                {"cid": "A", "ra": 1.1, "dec": 1.0, "separation_arcmin": 1.3}
            ]}"#,
        )
        .expect("catalog");
        Scene::Focus(build_focus(&catalog, &"A".into(), &SceneParams::default()).expect("focus"))
    }

    fn count(list: &DrawList, pred: impl Fn(&DrawItem) -> bool) -> usize {
        list.items.iter().filter(|i| pred(i)).count()
    }

    #[test]
    fn focus_layers_gate_sprite_points_and_links() {
        let scene = focus_scene();
        let eye = Vec3::new(0.0, 0.0, 3200.0);
        let params = DrawParams::default();

        let both = DrawList::build(&scene, LayerVisibility::Both, eye, &params);
        assert_eq!(count(&both, |i| matches!(i, DrawItem::Sprite { .. })), 1);
        assert_eq!(count(&both, |i| matches!(i, DrawItem::Points { .. })), 1);
        assert_eq!(count(&both, |i| matches!(i, DrawItem::DashedLine { .. })), 2);

        let gal = DrawList::build(&scene, LayerVisibility::Galaxies, eye, &params);
        assert_eq!(count(&gal, |i| matches!(i, DrawItem::Sprite { .. })), 0);
        assert_eq!(count(&gal, |i| matches!(i, DrawItem::DashedLine { .. })), 0);

        let sn = DrawList::build(&scene, LayerVisibility::Supernovae, eye, &params);
        assert_eq!(count(&sn, |i| matches!(i, DrawItem::Points { .. })), 0);
        assert_eq!(count(&sn, |i| matches!(i, DrawItem::Sprite { .. })), 1);
    }

    #[test]
    fn positions_are_relative_to_the_eye() {
        let list = DrawList::build(
            &Scene::Empty,
            LayerVisibility::Both,
            Vec3::new(0.0, 0.0, 3200.0),
            &DrawParams::default(),
        );
        assert_eq!(
            list.items,
            vec![DrawItem::Background {
                center: [0.0, 0.0, -3200.0],
                radius: 5000.0,
            }]
        );
    }
}
