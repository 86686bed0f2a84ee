use std::path::Path;

use scene::SceneParams;
use scene::draw::DrawParams;
use serde::Deserialize;

use crate::ViewerError;
use crate::controls::OrbitParams;
use crate::cutout::CutoutParams;

/// Every tunable of the viewer. Missing JSON fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub scene: SceneParams,
    pub draw: DrawParams,
    pub orbit: OrbitParams,
    pub cutout: CutoutParams,
    /// World-space radius around a ray within which a galaxy point counts
    /// as hit. Generous so small on-screen sprites stay clickable.
    pub point_pick_threshold: f64,
    pub link_pick_threshold: f64,
    pub hover_delay_ms: u64,
    pub tooltip_offset_px: f64,
    /// Camera distance from the origin on entering Focus (along +Z).
    pub focus_camera_distance: f64,
    pub default_fov_deg: f64,
    pub min_fov_deg: f64,
    pub max_fov_deg: f64,
    pub fov_wheel_step_deg: f64,
    pub pointer_speed: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scene: SceneParams::default(),
            draw: DrawParams::default(),
            orbit: OrbitParams::default(),
            cutout: CutoutParams::default(),
            point_pick_threshold: 35.0,
            link_pick_threshold: 12.0,
            hover_delay_ms: 2000,
            tooltip_offset_px: 12.0,
            focus_camera_distance: 3200.0,
            default_fov_deg: 65.0,
            min_fov_deg: 25.0,
            max_fov_deg: 90.0,
            fov_wheel_step_deg: 2.0,
            pointer_speed: 1.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ViewerError> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| ViewerError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ViewerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        if !(self.min_fov_deg > 0.0 && self.min_fov_deg <= self.max_fov_deg && self.max_fov_deg < 180.0) {
            return Err(ViewerError::Config(format!(
                "fov range {}..{} is not within (0, 180)",
                self.min_fov_deg, self.max_fov_deg
            )));
        }
        if !(self.orbit.min_distance > 0.0 && self.orbit.min_distance <= self.orbit.max_distance) {
            return Err(ViewerError::Config(format!(
                "orbit distance range {}..{} is empty",
                self.orbit.min_distance, self.orbit.max_distance
            )));
        }
        if self.point_pick_threshold < 0.0 || self.link_pick_threshold < 0.0 {
            return Err(ViewerError::Config("pick thresholds must be non-negative".to_string()));
        }
        url::Url::parse(&self.cutout.base_url)
            .map_err(|e| ViewerError::Config(format!("cutout base url: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerConfig;
    use crate::ViewerError;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(ViewerConfig::from_json_str("{}").expect("config"), ViewerConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = ViewerConfig::from_json_str(
            r#"{"hover_delay_ms": 500, "scene": {"sky_radius": 1000.0}, "orbit": {"zoom_speed": 2.0}}"#,
        )
        .expect("config");
        assert_eq!(cfg.hover_delay_ms, 500);
        assert_eq!(cfg.scene.sky_radius, 1000.0);
        assert_eq!(cfg.scene.sky_marker_radius, 2400.0);
        assert_eq!(cfg.orbit.zoom_speed, 2.0);
        assert_eq!(cfg.orbit.max_distance, 7000.0);
    }

    #[test]
    fn rejects_inverted_ranges_and_bad_urls() {
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{"min_fov_deg": 100.0}"#),
            Err(ViewerError::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{"cutout": {"base_url": "not a url"}}"#),
            Err(ViewerError::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str("[1, 2]"),
            Err(ViewerError::Config(_))
        ));
    }

    #[test]
    fn load_reads_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{"pointer_speed": 0.5}"#).expect("write");
        assert_eq!(ViewerConfig::load(&path).expect("load").pointer_speed, 0.5);
        assert!(ViewerConfig::load(dir.path().join("missing.json")).is_err());
    }
}
