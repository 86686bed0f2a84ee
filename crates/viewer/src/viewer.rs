//! The Sky/Focus view state machine.
//!
//! Invariants kept across every event:
//! - Pointer lock is only ever engaged in Sky, and orbit is enabled whenever
//!   it is not engaged.
//! - A scene rebuild replaces the whole [`Scene`] value, bumps the scene
//!   generation, and drops any hover state that pointed into the old scene.
//! - A rejected transition leaves mode, selection and scene untouched.

use catalog::{Band, Catalog, GroupId, GroupListing};
use foundation::math::{Vec2, Vec3};
use foundation::time::Millis;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runtime::Frame;
use scene::draw::DrawList;
use scene::picking::{PickOptions, Ray, pick_segments};
use scene::{Camera, LayerVisibility, Scene, SkyFilter, build_focus, build_sky, screen_to_ndc};
use tracing::{debug, warn};
use url::Url;

use crate::ViewerError;
use crate::config::ViewerConfig;
use crate::controls::{LookControls, OrbitControls};
use crate::cutout::CutoutRequest;
use crate::detail::{SKY_HELP, galaxy_meta, look_label, sn_meta};
use crate::hover::{HoverTracker, LinkHit, Tooltip};
use crate::pick::{Pick, resolve_pick};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Sky,
    Focus,
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sky" => Ok(ViewMode::Sky),
            "focus" => Ok(ViewMode::Focus),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ViewMode::Sky => "sky",
            ViewMode::Focus => "focus",
        })
    }
}

/// Input delivered by the host. Pointer positions are viewport pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    SetMode(ViewMode),
    /// Supernova list entry clicked: focus on that group.
    SelectGroup(GroupId),
    SetBand(Band),
    SetKeepPercent(f64),
    SetLayers(LayerVisibility),
    ToggleLook,
    /// The host released pointer lock on its own, e.g. on Escape.
    PointerLockLost,
    Reset,
    Key(char),
    PointerMove {
        x: f64,
        y: f64,
        movement_x: f64,
        movement_y: f64,
    },
    Drag {
        dx: f64,
        dy: f64,
    },
    Wheel {
        delta_y: f64,
    },
    Click {
        x: f64,
        y: f64,
    },
    Resize {
        width: f64,
        height: f64,
    },
}

/// Text surfaces owned by the viewer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    pub meta: String,
    pub cutout: Option<Url>,
    pub look_label: &'static str,
}

pub struct Viewer<R = StdRng> {
    catalog: Catalog,
    config: ViewerConfig,
    cutout: CutoutRequest,
    mode: ViewMode,
    layers: LayerVisibility,
    filter: SkyFilter,
    selected: Option<GroupId>,
    camera: Camera,
    orbit: OrbitControls,
    look: LookControls,
    scene: Scene,
    generation: u64,
    hover: HoverTracker,
    panel: Panel,
    viewport: (f64, f64),
    now: Millis,
    rng: R,
}

impl Viewer<StdRng> {
    /// Viewer in Sky mode with an entropy-seeded sampler for the keep filter.
    pub fn new(catalog: Catalog, config: ViewerConfig) -> Result<Self, ViewerError> {
        Self::with_rng(catalog, config, StdRng::from_entropy())
    }
}

impl<R: Rng> Viewer<R> {
    pub fn with_rng(catalog: Catalog, config: ViewerConfig, rng: R) -> Result<Self, ViewerError> {
        config.validate()?;
        let cutout = CutoutRequest::new(config.cutout.clone())?;
        let viewport = (1280.0, 720.0);
        let mut camera = Camera {
            fov_y_deg: config.default_fov_deg,
            ..Camera::default()
        };
        camera.set_aspect(viewport.0, viewport.1);

        let mut viewer = Self {
            orbit: OrbitControls::new(config.orbit),
            look: LookControls::new(config.pointer_speed),
            hover: HoverTracker::new(config.hover_delay_ms, config.tooltip_offset_px),
            catalog,
            config,
            cutout,
            mode: ViewMode::Sky,
            layers: LayerVisibility::default(),
            filter: SkyFilter::default(),
            selected: None,
            camera,
            scene: Scene::Empty,
            generation: 0,
            panel: Panel::default(),
            viewport,
            now: Millis(0),
            rng,
        };
        viewer.set_mode(ViewMode::Sky)?;
        Ok(viewer)
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn layers(&self) -> LayerVisibility {
        self.layers
    }

    pub fn filter(&self) -> &SkyFilter {
        &self.filter
    }

    pub fn selected_group(&self) -> Option<&GroupId> {
        self.selected.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Incremented on every rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.hover.tooltip()
    }

    pub fn hovered_link(&self) -> Option<usize> {
        self.hover.hovered()
    }

    pub fn is_look_locked(&self) -> bool {
        self.look.is_locked()
    }

    pub fn is_orbit_enabled(&self) -> bool {
        self.orbit.enabled
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Earliest time a frame has work to do, if any timer is pending.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.hover.next_deadline()
    }

    pub fn listing(&self) -> Vec<GroupListing> {
        self.catalog.listing()
    }

    pub fn draw_list(&self) -> DrawList {
        DrawList::build(&self.scene, self.layers, self.camera.position, &self.config.draw)
    }

    /// Advances the clock and fires due hover reveals.
    pub fn on_frame(&mut self, frame: Frame) {
        self.now = self.now.max(frame.now);
        if self.hover.poll(self.now) {
            debug!(link = ?self.hover.hovered(), at = self.now.0, "tooltip revealed");
        }
    }

    pub fn handle(&mut self, event: ViewerEvent) -> Result<(), ViewerError> {
        match event {
            ViewerEvent::SetMode(mode) => return self.set_mode(mode),
            ViewerEvent::SelectGroup(group) => {
                self.hover.cancel();
                return self.enter_focus(group);
            }
            ViewerEvent::SetBand(band) => {
                self.filter.band = band;
                self.refilter();
            }
            ViewerEvent::SetKeepPercent(percent) => {
                self.filter.keep_percent = if percent.is_finite() {
                    percent.clamp(0.0, 100.0)
                } else {
                    0.0
                };
                self.refilter();
            }
            ViewerEvent::SetLayers(layers) => {
                self.layers = layers;
                if !layers.shows_links() {
                    self.hover.cancel();
                }
            }
            ViewerEvent::ToggleLook => self.toggle_look(),
            ViewerEvent::PointerLockLost => self.pointer_lock_lost(),
            ViewerEvent::Reset => self.reset_camera(),
            ViewerEvent::Key(key) => match key.to_ascii_lowercase() {
                'l' => self.toggle_look(),
                'r' => self.reset_camera(),
                _ => {}
            },
            ViewerEvent::PointerMove {
                x,
                y,
                movement_x,
                movement_y,
            } => self.pointer_move(Vec2::new(x, y), movement_x, movement_y),
            ViewerEvent::Drag { dx, dy } => {
                if !self.look.is_locked() {
                    self.orbit.rotate(&mut self.camera, dx, dy, self.viewport.1);
                }
            }
            ViewerEvent::Wheel { delta_y } => self.wheel(delta_y),
            ViewerEvent::Click { x, y } => {
                self.click(Vec2::new(x, y));
            }
            ViewerEvent::Resize { width, height } => {
                if width > 0.0 && height > 0.0 {
                    self.viewport = (width, height);
                    self.camera.set_aspect(width, height);
                }
            }
        }
        Ok(())
    }

    pub fn set_mode(&mut self, mode: ViewMode) -> Result<(), ViewerError> {
        self.hover.cancel();
        match mode {
            ViewMode::Sky => {
                self.look.unlock();
                self.orbit.enabled = true;
                self.mode = ViewMode::Sky;
                self.rebuild_sky();
                Ok(())
            }
            ViewMode::Focus => {
                let Some(group) = self
                    .selected
                    .clone()
                    .or_else(|| self.catalog.first_group().map(|g| g.id.clone()))
                else {
                    warn!("focus requested with an empty catalog");
                    return Err(ViewerError::NoGroups);
                };
                self.enter_focus(group)
            }
        }
    }

    fn install(&mut self, scene: Scene) {
        self.scene = scene;
        self.generation += 1;
        self.hover.cancel();
    }

    fn rebuild_sky(&mut self) {
        self.orbit.enabled = !self.look.is_locked();
        self.orbit.target = Vec3::ZERO;
        self.orbit.update(&mut self.camera);

        let sky = build_sky(&self.catalog, &self.filter, &self.config.scene, &mut self.rng);
        debug!(
            points = sky.galaxies.len(),
            markers = sky.supernovae.len(),
            band = %self.filter.band,
            keep_percent = self.filter.keep_percent,
            "sky scene built"
        );
        self.install(Scene::Sky(sky));
        self.panel.meta = SKY_HELP.to_string();
        self.panel.look_label = look_label(self.look.is_locked());
    }

    fn enter_focus(&mut self, group: GroupId) -> Result<(), ViewerError> {
        let focus = match build_focus(&self.catalog, &group, &self.config.scene) {
            Ok(focus) => focus,
            Err(err) => {
                warn!(group = %group, "focus transition rejected: {err}");
                return Err(err.into());
            }
        };

        self.look.unlock();
        self.orbit.enabled = true;
        self.orbit.target = Vec3::ZERO;
        self.camera.position = Vec3::new(0.0, 0.0, self.config.focus_camera_distance);
        self.orbit.update(&mut self.camera);

        let anchor = self.catalog.record(focus.anchor);
        self.panel.meta = sn_meta(&group, anchor);
        self.panel.cutout = anchor.and_then(|r| r.position).map(|p| self.cutout.url_for(p));
        self.panel.look_label = look_label(false);

        debug!(
            group = %group,
            hosts = focus.galaxies.len(),
            links = focus.links.len(),
            "focus scene built"
        );
        self.selected = Some(group);
        self.mode = ViewMode::Focus;
        self.install(Scene::Focus(focus));
        Ok(())
    }

    /// Band and keep changes only rebuild while in Sky.
    fn refilter(&mut self) {
        if self.mode == ViewMode::Sky {
            self.rebuild_sky();
        }
    }

    fn toggle_look(&mut self) {
        if self.mode != ViewMode::Sky {
            return;
        }
        if self.look.is_locked() {
            self.look.unlock();
        } else {
            self.look.lock();
        }
        self.orbit.enabled = !self.look.is_locked();
        self.orbit.update(&mut self.camera);
        self.panel.look_label = look_label(self.look.is_locked());
    }

    fn pointer_lock_lost(&mut self) {
        if !self.look.unlock() {
            return;
        }
        self.orbit.enabled = true;
        self.orbit.update(&mut self.camera);
        self.panel.look_label = look_label(false);
    }

    fn reset_camera(&mut self) {
        match self.mode {
            // Position is kept; only the view direction (-Z) and FOV reset.
            ViewMode::Sky => {
                self.camera.yaw_rad = 0.0;
                self.camera.pitch_rad = 0.0;
                self.camera.fov_y_deg = self.config.default_fov_deg;
            }
            ViewMode::Focus => {
                self.orbit.target = Vec3::ZERO;
                self.camera.position = Vec3::new(0.0, 0.0, self.config.focus_camera_distance);
                self.orbit.update(&mut self.camera);
            }
        }
    }

    fn wheel(&mut self, delta_y: f64) {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return;
        }
        match self.mode {
            ViewMode::Sky => {
                let step = self.config.fov_wheel_step_deg * delta_y.signum();
                self.camera.fov_y_deg = (self.camera.fov_y_deg + step)
                    .clamp(self.config.min_fov_deg, self.config.max_fov_deg);
            }
            ViewMode::Focus => self.orbit.dolly(&mut self.camera, delta_y),
        }
    }

    fn ray_at(&self, px: Vec2) -> Ray {
        let ndc = screen_to_ndc(px, self.viewport.0, self.viewport.1);
        self.camera.ray_through_ndc(ndc)
    }

    fn pick_options(&self) -> PickOptions {
        PickOptions {
            near: self.camera.near,
            far: self.camera.far,
        }
    }

    fn pointer_move(&mut self, px: Vec2, movement_x: f64, movement_y: f64) {
        self.look.apply_movement(&mut self.camera, movement_x, movement_y);
        if self.mode != ViewMode::Focus {
            self.hover.cancel();
            return;
        }
        let hit = self.link_hit(px);
        self.hover.on_pointer_move(self.now, hit, px);
    }

    fn link_hit(&self, px: Vec2) -> Option<LinkHit> {
        let Scene::Focus(focus) = &self.scene else {
            return None;
        };
        if !self.layers.shows_links() {
            return None;
        }
        let hit = pick_segments(
            &focus.links,
            self.ray_at(px),
            self.config.link_pick_threshold,
            self.pick_options(),
        )?;
        let link = focus.links.get(hit.index)?;
        Some(LinkHit {
            link: hit.index,
            distance_mpc: link.distance_mpc,
        })
    }

    /// Resolves the entity under a viewport pixel in the current scene.
    pub fn pick_at(&self, px: Vec2) -> Option<Pick> {
        resolve_pick(
            &self.scene,
            self.layers,
            self.ray_at(px),
            self.config.point_pick_threshold,
            self.pick_options(),
        )
    }

    fn click(&mut self, px: Vec2) -> Option<Pick> {
        let pick = self.pick_at(px)?;
        match &pick {
            Pick::Galaxy(index) => {
                let record = self.catalog.record(*index)?;
                self.panel.meta = galaxy_meta(record);
                if let Some(pos) = record.position {
                    self.panel.cutout = Some(self.cutout.url_for(pos));
                }
            }
            Pick::SupernovaGroup(group) => {
                let anchor = self
                    .catalog
                    .anchor(group)
                    .and_then(|idx| self.catalog.record(idx));
                self.panel.meta = sn_meta(group, anchor);
                if let Some(pos) = anchor.and_then(|r| r.position) {
                    self.panel.cutout = Some(self.cutout.url_for(pos));
                }
                self.selected = Some(group.clone());
            }
        }
        debug!(?pick, "selection");
        Some(pick)
    }
}
