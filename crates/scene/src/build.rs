//! Sky and Focus scene construction.
//!
//! A build produces a complete, self-contained [`Scene`] value. Callers swap
//! it in whole, so a point cloud and its index map can never disagree and a
//! half-built scene is never observable.

use catalog::{Band, Catalog, GroupId, RecordIndex};
use foundation::math::Vec3;
use rand::Rng;
use serde::Deserialize;

use crate::SceneError;
use crate::bouquet::{BouquetParams, bouquet_position};
use crate::projection::{approx_transverse_distance, project_radec, project_unit};

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    /// Radius of the sky sphere the galaxy cloud is placed on.
    pub sky_radius: f64,
    /// Supernova markers sit slightly inside the galaxy shell.
    pub sky_marker_radius: f64,
    pub sky_marker_size: f64,
    pub focus_marker_size: f64,
    pub bouquet: BouquetParams,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            sky_radius: 2600.0,
            sky_marker_radius: 2400.0,
            sky_marker_size: 90.0,
            focus_marker_size: 140.0,
            bouquet: BouquetParams::default(),
        }
    }
}

/// Sky-mode inclusion rule.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SkyFilter {
    /// A record must have a magnitude in this band.
    pub band: Band,
    /// Per-record keep probability in percent, `0..=100`.
    pub keep_percent: f64,
}

impl Default for SkyFilter {
    fn default() -> Self {
        Self {
            band: Band::R,
            keep_percent: 100.0,
        }
    }
}

impl SkyFilter {
    fn keep_probability(&self) -> f64 {
        if self.keep_percent.is_finite() {
            (self.keep_percent / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Point cloud with its index map.
///
/// `records[v]` is the catalog record drawn at vertex `v`; both vectors only
/// grow together, so their lengths always match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    positions: Vec<Vec3>,
    records: Vec<RecordIndex>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: Vec3, record: RecordIndex) {
        self.positions.push(position);
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn index_map(&self) -> &[RecordIndex] {
        &self.records
    }

    pub fn record_at(&self, vertex: usize) -> Option<RecordIndex> {
        self.records.get(vertex).copied()
    }
}

/// Discrete supernova marker; carries its group id directly.
#[derive(Debug, Clone, PartialEq)]
pub struct SupernovaMarker {
    pub group: GroupId,
    pub position: Vec3,
    /// Edge length of the sprite in scene units.
    pub size: f64,
}

/// Dashed link from the focus origin to one host candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub record: RecordIndex,
    /// Approximate transverse distance shown on hover.
    pub distance_mpc: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkyScene {
    pub galaxies: PointCloud,
    pub supernovae: Vec<SupernovaMarker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FocusScene {
    pub group: GroupId,
    pub anchor: RecordIndex,
    pub origin: SupernovaMarker,
    pub galaxies: PointCloud,
    pub links: Vec<LinkSegment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Scene {
    #[default]
    Empty,
    Sky(SkyScene),
    Focus(FocusScene),
}

impl Scene {
    pub fn as_sky(&self) -> Option<&SkyScene> {
        match self {
            Scene::Sky(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_focus(&self) -> Option<&FocusScene> {
        match self {
            Scene::Focus(f) => Some(f),
            _ => None,
        }
    }
}

/// Full-sky scene: every record with coordinates and a magnitude in the
/// filter band, each kept with the filter's probability, plus one marker per
/// group whose anchor has coordinates.
pub fn build_sky<R: Rng>(
    catalog: &Catalog,
    filter: &SkyFilter,
    params: &SceneParams,
    rng: &mut R,
) -> SkyScene {
    let keep = filter.keep_probability();
    let mut galaxies = PointCloud::new();

    for r in catalog.records() {
        let Some(pos) = r.position else {
            continue;
        };
        if r.photometry.get(filter.band).is_none() {
            continue;
        }
        if !rng.gen_bool(keep) {
            continue;
        }
        galaxies.push(project_radec(pos, params.sky_radius), r.index);
    }

    let mut supernovae = Vec::new();
    for group in catalog.groups() {
        let Some(pos) = catalog
            .anchor(&group.id)
            .and_then(|idx| catalog.record(idx))
            .and_then(|r| r.position)
        else {
            continue;
        };
        supernovae.push(SupernovaMarker {
            group: group.id.clone(),
            position: project_radec(pos, params.sky_marker_radius),
            size: params.sky_marker_size,
        });
    }

    SkyScene {
        galaxies,
        supernovae,
    }
}

/// Focus scene for one group: supernova at the origin, members laid out by
/// [`bouquet_position`], one link per placed member.
pub fn build_focus(
    catalog: &Catalog,
    group_id: &GroupId,
    params: &SceneParams,
) -> Result<FocusScene, SceneError> {
    let group = catalog
        .group(group_id)
        .ok_or_else(|| SceneError::UnknownGroup(group_id.clone()))?;
    let anchor = catalog
        .anchor(group_id)
        .ok_or_else(|| SceneError::UnknownGroup(group_id.clone()))?;
    let anchor_pos = catalog
        .record(anchor)
        .and_then(|r| r.position)
        .ok_or_else(|| SceneError::AnchorWithoutPosition(group_id.clone()))?;
    let anchor_unit = project_unit(anchor_pos.ra_deg, anchor_pos.dec_deg);

    let mut galaxies = PointCloud::new();
    let mut links = Vec::new();
    for &idx in &group.members {
        let Some(r) = catalog.record(idx) else {
            continue;
        };
        let Some(p) = bouquet_position(anchor_unit, r, &params.bouquet) else {
            continue;
        };
        galaxies.push(p, idx);
        links.push(LinkSegment {
            start: Vec3::ZERO,
            end: p,
            record: idx,
            distance_mpc: approx_transverse_distance(r.separation_arcmin, r.z_cmb),
        });
    }

    Ok(FocusScene {
        group: group_id.clone(),
        anchor,
        origin: SupernovaMarker {
            group: group_id.clone(),
            position: Vec3::ZERO,
            size: params.focus_marker_size,
        },
        galaxies,
        links,
    })
}
