//! Detail-panel text.
//!
//! Field order is fixed: identifier, group, coordinates, redshift, band
//! magnitudes, derived distance. Absent fields are skipped, except the band
//! line, where an unknown magnitude prints as `-`.

use std::fmt::Write as _;

use catalog::{GroupId, Record};
use scene::projection::approx_transverse_distance;

pub const SKY_HELP: &str = "Sky view:\n\
- Mouse drag (orbit) or L to lock the look\n\
- Mouse wheel: zoom\n\
- Click a supernova: select CID / info";

pub const LOOK_LOCKED_LABEL: &str = "Sky: release look (L)";
pub const LOOK_UNLOCKED_LABEL: &str = "Sky: lock look (L)";

pub fn look_label(locked: bool) -> &'static str {
    if locked { LOOK_LOCKED_LABEL } else { LOOK_UNLOCKED_LABEL }
}

fn push_coordinates(s: &mut String, r: Option<&Record>) {
    if let Some(p) = r.and_then(|r| r.position) {
        let _ = write!(s, "\nRA: {:.6}\nDec: {:.6}", p.ra_deg, p.dec_deg);
    }
}

pub fn galaxy_meta(r: &Record) -> String {
    let mut s = match (&r.object_id, &r.group) {
        (Some(id), _) => format!("Galaxy ID: {id}"),
        (None, Some(cid)) => format!("Galaxy ID: GAL-{cid}-{}", r.index),
        (None, None) => format!("Galaxy ID: GAL-{}", r.index),
    };
    if let Some(cid) = &r.group {
        let _ = write!(s, "\nCID: {cid}");
    }
    push_coordinates(&mut s, Some(r));
    if let Some(z) = r.redshift_gal {
        let _ = write!(s, "\nredshift_GAL: {z}");
    }

    let bands: Vec<String> = r
        .photometry
        .in_order()
        .iter()
        .map(|m| m.map_or_else(|| "-".to_string(), |v| format!("{v:.3}")))
        .collect();
    let _ = write!(s, "\nu/g/r/i/z: {}", bands.join("  "));

    if let Some(mpc) = approx_transverse_distance(r.separation_arcmin, r.z_cmb) {
        let _ = write!(s, "\nDistance: {mpc:.3} Mpc");
    }
    s
}

/// Supernova summary; coordinates come from the group's anchor record.
pub fn sn_meta(cid: &GroupId, anchor: Option<&Record>) -> String {
    let mut s = format!("SNIa (CID): {cid}");
    push_coordinates(&mut s, anchor);
    s
}
