//! Scripted input sessions.
//!
//! A session file is a JSON array of steps, each tagged with the time it
//! happens at:
//!
//! ```json
//! [
//!   {"at_ms": 0,    "type": "select", "cid": "SN1"},
//!   {"at_ms": 100,  "type": "move", "x": 640, "y": 300},
//!   {"at_ms": 2200, "type": "click", "x": 640, "y": 300}
//! ]
//! ```
//!
//! Frames are stepped at a fixed interval between steps so hover timers fire
//! exactly as they would under a live render loop.

use catalog::{Band, GroupId};
use foundation::time::Millis;
use runtime::Frame;
use scene::LayerVisibility;
use serde::Deserialize;
use tracing::warn;
use viewer::{ViewMode, Viewer, ViewerEvent};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionInput {
    Mode { mode: String },
    Select { cid: String },
    Band { band: String },
    Keep { percent: f64 },
    Layers { show: String },
    Look,
    LockLost,
    Reset,
    Key { key: String },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
    Drag { dx: f64, dy: f64 },
    Wheel { delta_y: f64 },
    Click { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
    /// Advance time without input.
    Wait,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionStep {
    pub at_ms: u64,
    #[serde(flatten)]
    pub input: SessionInput,
}

impl SessionInput {
    pub fn to_event(&self) -> Result<Option<ViewerEvent>, String> {
        let event = match self {
            SessionInput::Mode { mode } => ViewerEvent::SetMode(mode.parse::<ViewMode>()?),
            SessionInput::Select { cid } => ViewerEvent::SelectGroup(GroupId::new(cid.as_str())),
            SessionInput::Band { band } => ViewerEvent::SetBand(band.parse::<Band>()?),
            SessionInput::Keep { percent } => ViewerEvent::SetKeepPercent(*percent),
            SessionInput::Layers { show } => ViewerEvent::SetLayers(show.parse::<LayerVisibility>()?),
            SessionInput::Look => ViewerEvent::ToggleLook,
            SessionInput::LockLost => ViewerEvent::PointerLockLost,
            SessionInput::Reset => ViewerEvent::Reset,
            SessionInput::Key { key } => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => ViewerEvent::Key(c),
                    _ => return Err(format!("key must be a single character: {key:?}")),
                }
            }
            SessionInput::Move { x, y, dx, dy } => ViewerEvent::PointerMove {
                x: *x,
                y: *y,
                movement_x: *dx,
                movement_y: *dy,
            },
            SessionInput::Drag { dx, dy } => ViewerEvent::Drag { dx: *dx, dy: *dy },
            SessionInput::Wheel { delta_y } => ViewerEvent::Wheel { delta_y: *delta_y },
            SessionInput::Click { x, y } => ViewerEvent::Click { x: *x, y: *y },
            SessionInput::Resize { width, height } => ViewerEvent::Resize {
                width: *width,
                height: *height,
            },
            SessionInput::Wait => return Ok(None),
        };
        Ok(Some(event))
    }
}

pub fn parse_session(json: &str) -> Result<Vec<SessionStep>, String> {
    let steps: Vec<SessionStep> =
        serde_json::from_str(json).map_err(|e| format!("session parse error: {e}"))?;
    if let Some(w) = steps.windows(2).find(|w| w[1].at_ms < w[0].at_ms) {
        return Err(format!(
            "session steps out of order: {} after {}",
            w[1].at_ms, w[0].at_ms
        ));
    }
    Ok(steps)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub rejected: usize,
    pub frames: u64,
}

/// Delivers every step at its time on a `frame_ms` frame grid. Idle stretches
/// are crossed in one jump; `frames` counts grid frames elapsed.
/// Rejected transitions are logged and counted, not fatal.
pub fn replay<R: rand::Rng>(
    viewer: &mut Viewer<R>,
    steps: &[SessionStep],
    frame_ms: u64,
) -> Result<ReplaySummary, String> {
    let frame_ms = frame_ms.max(1);
    let mut frame = Frame::at(0, frame_ms, viewer.now());
    let mut summary = ReplaySummary {
        steps: 0,
        rejected: 0,
        frames: 0,
    };

    for step in steps {
        let due = Millis(step.at_ms);
        loop {
            let whole = due.saturating_sub(frame.now) / frame_ms;
            if whole == 0 {
                break;
            }
            // Frames with no pending timer are skipped in one jump; a timer
            // fires on the first frame at or after its deadline.
            let ahead = match viewer.next_deadline() {
                Some(d) if d > frame.now => d.saturating_sub(frame.now).div_ceil(frame_ms),
                Some(_) => 1,
                None => whole,
            };
            let k = ahead.clamp(1, whole);
            frame = Frame::at(
                frame.index + k,
                frame_ms,
                frame.now.saturating_add(k * frame_ms),
            );
            viewer.on_frame(frame);
            summary.frames += k;
        }
        if frame.now < due {
            frame = Frame::at(frame.index + 1, frame_ms, due);
            viewer.on_frame(frame);
            summary.frames += 1;
        }

        if let Some(event) = step.input.to_event()? {
            if let Err(err) = viewer.handle(event) {
                warn!(at_ms = step.at_ms, "step rejected: {err}");
                summary.rejected += 1;
            }
        }
        summary.steps += 1;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::{SessionInput, parse_session, replay};
    use catalog::Catalog;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use viewer::{ViewMode, Viewer, ViewerConfig, ViewerEvent};

    fn viewer() -> Viewer<StdRng> {
        let catalog = Catalog::from_json_str(
            r#"{"records": [
                {"cid": "SN1", "ra": 150.10, "dec": 2.20, "separation_arcmin": 0.5, "zCMB": 0.05, "r": 17.1},
                {"cid": "SN1", "ra": 150.14, "dec": 2.23, "separation_arcmin": 2.0, "zCMB": 0.05, "r": 18.4}
            ]}"#,
        )
        .expect("catalog");
        Viewer::with_rng(catalog, ViewerConfig::default(), StdRng::seed_from_u64(9)).expect("viewer")
    }

    #[test]
    fn parses_tagged_steps() {
        let steps = parse_session(
            r#"[
                {"at_ms": 0, "type": "mode", "mode": "focus"},
                {"at_ms": 5, "type": "move", "x": 1.0, "y": 2.0},
                {"at_ms": 9, "type": "lock_lost"}
            ]"#,
        )
        .expect("session");
        assert_eq!(steps.len(), 3);
        assert_eq!(
            steps[1].input,
            SessionInput::Move {
                x: 1.0,
                y: 2.0,
                dx: 0.0,
                dy: 0.0
            }
        );
        assert_eq!(
            steps[0].input.to_event(),
            Ok(Some(ViewerEvent::SetMode(ViewMode::Focus)))
        );
    }

    #[test]
    fn rejects_unordered_steps_and_bad_values() {
        assert!(parse_session(r#"[{"at_ms": 10, "type": "look"}, {"at_ms": 5, "type": "look"}]"#).is_err());
        let bad = SessionInput::Band {
            band: "y".to_string(),
        };
        assert!(bad.to_event().is_err());
        let long_key = SessionInput::Key {
            key: "lr".to_string(),
        };
        assert!(long_key.to_event().is_err());
    }

    #[test]
    fn replay_advances_time_and_counts_rejections() {
        let mut v = viewer();
        let steps = parse_session(
            r#"[
                {"at_ms": 0, "type": "select", "cid": "missing"},
                {"at_ms": 100, "type": "mode", "mode": "focus"},
                {"at_ms": 2505, "type": "wait"}
            ]"#,
        )
        .expect("session");
        let summary = replay(&mut v, &steps, 16).expect("replay");
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.rejected, 1);
        assert_eq!(v.mode(), ViewMode::Focus);
        assert_eq!(v.now().0, 2505);
    }

    #[test]
    fn replay_jumps_idle_time_and_still_fires_hover() {
        let mut v = viewer();
        v.handle(ViewerEvent::SetMode(ViewMode::Focus)).expect("focus");
        let mid = v.scene().as_focus().expect("focus").links[0].end.scale(0.5);
        let ndc = v.camera().project_to_ndc(mid).expect("visible");
        let (w, h) = v.viewport();
        let (x, y) = ((ndc.x + 1.0) * 0.5 * w, (1.0 - ndc.y) * 0.5 * h);
        v.handle(ViewerEvent::PointerMove {
            x,
            y,
            movement_x: 0.0,
            movement_y: 0.0,
        })
        .expect("move");
        assert!(v.tooltip().is_none());

        let steps = parse_session(r#"[{"at_ms": 1000000000000, "type": "wait"}]"#).expect("session");
        let summary = replay(&mut v, &steps, 16).expect("replay");
        assert_eq!(summary.frames, 1_000_000_000_000 / 16);
        assert_eq!(v.now().0, 1_000_000_000_000);
        assert!(v.tooltip().is_some());
    }
}
