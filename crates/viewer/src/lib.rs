//! Interactive side of the sky viewer.
//!
//! [`Viewer`] owns all view state and is driven by discrete [`ViewerEvent`]s
//! plus a per-frame [`runtime::Frame`] tick. Nothing here touches a window or
//! the network: the host delivers input, reads back the panel text, tooltip,
//! cutout URL and draw list, and does the presentation.

pub mod assets;
pub mod config;
pub mod controls;
pub mod cutout;
pub mod detail;
pub mod hover;
pub mod pick;
pub mod ui;
pub mod viewer;

pub use config::ViewerConfig;
pub use pick::{Pick, resolve_pick};
pub use viewer::{Panel, ViewMode, Viewer, ViewerEvent};

use scene::SceneError;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerError {
    /// Required control ids absent from the host surface.
    MissingControls(Vec<String>),
    /// Focus requested but the catalog has no supernova groups.
    NoGroups,
    Scene(SceneError),
    Config(String),
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::MissingControls(ids) => {
                write!(f, "missing required controls: {}", ids.join("/"))
            }
            ViewerError::NoGroups => write!(f, "catalog has no supernova groups"),
            ViewerError::Scene(e) => write!(f, "{e}"),
            ViewerError::Config(msg) => write!(f, "invalid viewer config: {msg}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Scene(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SceneError> for ViewerError {
    fn from(e: SceneError) -> Self {
        ViewerError::Scene(e)
    }
}
