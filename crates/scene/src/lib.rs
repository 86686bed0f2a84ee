//! Spatial side of the sky viewer: projection of catalog records, the Sky
//! and Focus scene builders, camera rays and picking, and the draw list.

pub mod bouquet;
pub mod build;
pub mod camera;
pub mod draw;
pub mod layers;
pub mod picking;
pub mod projection;

pub use build::*;
pub use camera::*;
pub use layers::*;

use catalog::GroupId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    UnknownGroup(GroupId),
    /// The group's anchor record has no coordinates, so nothing can be
    /// placed relative to it.
    AnchorWithoutPosition(GroupId),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::UnknownGroup(id) => write!(f, "unknown supernova group: {id}"),
            SceneError::AnchorWithoutPosition(id) => {
                write!(f, "anchor of supernova group {id} has no coordinates")
            }
        }
    }
}

impl std::error::Error for SceneError {}
