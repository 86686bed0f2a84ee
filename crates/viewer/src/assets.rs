//! Optional textures.
//!
//! A missing or unreadable asset is logged and the viewer carries on
//! without that texture; nothing here is retried.

use std::path::PathBuf;

use tracing::{debug, warn};

pub const BACKGROUND_PATH: &str = "background/sky.jpg";
pub const GALAXY_ICON_PATH: &str = "icons/galaxy.png";
pub const SUPERNOVA_ICON_PATH: &str = "icons/supernova.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    NotFound(String),
    Io { path: String, message: String },
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::NotFound(path) => write!(f, "asset not found: {path}"),
            AssetError::Io { path, message } => write!(f, "asset read failed: {path}: {message}"),
        }
    }
}

impl std::error::Error for AssetError {}

pub trait AssetSource {
    /// Raw bytes of the asset at `path`, relative to the asset root.
    fn load(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// Assets under a directory on disk.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FsAssetSource {
    fn load(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(path.to_string()),
            _ => AssetError::Io {
                path: path.to_string(),
                message: e.to_string(),
            },
        })
    }
}

/// Encoded image bytes; decoding is left to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkyAssets {
    pub background: Option<Vec<u8>>,
    pub galaxy_icon: Option<Vec<u8>>,
    pub supernova_icon: Option<Vec<u8>>,
}

fn load_optional(source: &dyn AssetSource, path: &str) -> Option<Vec<u8>> {
    match source.load(path) {
        Ok(bytes) => {
            debug!(path, bytes = bytes.len(), "asset loaded");
            Some(bytes)
        }
        Err(err) => {
            warn!("{err}; continuing without it");
            None
        }
    }
}

impl SkyAssets {
    pub fn load(source: &dyn AssetSource) -> Self {
        Self {
            background: load_optional(source, BACKGROUND_PATH),
            galaxy_icon: load_optional(source, GALAXY_ICON_PATH),
            supernova_icon: load_optional(source, SUPERNOVA_ICON_PATH),
        }
    }

    pub fn missing(&self) -> Vec<&'static str> {
        [
            (BACKGROUND_PATH, &self.background),
            (GALAXY_ICON_PATH, &self.galaxy_icon),
            (SUPERNOVA_ICON_PATH, &self.supernova_icon),
        ]
        .into_iter()
        .filter(|(_, bytes)| bytes.is_none())
        .map(|(path, _)| path)
        .collect()
    }
}
