/// Which object classes are shown. Orthogonal to the view mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LayerVisibility {
    Supernovae,
    Galaxies,
    #[default]
    Both,
}

impl LayerVisibility {
    pub fn shows_galaxies(self) -> bool {
        matches!(self, LayerVisibility::Galaxies | LayerVisibility::Both)
    }

    pub fn shows_supernovae(self) -> bool {
        matches!(self, LayerVisibility::Supernovae | LayerVisibility::Both)
    }

    /// Supernova-to-host links need both ends on screen.
    pub fn shows_links(self) -> bool {
        self == LayerVisibility::Both
    }
}

impl std::str::FromStr for LayerVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sn" => Ok(LayerVisibility::Supernovae),
            "gal" => Ok(LayerVisibility::Galaxies),
            "both" | "" => Ok(LayerVisibility::Both),
            other => Err(format!("unknown layer selection: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LayerVisibility;

    #[test]
    fn selector_values() {
        assert_eq!("sn".parse(), Ok(LayerVisibility::Supernovae));
        assert_eq!("gal".parse(), Ok(LayerVisibility::Galaxies));
        assert_eq!("".parse(), Ok(LayerVisibility::Both));
        assert!("stars".parse::<LayerVisibility>().is_err());
    }

    #[test]
    fn links_need_both_layers() {
        assert!(LayerVisibility::Both.shows_links());
        assert!(!LayerVisibility::Galaxies.shows_links());
        assert!(!LayerVisibility::Supernovae.shows_galaxies());
        assert!(LayerVisibility::Supernovae.shows_supernovae());
    }
}
