//! Image-cutout request URLs (HiPS2FITS).
//!
//! The viewer only builds the URL; the host assigns it to an image element.
//! A failed fetch leaves that element blank and is never retried.

use catalog::RaDec;
use serde::Deserialize;
use url::Url;

use crate::ViewerError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CutoutParams {
    pub base_url: String,
    /// HiPS survey identifier.
    pub hips: String,
    pub fov_deg: f64,
    pub width_px: u32,
    pub height_px: u32,
    pub format: String,
}

impl Default for CutoutParams {
    fn default() -> Self {
        Self {
            base_url: "https://alasky.cds.unistra.fr/hips-image-services/hips2fits".to_string(),
            hips: "CDS/P/PanSTARRS/DR1/color-z-zg-g".to_string(),
            fov_deg: 0.03,
            width_px: 750,
            height_px: 750,
            format: "jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CutoutRequest {
    base: Url,
    params: CutoutParams,
}

impl CutoutRequest {
    pub fn new(params: CutoutParams) -> Result<Self, ViewerError> {
        let base = Url::parse(&params.base_url)
            .map_err(|e| ViewerError::Config(format!("cutout base url: {e}")))?;
        Ok(Self { base, params })
    }

    /// Image centred on `pos`.
    pub fn url_for(&self, pos: RaDec) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("hips", &self.params.hips)
            .append_pair("ra", &pos.ra_deg.to_string())
            .append_pair("dec", &pos.dec_deg.to_string())
            .append_pair("fov", &self.params.fov_deg.to_string())
            .append_pair("width", &self.params.width_px.to_string())
            .append_pair("height", &self.params.height_px.to_string())
            .append_pair("format", &self.params.format);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::{CutoutParams, CutoutRequest};
    use catalog::RaDec;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_request_matches_the_survey_service() {
        let req = CutoutRequest::new(CutoutParams::default()).expect("request");
        let url = req.url_for(RaDec::new(150.25, -2.5));
        assert_eq!(
            url.as_str(),
            "https://alasky.cds.unistra.fr/hips-image-services/hips2fits\
             ?hips=CDS%2FP%2FPanSTARRS%2FDR1%2Fcolor-z-zg-g\
             &ra=150.25&dec=-2.5&fov=0.03&width=750&height=750&format=jpg"
        );
    }

    #[test]
    fn base_query_is_replaced_not_extended() {
        let req = CutoutRequest::new(CutoutParams {
            base_url: "http://localhost:9000/cutout?stale=1".to_string(),
            ..CutoutParams::default()
        })
        .expect("request");
        let url = req.url_for(RaDec::new(1.0, 2.0));
        assert!(!url.as_str().contains("stale"));
        assert_eq!(url.query_pairs().count(), 7);
    }

    #[test]
    fn invalid_base_is_a_config_error() {
        let bad = CutoutParams {
            base_url: "::".to_string(),
            ..CutoutParams::default()
        };
        assert!(CutoutRequest::new(bad).is_err());
    }
}
