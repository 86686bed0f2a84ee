//! Host control surface.
//!
//! The viewer cannot run without these controls, so they are checked once at
//! startup and any absence is fatal.

use std::collections::BTreeSet;

use crate::ViewerError;

pub const REQUIRED_CONTROLS: [&str; 9] = [
    "mode",
    "band",
    "bandBright",
    "showLayer",
    "reset",
    "look",
    "tooltip",
    "cutout",
    "meta",
];

/// The supernova list is optional; without it the list is simply not built.
pub const OPTIONAL_CONTROLS: [&str; 1] = ["snlist"];

/// Fails with every missing id, in [`REQUIRED_CONTROLS`] order.
pub fn validate_controls<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<(), ViewerError> {
    let present: BTreeSet<&str> = present.into_iter().collect();
    let missing: Vec<String> = REQUIRED_CONTROLS
        .iter()
        .filter(|id| !present.contains(*id))
        .map(|id| id.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ViewerError::MissingControls(missing))
    }
}

/// Scans an HTML document for `id="..."` attributes.
///
/// `id=` only counts at an attribute boundary, so `data-id="x"` and
/// `grid="x"` are not ids.
pub fn control_ids_in_html(html: &str) -> Vec<&str> {
    let mut ids = Vec::new();
    let mut rest = html;
    while let Some(pos) = rest.find("id=") {
        let at_boundary = rest[..pos]
            .bytes()
            .next_back()
            .is_some_and(|b| b.is_ascii_whitespace());
        rest = &rest[pos + 3..];
        if !at_boundary {
            continue;
        }
        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let body = &rest[1..];
        let Some(end) = body.find(quote) else {
            break;
        };
        ids.push(&body[..end]);
        rest = &body[end + 1..];
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::{REQUIRED_CONTROLS, control_ids_in_html, validate_controls};
    use crate::ViewerError;
    use pretty_assertions::assert_eq;

    #[test]
    fn all_required_present_is_ok() {
        assert_eq!(validate_controls(REQUIRED_CONTROLS), Ok(()));
    }

    #[test]
    fn reports_every_missing_id() {
        let present = ["mode", "band", "reset", "look", "tooltip", "meta", "snlist"];
        assert_eq!(
            validate_controls(present),
            Err(ViewerError::MissingControls(vec![
                "bandBright".to_string(),
                "showLayer".to_string(),
                "cutout".to_string(),
            ]))
        );
    }

    #[test]
    fn html_scan_finds_quoted_ids() {
        let html = r#"<select id="mode"></select><input id='bandBright' type="range">
            <div data-x=1 grid=2></div><img id="cutout"><p id=unquoted></p>"#;
        assert_eq!(control_ids_in_html(html), vec!["mode", "bandBright", "cutout"]);
    }

    #[test]
    fn prefixed_id_attributes_do_not_count() {
        let html = r#"<select id="mode"></select><pre data-id="meta"></pre>
            <div userid="band"></div><p class="x" id="look"></p>"#;
        assert_eq!(control_ids_in_html(html), vec!["mode", "look"]);

        let page = r#"<select id="mode"></select><select id="band"></select>
            <input id="bandBright"><select id="showLayer"></select><button id="reset"></button>
            <button id="look"></button><div id="tooltip"></div><img id="cutout"><pre data-id="meta"></pre>"#;
        assert_eq!(
            validate_controls(control_ids_in_html(page)),
            Err(ViewerError::MissingControls(vec!["meta".to_string()]))
        );
    }
}
