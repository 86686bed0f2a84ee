//! Static hosting of the browser front end.

use std::net::SocketAddr;
use std::path::Path;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use viewer::assets::{FsAssetSource, SkyAssets};
use viewer::ui::{control_ids_in_html, validate_controls, OPTIONAL_CONTROLS};

/// Fails if `index.html` lacks a required control; missing textures only warn.
pub fn check_front_end(root: &Path) -> Result<(), String> {
    if !root.is_dir() {
        return Err(format!("static root is not a directory: {}", root.display()));
    }

    let index = root.join("index.html");
    match std::fs::read_to_string(&index) {
        Ok(html) => {
            let ids = control_ids_in_html(&html);
            validate_controls(ids.iter().copied())
                .map_err(|e| format!("{}: {e}", index.display()))?;
            for id in OPTIONAL_CONTROLS {
                if !ids.contains(&id) {
                    warn!(id, "optional control absent");
                }
            }
        }
        Err(err) => warn!("{}: {err}; skipping control check", index.display()),
    }

    let assets = SkyAssets::load(&FsAssetSource::new(root));
    let missing = assets.missing();
    if !missing.is_empty() {
        warn!(?missing, "front end will run without these textures");
    }
    Ok(())
}

pub fn router(root: &Path) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(ServeDir::new(root))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

pub fn run(root: &Path, host: &str, port: u16) -> Result<(), String> {
    check_front_end(root)?;
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("invalid address {host}:{port}: {e}"))?;
    let app = router(root);

    let rt = tokio::runtime::Runtime::new().map_err(|e| format!("tokio runtime: {e}"))?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| format!("bind {addr}: {e}"))?;
        info!("serving {} on http://{addr}/index.html", root.display());
        axum::serve(listener, app)
            .await
            .map_err(|e| format!("server error: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::check_front_end;

    const FULL_PAGE: &str = r#"<select id="mode"></select><select id="band"></select>
        <input id="bandBright"><select id="showLayer"></select><button id="reset"></button>
        <button id="look"></button><div id="tooltip"></div><img id="cutout"><pre id="meta"></pre>"#;

    #[test]
    fn complete_page_passes_without_assets() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("index.html"), FULL_PAGE).expect("write");
        assert_eq!(check_front_end(dir.path()), Ok(()));
    }

    #[test]
    fn missing_control_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = FULL_PAGE.replace(r#"<pre id="meta"></pre>"#, "");
        std::fs::write(dir.path().join("index.html"), page).expect("write");
        let err = check_front_end(dir.path()).err().expect("error");
        assert!(err.contains("missing required controls: meta"));
    }

    #[test]
    fn root_must_be_a_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(check_front_end(&dir.path().join("nope")).is_err());
    }
}
