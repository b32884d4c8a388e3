use crate::utils::static_assets::StaticAssets;
use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
};
use log::{debug, warn};

// The settings page is one embedded document
pub async fn index_handler() -> Result<Html<String>, StatusCode> {
    let index_html = match StaticAssets::get("index.html") {
        Some(content) => content,
        None => {
            warn!("index.html missing from embedded assets");
            return Err(StatusCode::NOT_FOUND);
        }
    };

    match String::from_utf8(index_html.data.into_owned()) {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            warn!("index.html is not valid UTF-8: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// Serve the supporting files (stylesheet, script) from the embedded bundle
pub async fn static_assets_handler(Path(path): Path<String>) -> impl IntoResponse {
    let full_path = format!("static/{}", path);

    debug!("Serving static asset: {}", full_path);

    match StaticAssets::get(&full_path) {
        Some(content) => {
            let content_type = mime_guess::from_path(&full_path)
                .first_or_octet_stream()
                .to_string();

            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type)],
                content.data,
            )
                .into_response()
        }
        None => {
            warn!("Static asset not found: {}", full_path);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
