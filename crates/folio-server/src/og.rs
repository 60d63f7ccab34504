//! On-demand preview images.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::IF_NONE_MATCH;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use folio_content::{ContentStore, Writing};
use folio_og::{etag_matches, not_modified, png_response, OgError, OgGenerator};
use folio_static::og_target;

/// State for the image route.
pub struct OgState {
    pub content_dir: PathBuf,
    pub generator: OgGenerator,
}

/// `GET /og/{*path}`: render the image for a published writing entry.
///
/// Content is re-read per request so edits show up without a restart. A
/// matching `If-None-Match` is answered before anything is rasterized.
pub async fn og_handler(
    State(state): State<Arc<OgState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(slug) = path.strip_suffix(".png") else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let store = match ContentStore::load(&state.content_dir) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to load content: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(entry) = store
        .get_entry::<Writing>(slug)
        .filter(|entry| !entry.data.draft)
    else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let target = og_target(entry);

    let prepared = match state.generator.prepare(&target).await {
        Ok(prepared) => prepared,
        Err(e) => return generation_failed(slug, e),
    };

    let fresh = headers
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| etag_matches(value, &prepared.etag));
    if fresh {
        return not_modified(&prepared.etag).map(Body::from).into_response();
    }

    match state.generator.render(prepared).await {
        Ok(image) => png_response(image.png, Some(&image.etag))
            .map(Body::from)
            .into_response(),
        Err(e) => generation_failed(slug, e),
    }
}

fn generation_failed(slug: &str, e: OgError) -> Response {
    tracing::error!("Failed to generate OG image for {}: {}", slug, e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate image").into_response()
}
