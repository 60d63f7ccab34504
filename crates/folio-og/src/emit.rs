//! HTTP responses for generated images.

use http::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG};
use http::{HeaderValue, Response, StatusCode};
use sha2::{Digest, Sha256};

/// Media type of every generated image.
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// One year, immutable. URLs are keyed by slug, so content never changes in place.
pub const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";

/// Strong entity tag over the inputs that determine an image.
pub fn entity_tag<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    format!("\"{}\"", hex::encode(&hasher.finalize()[..16]))
}

/// Whether an `If-None-Match` header value matches `etag`.
pub fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    let bare = etag.trim_start_matches("W/");
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.trim_start_matches("W/") == bare
    })
}

/// `200 OK` with the PNG body and long-lived cache headers.
pub fn png_response(png: Vec<u8>, etag: Option<&str>) -> Response<Vec<u8>> {
    let mut response = Response::new(png);
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(PNG_MEDIA_TYPE));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE_CACHE));
    if let Some(value) = etag.and_then(|t| HeaderValue::from_str(t).ok()) {
        headers.insert(ETAG, value);
    }
    response
}

/// `304 Not Modified` for a matching conditional request.
pub fn not_modified(etag: &str) -> Response<Vec<u8>> {
    let mut response = Response::new(Vec::new());
    *response.status_mut() = StatusCode::NOT_MODIFIED;
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE_CACHE));
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert(ETAG, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_response_carries_cache_headers() {
        let response = png_response(vec![1, 2, 3], Some("\"abc\""));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
        assert_eq!(
            response.headers()[CACHE_CONTROL],
            "public, max-age=31536000, immutable"
        );
        assert_eq!(response.headers()[ETAG], "\"abc\"");
        assert_eq!(response.body(), &vec![1, 2, 3]);
    }

    #[test]
    fn entity_tag_is_stable_and_input_sensitive() {
        let a = entity_tag([b"title".as_slice(), b"body".as_slice()]);
        let b = entity_tag([b"title".as_slice(), b"body".as_slice()]);
        let c = entity_tag([b"titleb".as_slice(), b"ody".as_slice()]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with('"') && a.ends_with('"'));
    }

    #[test]
    fn matches_conditional_headers() {
        assert!(etag_matches("\"abc\"", "\"abc\""));
        assert!(etag_matches("\"x\", W/\"abc\"", "\"abc\""));
        assert!(etag_matches("*", "\"abc\""));
        assert!(!etag_matches("\"abd\"", "\"abc\""));
    }

    #[test]
    fn not_modified_has_empty_body() {
        let response = not_modified("\"abc\"");

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(response.body().is_empty());
    }
}
