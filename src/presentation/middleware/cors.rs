use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer from a comma separated origin list.
///
/// An empty list or `*` allows any origin.
pub fn cors_layer(allowed_origins: Option<&str>) -> anyhow::Result<CorsLayer> {
    let allowed_origins = allowed_origins.unwrap_or("").trim();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.is_empty() || allowed_origins == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(|s| s.trim().parse())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    Ok(layer.allow_origin(origins))
}
