use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header::ORIGIN},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{
    errors::HttpError,
    state::{HttpState, TOKEN_HEADER},
};

pub async fn require_token(
    State(state): State<HttpState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    if let Some(origin) = req.headers().get(ORIGIN) {
        let origin = origin.to_str().map_err(|_| {
            HttpError::new(
                StatusCode::BAD_REQUEST,
                "invalid Origin header",
                Some("invalid_origin".to_string()),
            )
        })?;
        if !is_loopback_origin(origin) {
            return Err(HttpError::new(
                StatusCode::FORBIDDEN,
                "invalid origin",
                Some("invalid_origin".to_string()),
            ));
        }
    }

    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    if token != Some(state.token.as_str()) {
        warn!(path = %req.uri().path(), "rejected request without a valid API token");
        return Err(HttpError::new(
            StatusCode::UNAUTHORIZED,
            "missing or invalid API token",
            Some("token_invalid".to_string()),
        ));
    }

    Ok(next.run(req).await)
}

fn is_loopback_origin(origin: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        origin
            .strip_prefix(scheme)
            .is_some_and(|host| {
                host.starts_with("127.0.0.1:")
                    || host.starts_with("localhost:")
                    || host.starts_with("[::1]:")
            })
    })
}

#[cfg(test)]
mod tests {
    use super::is_loopback_origin;

    #[test]
    fn loopback_origins_are_accepted() {
        assert!(is_loopback_origin("http://127.0.0.1:3846"));
        assert!(is_loopback_origin("https://localhost:8080"));
        assert!(is_loopback_origin("http://[::1]:1"));
        assert!(!is_loopback_origin("http://example.com"));
        assert!(!is_loopback_origin("http://localhost.evil.com:80"));
    }
}
