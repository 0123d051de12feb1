//! HTTP Basic credential gate for `/api` routes.

use super::error::ApiError;
use super::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;

/// Rejects the request with 401 unless it carries accepted Basic credentials.
pub async fn require_basic_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let authorized = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic_credentials)
        .is_some_and(|(username, password)| state.verifier.verify(&username, &password));

    if !authorized {
        warn!(
            "event=auth_rejected module=api status=error method={} path={}",
            req.method(),
            req.uri().path()
        );
        return ApiError::Unauthorized.into_response();
    }

    next.run(req).await
}

/// Decodes `Basic <base64(user:password)>`.
///
/// The password may itself contain `:`; only the first one separates.
pub fn parse_basic_credentials(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?.trim();
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::parse_basic_credentials;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    fn header(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn parses_username_and_password() {
        assert_eq!(
            parse_basic_credentials(&header("admin:pa:ss")),
            Some(("admin".to_string(), "pa:ss".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(parse_basic_credentials("Bearer abc"), None);
        assert_eq!(parse_basic_credentials("Basic !!!"), None);
        assert_eq!(parse_basic_credentials(&header("no-colon")), None);
    }
}
