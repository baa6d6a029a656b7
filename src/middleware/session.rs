use axum::{
    extract::Request,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Cookie carrying the browser session ID
pub const SESSION_COOKIE: &str = "movie_recs_session";

/// Identifies one browser session's navigation state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reads the session cookie; malformed values are ignored
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == SESSION_COOKIE).then_some(value)
            })
            .find_map(|value| Uuid::parse_str(value).ok())
            .map(SessionId)
    }

    fn set_cookie_header(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, self.0
        ))
        .ok()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attaches a `SessionId` to every request, issuing a cookie for new sessions
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let existing = SessionId::from_headers(request.headers());
    let session_id = existing.unwrap_or_default();
    request.extensions_mut().insert(session_id);

    let mut response = next.run(request).await;

    if existing.is_none() {
        tracing::debug!(session_id = %session_id, "New session");
        if let Some(cookie) = session_id.set_cookie_header() {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_reads_session_cookie_among_others() {
        let id = Uuid::new_v4();
        let headers = headers(&format!("theme=dark; {}={}; other=1", SESSION_COOKIE, id));
        assert_eq!(SessionId::from_headers(&headers), Some(SessionId(id)));
    }

    #[test]
    fn test_ignores_malformed_cookie() {
        let headers = headers(&format!("{}=garbage", SESSION_COOKIE));
        assert_eq!(SessionId::from_headers(&headers), None);
    }

    #[test]
    fn test_missing_cookie() {
        assert_eq!(SessionId::from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_set_cookie_header_format() {
        let id = SessionId(Uuid::nil());
        let header = id.set_cookie_header().unwrap();
        assert_eq!(
            header.to_str().unwrap(),
            "movie_recs_session=00000000-0000-0000-0000-000000000000; Path=/; HttpOnly; SameSite=Lax"
        );
    }
}
