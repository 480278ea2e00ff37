//! Browser sessions, identified by a random id in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "pokeview_session";

/// Reads the session id from `jar`, or issues a new one.
///
/// The returned jar carries the `Set-Cookie` for a new id and must be part
/// of the response.
pub fn resolve(jar: CookieJar) -> (CookieJar, Uuid) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
    {
        return (jar, id);
    }

    let id = Uuid::new_v4();
    debug!(%id, "New session");
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}
