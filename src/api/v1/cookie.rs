use crate::server::RefreshCookie;

pub fn set_refresh_cookie(cookie: &RefreshCookie, token: &str) -> String {
    format!(
        "{}={}; Path={}; Max-Age={}; HttpOnly; Secure; SameSite=Strict",
        cookie.name,
        token,
        cookie.path,
        cookie.max_age.as_secs()
    )
}

pub fn clear_refresh_cookie(cookie: &RefreshCookie) -> String {
    format!(
        "{}=; Path={}; Max-Age=0; HttpOnly; Secure; SameSite=Strict",
        cookie.name, cookie.path
    )
}
