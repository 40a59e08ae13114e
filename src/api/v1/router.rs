use super::error::*;
use super::handler;
use crate::application_port::AuthService;
use crate::domain_model::UserId;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::HeaderMap;
use warp::http::header::AUTHORIZATION;
use warp::{Filter, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let cookie = Arc::new(server.refresh_cookie.clone());

    let register = warp::post()
        .and(warp::path("register"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.user_service.clone()))
        .and(with(server.auth_service.clone()))
        .and(with(cookie.clone()))
        .and_then(handler::register);

    let login = warp::post()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.user_service.clone()))
        .and(with(server.auth_service.clone()))
        .and(with(cookie.clone()))
        .and_then(handler::login);

    let refresh = warp::post()
        .and(warp::path("refresh"))
        .and(warp::path::end())
        .and(with_refresh_token(cookie.name))
        .and(with(server.auth_service.clone()))
        .and(with(cookie.clone()))
        .and_then(handler::refresh);

    let logout = warp::post()
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(with_access_token())
        .and(with_refresh_token(cookie.name))
        .and(with(server.auth_service.clone()))
        .and(with(cookie))
        .and_then(handler::logout);

    let user = warp::post()
        .and(warp::path("user"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::user);

    register.or(login).or(refresh).or(logout).or(user)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_access_token() -> impl Filter<Extract = (String,), Error = warp::Rejection> + Clone {
    warp::header::headers_cloned().and_then(|headers: HeaderMap| async move {
        // Non-ASCII header bytes read as an absent token.
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| reject::custom(ApiErrorCode::MissingAccessToken))
    })
}

fn with_refresh_token(
    cookie_name: &'static str,
) -> impl Filter<Extract = (String,), Error = warp::Rejection> + Clone {
    warp::cookie::optional(cookie_name).and_then(|token: Option<String>| async move {
        token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| reject::custom(ApiErrorCode::MissingRefreshToken))
    })
}

fn with_verification(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    with_access_token().and_then(move |token: String| {
        let auth_service = auth_service.clone();
        async move {
            auth_service
                .access(&token)
                .await
                .map_err(ApiErrorCode::from)
                .map_err(reject::custom)
        }
    })
}
