use super::cookie::*;
use super::error::*;
use crate::application_port::*;
use crate::domain_model::UserId;
use crate::server::RefreshCookie;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use warp::http::header::SET_COOKIE;
use warp::reply::{Json, WithHeader};
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: &'static str, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// Access token in the body, refresh token in the cookie.
fn token_reply(tokens: AuthTokens, cookie: &RefreshCookie) -> WithHeader<Json> {
    let set_cookie = set_refresh_cookie(cookie, &tokens.refresh_token.0);
    let body = warp::reply::json(&ApiResponse::ok(AccessTokenResponse {
        access_token: tokens.access_token.0,
    }));
    warp::reply::with_header(body, SET_COOKIE, set_cookie)
}

#[instrument(name = "register", skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn register(
    body: CredentialsRequest,
    user_service: Arc<dyn UserService>,
    auth_service: Arc<dyn AuthService>,
    cookie: Arc<RefreshCookie>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user_id = user_service
        .register(&body.email, &body.password)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let tokens = auth_service
        .tokens(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(token_reply(tokens, &cookie))
}

#[instrument(name = "login", skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn login(
    body: CredentialsRequest,
    user_service: Arc<dyn UserService>,
    auth_service: Arc<dyn AuthService>,
    cookie: Arc<RefreshCookie>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user_id = user_service
        .login(&body.email, &body.password)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let tokens = auth_service
        .tokens(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(token_reply(tokens, &cookie))
}

#[instrument(name = "refresh", skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn refresh(
    refresh_token: String,
    auth_service: Arc<dyn AuthService>,
    cookie: Arc<RefreshCookie>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let tokens = auth_service
        .refresh(&refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(token_reply(tokens, &cookie))
}

#[instrument(name = "logout", skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn logout(
    access_token: String,
    refresh_token: String,
    auth_service: Arc<dyn AuthService>,
    cookie: Arc<RefreshCookie>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .ban_tokens(&access_token, &refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let body = warp::reply::json(&ApiResponse::ok("logout success"));
    Ok(warp::reply::with_header(
        body,
        SET_COOKIE,
        clear_refresh_cookie(&cookie),
    ))
}

#[instrument(name = "user", skip_all, fields(request_id = %uuid::Uuid::new_v4(), user_id = %user_id))]
pub async fn user(
    user_id: UserId,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = user_service
        .user(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(user)))
}
