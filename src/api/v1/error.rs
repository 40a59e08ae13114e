use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let code = if let Some(code) = err.find::<ApiErrorCode>() {
        code.clone()
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        ApiErrorCode::InvalidRequest(e.to_string())
    } else if err.find::<reject::MissingCookie>().is_some() {
        ApiErrorCode::MissingRefreshToken
    } else if err.find::<reject::InvalidHeader>().is_some() {
        ApiErrorCode::InvalidHeader
    } else if err.is_not_found() {
        ApiErrorCode::NotFound
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        ApiErrorCode::MethodNotAllowed
    } else {
        warn!("Unhandled rejection: {:?}", err);
        ApiErrorCode::InternalError
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code.code(), code.to_string()));
    Ok(warp::reply::with_status(json, code.status()))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
pub enum ApiErrorCode {
    #[error("token is malformed")]
    TokenMalformed,
    #[error("token signature is invalid")]
    TokenSignatureInvalid,
    #[error("token is expired")]
    TokenExpired,
    #[error("token is in blacklist")]
    TokenInBlackList,
    #[error("invalid refresh version")]
    InvalidRefreshVersion,
    #[error("user not found")]
    UserNotFound,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("no authorization header in request")]
    MissingAccessToken,
    #[error("no refresh cookie in request")]
    MissingRefreshToken,
    #[error("request header is not readable")]
    InvalidHeader,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::TokenMalformed => "TokenMalformed",
            ApiErrorCode::TokenSignatureInvalid => "TokenSignatureInvalid",
            ApiErrorCode::TokenExpired => "TokenExpired",
            ApiErrorCode::TokenInBlackList => "TokenInBlackList",
            ApiErrorCode::InvalidRefreshVersion => "InvalidRefreshVersion",
            ApiErrorCode::UserNotFound => "UserNotFound",
            ApiErrorCode::InvalidCredentials => "InvalidCredentials",
            ApiErrorCode::UserAlreadyExists => "UserAlreadyExists",
            ApiErrorCode::MissingAccessToken => "MissingAccessToken",
            ApiErrorCode::MissingRefreshToken => "MissingRefreshToken",
            ApiErrorCode::InvalidHeader => "InvalidHeader",
            ApiErrorCode::InvalidRequest(_) => "InvalidRequest",
            ApiErrorCode::NotFound => "NotFound",
            ApiErrorCode::MethodNotAllowed => "MethodNotAllowed",
            ApiErrorCode::InternalError => "InternalError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::UserAlreadyExists => StatusCode::CONFLICT,
            ApiErrorCode::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::TokenMalformed => ApiErrorCode::TokenMalformed,
            AuthError::TokenSignatureInvalid => ApiErrorCode::TokenSignatureInvalid,
            AuthError::TokenExpired => ApiErrorCode::TokenExpired,
            AuthError::TokenInBlackList => ApiErrorCode::TokenInBlackList,
            AuthError::InvalidRefreshVersion => ApiErrorCode::InvalidRefreshVersion,
            AuthError::UserNotFound => ApiErrorCode::UserNotFound,
            AuthError::Internal(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<UserError> for ApiErrorCode {
    fn from(error: UserError) -> Self {
        match error {
            UserError::InvalidCredentials => ApiErrorCode::InvalidCredentials,
            UserError::UserAlreadyExists => ApiErrorCode::UserAlreadyExists,
            UserError::UserNotFound => ApiErrorCode::UserNotFound,
            UserError::Validation(msg) => ApiErrorCode::InvalidRequest(msg),
            UserError::Internal(e) => ApiErrorCode::internal(e),
        }
    }
}
