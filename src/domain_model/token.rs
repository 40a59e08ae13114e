use super::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independently signed and independently banned token families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Access,
    Refresh,
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenClass::Access => write!(f, "access"),
            TokenClass::Refresh => write!(f, "refresh"),
        }
    }
}

/// Payload of an access token. `exp` is in unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub uid: UserId,
    pub exp: i64,
}

/// Payload of a refresh token. `version` pins the token to one value of the
/// user's refresh version counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub uid: UserId,
    pub version: i64,
    pub exp: i64,
}
