use crate::application_port::*;
use crate::domain_model::*;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_secret: Vec<u8>,
    pub refresh_ttl: Duration,
}

fn expires_at(ttl: Duration) -> Result<i64, AuthError> {
    i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|secs| Utc::now().timestamp().checked_add(secs))
        .ok_or_else(|| AuthError::Internal(format!("token ttl out of range: {}s", ttl.as_secs())))
}

fn sign<C: Serialize>(claims: &C, secret: &[u8]) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::Internal(e.to_string()))
}

fn token_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::InvalidSignature => AuthError::TokenSignatureInvalid,
        ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => AuthError::TokenExpired,
        _ => AuthError::TokenMalformed,
    }
}

pub fn new_access_token(uid: UserId, secret: &[u8], ttl: Duration) -> Result<String, AuthError> {
    let claims = AccessClaims {
        uid,
        exp: expires_at(ttl)?,
    };
    sign(&claims, secret)
}

pub fn new_refresh_token(
    uid: UserId,
    version: i64,
    secret: &[u8],
    ttl: Duration,
) -> Result<String, AuthError> {
    let claims = RefreshClaims {
        uid,
        version,
        exp: expires_at(ttl)?,
    };
    sign(&claims, secret)
}

/// Checks the HS256 signature first, then `exp` with no leeway.
pub fn parse_token<C: DeserializeOwned>(token: &str, secret: &[u8]) -> Result<C, AuthError> {
    let mut v = Validation::new(Algorithm::HS256);
    v.validate_exp = true;
    v.leeway = 0;
    let data = decode::<C>(token, &DecodingKey::from_secret(secret), &v).map_err(token_error)?;
    Ok(data.claims)
}

pub struct JwtHs256Codec {
    cfg: JwtConfig,
}

impl JwtHs256Codec {
    pub fn new(cfg: JwtConfig) -> Self {
        JwtHs256Codec { cfg }
    }
}

impl TokenCodec for JwtHs256Codec {
    fn issue_access_token(&self, user: UserId) -> Result<AccessToken, AuthError> {
        let token = new_access_token(user, &self.cfg.access_secret, self.cfg.access_ttl)?;
        Ok(AccessToken(token))
    }

    fn issue_refresh_token(&self, user: UserId, version: i64) -> Result<RefreshToken, AuthError> {
        let token = new_refresh_token(
            user,
            version,
            &self.cfg.refresh_secret,
            self.cfg.refresh_ttl,
        )?;
        Ok(RefreshToken(token))
    }

    fn parse_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        parse_token(token, &self.cfg.access_secret)
    }

    fn parse_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        parse_token(token, &self.cfg.refresh_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"access-secret";
    const OTHER_SECRET: &[u8] = b"some-other-secret";

    fn codec() -> JwtHs256Codec {
        JwtHs256Codec::new(JwtConfig {
            access_secret: b"access-secret".to_vec(),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_secret: b"refresh-secret".to_vec(),
            refresh_ttl: Duration::from_secs(30 * 24 * 60 * 60),
        })
    }

    fn parts(token: &str) -> Vec<String> {
        token.split('.').map(str::to_string).collect()
    }

    #[test]
    fn access_token_carries_uid_and_expiry() {
        let before = Utc::now().timestamp();
        let token = new_access_token(UserId(7), SECRET, Duration::from_secs(60)).unwrap();
        assert_eq!(parts(&token).len(), 3);

        let claims: AccessClaims = parse_token(&token, SECRET).unwrap();
        assert_eq!(claims.uid, UserId(7));
        assert!(claims.exp >= before + 60);
        assert!(claims.exp <= Utc::now().timestamp() + 60);
    }

    #[test]
    fn refresh_token_carries_version() {
        let c = codec();
        let token = c.issue_refresh_token(UserId(42), 3).unwrap();
        let claims = c.parse_refresh_token(&token.0).unwrap();
        assert_eq!(claims.uid, UserId(42));
        assert_eq!(claims.version, 3);
    }

    #[test]
    fn swapped_signature_is_rejected() {
        let token = new_access_token(UserId(1), SECRET, Duration::from_secs(60)).unwrap();
        let other = new_access_token(UserId(2), SECRET, Duration::from_secs(60)).unwrap();
        let (a, b) = (parts(&token), parts(&other));

        let forged = format!("{}.{}.{}", a[0], a[1], b[2]);
        assert_eq!(
            parse_token::<AccessClaims>(&forged, SECRET),
            Err(AuthError::TokenSignatureInvalid)
        );
    }

    #[test]
    fn tampered_payload_is_rejected_whatever_it_claims() {
        let token = new_access_token(UserId(1), SECRET, Duration::from_secs(60)).unwrap();
        // Same uid, different expiry: still a signature failure.
        let other = new_access_token(UserId(1), SECRET, Duration::from_secs(3600)).unwrap();
        let (a, b) = (parts(&token), parts(&other));

        let forged = format!("{}.{}.{}", a[0], b[1], a[2]);
        assert_eq!(
            parse_token::<AccessClaims>(&forged, SECRET),
            Err(AuthError::TokenSignatureInvalid)
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = new_access_token(UserId(1), OTHER_SECRET, Duration::from_secs(60)).unwrap();
        assert_eq!(
            parse_token::<AccessClaims>(&token, SECRET),
            Err(AuthError::TokenSignatureInvalid)
        );
    }

    #[test]
    fn refresh_token_does_not_verify_as_access_token() {
        let c = codec();
        let refresh = c.issue_refresh_token(UserId(1), 1).unwrap();
        assert_eq!(
            c.parse_access_token(&refresh.0),
            Err(AuthError::TokenSignatureInvalid)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = AccessClaims {
            uid: UserId(1),
            exp: Utc::now().timestamp() - 5,
        };
        let token = sign(&claims, SECRET).unwrap();
        assert_eq!(
            parse_token::<AccessClaims>(&token, SECRET),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn expired_refresh_token_is_rejected() {
        let claims = RefreshClaims {
            uid: UserId(1),
            version: 1,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = sign(&claims, b"refresh-secret").unwrap();
        assert_eq!(
            codec().parse_refresh_token(&token),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        for input in ["", "not-a-token", "a.b", "a.b.c", "....."] {
            assert_eq!(
                parse_token::<AccessClaims>(input, SECRET),
                Err(AuthError::TokenMalformed),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn out_of_range_ttl_is_an_error() {
        for secs in [u64::MAX, i64::MAX as u64] {
            let ttl = Duration::from_secs(secs);
            assert!(matches!(
                new_access_token(UserId(1), SECRET, ttl),
                Err(AuthError::Internal(_))
            ));
            assert!(matches!(
                new_refresh_token(UserId(1), 1, SECRET, ttl),
                Err(AuthError::Internal(_))
            ));
        }
    }

    #[test]
    fn access_token_lacks_refresh_claims() {
        let token = new_access_token(UserId(1), SECRET, Duration::from_secs(60)).unwrap();
        assert_eq!(
            parse_token::<RefreshClaims>(&token, SECRET),
            Err(AuthError::TokenMalformed)
        );
    }
}
