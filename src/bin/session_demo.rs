use pcclub::application_impl::*;
use pcclub::application_port::*;
use pcclub::domain_model::UserId;
use pcclub::domain_port::UserRecord;
use pcclub::infra_memory::*;
use pcclub::logger::*;
use std::sync::Arc;
use std::time::Duration;

async fn run(access_blacklist: bool) -> anyhow::Result<()> {
    let users = Arc::new(MemoryUserRepo::new());
    users.insert(UserRecord {
        user_id: UserId(42),
        email: "demo@pc.club".to_string(),
        password_hash: String::new(),
        refresh_token_version: 0,
    });

    let codec = Arc::new(JwtHs256Codec::new(JwtConfig {
        access_secret: b"demo-access-secret".to_vec(),
        access_ttl: Duration::from_secs(900),
        refresh_secret: b"demo-refresh-secret".to_vec(),
        refresh_ttl: Duration::from_secs(3600),
    }));
    let auth = RealAuthService::new(
        codec.clone(),
        users.clone(),
        Arc::new(MemoryTokenBlacklistStore::new()),
        AuthConfig {
            access: AccessTokenConfig {
                ttl: Duration::from_secs(900),
                blacklist_enabled: access_blacklist,
                ban_key_prefix: "blacklist:access".to_string(),
            },
            refresh: RefreshTokenConfig {
                ttl: Duration::from_secs(3600),
                ban_key_prefix: "blacklist:refresh".to_string(),
            },
        },
    );

    info!(access_blacklist, "--- scenario ---");

    let first = auth.tokens(UserId(42)).await?;
    let claims = codec.parse_refresh_token(&first.refresh_token.0)?;
    info!(version = claims.version, "login issued first pair");

    let second = auth.refresh(&first.refresh_token.0).await?;
    let claims = codec.parse_refresh_token(&second.refresh_token.0)?;
    info!(version = claims.version, "refresh rotated the pair");

    let uid = auth
        .ban_tokens(&second.access_token.0, &second.refresh_token.0)
        .await?;
    info!(%uid, "logout banned both tokens");

    match auth.refresh(&second.refresh_token.0).await {
        Ok(_) => warn!("banned refresh token was accepted"),
        Err(e) => info!(code = e.code(), "refresh after logout rejected"),
    }
    match auth.access(&second.access_token.0).await {
        Ok(uid) => info!(%uid, "access after logout still valid"),
        Err(e) => info!(code = e.code(), "access after logout rejected"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    logger.reload_from_config(&LogConfig {
        filter: "debug".to_string(),
    })?;

    run(true).await?;
    run(false).await?;

    Ok(())
}
