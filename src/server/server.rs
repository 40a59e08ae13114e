use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use anyhow::{Context, anyhow};
use sqlx::{MySql, Pool};
use std::sync::Arc;
use std::time::Duration;

/// How the refresh token travels between client and server.
#[derive(Debug, Clone)]
pub struct RefreshCookie {
    pub name: &'static str,
    pub path: String,
    pub max_age: Duration,
}

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub refresh_cookie: RefreshCookie,
    pool: Option<Pool<MySql>>,
}

fn secret_from_env(var: &str, configured: &str) -> anyhow::Result<Vec<u8>> {
    let secret = std::env::var(var).unwrap_or_else(|_| configured.to_string());
    if secret.is_empty() {
        return Err(anyhow!("{} is empty and not set in settings", var));
    }
    Ok(secret.into_bytes())
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let access = &settings.auth.access;
        let refresh = &settings.auth.refresh;
        let access_ttl = Duration::from_secs(access.ttl_secs);
        let refresh_ttl = Duration::from_secs(refresh.ttl_secs);

        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(JwtConfig {
            access_secret: secret_from_env("ACCESS_TOKEN_SECRET", &access.secret)?,
            access_ttl,
            refresh_secret: secret_from_env("REFRESH_TOKEN_SECRET", &refresh.secret)?,
            refresh_ttl,
        }));
        let auth_config = AuthConfig {
            access: AccessTokenConfig {
                ttl: access_ttl,
                blacklist_enabled: access.blacklist_enabled,
                ban_key_prefix: access.ban_key_prefix.clone(),
            },
            refresh: RefreshTokenConfig {
                ttl: refresh_ttl,
                ban_key_prefix: refresh.ban_key_prefix.clone(),
            },
        };

        let (user_repo, version_repo, blacklist_store, pool): (
            Arc<dyn UserRepo>,
            Arc<dyn RefreshVersionRepo>,
            Arc<dyn TokenBlacklistStore>,
            Option<Pool<MySql>>,
        ) = match settings.store.backend.as_str() {
            "memory" => {
                let users = Arc::new(MemoryUserRepo::new());
                let user_repo: Arc<dyn UserRepo> = users.clone();
                let version_repo: Arc<dyn RefreshVersionRepo> = users;
                let blacklist_store: Arc<dyn TokenBlacklistStore> =
                    Arc::new(MemoryTokenBlacklistStore::new());
                (user_repo, version_repo, blacklist_store, None)
            }
            "real" => {
                let mysql_dsn = settings
                    .store
                    .mysql_dsn
                    .as_deref()
                    .context("store.mysql_dsn is required for the real backend")?;
                let redis_dsn = settings
                    .store
                    .redis_dsn
                    .as_deref()
                    .context("store.redis_dsn is required for the real backend")?;

                let redis_client = redis::Client::open(redis_dsn)?;
                let redis_manager = redis_client.get_connection_manager().await?;
                let pool = Pool::<MySql>::connect(mysql_dsn).await?;

                let users = Arc::new(MySqlUserRepo::new(pool.clone()));
                let user_repo: Arc<dyn UserRepo> = users.clone();
                let version_repo: Arc<dyn RefreshVersionRepo> = users;
                let blacklist_store: Arc<dyn TokenBlacklistStore> =
                    Arc::new(RedisTokenBlacklistStore::new(redis_manager));
                (user_repo, version_repo, blacklist_store, Some(pool))
            }
            other => return Err(anyhow!("Unknown store backend: {}", other)),
        };

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            token_codec,
            version_repo,
            blacklist_store,
            auth_config,
        ));
        let user_service: Arc<dyn UserService> = Arc::new(RealUserService::new(
            user_repo,
            Arc::new(Argon2PasswordHasher),
        ));

        info!(backend = %settings.store.backend, "server started");

        Ok(Self {
            auth_service,
            user_service,
            refresh_cookie: RefreshCookie {
                // warp's cookie filter takes a static name; one leak per server.
                name: Box::leak(refresh.cookie_name.clone().into_boxed_str()),
                path: settings.auth.cookie_path.clone(),
                max_age: refresh_ttl,
            },
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
