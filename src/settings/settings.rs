use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub http: Http,
    pub log: Log,
    pub store: Store,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub cookie_path: String,
    pub access: AccessToken,
    pub refresh: RefreshToken,
}

#[derive(Deserialize)]
pub struct AccessToken {
    pub secret: String,
    pub ttl_secs: u64,
    pub blacklist_enabled: bool,
    pub ban_key_prefix: String,
}

#[derive(Deserialize)]
pub struct RefreshToken {
    pub secret: String,
    pub ttl_secs: u64,
    pub ban_key_prefix: String,
    pub cookie_name: String,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "real"
    pub mysql_dsn: Option<String>,
    pub redis_dsn: Option<String>,
}

// Secrets stay out of `{:?}` output.
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .field("blacklist_enabled", &self.blacklist_enabled)
            .field("ban_key_prefix", &self.ban_key_prefix)
            .finish()
    }
}

impl std::fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshToken")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .field("ban_key_prefix", &self.ban_key_prefix)
            .field("cookie_name", &self.cookie_name)
            .finish()
    }
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;
    check_ttls(&settings)?;

    Ok(settings)
}

// Token `exp` is an i64 unix timestamp.
fn check_ttls(settings: &Settings) -> Result<()> {
    for (name, ttl_secs) in [
        ("auth.access.ttl_secs", settings.auth.access.ttl_secs),
        ("auth.refresh.ttl_secs", settings.auth.refresh.ttl_secs),
    ] {
        if ttl_secs == 0 || i64::try_from(ttl_secs).is_err() {
            return Err(anyhow!("{} out of range: {}", name, ttl_secs));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_settings_parse() {
        let settings = parse_settings(Some("settings/dev.toml")).unwrap();
        assert_eq!(settings.store.backend, "memory");
        assert!(settings.auth.access.blacklist_enabled);
        assert_eq!(settings.auth.refresh.cookie_name, "refresh_token");
        assert!(settings.http.cert_path.is_none());
    }

    #[test]
    fn secrets_are_not_printed() {
        let settings = parse_settings(Some("settings/dev.toml")).unwrap();
        let printed = format!("{:?}", settings);
        assert!(!printed.contains(&settings.auth.access.secret));
        assert!(!printed.contains(&settings.auth.refresh.secret));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("settings/does-not-exist.toml")).is_err());
    }

    #[test]
    fn out_of_range_ttl_is_rejected() {
        let mut settings = parse_settings(Some("settings/dev.toml")).unwrap();
        assert!(check_ttls(&settings).is_ok());

        settings.auth.refresh.ttl_secs = u64::MAX;
        assert!(check_ttls(&settings).is_err());

        settings.auth.refresh.ttl_secs = 60;
        settings.auth.access.ttl_secs = 0;
        assert!(check_ttls(&settings).is_err());
    }
}
