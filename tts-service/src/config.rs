use anyhow::{anyhow, Result};
use rand_core::{OsRng, RngCore};
use std::env;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

pub const DEFAULT_MODEL_NAME: &str = "Qwen3-TTS-12Hz-1.7B-CustomVoice";
pub const MAX_ACCESS_TTL_HOURS: i64 = 24 * 365;
pub const MAX_LEEWAY_SECONDS: u32 = common_auth::MAX_LEEWAY_SECONDS;
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];

#[derive(Clone)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    pub jwt_secret: String,
    /// True when no secret was configured and one was generated for this process.
    pub jwt_secret_generated: bool,
    pub access_ttl_hours: i64,
    pub jwt_leeway_seconds: u32,
    pub username: String,
    pub password: String,
    pub allowed_origins: Vec<String>,
    pub model_url: String,
    pub model_name: String,
    pub model_timeout: Duration,
    pub max_text_chars: usize,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_secret_generated", &self.jwt_secret_generated)
            .field("access_ttl_hours", &self.access_ttl_hours)
            .field("jwt_leeway_seconds", &self.jwt_leeway_seconds)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("allowed_origins", &self.allowed_origins)
            .field("model_url", &self.model_url)
            .field("model_name", &self.model_name)
            .field("model_timeout", &self.model_timeout)
            .field("max_text_chars", &self.max_text_chars)
            .finish()
    }
}

pub fn load_service_config() -> Result<ServiceConfig> {
    config_from_lookup(|key| env::var(key).ok())
}

/// Builds the configuration from an arbitrary key lookup so tests do not
/// have to mutate the process environment.
pub fn config_from_lookup<F>(lookup: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).and_then(|value| normalize_optional(&value));
    // Secrets and credentials are compared byte for byte, so only blank
    // values are dropped; surrounding whitespace is kept.
    let get_exact = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let host: IpAddr = get("HOST")
        .unwrap_or_else(|| "0.0.0.0".to_string())
        .parse()
        .map_err(|err| anyhow!("Invalid HOST: {err}"))?;
    let port = parse_number(get("PORT"), "PORT", 8000u16)?;

    let (jwt_secret, jwt_secret_generated) = match get_exact("JWT_SECRET_KEY") {
        Some(secret) => (secret, false),
        None => (generate_secret(), true),
    };
    let access_ttl_hours = parse_number(get("ACCESS_TOKEN_EXPIRE_HOURS"), "ACCESS_TOKEN_EXPIRE_HOURS", 8i64)?;
    if !(1..=MAX_ACCESS_TTL_HOURS).contains(&access_ttl_hours) {
        return Err(anyhow!(
            "ACCESS_TOKEN_EXPIRE_HOURS must be between 1 and {MAX_ACCESS_TTL_HOURS}"
        ));
    }
    let jwt_leeway_seconds = parse_number(get("JWT_LEEWAY_SECONDS"), "JWT_LEEWAY_SECONDS", 0u32)?;
    if jwt_leeway_seconds > MAX_LEEWAY_SECONDS {
        return Err(anyhow!("JWT_LEEWAY_SECONDS must be at most {MAX_LEEWAY_SECONDS}"));
    }

    let username = get_exact("VOCABLY_USERNAME").unwrap_or_else(|| "vocably".to_string());
    let password = get_exact("VOCABLY_PASSWORD").unwrap_or_else(|| "vocably2026".to_string());

    let mut allowed_origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect();
    if let Some(frontend) = get("FRONTEND_URL") {
        let frontend = frontend.trim_end_matches('/').to_string();
        if !allowed_origins.contains(&frontend) {
            allowed_origins.push(frontend);
        }
    }

    let model_url = get("TTS_MODEL_URL").unwrap_or_else(|| "http://127.0.0.1:8001".to_string());
    let model_name = get("TTS_MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
    let model_timeout = Duration::from_secs(parse_number(get("TTS_MODEL_TIMEOUT_SECS"), "TTS_MODEL_TIMEOUT_SECS", 120u64)?);
    let max_text_chars = parse_number(get("TTS_MAX_TEXT_CHARS"), "TTS_MAX_TEXT_CHARS", 3000usize)?;

    Ok(ServiceConfig {
        host,
        port,
        jwt_secret,
        jwt_secret_generated,
        access_ttl_hours,
        jwt_leeway_seconds,
        username,
        password,
        allowed_origins,
        model_url,
        model_name,
        model_timeout,
        max_text_chars,
    })
}

/// 32 random bytes, hex encoded.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn parse_number<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|err| anyhow!("Invalid {key} '{raw}': {err}")),
        None => Ok(default),
    }
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
