use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub session: SessionConfig,

    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/fitcms.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// Directory holding the admin UI pages and uploaded images
    pub public_dir: String,

    /// Absolute base URL stamped into stored image URLs. When unset, the
    /// scheme+host of the originating request is used instead, so stored
    /// URLs can go stale if the serving host changes.
    pub base_url: Option<String>,

    /// Allowed CORS origins. A "*" entry switches to wildcard mode
    /// (no credentials); otherwise the allow-list is used with credentials.
    pub cors_allowed_origins: Vec<String>,

    /// Expose GET /api/debug/session for session troubleshooting
    pub debug_endpoint: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            public_dir: "public".to_string(),
            base_url: None,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5000".to_string(),
                "http://localhost:5001".to_string(),
            ],
            debug_endpoint: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the session cookie
    pub cookie_name: String,

    /// Whether to set the Secure flag on session cookies.
    /// Default: true for production safety. Set to false for local
    /// development without HTTPS.
    pub secure_cookies: bool,

    /// SameSite policy: "lax", "strict" or "none"
    pub same_site: String,

    /// Session time-to-live in hours
    pub ttl_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "fitcms.sid".to_string(),
            secure_cookies: true,
            same_site: "lax".to_string(),
            ttl_hours: 24,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn same_site_policy(&self) -> tower_sessions::cookie::SameSite {
        use tower_sessions::cookie::SameSite;

        match self.same_site.as_str() {
            "strict" => SameSite::Strict,
            "none" => SameSite::None,
            _ => SameSite::Lax,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Username of the account the seed routine creates when missing
    pub admin_username: String,

    /// Initial password for the seeded account (stored hashed)
    pub admin_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "welcome@1".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Environment variables take precedence over the config file.
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("FITCMS_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
        }

        if let Ok(base_url) = std::env::var("FITCMS_BASE_URL")
            && !base_url.is_empty()
        {
            self.server.base_url = Some(base_url);
        }

        if let Ok(database_path) = std::env::var("FITCMS_DATABASE_PATH")
            && !database_path.is_empty()
        {
            self.general.database_path = database_path;
        }

        if let Ok(public_dir) = std::env::var("FITCMS_PUBLIC_DIR")
            && !public_dir.is_empty()
        {
            self.server.public_dir = public_dir;
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("fitcms").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".fitcms").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.ttl_hours <= 0 {
            anyhow::bail!("Session TTL must be > 0 hours");
        }

        if !matches!(self.session.same_site.as_str(), "lax" | "strict" | "none") {
            anyhow::bail!(
                "Invalid same_site value '{}' (expected lax, strict or none)",
                self.session.same_site
            );
        }

        if self.auth.admin_username.is_empty() || self.auth.admin_password.is_empty() {
            anyhow::bail!("Seed admin username and password cannot be empty");
        }

        Ok(())
    }
}
