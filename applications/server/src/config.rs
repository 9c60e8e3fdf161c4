//! Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_uploads")]
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Root directory for uploaded media (audio files and cover images)
    #[serde(default = "default_media_storage_path")]
    pub media_storage_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    pub jwt_secret: String,

    #[serde(default = "default_token_expiration_hours")]
    pub token_expiration_hours: u64,
}

/// Upload size limits, in kilobytes to match client-facing documentation
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct UploadSettings {
    #[serde(default = "default_max_audio_kb")]
    pub max_audio_kb: u64,

    #[serde(default = "default_max_image_kb")]
    pub max_image_kb: u64,
}

impl UploadSettings {
    pub fn max_audio_bytes(&self) -> usize {
        (self.max_audio_kb * 1024) as usize
    }

    pub fn max_image_bytes(&self) -> usize {
        (self.max_image_kb * 1024) as usize
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = PathBuf::from("config.toml");
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables (prefixed with CHORUS_)
        settings = settings.add_source(
            config::Environment::with_prefix("CHORUS")
                .separator("_")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Internal(format!("configuration: {}", e)))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Internal(format!("configuration: {}", e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Internal(
                "JWT secret is required (set CHORUS_AUTH_JWT_SECRET)".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        media_storage_path: default_media_storage_path(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/chorus.db".to_string()
}

fn default_media_storage_path() -> PathBuf {
    PathBuf::from("./data/media")
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        token_expiration_hours: default_token_expiration_hours(),
    }
}

fn default_token_expiration_hours() -> u64 {
    24
}

fn default_uploads() -> UploadSettings {
    UploadSettings {
        max_audio_kb: default_max_audio_kb(),
        max_image_kb: default_max_image_kb(),
    }
}

fn default_max_audio_kb() -> u64 {
    10240
}

fn default_max_image_kb() -> u64 {
    2048
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            uploads: default_uploads(),
        }
    }
}
