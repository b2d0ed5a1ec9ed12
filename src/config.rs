use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Fieldstock
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FieldstockConfig {
    /// Logging/observability settings
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Database settings (optional; the in-memory store is used when absent)
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level directive applied when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON-formatted log lines
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database URL (SQLite file path or connection string)
    pub url: String,
    /// Maximum connections in pool
    pub max_connections: u32,
    /// Enable automatic migrations
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://.fieldstock/fieldstock.db".to_string(),
            max_connections: 10,
            auto_migrate: true,
        }
    }
}

impl FieldstockConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (fieldstock.toml)
    /// 3. Environment variables (prefixed with FIELDSTOCK_)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("fieldstock.toml").exists() {
            builder = builder.add_source(File::with_name("fieldstock"));
        }

        builder = builder.add_source(
            Environment::with_prefix("FIELDSTOCK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let fieldstock_config: FieldstockConfig = config.try_deserialize()?;
        Ok(fieldstock_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<FieldstockConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = FieldstockConfig::load_env_file();
        FieldstockConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static FieldstockConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
