use serde::{Deserialize, Serialize};
use std::fs;

/// Placeholder substituted with the deployment's public URL at build time
pub const PUBLIC_URL_PLACEHOLDER: &str = "__NEXT_PUBLIC_URL__";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeSettings {
    #[serde(default)]
    pub application: ApplicationSettings,
    #[serde(default)]
    pub cookies: CookieSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    /// Public base URL passed to the engine as the request host
    pub public_url: String,
    /// Prefix the catch-all auth route is mounted under
    pub base_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    /// Cookie dropped from responses when the engine clears it with an empty value
    pub state_cookie_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            public_url: PUBLIC_URL_PLACEHOLDER.to_string(),
            base_path: "/api/auth".to_string(),
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            state_cookie_name: "next-auth.state".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl BridgeSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read or parsed
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::initialize_environment();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        Ok(settings)
    }

    /// Load `.env` and install the logger; a logger installed by the host wins
    fn initialize_environment() {
        Self::load_env_file();
        if env_logger::try_init().is_err() {
            log::debug!("Logger already initialized, keeping existing one");
        }
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `AUTHBRIDGE_CONFIG_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_file(&default_config_path)?;
            log::info!("Loaded base settings from {}", default_config_path.display());
        }

        if let Ok(config_dir) = std::env::var("AUTHBRIDGE_CONFIG_DIR") {
            let config_path = std::path::Path::new(&config_dir).join("Settings.toml");
            if config_path.exists() {
                settings = Self::from_file(&config_path)?;
                log::info!("Overriding settings from {}", config_path.display());
            } else {
                log::info!(
                    "AUTHBRIDGE_CONFIG_DIR set but no Settings.toml found at: {}",
                    config_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a single TOML settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let toml_content = fs::read_to_string(path)?;
        Ok(basic_toml::from_str(&toml_content)?)
    }

    fn apply_env_overrides(settings: &mut Self) {
        if let Ok(public_url) = std::env::var("NEXTAUTH_URL") {
            if !public_url.is_empty() {
                settings.application.public_url = public_url;
            }
        }
        if let Ok(base_path) = std::env::var("AUTH_BASE_PATH") {
            settings.application.base_path = base_path;
        }
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            settings.logging.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if line.trim_start().starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Route pattern for the catch-all auth endpoint
    #[must_use]
    pub fn route_pattern(&self) -> String {
        format!(
            "{}/{{nextauth:.*}}",
            self.application.base_path.trim_end_matches('/')
        )
    }

    /// Whether the public URL still holds the unsubstituted placeholder
    #[must_use]
    pub fn has_placeholder_url(&self) -> bool {
        self.application.public_url == PUBLIC_URL_PLACEHOLDER
    }
}
