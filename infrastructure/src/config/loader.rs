//! Configuration loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use sages_application::BehaviorConfig;
use sages_domain::ProviderConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const APP_DIR: &str = "two-sages";
const PROJECT_FILES: [&str; 2] = ["sages.toml", ".sages.toml"];
const ENV_PREFIX: &str = "SAGES_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

/// Fully resolved configuration, ready for wiring.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub file: FileConfig,
    pub providers: ProviderConfig,
    pub behavior: BehaviorConfig,
}

impl From<FileConfig> for LoadedConfig {
    fn from(file: FileConfig) -> Self {
        Self {
            providers: file.to_provider_config(),
            behavior: file.to_behavior_config(),
            file,
        }
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `.env` from the working directory into the process environment.
    ///
    /// A missing file only warns; credentials may come from elsewhere.
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => warn!("No .env file found, using the process environment"),
            Err(e) => warn!("Failed to load .env: {}", e),
        }
    }

    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `AWS_REGION` / `AWS_PROFILE`
    /// 2. `SAGES_`-prefixed environment variables (`__` separates sections)
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./sages.toml` or `./.sages.toml`
    /// 5. Global: `$XDG_CONFIG_HOME/two-sages/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let global = Self::global_config_path().filter(|p| p.exists());
        let project = Self::project_config_path();

        let mut file: FileConfig =
            Self::figment(global.as_deref(), project.as_deref(), config_path)
                .merge(Env::prefixed(ENV_PREFIX).split("__"))
                .extract()
                .map_err(Box::new)?;

        Self::apply_legacy_env(&mut file, |name| std::env::var(name).ok());

        Ok(file.into())
    }

    /// Load only default configuration (for --no-config).
    ///
    /// The legacy AWS variables still apply.
    pub fn load_defaults() -> LoadedConfig {
        let mut file = FileConfig::default();
        Self::apply_legacy_env(&mut file, |name| std::env::var(name).ok());
        file.into()
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project, explicit].into_iter().flatten() {
            debug!(path = %path.display(), "Merging config file");
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Apply the plain AWS variables the SDK users already set.
    fn apply_legacy_env(file: &mut FileConfig, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(region) = non_empty("AWS_REGION") {
            file.providers.bedrock.region = region;
        }
        if let Some(profile) = non_empty("AWS_PROFILE") {
            file.providers.bedrock.profile = Some(profile);
        }
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/two-sages/config.toml if set,
    /// otherwise falls back to ~/.config/two-sages/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     AWS_REGION, AWS_PROFILE, {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./sages.toml or ./.sages.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
