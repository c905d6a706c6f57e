//! Configuration loading for two-sages
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AWS_REGION` / `AWS_PROFILE`
//! 2. `SAGES_`-prefixed environment variables
//! 3. `--config <path>` specified file
//! 4. Project root: `./sages.toml` or `./.sages.toml`
//! 5. XDG config: `$XDG_CONFIG_HOME/two-sages/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBedrockConfig, FileBehaviorConfig, FileConfig, FileModelsConfig, FileOpenAiConfig,
    FileProvidersConfig,
};
pub use loader::{ConfigError, ConfigLoader, LoadedConfig};
