use std::path::PathBuf;

pub use fintrack_config::{manager::HOME_ENV, model::SETTING_KEYS};
pub use fintrack_config::{Config, ConfigError, ConfigManager};

/// Manager rooted at `$FINTRACK_HOME` or `~/.fintrack`.
pub fn default_manager() -> Result<ConfigManager, ConfigError> {
    ConfigManager::with_base_dir(ConfigManager::default_base_dir())
}

pub fn manager_with_base(base: PathBuf) -> Result<ConfigManager, ConfigError> {
    ConfigManager::with_base_dir(base)
}
