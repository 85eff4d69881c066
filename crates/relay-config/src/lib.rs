pub mod config;
pub mod loader;

pub use config::{
    default_models, Config, ConfigError, ConfigResult, GenerationDefaults, HttpConfig, LogLevel,
    LoggingConfig, ModelMapping, ProviderSettings, ProvidersConfig, ServerConfig,
};
pub use loader::ConfigLoader;

use std::path::PathBuf;

/// 展开路径中的 ~ 为用户主目录
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(rest))
    } else {
        Some(PathBuf::from(path))
    }
}
