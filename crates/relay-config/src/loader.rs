use crate::config::{Config, ConfigError, ConfigResult, ModelMapping};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// 模型映射文件格式
#[derive(Debug, Deserialize)]
struct ModelsFile {
    models: Vec<ModelMapping>,
}

/// 配置加载器
///
/// 环境变量 → 可选的模型映射文件 → 校验。返回的 Config 在进程生命周期内不再修改。
pub struct ConfigLoader;

impl ConfigLoader {
    /// 读取模型映射文件（如有）并校验配置
    pub async fn finish(mut config: Config) -> ConfigResult<Config> {
        if let Some(path) = config.models_file.clone() {
            config.models = Self::load_models(&path).await?;
        }

        Self::validate(&config)?;
        Self::warn_missing_keys(&config);
        Ok(config)
    }

    /// 加载模型映射文件
    pub async fn load_models(path: &Path) -> ConfigResult<Vec<ModelMapping>> {
        if !path.exists() {
            return Err(ConfigError::InvalidPath(format!(
                "Models file not found: {:?}",
                path
            )));
        }

        info!("Loading model mapping from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let content = Self::expand_env_vars(&content, |key| std::env::var(key).ok())?;
        let file: ModelsFile = serde_json::from_str(&content)?;
        Ok(file.models)
    }

    /// 验证配置
    pub fn validate(config: &Config) -> ConfigResult<()> {
        if config.server.port == 0 {
            return Err(ConfigError::Validation(
                "Server port cannot be 0".to_string(),
            ));
        }

        if config.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "HTTP timeout_seconds must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for mapping in &config.models {
            if mapping.name.trim().is_empty() || mapping.model.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Model mapping entries need a name and an upstream model: {:?}",
                    mapping
                )));
            }
            if !seen.insert(mapping.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate model name '{}'",
                    mapping.name
                )));
            }
        }

        Ok(())
    }

    /// 缺少 API key 只是警告，请求在分发时才会失败
    fn warn_missing_keys(config: &Config) {
        let missing = config.missing_api_keys();
        if missing.is_empty() {
            info!("All providers configured properly");
            return;
        }

        for kind in &missing {
            warn!("API key not set for provider {}", kind);
        }
    }

    /// 展开环境变量 ${VAR} 或 ${VAR:-default}
    pub fn expand_env_vars<F>(content: &str, lookup: F) -> ConfigResult<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        let mut result = content.to_string();

        for cap in re.captures_iter(content) {
            let (Some(full_match), Some(var_expr)) = (cap.get(0), cap.get(1)) else {
                continue;
            };

            let (var_name, default_value) = match var_expr.as_str().split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (var_expr.as_str(), None),
            };

            let replacement = match lookup(var_name) {
                Some(val) => val,
                None => match default_value {
                    Some(default) => default.to_string(),
                    None => return Err(ConfigError::EnvVarNotFound(var_name.to_string())),
                },
            };

            result = result.replace(full_match.as_str(), &replacement);
        }

        Ok(result)
    }
}
