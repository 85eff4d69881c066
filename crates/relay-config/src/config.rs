use relay_core::ProviderKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 网关主配置结构体
///
/// 启动时构建一次，之后只读，显式注入到 Gateway 和各个 adapter。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub providers: ProvidersConfig,
    pub defaults: GenerationDefaults,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub models: Vec<ModelMapping>,
    /// 可选的模型映射文件（JSON），覆盖内置模型表
    #[serde(skip)]
    pub models_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            providers: ProvidersConfig::default(),
            defaults: GenerationDefaults::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
            models: default_models(),
            models_file: None,
        }
    }
}

impl Config {
    /// 从进程环境变量加载配置
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意 lookup 函数加载配置（测试时避免修改进程环境）
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(host) = lookup("LLM_GATEWAY_HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("LLM_GATEWAY_PORT") {
            config.server.port = parse_var("LLM_GATEWAY_PORT", &port)?;
        }
        if let Some(debug) = lookup("LLM_GATEWAY_DEBUG") {
            config.server.debug = debug.eq_ignore_ascii_case("true");
        }

        for kind in ProviderKind::ALL {
            let prefix = env_prefix(kind);
            let settings = config.providers.get_mut(kind);
            if let Some(base_url) = lookup(&format!("{}_BASE_URL", prefix)) {
                settings.base_url = base_url;
            }
            settings.api_key = lookup(&format!("{}_API_KEY", prefix));
        }

        if let Some(value) = lookup("DEFAULT_TEMPERATURE") {
            config.defaults.temperature = parse_var("DEFAULT_TEMPERATURE", &value)?;
        }
        if let Some(value) = lookup("DEFAULT_MAX_TOKENS") {
            config.defaults.max_tokens = parse_var("DEFAULT_MAX_TOKENS", &value)?;
        }
        if let Some(value) = lookup("DEFAULT_TOP_P") {
            config.defaults.top_p = parse_var("DEFAULT_TOP_P", &value)?;
        }
        if let Some(value) = lookup("LLM_GATEWAY_TIMEOUT_SECS") {
            config.http.timeout_seconds = parse_var("LLM_GATEWAY_TIMEOUT_SECS", &value)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level.parse()?;
        }
        if let Some(path) = lookup("LLM_GATEWAY_MODELS") {
            config.models_file = crate::expand_tilde(&path);
        }

        Ok(config)
    }

    /// 未配置 API key 的 provider 列表
    pub fn missing_api_keys(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.providers.get(*kind).api_key().is_none())
            .collect()
    }
}

fn env_prefix(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAi => "OPENAI",
        ProviderKind::HuggingFace => "HUGGINGFACE",
        ProviderKind::Gemini => "GEMINI",
        ProviderKind::Anthropic => "ANTHROPIC",
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::Validation(format!("Invalid value for {}: {}", key, value))
    })
}

/// Server 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            debug: false,
        }
    }
}

/// 单个 provider 的连接配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSettings {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ProviderSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// API key, treating an empty value as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// 所有 provider 的配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvidersConfig {
    pub openai: ProviderSettings,
    pub huggingface: ProviderSettings,
    pub gemini: ProviderSettings,
    pub anthropic: ProviderSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai: ProviderSettings::new("https://api.openai.com/v1"),
            huggingface: ProviderSettings::new("https://api-inference.huggingface.co/models"),
            gemini: ProviderSettings::new("https://generativelanguage.googleapis.com/v1beta"),
            anthropic: ProviderSettings::new("https://api.anthropic.com/v1"),
        }
    }
}

impl ProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::HuggingFace => &self.huggingface,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Anthropic => &self.anthropic,
        }
    }

    pub fn get_mut(&mut self, kind: ProviderKind) -> &mut ProviderSettings {
        match kind {
            ProviderKind::OpenAi => &mut self.openai,
            ProviderKind::HuggingFace => &mut self.huggingface,
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::Anthropic => &mut self.anthropic,
        }
    }
}

/// 请求未指定时使用的采样参数
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GenerationDefaults {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            max_tokens: 1024,
            top_p: 0.9,
        }
    }
}

/// 出站 HTTP 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: 60 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

/// 对外模型名到 provider 模型的映射
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelMapping {
    pub name: String,
    pub provider: ProviderKind,
    pub model: String,
}

impl ModelMapping {
    pub fn new(name: impl Into<String>, provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider,
            model: model.into(),
        }
    }
}

/// 内置模型表
pub fn default_models() -> Vec<ModelMapping> {
    use ProviderKind::*;

    vec![
        ModelMapping::new("qwen3-0.6b", OpenAi, "qwen3:0.6b"),
        ModelMapping::new("gpt-3.5-turbo", OpenAi, "gpt-3.5-turbo"),
        ModelMapping::new("gpt-4", OpenAi, "gpt-4"),
        ModelMapping::new("gpt-4o", OpenAi, "gpt-4o"),
        ModelMapping::new("mistral-7b", HuggingFace, "mistralai/Mistral-7B-Instruct-v0.1"),
        ModelMapping::new("llama-2", HuggingFace, "meta-llama/Llama-2-7b-chat-hf"),
        ModelMapping::new("zephyr-7b", HuggingFace, "HuggingFaceH4/zephyr-7b-beta"),
        ModelMapping::new("gemini-pro", Gemini, "gemini-pro"),
        ModelMapping::new("gemini-1.5-pro", Gemini, "gemini-1.5-pro-latest"),
        ModelMapping::new("claude-3-opus", Anthropic, "claude-3-opus-20240229"),
        ModelMapping::new("claude-3-sonnet", Anthropic, "claude-3-sonnet-20240229"),
        ModelMapping::new("claude-3-haiku", Anthropic, "claude-3-haiku-20240307"),
    ]
}

/// 日志级别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" | "critical" => Ok(LogLevel::Error),
            _ => Err(ConfigError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

/// Logging 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
