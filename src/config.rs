use crate::error::{AppError, AppResult, ConfigError, FileError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 判题站地址
    pub base_url: String,
    /// 登录凭证（cookie `t` 的值）
    pub token: String,
    /// 轮询判题结果的间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 最多轮询次数
    pub max_poll_attempts: u32,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// User-Agent
    pub user_agent: String,
    /// 比赛目录下的配置文件名
    pub config_file_name: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://ac.nowcoder.com".to_string(),
            token: String::new(),
            poll_interval_ms: 1000,
            max_poll_attempts: 60,
            request_timeout_secs: 10,
            user_agent: format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 NowCoderAC/{}",
                env!("CARGO_PKG_VERSION")
            ),
            config_file_name: "nowcoderac.json".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，缺省值见 [`Config::default`]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 先读取 TOML 文件（不存在时使用默认值），再用环境变量覆盖
    pub fn load(path: &Path) -> AppResult<Self> {
        let base = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
            toml::from_str::<Config>(&content).map_err(|e| {
                AppError::File(FileError::TomlParseFailed {
                    path: path.display().to_string(),
                    source: e,
                })
            })?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        let default = self;
        Self {
            base_url: std::env::var("NOWCODER_BASE_URL").unwrap_or(default.base_url),
            token: std::env::var("NOWCODER_TOKEN").unwrap_or(default.token),
            poll_interval_ms: std::env::var("NOWCODER_POLL_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.poll_interval_ms),
            max_poll_attempts: std::env::var("NOWCODER_MAX_POLL_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_poll_attempts),
            request_timeout_secs: std::env::var("NOWCODER_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            user_agent: std::env::var("NOWCODER_USER_AGENT").unwrap_or(default.user_agent),
            config_file_name: std::env::var("NOWCODER_CONFIG_FILE").unwrap_or(default.config_file_name),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 确认已经提供登录凭证
    pub fn require_token(&self) -> AppResult<&str> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingToken.into());
        }
        Ok(&self.token)
    }
}
