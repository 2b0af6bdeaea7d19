//! 服务配置

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config/catalog.toml";

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV_VAR: &str = "PRODUCT_CATALOG_CONFIG";

/// 服务配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 认证门禁配置
    pub auth: AuthConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    /// 控制台是否使用颜色
    pub ansi: bool,
}

/// 认证模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// 按 Bearer token 查表认证
    Tokens,
    /// 所有请求都视为已认证，身份携带 `allow_all_roles`
    AllowAll,
}

/// 单个 token 的配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub token: String,
    pub subject: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// 认证门禁配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub tokens: Vec<TokenConfig>,
    pub allow_all_roles: Vec<String>,
    /// 缺少认证信息时的状态码
    pub missing_credentials_status: u16,
    /// 认证信息无效时的状态码
    pub invalid_credentials_status: u16,
    /// 缺少角色时的状态码
    pub missing_role_status: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::Tokens,
            tokens: Vec::new(),
            allow_all_roles: vec!["admin".to_string()],
            missing_credentials_status: 401,
            invalid_credentials_status: 401,
            missing_role_status: 403,
        }
    }
}

impl HttpConfig {
    /// 监听地址，形如 `0.0.0.0:3000`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl AppConfig {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        Self::from_toml_str(&content)
    }

    /// 从 TOML 文本解析并验证配置
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 按优先级确定配置来源：显式路径 > 环境变量 > 默认文件 > 内置默认值
    pub fn resolve(explicit: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = explicit
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                default.exists().then_some(default)
            });

        match path {
            Some(path) => Ok((Self::load_from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("HTTP端口必须大于0".to_string()));
        }
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation("请求超时时间必须大于0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        for (name, status) in [
            ("missing_credentials_status", self.auth.missing_credentials_status),
            ("invalid_credentials_status", self.auth.invalid_credentials_status),
            ("missing_role_status", self.auth.missing_role_status),
        ] {
            if !(400..500).contains(&status) {
                return Err(ConfigError::Validation(format!(
                    "{} 必须是 4xx 状态码，当前为 {}",
                    name, status
                )));
            }
        }

        if self.auth.mode == AuthMode::Tokens {
            let mut seen = HashSet::new();
            for entry in &self.auth.tokens {
                if entry.token.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "用户 {} 的 token 不能为空",
                        entry.subject
                    )));
                }
                if !seen.insert(entry.token.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "token 重复: 用户 {}",
                        entry.subject
                    )));
                }
            }
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}
