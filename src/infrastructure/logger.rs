//! 日志基础设施

use tracing_subscriber::EnvFilter;

use super::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 初始化 tracing 日志，设置了 `RUST_LOG` 时以其为准。
    ///
    /// 重复初始化（例如测试中）会被忽略。
    pub fn init(config: &LoggingConfig) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(&config.level)
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(config.ansi)
            .with_target(false)
            .try_init();
    }
}
