//! 产品目录服务入口
//!
//! 用法: `product_catalog [配置文件路径]`

use std::{path::PathBuf, time::Duration};

use product_catalog::{
    infrastructure::{
        config::{AppConfig, AuthMode},
        logger::Logger,
    },
    router, AppState,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let explicit = std::env::args().nth(1).map(PathBuf::from);
    let (config, source) = AppConfig::resolve(explicit)?;

    Logger::init(&config.logging);
    match &source {
        Some(path) => info!("已加载配置文件: {}", path.display()),
        None => info!("未找到配置文件，使用默认配置"),
    }

    match config.auth.mode {
        AuthMode::AllowAll => warn!("认证模式为 allow_all，所有请求都将以 {:?} 角色通过", config.auth.allow_all_roles),
        AuthMode::Tokens if config.auth.tokens.is_empty() => {
            warn!("未配置任何 token，受保护的接口将全部拒绝")
        }
        AuthMode::Tokens => info!("已加载 {} 个 token", config.auth.tokens.len()),
    }

    let state = AppState::from_config(&config)?;
    let app = router(state, Duration::from_secs(config.http.timeout_seconds));

    let addr = config.http.listen_addr();
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        error!("无法绑定到 {}: {}", addr, e);
        e
    })?;

    info!("🚀 产品目录服务运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /health        - 健康检查");
    info!("   GET    /products      - 获取产品列表");
    info!("   GET    /products/:id  - 获取产品详情 (需要认证)");
    info!("   POST   /products      - 创建产品 (需要 admin 角色)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("监听 ctrl+c 失败: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到停止信号，正在关闭...");
}
