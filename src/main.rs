// ==========================================
// 技能矩阵管理系统 - HTTP 服务主入口
// ==========================================
// 配置: 环境变量（见 config::app_config）
// 退出: Ctrl+C / SIGTERM 时优雅停机
// ==========================================

use std::sync::Arc;

use anyhow::anyhow;
use skills_matrix::app::{self, AppState};
use skills_matrix::config::AppConfig;
use skills_matrix::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // 初始化日志系统
    logging::init(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("{}", skills_matrix::APP_NAME);
    tracing::info!("系统版本: {}", skills_matrix::VERSION);
    tracing::info!("==================================================");
    tracing::info!("使用数据库: {}", config.db_path);

    let db_path = config.db_path.clone();
    let state = tokio::task::spawn_blocking(move || AppState::new(db_path))
        .await?
        .map_err(|e| anyhow!("无法初始化AppState: {}", e))?;

    app::serve(Arc::new(state), &config.bind_addr).await?;

    tracing::info!("服务已退出");
    Ok(())
}
