// ==========================================
// 技能矩阵管理系统 - 启动配置
// ==========================================
// 来源: 环境变量
// - SKILLS_MATRIX_DB_PATH    数据库文件路径
// - SKILLS_MATRIX_BIND_ADDR  HTTP 监听地址（默认 127.0.0.1:8080）
// - SKILLS_MATRIX_LOG_FORMAT 日志格式 text | json（默认 text）
// ==========================================

use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SKILLS_MATRIX_DB_PATH";
pub const ENV_BIND_ADDR: &str = "SKILLS_MATRIX_BIND_ADDR";
pub const ENV_LOG_FORMAT: &str = "SKILLS_MATRIX_LOG_FORMAT";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DB_FILE_NAME: &str = "skills_matrix.db";

/// 日志输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// 解析格式名（大小写不敏感,未知值回退到 Text）
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// 启动配置
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: String,
    pub bind_addr: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// 从环境变量加载
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载（便于测试）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            db_path: non_empty(ENV_DB_PATH).unwrap_or_else(get_default_db_path),
            bind_addr: non_empty(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            log_format: non_empty(ENV_LOG_FORMAT)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }
}

/// 默认数据库路径
///
/// 优先使用用户数据目录,取不到时回退到当前目录
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("skills-matrix");
        match std::fs::create_dir_all(&dir) {
            Ok(()) => path = dir.join(DB_FILE_NAME),
            Err(e) => tracing::warn!("无法创建数据目录 {}: {}", dir.display(), e),
        }
    }

    path.to_string_lossy().to_string()
}
