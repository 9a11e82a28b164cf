// ==========================================
// 技能矩阵管理系统 - 配置层
// ==========================================
// 启动配置: 环境变量 (AppConfig)
// 运行期配置: config_kv 表 (ConfigManager)
// ==========================================

pub mod app_config;
pub mod config_manager;

pub use app_config::{get_default_db_path, AppConfig, LogFormat};
pub use config_manager::{config_keys, ConfigManager, DEFAULT_AGGREGATION_BUDGET_MS};
