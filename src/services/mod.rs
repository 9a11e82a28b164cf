// ==========================================
// 技能矩阵管理系统 - 服务层
// ==========================================
// 职责: 装载快照、调用引擎、持久化结果
// ==========================================

pub mod performance_service;
pub mod scoring_service;

pub use performance_service::{PerformanceService, RecalculationSummary, SkippedMonths};
pub use scoring_service::ScoringService;
