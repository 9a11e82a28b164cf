// ==========================================
// 技能矩阵管理系统 - 应用层
// ==========================================
// 职责: 装配应用状态,对外提供 HTTP 服务
// ==========================================

pub mod http;
pub mod state;

// 重导出
pub use http::{router, serve};
pub use state::AppState;
