// ==========================================
// 技能矩阵管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod department;
pub mod employee;
pub mod performance;
pub mod skill;
pub mod types;

// 重导出核心类型
pub use department::{Department, Machine};
pub use employee::{Employee, SkillAssignment};
pub use performance::{DepartmentPerformanceRecord, PerformanceRow};
pub use skill::Skill;
pub use types::{DeactivationPolicy, Gender, SkillLevel};
