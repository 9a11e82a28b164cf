// ==========================================
// 技能矩阵管理系统 - 引擎层
// ==========================================
// 职责: 技能评分与聚合的纯计算逻辑
// 红线: 引擎不访问数据库,输入为已装载的快照
// ==========================================

pub mod aggregator;
pub mod budget;
pub mod employee_score;
pub mod error;
pub mod level_codec;
pub mod performance;
pub mod snapshot;

// 重导出核心引擎
pub use aggregator::{DepartmentStats, MachineStats, SkillAggregator};
pub use budget::Budget;
pub use employee_score::{employee_score, to_percentage, EmployeeScore, EmployeeScoreCalculator};
pub use error::{EngineError, EngineResult};
pub use level_codec::{level_to_points, points_to_level_name, zero_breakdown};
pub use performance::{
    build_series, month_bound, percentage_score, MonthlyPerformance, PerformanceAccumulator,
    YearComputation,
};
pub use snapshot::{DepartmentSnapshot, EmployeeSkills, MachineSkills};
