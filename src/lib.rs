// ==========================================
// 技能矩阵管理系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 员工技能评分、部门/设备技能聚合、部门月度绩效
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 评分与聚合
pub mod engine;

// 服务层 - 装载快照并驱动引擎
pub mod services;

// 导入层 - 技能矩阵文件
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配与 HTTP
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    DeactivationPolicy, Department, DepartmentPerformanceRecord, Employee, Gender, Machine, Skill,
    SkillAssignment, SkillLevel,
};

// 引擎
pub use engine::{
    Budget, DepartmentStats, EmployeeScore, EmployeeScoreCalculator, MachineStats,
    MonthlyPerformance, PerformanceAccumulator, SkillAggregator,
};

// 服务
pub use services::{PerformanceService, ScoringService};

// API
pub use api::{ApiError, ApiResponse, DashboardApi, MatrixApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "技能矩阵管理系统";
