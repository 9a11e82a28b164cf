// ==========================================
// 技能矩阵管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 连接: 统一使用注入的 Arc<Mutex<Connection>>
// ==========================================

pub mod assignment_repo;
pub mod department_repo;
pub mod employee_repo;
pub mod error;
pub mod machine_repo;
pub mod performance_repo;
pub mod skill_repo;
pub mod store;

// 重导出核心仓储
pub use assignment_repo::{AssignmentUpsert, SkillAssignmentRepository};
pub use department_repo::{CascadeDeactivation, DepartmentRepository};
pub use employee_repo::EmployeeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use machine_repo::MachineRepository;
pub use performance_repo::DepartmentPerformanceRepository;
pub use skill_repo::SkillRepository;
pub use store::{SkillStore, SqliteSkillStore};
