// ==========================================
// 技能矩阵管理系统 - API 层
// ==========================================
// 职责: 参数校验、错误归一、调用服务/仓储
// 约束: 不依赖 HTTP 框架,HTTP 适配在 app::http
// ==========================================

pub mod dashboard_api;
pub mod department_api;
pub mod employee_api;
pub mod error;
pub mod machine_api;
pub mod matrix_api;
pub mod response;
pub mod skill_api;
pub mod validator;

// 重导出核心API
pub use dashboard_api::DashboardApi;
pub use department_api::{CreateDepartmentRequest, DepartmentApi, DepartmentDeactivation};
pub use employee_api::{
    CreateEmployeeRequest, EmployeeApi, EmployeeDetail, SkillAssignmentResult, UpsertSkillRequest,
};
pub use error::{ApiError, ApiResult};
pub use machine_api::{CreateMachineRequest, MachineApi};
pub use matrix_api::{MatrixApi, MatrixRow, MatrixSkill, SkillsMatrix};
pub use response::ApiResponse;
pub use skill_api::{CreateSkillRequest, SkillApi};
