// ==========================================
// 技能矩阵管理系统 - 部门 API
// ==========================================
// 职责: 部门创建、查询、停用
// 停用策略: Reject（有在职员工/在用设备时拒绝）| Cascade（单事务级联软删除）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{parse_id, require_name};
use crate::db::now;
use crate::domain::{DeactivationPolicy, Department};
use crate::repository::DepartmentRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// 创建部门请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// 停用结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDeactivation {
    pub department_id: String,
    pub policy: DeactivationPolicy,
    pub employees: usize,
    pub machines: usize,
    pub assignments: usize,
}

// ==========================================
// DepartmentApi
// ==========================================
pub struct DepartmentApi {
    department_repo: Arc<DepartmentRepository>,
}

impl DepartmentApi {
    pub fn new(department_repo: Arc<DepartmentRepository>) -> Self {
        Self { department_repo }
    }

    /// 创建部门
    ///
    /// # 返回
    /// - Err(Conflict): 已有同名在用部门
    pub fn create_department(&self, req: CreateDepartmentRequest) -> ApiResult<Department> {
        let name = require_name("name", &req.name)?;
        if self.department_repo.find_active_by_name(&name)?.is_some() {
            return Err(ApiError::Conflict(format!("部门名称已存在: {}", name)));
        }

        let description = req
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let department = Department::new(Uuid::new_v4().to_string(), name, description, now());
        self.department_repo.insert(&department)?;

        tracing::info!(department_id = %department.department_id, name = %department.name, "部门已创建");
        Ok(department)
    }

    /// 在用部门列表（按名称排序）
    pub fn list_departments(&self) -> ApiResult<Vec<Department>> {
        Ok(self.department_repo.list_active()?)
    }

    /// 查询在用部门
    pub fn get_department(&self, department_id: &str) -> ApiResult<Department> {
        let id = parse_id("departmentId", department_id)?;
        self.department_repo
            .find_active_by_id(&id)?
            .ok_or_else(|| ApiError::NotFound(format!("Department(id={})不存在", id)))
    }

    /// 停用部门
    ///
    /// # 参数
    /// - policy: Reject 时部门下仍有在职员工或在用设备则返回 BusinessRuleViolation
    pub fn deactivate_department(
        &self,
        department_id: &str,
        policy: DeactivationPolicy,
    ) -> ApiResult<DepartmentDeactivation> {
        let department = self.get_department(department_id)?;
        let id = department.department_id;

        let result = match policy {
            DeactivationPolicy::Reject => {
                if !self.department_repo.deactivate(&id)? {
                    return Err(ApiError::NotFound(format!("Department(id={})不存在", id)));
                }
                DepartmentDeactivation {
                    department_id: id,
                    policy,
                    employees: 0,
                    machines: 0,
                    assignments: 0,
                }
            }
            DeactivationPolicy::Cascade => {
                let cascade = self.department_repo.deactivate_cascade(&id)?;
                DepartmentDeactivation {
                    department_id: id,
                    policy,
                    employees: cascade.employees,
                    machines: cascade.machines,
                    assignments: cascade.assignments,
                }
            }
        };

        tracing::info!(
            department_id = %result.department_id,
            policy = ?policy,
            employees = result.employees,
            machines = result.machines,
            "部门已停用"
        );
        Ok(result)
    }
}
