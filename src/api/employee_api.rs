// ==========================================
// 技能矩阵管理系统 - 员工 API
// ==========================================
// 职责: 员工增删查、调岗、技能记录维护
// 约束: 员工只能归属在用部门; 技能等级只接受规范名称
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{parse_date, parse_id, parse_level, parse_optional_id, require_name};
use crate::db::now;
use crate::domain::{Employee, Gender, SkillAssignment};
use crate::repository::{
    AssignmentUpsert, DepartmentRepository, EmployeeRepository, MachineRepository,
    SkillAssignmentRepository, SkillRepository,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// 创建员工请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub gender: String,
    pub department_id: String,
}

/// 技能记录写入请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSkillRequest {
    pub skill_id: String,
    #[serde(default)]
    pub machine_id: Option<String>,
    pub level: String,
    #[serde(default)]
    pub acquired_date: Option<String>,
    #[serde(default)]
    pub assessed_date: Option<String>,
}

/// 技能记录写入结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAssignmentResult {
    pub assignment: SkillAssignment,
    /// true: 新建; false: 覆盖已有记录
    pub created: bool,
}

/// 员工详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub skills: Vec<SkillAssignment>,
}

// ==========================================
// EmployeeApi
// ==========================================
pub struct EmployeeApi {
    employee_repo: Arc<EmployeeRepository>,
    department_repo: Arc<DepartmentRepository>,
    skill_repo: Arc<SkillRepository>,
    machine_repo: Arc<MachineRepository>,
    assignment_repo: Arc<SkillAssignmentRepository>,
}

impl EmployeeApi {
    pub fn new(
        employee_repo: Arc<EmployeeRepository>,
        department_repo: Arc<DepartmentRepository>,
        skill_repo: Arc<SkillRepository>,
        machine_repo: Arc<MachineRepository>,
        assignment_repo: Arc<SkillAssignmentRepository>,
    ) -> Self {
        Self {
            employee_repo,
            department_repo,
            skill_repo,
            machine_repo,
            assignment_repo,
        }
    }

    fn require_department(&self, department_id: &str) -> ApiResult<String> {
        let id = parse_id("departmentId", department_id)?;
        match self.department_repo.find_active_by_id(&id)? {
            Some(d) => Ok(d.department_id),
            None => Err(ApiError::NotFound(format!("Department(id={})不存在", id))),
        }
    }

    fn require_employee(&self, employee_id: &str) -> ApiResult<Employee> {
        let id = parse_id("employeeId", employee_id)?;
        self.employee_repo
            .find_active_by_id(&id)?
            .ok_or_else(|| ApiError::NotFound(format!("Employee(id={})不存在", id)))
    }

    /// 创建员工
    pub fn create_employee(&self, req: CreateEmployeeRequest) -> ApiResult<Employee> {
        let name = require_name("name", &req.name)?;
        let gender = Gender::parse(&req.gender)
            .ok_or_else(|| ApiError::InvalidArgument(format!("无法识别的性别: {}", req.gender)))?;
        let department_id = self.require_department(&req.department_id)?;

        let employee = Employee::new(Uuid::new_v4().to_string(), name, gender, department_id, now());
        self.employee_repo.insert(&employee)?;

        tracing::info!(employee_id = %employee.employee_id, "员工已创建");
        Ok(employee)
    }

    /// 在职员工列表
    ///
    /// # 参数
    /// - department_id: 部门过滤（格式错误 → InvalidArgument; 未命中 → 空列表）
    pub fn list_employees(&self, department_id: Option<&str>) -> ApiResult<Vec<Employee>> {
        let department_id = parse_optional_id("departmentId", department_id)?;
        Ok(self.employee_repo.list_active(department_id.as_deref())?)
    }

    /// 员工详情（含在用技能记录）
    pub fn get_employee(&self, employee_id: &str) -> ApiResult<EmployeeDetail> {
        let employee = self.require_employee(employee_id)?;
        let skills = self
            .assignment_repo
            .list_active_by_employee(&employee.employee_id)?;
        Ok(EmployeeDetail { employee, skills })
    }

    /// 调整员工所属部门
    pub fn change_department(&self, employee_id: &str, department_id: &str) -> ApiResult<Employee> {
        let employee = self.require_employee(employee_id)?;
        let department_id = self.require_department(department_id)?;
        self.employee_repo
            .update_department(&employee.employee_id, &department_id)?;
        self.require_employee(&employee.employee_id)
    }

    /// 软删除员工（同时停用其技能记录）
    ///
    /// # 返回
    /// 被停用的技能记录数
    pub fn delete_employee(&self, employee_id: &str) -> ApiResult<usize> {
        let id = parse_id("employeeId", employee_id)?;
        let assignments = self.employee_repo.deactivate(&id)?;
        tracing::info!(employee_id = %id, assignments, "员工已停用");
        Ok(assignments)
    }

    /// 写入员工技能记录
    ///
    /// 同一 (员工, 技能, 设备) 已有在用记录时覆盖等级与日期
    pub fn upsert_skill(
        &self,
        employee_id: &str,
        req: UpsertSkillRequest,
    ) -> ApiResult<SkillAssignmentResult> {
        let employee = self.require_employee(employee_id)?;
        let level = parse_level(&req.level)?;

        let skill_id = parse_id("skillId", &req.skill_id)?;
        if self.skill_repo.find_active_by_id(&skill_id)?.is_none() {
            return Err(ApiError::NotFound(format!("Skill(id={})不存在", skill_id)));
        }

        let machine_id = parse_optional_id("machineId", req.machine_id.as_deref())?;
        if let Some(mid) = &machine_id {
            if self.machine_repo.find_active_by_id(mid)?.is_none() {
                return Err(ApiError::NotFound(format!("Machine(id={})不存在", mid)));
            }
        }

        let (assignment, created) = self.assignment_repo.upsert(&AssignmentUpsert {
            employee_id: &employee.employee_id,
            skill_id: &skill_id,
            machine_id: machine_id.as_deref(),
            level: level.name(),
            acquired_date: parse_date("acquiredDate", req.acquired_date.as_deref())?,
            assessed_date: parse_date("assessedDate", req.assessed_date.as_deref())?,
        })?;

        tracing::info!(
            employee_id = %employee.employee_id,
            skill_id = %skill_id,
            level = %level,
            created,
            "技能记录已写入"
        );
        Ok(SkillAssignmentResult {
            assignment,
            created,
        })
    }

    /// 移除技能记录（软删除）
    ///
    /// 技能记录不属于该员工时返回 NotFound
    pub fn remove_skill(&self, employee_id: &str, assignment_id: &str) -> ApiResult<()> {
        let employee_id = parse_id("employeeId", employee_id)?;
        let id = parse_id("assignmentId", assignment_id)?;
        self.assignment_repo.deactivate(&employee_id, &id)?;
        Ok(())
    }
}
