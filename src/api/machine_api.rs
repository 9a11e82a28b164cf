// ==========================================
// 技能矩阵管理系统 - 设备 API
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{parse_id, parse_optional_id, require_name};
use crate::db::now;
use crate::domain::Machine;
use crate::repository::{DepartmentRepository, MachineRepository};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMachineRequest {
    pub name: String,
    pub machine_type: String,
    pub department_id: String,
}

pub struct MachineApi {
    machine_repo: Arc<MachineRepository>,
    department_repo: Arc<DepartmentRepository>,
}

impl MachineApi {
    pub fn new(machine_repo: Arc<MachineRepository>, department_repo: Arc<DepartmentRepository>) -> Self {
        Self {
            machine_repo,
            department_repo,
        }
    }

    /// 创建设备（部门必须在用）
    pub fn create_machine(&self, req: CreateMachineRequest) -> ApiResult<Machine> {
        let name = require_name("name", &req.name)?;
        let machine_type = require_name("machineType", &req.machine_type)?;
        let department_id = parse_id("departmentId", &req.department_id)?;
        if self.department_repo.find_active_by_id(&department_id)?.is_none() {
            return Err(ApiError::NotFound(format!("Department(id={})不存在", department_id)));
        }

        let machine = Machine::new(Uuid::new_v4().to_string(), name, machine_type, department_id, now());
        self.machine_repo.insert(&machine)?;
        Ok(machine)
    }

    pub fn list_machines(&self, department_id: Option<&str>) -> ApiResult<Vec<Machine>> {
        let department_id = parse_optional_id("departmentId", department_id)?;
        Ok(self.machine_repo.list_active(department_id.as_deref())?)
    }

    /// 软删除设备（同时停用设备上的技能记录）
    pub fn delete_machine(&self, machine_id: &str) -> ApiResult<usize> {
        let id = parse_id("machineId", machine_id)?;
        Ok(self.machine_repo.deactivate(&id)?)
    }
}
