// ==========================================
// 技能矩阵管理系统 - 评分引擎数据源
// ==========================================
// 职责: 评分/聚合服务所需的最小存储接口
// 实现: SqliteSkillStore 组合各仓储,连接由调用方注入
// ==========================================

use crate::domain::{
    Department, DepartmentPerformanceRecord, Employee, Machine, PerformanceRow, SkillAssignment,
};
use crate::repository::assignment_repo::SkillAssignmentRepository;
use crate::repository::department_repo::DepartmentRepository;
use crate::repository::employee_repo::EmployeeRepository;
use crate::repository::error::RepositoryResult;
use crate::repository::machine_repo::MachineRepository;
use crate::repository::performance_repo::DepartmentPerformanceRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 评分引擎数据源
///
/// 所有 list_* 只返回在用实体
pub trait SkillStore: Send + Sync {
    fn list_departments(&self) -> RepositoryResult<Vec<Department>>;

    fn find_department(&self, department_id: &str) -> RepositoryResult<Option<Department>>;

    fn find_machine(&self, machine_id: &str) -> RepositoryResult<Option<Machine>>;

    fn list_employees(&self, department_id: Option<&str>) -> RepositoryResult<Vec<Employee>>;

    fn list_machines(&self, department_id: Option<&str>) -> RepositoryResult<Vec<Machine>>;

    fn list_assignments_by_employee(&self, employee_id: &str)
        -> RepositoryResult<Vec<SkillAssignment>>;

    fn list_assignments_by_machine(&self, machine_id: &str)
        -> RepositoryResult<Vec<SkillAssignment>>;

    /// 批量写入绩效记录（同批次原子）
    fn upsert_performance_records(
        &self,
        records: &[DepartmentPerformanceRecord],
    ) -> RepositoryResult<usize>;

    fn list_performance_records(
        &self,
        year: i32,
        department_id: Option<&str>,
    ) -> RepositoryResult<Vec<PerformanceRow>>;
}

// ==========================================
// SqliteSkillStore
// ==========================================
pub struct SqliteSkillStore {
    department_repo: DepartmentRepository,
    employee_repo: EmployeeRepository,
    machine_repo: MachineRepository,
    assignment_repo: SkillAssignmentRepository,
    performance_repo: DepartmentPerformanceRepository,
}

impl SqliteSkillStore {
    /// 从共享连接创建
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            department_repo: DepartmentRepository::new(conn.clone()),
            employee_repo: EmployeeRepository::new(conn.clone()),
            machine_repo: MachineRepository::new(conn.clone()),
            assignment_repo: SkillAssignmentRepository::new(conn.clone()),
            performance_repo: DepartmentPerformanceRepository::new(conn),
        }
    }
}

impl SkillStore for SqliteSkillStore {
    fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        self.department_repo.list_active()
    }

    fn find_department(&self, department_id: &str) -> RepositoryResult<Option<Department>> {
        self.department_repo.find_active_by_id(department_id)
    }

    fn find_machine(&self, machine_id: &str) -> RepositoryResult<Option<Machine>> {
        self.machine_repo.find_active_by_id(machine_id)
    }

    fn list_employees(&self, department_id: Option<&str>) -> RepositoryResult<Vec<Employee>> {
        self.employee_repo.list_active(department_id)
    }

    fn list_machines(&self, department_id: Option<&str>) -> RepositoryResult<Vec<Machine>> {
        self.machine_repo.list_active(department_id)
    }

    fn list_assignments_by_employee(
        &self,
        employee_id: &str,
    ) -> RepositoryResult<Vec<SkillAssignment>> {
        self.assignment_repo.list_active_by_employee(employee_id)
    }

    fn list_assignments_by_machine(
        &self,
        machine_id: &str,
    ) -> RepositoryResult<Vec<SkillAssignment>> {
        self.assignment_repo.list_active_by_machine(machine_id)
    }

    fn upsert_performance_records(
        &self,
        records: &[DepartmentPerformanceRecord],
    ) -> RepositoryResult<usize> {
        self.performance_repo.upsert_batch(records)
    }

    fn list_performance_records(
        &self,
        year: i32,
        department_id: Option<&str>,
    ) -> RepositoryResult<Vec<PerformanceRow>> {
        self.performance_repo.list_by_year(year, department_id)
    }
}
