// ==========================================
// 技能矩阵管理系统 - 技能矩阵导入器
// ==========================================
// 列: employee_name, gender, skill_name, level, [category], [machine_name]
// 流程: 解析文件 → 逐行处理（员工/技能/设备不存在则在目标部门下创建）→ upsert 技能记录
// 错误策略: 单行失败记录 (row, reason) 后继续; 存储不可用时整体中止
// ==========================================

use crate::db::now;
use crate::domain::{Department, Employee, Gender, Machine, Skill, SkillLevel};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{ImportFormat, RawRow};
use crate::repository::{
    AssignmentUpsert, DepartmentRepository, EmployeeRepository, MachineRepository,
    RepositoryError, SkillAssignmentRepository, SkillRepository,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 必需列
pub const REQUIRED_COLUMNS: [&str; 4] = ["employee_name", "gender", "skill_name", "level"];

const DEFAULT_CATEGORY: &str = "General";
const DEFAULT_MACHINE_TYPE: &str = "General";

/// 单行导入失败
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRowError {
    pub row: usize,
    pub reason: String,
}

/// 导入报告
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixImportReport {
    pub department_id: String,
    pub total_rows: usize,
    pub imported: usize,
    pub created_employees: usize,
    pub created_skills: usize,
    pub created_machines: usize,
    pub failed: Vec<ImportRowError>,
}

/// 单行处理结果
enum RowFailure {
    /// 当前行数据问题,跳过
    Row(String),
    /// 存储不可用,中止整批
    Fatal(RepositoryError),
}

impl From<RepositoryError> for RowFailure {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::LockError(_)
            | RepositoryError::DatabaseConnectionError(_)
            | RepositoryError::DatabaseTransactionError(_) => RowFailure::Fatal(err),
            other => RowFailure::Row(other.to_string()),
        }
    }
}

// ==========================================
// MatrixImporter
// ==========================================
pub struct MatrixImporter {
    department_repo: Arc<DepartmentRepository>,
    employee_repo: Arc<EmployeeRepository>,
    skill_repo: Arc<SkillRepository>,
    machine_repo: Arc<MachineRepository>,
    assignment_repo: Arc<SkillAssignmentRepository>,
}

impl MatrixImporter {
    pub fn new(
        department_repo: Arc<DepartmentRepository>,
        employee_repo: Arc<EmployeeRepository>,
        skill_repo: Arc<SkillRepository>,
        machine_repo: Arc<MachineRepository>,
        assignment_repo: Arc<SkillAssignmentRepository>,
    ) -> Self {
        Self {
            department_repo,
            employee_repo,
            skill_repo,
            machine_repo,
            assignment_repo,
        }
    }

    /// 导入技能矩阵文件
    ///
    /// # 参数
    /// - department_id: 目标部门（必须在用）
    /// - format: 文件格式
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(report): 成功行数与失败行明细
    /// - Err: 部门不存在、文件无法解析、缺少必需列、存储不可用
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub fn import(
        &self,
        department_id: &str,
        format: ImportFormat,
        bytes: &[u8],
    ) -> ImportResult<MatrixImportReport> {
        let department = self
            .department_repo
            .find_active_by_id(department_id)?
            .ok_or_else(|| ImportError::DepartmentNotFound(department_id.to_string()))?;

        let rows = format.parser().parse_bytes(bytes)?;
        check_columns(&rows)?;

        let mut report = MatrixImportReport {
            department_id: department.department_id.clone(),
            total_rows: rows.len(),
            ..Default::default()
        };

        for (row_no, row) in &rows {
            match self.import_row(&department, row, &mut report) {
                Ok(()) => report.imported += 1,
                Err(RowFailure::Row(reason)) => {
                    tracing::warn!(row = row_no, %reason, "导入行失败,已跳过");
                    report.failed.push(ImportRowError {
                        row: *row_no,
                        reason,
                    });
                }
                Err(RowFailure::Fatal(e)) => return Err(e.into()),
            }
        }

        tracing::info!(
            department = %department.name,
            imported = report.imported,
            failed = report.failed.len(),
            "技能矩阵导入完成"
        );
        Ok(report)
    }

    fn import_row(
        &self,
        department: &Department,
        row: &HashMap<String, String>,
        report: &mut MatrixImportReport,
    ) -> Result<(), RowFailure> {
        let employee_name = required(row, "employee_name")?;
        let skill_name = required(row, "skill_name")?;
        let level_raw = required(row, "level")?;
        let level = SkillLevel::from_name(level_raw)
            .ok_or_else(|| RowFailure::Row(format!("无法识别的技能等级: {}", level_raw)))?;
        let machine_name = optional(row, "machine_name");
        let ts = now();

        // 员工: 按 (姓名, 部门) 查找,不存在则创建
        let employee = match self
            .employee_repo
            .find_active_by_name_in_department(employee_name, &department.department_id)?
        {
            Some(e) => e,
            None => {
                let gender_raw = required(row, "gender")?;
                let gender = Gender::parse(gender_raw)
                    .ok_or_else(|| RowFailure::Row(format!("无法识别的性别: {}", gender_raw)))?;
                let employee = Employee::new(
                    Uuid::new_v4().to_string(),
                    employee_name.to_string(),
                    gender,
                    department.department_id.clone(),
                    ts,
                );
                self.employee_repo.insert(&employee)?;
                report.created_employees += 1;
                employee
            }
        };

        // 技能: 按名称全局查找,不存在则挂在目标部门下创建
        let skill = match self.skill_repo.find_active_by_name(skill_name)? {
            Some(s) => s,
            None => {
                let skill = Skill::new(
                    Uuid::new_v4().to_string(),
                    skill_name.to_string(),
                    optional(row, "category").unwrap_or(DEFAULT_CATEGORY).to_string(),
                    Some(department.department_id.clone()),
                    machine_name.is_some(),
                    ts,
                );
                self.skill_repo.insert(&skill)?;
                report.created_skills += 1;
                skill
            }
        };

        let machine = match machine_name {
            Some(name) => Some(self.resolve_machine(department, name, report)?),
            None => None,
        };

        self.assignment_repo.upsert(&AssignmentUpsert {
            employee_id: &employee.employee_id,
            skill_id: &skill.skill_id,
            machine_id: machine.as_ref().map(|m| m.machine_id.as_str()),
            level: level.name(),
            acquired_date: None,
            assessed_date: None,
        })?;
        Ok(())
    }

    fn resolve_machine(
        &self,
        department: &Department,
        name: &str,
        report: &mut MatrixImportReport,
    ) -> Result<Machine, RowFailure> {
        if let Some(m) = self
            .machine_repo
            .find_active_by_name_in_department(name, &department.department_id)?
        {
            return Ok(m);
        }
        let machine = Machine::new(
            Uuid::new_v4().to_string(),
            name.to_string(),
            DEFAULT_MACHINE_TYPE.to_string(),
            department.department_id.clone(),
            now(),
        );
        self.machine_repo.insert(&machine)?;
        report.created_machines += 1;
        Ok(machine)
    }
}

fn check_columns(rows: &[RawRow]) -> ImportResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    for column in REQUIRED_COLUMNS {
        if !rows.iter().any(|(_, r)| r.contains_key(column)) {
            return Err(ImportError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

fn required<'a>(row: &'a HashMap<String, String>, column: &str) -> Result<&'a str, RowFailure> {
    optional(row, column).ok_or_else(|| RowFailure::Row(format!("{} 为空", column)))
}

fn optional<'a>(row: &'a HashMap<String, String>, column: &str) -> Option<&'a str> {
    row.get(column).map(String::as_str).filter(|v| !v.is_empty())
}
