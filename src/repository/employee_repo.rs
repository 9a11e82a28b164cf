// ==========================================
// 技能矩阵管理系统 - 员工数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 员工只做软删除
// ==========================================

use crate::db::{format_datetime, now, parse_datetime_column};
use crate::domain::employee::Employee;
use crate::domain::types::Gender;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const EMPLOYEE_COLUMNS: &str =
    "employee_id, name, gender, department_id, is_active, created_at, updated_at";

// ==========================================
// EmployeeRepository - 员工仓储
// ==========================================
pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入员工
    pub fn insert(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO employee (
                employee_id, name, gender, department_id, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                employee.employee_id,
                employee.name,
                employee.gender.as_str(),
                employee.department_id,
                employee.is_active,
                format_datetime(&employee.created_at),
                format_datetime(&employee.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 按ID查询在职员工
    pub fn find_active_by_id(&self, employee_id: &str) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM employee WHERE employee_id = ?1 AND is_active = 1",
            EMPLOYEE_COLUMNS
        );
        let employee = conn
            .query_row(&sql, params![employee_id], map_employee_row)
            .optional()?;
        Ok(employee)
    }

    /// 按名称在部门内查询在职员工（导入时用于去重）
    pub fn find_active_by_name_in_department(
        &self,
        name: &str,
        department_id: &str,
    ) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM employee WHERE name = ?1 AND department_id = ?2 AND is_active = 1 \
             ORDER BY created_at LIMIT 1",
            EMPLOYEE_COLUMNS
        );
        let employee = conn
            .query_row(&sql, params![name, department_id], map_employee_row)
            .optional()?;
        Ok(employee)
    }

    /// 查询在职员工
    ///
    /// # 参数
    /// - department_id: 部门过滤（None 表示全部在用部门）
    ///
    /// 仅返回所属部门仍在用的员工;
    /// 单行字段解析失败的员工记录告警后跳过,其余错误直接返回
    pub fn list_active(&self, department_id: Option<&str>) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT e.employee_id, e.name, e.gender, e.department_id, e.is_active,
                   e.created_at, e.updated_at
            FROM employee e
            JOIN department d ON d.department_id = e.department_id
            WHERE e.is_active = 1
              AND d.is_active = 1
              AND (?1 IS NULL OR e.department_id = ?1)
            ORDER BY e.name, e.employee_id
            "#,
        )?;
        let mut rows = stmt.query(params![department_id])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            match map_employee_row(row).map_err(RepositoryError::from) {
                Ok(employee) => employees.push(employee),
                Err(e) if e.is_row_level() => {
                    let employee_id: String = row.get(0)?;
                    tracing::warn!(
                        employee_id = %employee_id,
                        error = %e,
                        "员工记录解析失败,跳过该员工"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(employees)
    }

    /// 调整员工所属部门
    pub fn update_department(&self, employee_id: &str, department_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE employee SET department_id = ?2, updated_at = ?3 WHERE employee_id = ?1 AND is_active = 1",
            params![employee_id, department_id, format_datetime(&now())],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: employee_id.to_string(),
            });
        }
        Ok(())
    }

    /// 软删除员工及其技能记录（单事务）
    ///
    /// # 返回
    /// 被停用的技能记录数
    pub fn deactivate(&self, employee_id: &str) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let ts = format_datetime(&now());

        let affected = tx.execute(
            "UPDATE employee SET is_active = 0, updated_at = ?2 WHERE employee_id = ?1 AND is_active = 1",
            params![employee_id, ts],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: employee_id.to_string(),
            });
        }
        let assignments = tx.execute(
            "UPDATE employee_skill SET is_active = 0, updated_at = ?2 WHERE employee_id = ?1 AND is_active = 1",
            params![employee_id, ts],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(assignments)
    }
}

/// 行映射: employee
pub(crate) fn map_employee_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    let gender_raw: String = row.get(2)?;
    let gender = Gender::parse(&gender_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("无法识别的性别: {}", gender_raw).into(),
        )
    })?;

    Ok(Employee {
        employee_id: row.get(0)?,
        name: row.get(1)?,
        gender,
        department_id: row.get(3)?,
        is_active: row.get(4)?,
        created_at: parse_datetime_column(5, &row.get::<_, String>(5)?)?,
        updated_at: parse_datetime_column(6, &row.get::<_, String>(6)?)?,
    })
}
