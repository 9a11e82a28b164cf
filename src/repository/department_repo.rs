// ==========================================
// 技能矩阵管理系统 - 部门数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::db::{format_datetime, now, parse_datetime_column};
use crate::domain::department::Department;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::sync::{Arc, Mutex, MutexGuard};

const DEPARTMENT_COLUMNS: &str =
    "department_id, name, description, is_active, created_at, updated_at";

/// 部门级联停用结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeDeactivation {
    pub employees: usize,
    pub machines: usize,
    pub assignments: usize,
}

// ==========================================
// DepartmentRepository - 部门仓储
// ==========================================
pub struct DepartmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DepartmentRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入部门
    pub fn insert(&self, department: &Department) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO department (
                department_id, name, description, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                department.department_id,
                department.name,
                department.description,
                department.is_active,
                format_datetime(&department.created_at),
                format_datetime(&department.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 按ID查询部门（含已停用）
    pub fn find_by_id(&self, department_id: &str) -> RepositoryResult<Option<Department>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM department WHERE department_id = ?1",
            DEPARTMENT_COLUMNS
        );
        let dept = conn
            .query_row(&sql, params![department_id], map_department_row)
            .optional()?;
        Ok(dept)
    }

    /// 按ID查询在用部门
    pub fn find_active_by_id(&self, department_id: &str) -> RepositoryResult<Option<Department>> {
        Ok(self.find_by_id(department_id)?.filter(|d| d.is_active))
    }

    /// 按名称查询在用部门
    pub fn find_active_by_name(&self, name: &str) -> RepositoryResult<Option<Department>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM department WHERE name = ?1 AND is_active = 1",
            DEPARTMENT_COLUMNS
        );
        let dept = conn
            .query_row(&sql, params![name], map_department_row)
            .optional()?;
        Ok(dept)
    }

    /// 查询全部在用部门（按名称排序）
    pub fn list_active(&self) -> RepositoryResult<Vec<Department>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM department WHERE is_active = 1 ORDER BY name",
            DEPARTMENT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let departments = stmt
            .query_map([], map_department_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(departments)
    }

    /// 统计部门下在职员工数与在用设备数
    pub fn count_active_members(&self, department_id: &str) -> RepositoryResult<(u32, u32)> {
        let conn = self.get_conn()?;
        Ok(count_members(&conn, department_id)?)
    }

    /// 停用部门（仅部门本身,单事务内先检查成员）
    ///
    /// # 返回
    /// - Ok(true): 已停用
    /// - Ok(false): 部门不存在或已停用
    /// - Err(BusinessRuleViolation): 仍有在职员工或在用设备
    pub fn deactivate(&self, department_id: &str) -> RepositoryResult<bool> {
        let mut conn = self.get_conn()?;
        // IMMEDIATE: 检查与停用之间其他连接无法写入
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let (employees, machines) = count_members(&tx, department_id)?;
        if employees > 0 || machines > 0 {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "部门仍有 {} 名在职员工、{} 台在用设备,无法停用",
                employees, machines
            )));
        }
        let affected = tx.execute(
            "UPDATE department SET is_active = 0, updated_at = ?2 WHERE department_id = ?1 AND is_active = 1",
            params![department_id, format_datetime(&now())],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(affected > 0)
    }

    /// 级联停用部门（单事务）
    ///
    /// 顺序: 技能记录 → 员工 → 设备 → 部门
    pub fn deactivate_cascade(&self, department_id: &str) -> RepositoryResult<CascadeDeactivation> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let ts = format_datetime(&now());

        let assignments = tx.execute(
            r#"
            UPDATE employee_skill SET is_active = 0, updated_at = ?2
            WHERE is_active = 1
              AND (
                employee_id IN (SELECT employee_id FROM employee WHERE department_id = ?1)
                OR machine_id IN (SELECT machine_id FROM machine WHERE department_id = ?1)
              )
            "#,
            params![department_id, ts],
        )?;
        let employees = tx.execute(
            "UPDATE employee SET is_active = 0, updated_at = ?2 WHERE department_id = ?1 AND is_active = 1",
            params![department_id, ts],
        )?;
        let machines = tx.execute(
            "UPDATE machine SET is_active = 0, updated_at = ?2 WHERE department_id = ?1 AND is_active = 1",
            params![department_id, ts],
        )?;
        let departments = tx.execute(
            "UPDATE department SET is_active = 0, updated_at = ?2 WHERE department_id = ?1 AND is_active = 1",
            params![department_id, ts],
        )?;
        if departments == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Department".to_string(),
                id: department_id.to_string(),
            });
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(CascadeDeactivation {
            employees,
            machines,
            assignments,
        })
    }
}

fn count_members(conn: &Connection, department_id: &str) -> rusqlite::Result<(u32, u32)> {
    conn.query_row(
        r#"
        SELECT
            (SELECT COUNT(*) FROM employee WHERE department_id = ?1 AND is_active = 1),
            (SELECT COUNT(*) FROM machine WHERE department_id = ?1 AND is_active = 1)
        "#,
        params![department_id],
        |row| Ok((row.get::<_, u32>(0)?, row.get::<_, u32>(1)?)),
    )
}

/// 行映射: department
pub(crate) fn map_department_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        department_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        is_active: row.get(3)?,
        created_at: parse_datetime_column(4, &row.get::<_, String>(4)?)?,
        updated_at: parse_datetime_column(5, &row.get::<_, String>(5)?)?,
    })
}
