// ==========================================
// 技能矩阵管理系统 - 设备数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::{format_datetime, now, parse_datetime_column};
use crate::domain::department::Machine;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const MACHINE_COLUMNS: &str =
    "machine_id, name, machine_type, department_id, is_active, created_at, updated_at";

// ==========================================
// MachineRepository - 设备仓储
// ==========================================
pub struct MachineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MachineRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入设备
    pub fn insert(&self, machine: &Machine) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO machine (
                machine_id, name, machine_type, department_id, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                machine.machine_id,
                machine.name,
                machine.machine_type,
                machine.department_id,
                machine.is_active,
                format_datetime(&machine.created_at),
                format_datetime(&machine.updated_at),
            ],
        )?;
        Ok(())
    }

    /// 按ID查询在用设备
    pub fn find_active_by_id(&self, machine_id: &str) -> RepositoryResult<Option<Machine>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM machine WHERE machine_id = ?1 AND is_active = 1",
            MACHINE_COLUMNS
        );
        let machine = conn
            .query_row(&sql, params![machine_id], map_machine_row)
            .optional()?;
        Ok(machine)
    }

    /// 按名称在部门内查询在用设备
    pub fn find_active_by_name_in_department(
        &self,
        name: &str,
        department_id: &str,
    ) -> RepositoryResult<Option<Machine>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM machine WHERE name = ?1 AND department_id = ?2 AND is_active = 1 \
             ORDER BY created_at LIMIT 1",
            MACHINE_COLUMNS
        );
        let machine = conn
            .query_row(&sql, params![name, department_id], map_machine_row)
            .optional()?;
        Ok(machine)
    }

    /// 查询在用设备（可按部门过滤）
    pub fn list_active(&self, department_id: Option<&str>) -> RepositoryResult<Vec<Machine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT m.machine_id, m.name, m.machine_type, m.department_id, m.is_active,
                   m.created_at, m.updated_at
            FROM machine m
            JOIN department d ON d.department_id = m.department_id
            WHERE m.is_active = 1
              AND d.is_active = 1
              AND (?1 IS NULL OR m.department_id = ?1)
            ORDER BY m.name, m.machine_id
            "#,
        )?;
        let machines = stmt
            .query_map(params![department_id], map_machine_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(machines)
    }

    /// 停用设备及其关联技能记录（单事务）
    pub fn deactivate(&self, machine_id: &str) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let ts = format_datetime(&now());

        let affected = tx.execute(
            "UPDATE machine SET is_active = 0, updated_at = ?2 WHERE machine_id = ?1 AND is_active = 1",
            params![machine_id, ts],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Machine".to_string(),
                id: machine_id.to_string(),
            });
        }
        let assignments = tx.execute(
            "UPDATE employee_skill SET is_active = 0, updated_at = ?2 WHERE machine_id = ?1 AND is_active = 1",
            params![machine_id, ts],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(assignments)
    }
}

/// 行映射: machine
pub(crate) fn map_machine_row(row: &Row<'_>) -> rusqlite::Result<Machine> {
    Ok(Machine {
        machine_id: row.get(0)?,
        name: row.get(1)?,
        machine_type: row.get(2)?,
        department_id: row.get(3)?,
        is_active: row.get(4)?,
        created_at: parse_datetime_column(5, &row.get::<_, String>(5)?)?,
        updated_at: parse_datetime_column(6, &row.get::<_, String>(6)?)?,
    })
}
