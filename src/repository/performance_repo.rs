// ==========================================
// 技能矩阵管理系统 - 部门月度绩效仓储
// ==========================================
// 表: department_performance
// 主键: (department_id, year, month)
// 写入: INSERT ... ON CONFLICT DO UPDATE（原地覆盖）
// 并发: 同一 (部门, 年度) 的整批写入在单事务内完成,
//       连接互斥锁 + 事务保证手动重算与定时重算不会丢失更新
// ==========================================

use crate::db::{format_datetime, parse_datetime_column};
use crate::domain::performance::{DepartmentPerformanceRecord, PerformanceRow};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const UPSERT_SQL: &str = r#"
    INSERT INTO department_performance (
        department_id, year, month, score, employee_count, machine_count, calculated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(department_id, year, month) DO UPDATE SET
        score = excluded.score,
        employee_count = excluded.employee_count,
        machine_count = excluded.machine_count,
        calculated_at = excluded.calculated_at
"#;

// ==========================================
// DepartmentPerformanceRepository
// ==========================================
pub struct DepartmentPerformanceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DepartmentPerformanceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入或覆盖单条绩效记录
    pub fn upsert(&self, record: &DepartmentPerformanceRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            UPSERT_SQL,
            params![
                record.department_id,
                record.year,
                record.month,
                record.score,
                record.employee_count,
                record.machine_count,
                format_datetime(&record.calculated_at),
            ],
        )?;
        Ok(())
    }

    /// 批量写入（单事务,全部成功或全部回滚）
    pub fn upsert_batch(&self, records: &[DepartmentPerformanceRecord]) -> RepositoryResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        {
            let mut stmt = tx.prepare(UPSERT_SQL)?;
            for record in records {
                stmt.execute(params![
                    record.department_id,
                    record.year,
                    record.month,
                    record.score,
                    record.employee_count,
                    record.machine_count,
                    format_datetime(&record.calculated_at),
                ])?;
            }
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(records.len())
    }

    /// 查询单条记录
    pub fn find(
        &self,
        department_id: &str,
        year: i32,
        month: u32,
    ) -> RepositoryResult<Option<DepartmentPerformanceRecord>> {
        let conn = self.get_conn()?;
        let record = conn
            .query_row(
                r#"
                SELECT department_id, year, month, score, employee_count, machine_count, calculated_at
                FROM department_performance
                WHERE department_id = ?1 AND year = ?2 AND month = ?3
                "#,
                params![department_id, year, month],
                map_performance_row,
            )
            .optional()?;
        Ok(record)
    }

    /// 按年度查询（仅在用部门）
    ///
    /// # 参数
    /// - year: 年度
    /// - department_id: 部门过滤（可选）
    pub fn list_by_year(
        &self,
        year: i32,
        department_id: Option<&str>,
    ) -> RepositoryResult<Vec<PerformanceRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT p.department_id, p.year, p.month, p.score, p.employee_count,
                   p.machine_count, p.calculated_at, d.name
            FROM department_performance p
            JOIN department d ON d.department_id = p.department_id
            WHERE p.year = ?1
              AND d.is_active = 1
              AND (?2 IS NULL OR p.department_id = ?2)
            ORDER BY p.month, d.name
            "#,
        )?;
        let rows = stmt
            .query_map(params![year, department_id], |row| {
                Ok(PerformanceRow {
                    record: map_performance_row(row)?,
                    department_name: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn map_performance_row(row: &Row<'_>) -> rusqlite::Result<DepartmentPerformanceRecord> {
    Ok(DepartmentPerformanceRecord {
        department_id: row.get(0)?,
        year: row.get(1)?,
        month: row.get(2)?,
        score: row.get(3)?,
        employee_count: row.get(4)?,
        machine_count: row.get(5)?,
        calculated_at: parse_datetime_column(6, &row.get::<_, String>(6)?)?,
    })
}
