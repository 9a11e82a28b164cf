// ==========================================
// 技能矩阵管理系统 - 员工技能记录仓储
// ==========================================
// 表: employee_skill
// 约束: 同一 (员工, 技能, 设备) 至多一条在用记录
//       upsert 覆盖等级/日期,不产生重复记录
// ==========================================

use crate::db::{format_date, format_datetime, now, parse_date_column, parse_datetime_column};
use crate::domain::employee::SkillAssignment;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// 技能记录写入参数
#[derive(Debug, Clone)]
pub struct AssignmentUpsert<'a> {
    pub employee_id: &'a str,
    pub skill_id: &'a str,
    pub machine_id: Option<&'a str>,
    pub level: &'a str,
    pub acquired_date: Option<NaiveDate>,
    pub assessed_date: Option<NaiveDate>,
}

// ==========================================
// SkillAssignmentRepository
// ==========================================
pub struct SkillAssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SkillAssignmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入或覆盖技能记录（单事务）
    ///
    /// # 返回
    /// - (SkillAssignment, true): 新建
    /// - (SkillAssignment, false): 覆盖已有在用记录
    ///
    /// 日期参数为 None 时保留原值
    pub fn upsert(&self, input: &AssignmentUpsert<'_>) -> RepositoryResult<(SkillAssignment, bool)> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let ts = format_datetime(&now());
        let acquired = input.acquired_date.as_ref().map(format_date);
        let assessed = input.assessed_date.as_ref().map(format_date);

        let existing: Option<String> = tx
            .query_row(
                r#"
                SELECT assignment_id FROM employee_skill
                WHERE employee_id = ?1
                  AND skill_id = ?2
                  AND IFNULL(machine_id, '') = IFNULL(?3, '')
                  AND is_active = 1
                "#,
                params![input.employee_id, input.skill_id, input.machine_id],
                |row| row.get(0),
            )
            .optional()?;

        let (assignment_id, created) = match existing {
            Some(id) => {
                tx.execute(
                    r#"
                    UPDATE employee_skill
                    SET level = ?2,
                        acquired_date = COALESCE(?3, acquired_date),
                        assessed_date = COALESCE(?4, assessed_date),
                        updated_at = ?5
                    WHERE assignment_id = ?1
                    "#,
                    params![id, input.level, acquired, assessed, ts],
                )?;
                (id, false)
            }
            None => {
                let id = Uuid::new_v4().to_string();
                tx.execute(
                    r#"
                    INSERT INTO employee_skill (
                        assignment_id, employee_id, skill_id, machine_id, level,
                        acquired_date, assessed_date, is_active, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)
                    "#,
                    params![
                        id,
                        input.employee_id,
                        input.skill_id,
                        input.machine_id,
                        input.level,
                        acquired,
                        assessed,
                        ts,
                    ],
                )?;
                (id, true)
            }
        };

        let assignment = tx.query_row(
            "SELECT assignment_id, employee_id, skill_id, machine_id, level, acquired_date, \
             assessed_date, is_active, updated_at FROM employee_skill WHERE assignment_id = ?1",
            params![assignment_id],
            map_assignment_row,
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok((assignment, created))
    }

    /// 查询员工的在用技能记录（仅在用技能）
    pub fn list_active_by_employee(&self, employee_id: &str) -> RepositoryResult<Vec<SkillAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT a.assignment_id, a.employee_id, a.skill_id, a.machine_id, a.level,
                   a.acquired_date, a.assessed_date, a.is_active, a.updated_at
            FROM employee_skill a
            JOIN skill s ON s.skill_id = a.skill_id
            WHERE a.employee_id = ?1
              AND a.is_active = 1
              AND s.is_active = 1
            ORDER BY s.name, a.assignment_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![employee_id], map_assignment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// 查询设备上的在用技能记录（仅在职员工、在用技能）
    pub fn list_active_by_machine(&self, machine_id: &str) -> RepositoryResult<Vec<SkillAssignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT a.assignment_id, a.employee_id, a.skill_id, a.machine_id, a.level,
                   a.acquired_date, a.assessed_date, a.is_active, a.updated_at
            FROM employee_skill a
            JOIN employee e ON e.employee_id = a.employee_id
            JOIN skill s ON s.skill_id = a.skill_id
            WHERE a.machine_id = ?1
              AND a.is_active = 1
              AND e.is_active = 1
              AND s.is_active = 1
            ORDER BY a.employee_id, a.assignment_id
            "#,
        )?;
        let rows = stmt
            .query_map(params![machine_id], map_assignment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// 停用单条技能记录
    ///
    /// 记录必须属于 employee_id,否则视为未找到
    pub fn deactivate(&self, employee_id: &str, assignment_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE employee_skill SET is_active = 0, updated_at = ?3 \
             WHERE assignment_id = ?1 AND employee_id = ?2 AND is_active = 1",
            params![assignment_id, employee_id, format_datetime(&now())],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "SkillAssignment".to_string(),
                id: assignment_id.to_string(),
            });
        }
        Ok(())
    }
}

pub(crate) fn map_assignment_row(row: &Row<'_>) -> rusqlite::Result<SkillAssignment> {
    Ok(SkillAssignment {
        assignment_id: row.get(0)?,
        employee_id: row.get(1)?,
        skill_id: row.get(2)?,
        machine_id: row.get(3)?,
        level: row.get(4)?,
        acquired_date: parse_date_column(5, row.get(5)?)?,
        assessed_date: parse_date_column(6, row.get(6)?)?,
        is_active: row.get(7)?,
        updated_at: parse_datetime_column(8, &row.get::<_, String>(8)?)?,
    })
}
