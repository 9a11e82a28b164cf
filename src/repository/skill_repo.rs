// ==========================================
// 技能矩阵管理系统 - 技能数据仓储
// ==========================================

use crate::db::{format_datetime, now, parse_datetime_column};
use crate::domain::skill::Skill;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SKILL_COLUMNS: &str = "skill_id, name, category, is_machine_related, is_critical, \
                             department_id, is_active, created_at, updated_at";

/// 技能仓储
pub struct SkillRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SkillRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, skill: &Skill) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO skill (
                skill_id, name, category, is_machine_related, is_critical,
                department_id, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                skill.skill_id,
                skill.name,
                skill.category,
                skill.is_machine_related,
                skill.is_critical,
                skill.department_id,
                skill.is_active,
                format_datetime(&skill.created_at),
                format_datetime(&skill.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_active_by_id(&self, skill_id: &str) -> RepositoryResult<Option<Skill>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM skill WHERE skill_id = ?1 AND is_active = 1",
            SKILL_COLUMNS
        );
        let skill = conn
            .query_row(&sql, params![skill_id], map_skill_row)
            .optional()?;
        Ok(skill)
    }

    pub fn find_active_by_name(&self, name: &str) -> RepositoryResult<Option<Skill>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM skill WHERE name = ?1 AND is_active = 1",
            SKILL_COLUMNS
        );
        let skill = conn
            .query_row(&sql, params![name], map_skill_row)
            .optional()?;
        Ok(skill)
    }

    /// 查询在用技能
    ///
    /// # 参数
    /// - category: 分类过滤
    /// - department_id: 部门过滤（同时包含 department_id 为空的通用技能）
    pub fn list_active(
        &self,
        category: Option<&str>,
        department_id: Option<&str>,
    ) -> RepositoryResult<Vec<Skill>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT {} FROM skill
            WHERE is_active = 1
              AND (?1 IS NULL OR category = ?1)
              AND (?2 IS NULL OR department_id IS NULL OR department_id = ?2)
            ORDER BY category, name
            "#,
            SKILL_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let skills = stmt
            .query_map(params![category, department_id], map_skill_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(skills)
    }

    /// 停用技能及其技能记录（单事务）
    pub fn deactivate(&self, skill_id: &str) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let ts = format_datetime(&now());

        let affected = tx.execute(
            "UPDATE skill SET is_active = 0, updated_at = ?2 WHERE skill_id = ?1 AND is_active = 1",
            params![skill_id, ts],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Skill".to_string(),
                id: skill_id.to_string(),
            });
        }
        let assignments = tx.execute(
            "UPDATE employee_skill SET is_active = 0, updated_at = ?2 WHERE skill_id = ?1 AND is_active = 1",
            params![skill_id, ts],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(assignments)
    }
}

pub(crate) fn map_skill_row(row: &Row<'_>) -> rusqlite::Result<Skill> {
    Ok(Skill {
        skill_id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        is_machine_related: row.get(3)?,
        is_critical: row.get(4)?,
        department_id: row.get(5)?,
        is_active: row.get(6)?,
        created_at: parse_datetime_column(7, &row.get::<_, String>(7)?)?,
        updated_at: parse_datetime_column(8, &row.get::<_, String>(8)?)?,
    })
}
