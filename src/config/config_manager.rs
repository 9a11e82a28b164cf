// ==========================================
// 技能矩阵管理系统 - 配置管理器
// ==========================================
// 职责: 运行期可调参数的查询与覆写
// 存储: config_kv 表 (scope_id='global')
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 聚合预算默认值（毫秒）
pub const DEFAULT_AGGREGATION_BUDGET_MS: u64 = 5000;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从共享连接创建
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 全部 global 配置快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    // ===== 评分配置 =====

    /// 单次聚合/重算的时间预算（毫秒,0 表示不限）
    ///
    /// 配置值无法解析时回退到默认值
    pub fn get_aggregation_budget_ms(&self) -> RepositoryResult<u64> {
        let raw = self.get_config_value(config_keys::AGGREGATION_BUDGET_MS)?;
        Ok(match raw {
            Some(v) => v.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %v, "聚合预算配置无效,使用默认值");
                DEFAULT_AGGREGATION_BUDGET_MS
            }),
            None => DEFAULT_AGGREGATION_BUDGET_MS,
        })
    }

    /// 查询绩效序列前是否默认先重算
    pub fn get_recalc_on_read(&self) -> RepositoryResult<bool> {
        let raw = self.get_config_value(config_keys::RECALC_ON_READ)?;
        Ok(matches!(
            raw.as_deref().map(str::trim),
            Some("true") | Some("1") | Some("yes")
        ))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const AGGREGATION_BUDGET_MS: &str = "scoring.aggregation_budget_ms";
    pub const RECALC_ON_READ: &str = "performance.recalc_on_read";
}
