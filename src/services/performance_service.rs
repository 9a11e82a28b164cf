// ==========================================
// 技能矩阵管理系统 - 部门月度绩效服务
// ==========================================
// 重算: 每个 (部门, 年度) 计算 1..=maxMonth 后在单事务内批量 upsert
// 查询: 读取已存储记录,按月组装图表序列
// 并发: 每个部门一把重算锁,读取快照 → 计算 → upsert 在锁内完成,
//       手动重算与定时重算对同一部门串行,后开始的重算总是最后写入
// ==========================================

use crate::db::now;
use crate::engine::performance::validate_year;
use crate::domain::Department;
use crate::engine::{
    build_series, Budget, DepartmentSnapshot, EngineError, EngineResult, MonthlyPerformance,
    PerformanceAccumulator,
};
use crate::services::scoring_service::ScoringService;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// 单个部门跳过的月份
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedMonths {
    pub department_id: String,
    pub months: Vec<u32>,
}

/// 重算结果摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationSummary {
    pub year: i32,
    pub departments: u32,
    pub months_processed: u32,
    pub records_written: u32,
    pub skipped: Vec<SkippedMonths>,
}

// ==========================================
// PerformanceService
// ==========================================
pub struct PerformanceService {
    scoring: Arc<ScoringService>,
    accumulator: PerformanceAccumulator,
    /// department_id → 重算锁
    recalc_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PerformanceService {
    pub fn new(scoring: Arc<ScoringService>) -> Self {
        Self {
            scoring,
            accumulator: PerformanceAccumulator::new(),
            recalc_locks: Mutex::new(HashMap::new()),
        }
    }

    fn department_lock(&self, department_id: &str) -> EngineResult<Arc<Mutex<()>>> {
        let mut locks = self
            .recalc_locks
            .lock()
            .map_err(|e| EngineError::UpstreamFailure(format!("重算锁获取失败: {}", e)))?;
        Ok(locks.entry(department_id.to_string()).or_default().clone())
    }

    /// 持有部门重算锁执行: 装载快照 → f
    ///
    /// 锁内装载的快照与写入之间不会插入同部门的其他重算
    fn with_department_locked<T>(
        &self,
        department: &Department,
        budget: &Budget,
        f: impl FnOnce(&DepartmentSnapshot) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let lock = self.department_lock(&department.department_id)?;
        // 锁只保护执行顺序,不保护数据,中毒后继续使用
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.scoring.department_snapshot(department, budget)?;
        f(&snapshot)
    }

    /// 重算年度绩效
    ///
    /// # 参数
    /// - year: 年度
    /// - department_id: 部门过滤（None 表示全部在用部门）
    /// - today: 当前日期（决定 maxMonth）
    /// - budget: 时间预算
    #[tracing::instrument(skip(self, budget))]
    pub fn recalculate(
        &self,
        year: i32,
        department_id: Option<&str>,
        today: NaiveDate,
        budget: &Budget,
    ) -> EngineResult<RecalculationSummary> {
        validate_year(year)?;

        let store = self.scoring.store();
        let departments = match department_id {
            Some(id) => store.find_department(id)?.into_iter().collect(),
            None => store.list_departments()?,
        };

        let mut summary = RecalculationSummary {
            year,
            ..Default::default()
        };

        for department in &departments {
            let (computed, written) = self.with_department_locked(department, budget, |snapshot| {
                let computed = self
                    .accumulator
                    .compute_year(snapshot, year, today, now(), budget)?;
                let written = store.upsert_performance_records(&computed.records)?;
                Ok((computed, written))
            })?;
            summary.departments += 1;
            summary.months_processed += computed.months_processed;
            summary.records_written += written as u32;

            if !computed.skipped_months.is_empty() {
                tracing::debug!(
                    department_id = %department.department_id,
                    months = ?computed.skipped_months,
                    "无有效员工,跳过月份"
                );
                summary.skipped.push(SkippedMonths {
                    department_id: department.department_id.clone(),
                    months: computed.skipped_months,
                });
            }
        }

        tracing::info!(
            year,
            departments = summary.departments,
            records = summary.records_written,
            "部门月度绩效重算完成"
        );
        Ok(summary)
    }

    /// 重算当月（定时任务入口）
    pub fn recalculate_current_month(
        &self,
        today: NaiveDate,
        budget: &Budget,
    ) -> EngineResult<RecalculationSummary> {
        let store = self.scoring.store();
        let year = today.year();
        let month = today.month();

        let mut summary = RecalculationSummary {
            year,
            ..Default::default()
        };
        for department in &store.list_departments()? {
            let written = self.with_department_locked(department, budget, |snapshot| {
                match self
                    .accumulator
                    .compute_month(snapshot, year, month, now(), budget)?
                {
                    Some(record) => Ok(Some(
                        store.upsert_performance_records(std::slice::from_ref(&record))?,
                    )),
                    None => Ok(None),
                }
            })?;
            summary.departments += 1;
            summary.months_processed += 1;
            match written {
                Some(n) => summary.records_written += n as u32,
                None => summary.skipped.push(SkippedMonths {
                    department_id: department.department_id.clone(),
                    months: vec![month],
                }),
            }
        }
        Ok(summary)
    }

    /// 查询年度绩效序列
    ///
    /// # 参数
    /// - recalculate: 先重算再查询
    #[tracing::instrument(skip(self, budget))]
    pub fn performance_series(
        &self,
        year: i32,
        department_id: Option<&str>,
        recalculate: bool,
        today: NaiveDate,
        budget: &Budget,
    ) -> EngineResult<Vec<MonthlyPerformance>> {
        validate_year(year)?;
        if recalculate {
            self.recalculate(year, department_id, today, budget)?;
        }
        let rows = self
            .scoring
            .store()
            .list_performance_records(year, department_id)?;
        Ok(build_series(&rows, year, today))
    }
}
