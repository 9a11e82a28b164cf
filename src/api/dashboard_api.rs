// ==========================================
// 技能矩阵管理系统 - 驾驶舱 API
// ==========================================
// 职责: 部门/设备/员工技能统计,部门月度绩效查询与重算
// 架构: API 层 → 服务层 (ScoringService / PerformanceService) → 引擎层
// 预算: 每次调用按 config_kv 中的 scoring.aggregation_budget_ms 创建
// ==========================================

use crate::api::error::ApiResult;
use crate::api::validator::parse_optional_id;
use crate::config::ConfigManager;
use crate::engine::{Budget, DepartmentStats, EmployeeScore, MachineStats, MonthlyPerformance};
use crate::services::{PerformanceService, RecalculationSummary, ScoringService};
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    scoring: Arc<ScoringService>,
    performance: Arc<PerformanceService>,
    config_manager: Arc<ConfigManager>,
}

impl DashboardApi {
    pub fn new(
        scoring: Arc<ScoringService>,
        performance: Arc<PerformanceService>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            scoring,
            performance,
            config_manager,
        }
    }

    fn budget(&self) -> ApiResult<Budget> {
        Ok(Budget::from_millis(
            self.config_manager.get_aggregation_budget_ms()?,
        ))
    }

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// 部门技能统计
    ///
    /// # 参数
    /// - department_id: 部门过滤（未命中 → 空列表）
    pub fn department_stats(&self, department_id: Option<&str>) -> ApiResult<Vec<DepartmentStats>> {
        let department_id = parse_optional_id("departmentId", department_id)?;
        Ok(self
            .scoring
            .department_stats(department_id.as_deref(), &self.budget()?)?)
    }

    /// 设备技能统计
    pub fn machine_stats(
        &self,
        department_id: Option<&str>,
        machine_id: Option<&str>,
    ) -> ApiResult<Vec<MachineStats>> {
        let department_id = parse_optional_id("departmentId", department_id)?;
        let machine_id = parse_optional_id("machineId", machine_id)?;
        Ok(self.scoring.machine_stats(
            department_id.as_deref(),
            machine_id.as_deref(),
            &self.budget()?,
        )?)
    }

    /// 员工技能分
    pub fn employee_scores(&self, department_id: Option<&str>) -> ApiResult<Vec<EmployeeScore>> {
        let department_id = parse_optional_id("departmentId", department_id)?;
        Ok(self
            .scoring
            .employee_scores(department_id.as_deref(), &self.budget()?)?)
    }

    /// 部门月度绩效序列
    ///
    /// # 参数
    /// - year: 年度（默认当前年）
    /// - recalculate: 查询前先重算（默认取 performance.recalc_on_read）
    pub fn performance_series(
        &self,
        year: Option<i32>,
        department_id: Option<&str>,
        recalculate: Option<bool>,
    ) -> ApiResult<Vec<MonthlyPerformance>> {
        self.performance_series_at(year, department_id, recalculate, Self::today())
    }

    /// 同 performance_series,指定当前日期
    pub fn performance_series_at(
        &self,
        year: Option<i32>,
        department_id: Option<&str>,
        recalculate: Option<bool>,
        today: NaiveDate,
    ) -> ApiResult<Vec<MonthlyPerformance>> {
        let department_id = parse_optional_id("departmentId", department_id)?;
        let recalculate = match recalculate {
            Some(flag) => flag,
            None => self.config_manager.get_recalc_on_read()?,
        };
        Ok(self.performance.performance_series(
            year.unwrap_or_else(|| today.year()),
            department_id.as_deref(),
            recalculate,
            today,
            &self.budget()?,
        )?)
    }

    /// 重算部门月度绩效
    pub fn recalculate_performance(
        &self,
        year: Option<i32>,
        department_id: Option<&str>,
    ) -> ApiResult<RecalculationSummary> {
        self.recalculate_performance_at(year, department_id, Self::today())
    }

    /// 同 recalculate_performance,指定当前日期
    pub fn recalculate_performance_at(
        &self,
        year: Option<i32>,
        department_id: Option<&str>,
        today: NaiveDate,
    ) -> ApiResult<RecalculationSummary> {
        let department_id = parse_optional_id("departmentId", department_id)?;
        Ok(self.performance.recalculate(
            year.unwrap_or_else(|| today.year()),
            department_id.as_deref(),
            today,
            &self.budget()?,
        )?)
    }

    /// 重算当月（定时任务）
    pub fn recalculate_current_month(&self) -> ApiResult<RecalculationSummary> {
        Ok(self
            .performance
            .recalculate_current_month(Self::today(), &self.budget()?)?)
    }
}
