// ==========================================
// 技能矩阵管理系统 - 部门月度绩效累加器
// ==========================================
// 月份范围: 1..=maxMonth
//   maxMonth = 当月 (year == 当前年), 12 (往年), 0 (未来年份,不预测)
// 单月计算:
//   1. 跳过无技能记录的员工
//   2. employeeAvg = mean(level_to_points) (1-4)
//   3. rawAvg = Σ employeeAvg / validEmployeeCount
//   4. score = ((rawAvg - 1) / 3) × 100, 截断到 [0, 100]
//   machineCount 只记录,不参与计分
//   validEmployeeCount = 0 时不产生记录（已有记录保持不变）
// 查询: 每月一行 { month, <部门名>: 四舍五入分数 },无记录的部门不出现
// ==========================================

use crate::domain::performance::{DepartmentPerformanceRecord, PerformanceRow};
use crate::engine::budget::Budget;
use crate::engine::employee_score::employee_score;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::snapshot::DepartmentSnapshot;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// 月份简称（图表横轴）
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 可接受的年份范围
pub const MIN_YEAR: i32 = 1970;
pub const MAX_YEAR: i32 = 9999;

/// 月度绩效行（图表数据）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPerformance {
    /// 月份序号 1-12（不序列化）
    #[serde(skip)]
    pub month_index: u32,
    /// 月份简称
    pub month: String,
    /// 部门名称 → 四舍五入后的分数
    #[serde(flatten)]
    pub scores: BTreeMap<String, i64>,
}

/// 年度重算结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearComputation {
    pub records: Vec<DepartmentPerformanceRecord>,
    pub months_processed: u32,
    /// 无有效员工、未生成记录的月份
    pub skipped_months: Vec<u32>,
}

/// 计算某年度需要处理的最大月份
pub fn month_bound(year: i32, today: NaiveDate) -> u32 {
    match year.cmp(&today.year()) {
        Ordering::Equal => today.month(),
        Ordering::Less => 12,
        Ordering::Greater => 0,
    }
}

/// 1-4 分制 → 百分制 ((raw - 1) / 3 × 100), 截断到 [0, 100]
pub fn percentage_score(raw_avg: f64) -> f64 {
    (((raw_avg - 1.0) / 3.0) * 100.0).clamp(0.0, 100.0)
}

/// 校验年份
pub fn validate_year(year: i32) -> EngineResult<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(EngineError::InvalidArgument(format!(
            "年份超出范围 [{}, {}]: {}",
            MIN_YEAR, MAX_YEAR, year
        )));
    }
    Ok(())
}

// ==========================================
// PerformanceAccumulator - 月度绩效累加器
// ==========================================
pub struct PerformanceAccumulator {
    // 无状态引擎,持久化由服务层处理
}

impl PerformanceAccumulator {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算单个部门单月绩效
    ///
    /// # 返回
    /// - Ok(Some(record)): 有效员工数 > 0
    /// - Ok(None): 无有效员工,不写入
    /// - Err(InvalidArgument): 月份不在 1-12
    /// - Err(Timeout): 超出预算
    pub fn compute_month(
        &self,
        snapshot: &DepartmentSnapshot,
        year: i32,
        month: u32,
        calculated_at: NaiveDateTime,
        budget: &Budget,
    ) -> EngineResult<Option<DepartmentPerformanceRecord>> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidArgument(format!(
                "月份必须在 1-12 之间: {}",
                month
            )));
        }

        let mut total_employee_scores = 0.0_f64;
        let mut valid_employee_count: u32 = 0;

        for employee in &snapshot.employees {
            budget.check("monthly_performance")?;
            if let Some(avg) = employee_score(&employee.levels) {
                total_employee_scores += avg;
                valid_employee_count += 1;
            }
        }

        if valid_employee_count == 0 {
            return Ok(None);
        }

        let raw_avg = total_employee_scores / f64::from(valid_employee_count);
        Ok(Some(DepartmentPerformanceRecord {
            department_id: snapshot.department_id.clone(),
            year,
            month,
            score: percentage_score(raw_avg),
            employee_count: valid_employee_count,
            machine_count: snapshot.machine_count,
            calculated_at,
        }))
    }

    /// 计算部门整年度（1..=maxMonth）
    pub fn compute_year(
        &self,
        snapshot: &DepartmentSnapshot,
        year: i32,
        today: NaiveDate,
        calculated_at: NaiveDateTime,
        budget: &Budget,
    ) -> EngineResult<YearComputation> {
        validate_year(year)?;

        let max_month = month_bound(year, today);
        let mut result = YearComputation::default();

        for month in 1..=max_month {
            result.months_processed += 1;
            match self.compute_month(snapshot, year, month, calculated_at, budget)? {
                Some(record) => result.records.push(record),
                None => result.skipped_months.push(month),
            }
        }

        Ok(result)
    }
}

impl Default for PerformanceAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// 由已存储的记录构造月度序列
///
/// 只输出 1..=maxMonth; 缺失的 (月, 部门) 直接不出现,不补零
pub fn build_series(rows: &[PerformanceRow], year: i32, today: NaiveDate) -> Vec<MonthlyPerformance> {
    let max_month = month_bound(year, today);
    let mut series: Vec<MonthlyPerformance> = (1..=max_month)
        .map(|m| MonthlyPerformance {
            month_index: m,
            month: MONTH_LABELS[(m - 1) as usize].to_string(),
            scores: BTreeMap::new(),
        })
        .collect();

    for row in rows {
        if row.record.year != year {
            continue;
        }
        let month = row.record.month;
        if month == 0 || month > max_month {
            continue;
        }
        series[(month - 1) as usize]
            .scores
            .insert(row.department_name.clone(), row.record.score.round() as i64);
    }

    series
}
