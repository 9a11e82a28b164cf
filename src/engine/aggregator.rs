// ==========================================
// 技能矩阵管理系统 - 部门/设备技能聚合引擎
// ==========================================
// 部门:
//   averageScore = round(mean(员工分) × 25), 只统计有技能记录的员工
//   skillBreakdown 按技能记录逐条计数（与平均分无关）,键为等级字面值
// 设备:
//   公式相同,但逐条遍历设备上的技能记录;
//   operatorCount = 技能记录条数（同一员工在同一设备上有两项技能计 2 次）
// 无有效数据时: averageScore = 0, skillBreakdown 全零
// ==========================================

use crate::engine::budget::Budget;
use crate::engine::employee_score::{employee_score, to_percentage};
use crate::engine::error::EngineResult;
use crate::engine::level_codec::{level_to_points, zero_breakdown};
use crate::engine::snapshot::{DepartmentSnapshot, MachineSkills};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 部门技能统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    pub department_id: String,
    pub department_name: String,
    /// 快照内在职员工数
    ///
    /// 员工行或其技能记录存在脏数据时,该员工在装载阶段已被跳过,不计入本字段
    pub employee_count: u32,
    /// 有技能记录、参与计分的员工数
    pub valid_employee_count: u32,
    /// 0-100
    pub average_score: u32,
    pub skill_breakdown: BTreeMap<String, u32>,
}

/// 设备技能统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineStats {
    pub machine_id: String,
    pub machine_name: String,
    pub machine_type: String,
    pub department_id: String,
    /// 技能记录条数（不是去重后的员工数）
    pub operator_count: u32,
    pub average_score: u32,
    pub skill_breakdown: BTreeMap<String, u32>,
}

// ==========================================
// SkillAggregator - 聚合引擎
// ==========================================
pub struct SkillAggregator {
    // 无状态引擎,数据装载由服务层负责
}

impl SkillAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 部门聚合
    ///
    /// # 参数
    /// - snapshot: 部门快照
    /// - budget: 时间预算（每名员工检查一次）
    ///
    /// # 返回
    /// - Ok(DepartmentStats)
    /// - Err(EngineError::Timeout): 超出预算,不返回部分结果
    pub fn aggregate_department(
        &self,
        snapshot: &DepartmentSnapshot,
        budget: &Budget,
    ) -> EngineResult<DepartmentStats> {
        let mut breakdown = zero_breakdown();
        let mut total_score = 0.0_f64;
        let mut valid_count: u32 = 0;

        for employee in &snapshot.employees {
            budget.check("department_aggregation")?;

            // 无技能记录的员工不参与平均
            let Some(score) = employee_score(&employee.levels) else {
                continue;
            };
            total_score += score;
            valid_count += 1;

            for level in &employee.levels {
                *breakdown.entry(level.clone()).or_insert(0) += 1;
            }
        }

        let average_score = if valid_count == 0 {
            0
        } else {
            to_percentage(total_score / f64::from(valid_count))
        };

        tracing::debug!(
            department_id = %snapshot.department_id,
            employees = snapshot.employees.len(),
            valid = valid_count,
            average_score,
            "部门聚合完成"
        );

        Ok(DepartmentStats {
            department_id: snapshot.department_id.clone(),
            department_name: snapshot.name.clone(),
            employee_count: snapshot.employees.len() as u32,
            valid_employee_count: valid_count,
            average_score,
            skill_breakdown: breakdown,
        })
    }

    /// 设备聚合
    ///
    /// 逐条技能记录计分: 每条记录视为一名“操作者”
    pub fn aggregate_machine(
        &self,
        machine: &MachineSkills,
        budget: &Budget,
    ) -> EngineResult<MachineStats> {
        let mut breakdown = zero_breakdown();
        let mut total_points: u32 = 0;

        for (_employee_id, level) in &machine.assignments {
            budget.check("machine_aggregation")?;
            total_points += u32::from(level_to_points(level));
            *breakdown.entry(level.clone()).or_insert(0) += 1;
        }

        let operator_count = machine.assignments.len() as u32;
        let average_score = if operator_count == 0 {
            0
        } else {
            to_percentage(f64::from(total_points) / f64::from(operator_count))
        };

        Ok(MachineStats {
            machine_id: machine.machine_id.clone(),
            machine_name: machine.name.clone(),
            machine_type: machine.machine_type.clone(),
            department_id: machine.department_id.clone(),
            operator_count,
            average_score,
            skill_breakdown: breakdown,
        })
    }
}

impl Default for SkillAggregator {
    fn default() -> Self {
        Self::new()
    }
}
