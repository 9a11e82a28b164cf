// ==========================================
// 技能矩阵管理系统 - 部门月度绩效记录
// ==========================================
// 约束: (department_id, year, month) 唯一,重算时原地覆盖 (upsert)
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// DepartmentPerformanceRecord - 部门月度绩效
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPerformanceRecord {
    pub department_id: String,
    pub year: i32,
    pub month: u32,                   // 1-12
    pub score: f64,                   // 0-100
    pub employee_count: u32,          // 参与计分的员工数 (validEmployeeCount)
    pub machine_count: u32,           // 在用设备数 (不参与计分)
    pub calculated_at: NaiveDateTime, // 计算时间
}

/// 绩效记录 + 部门显示名称（查询视图）
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    pub record: DepartmentPerformanceRecord,
    pub department_name: String,
}
