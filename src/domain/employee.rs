// ==========================================
// 技能矩阵管理系统 - 员工与技能记录领域模型
// ==========================================
// 员工: 仅软删除 (is_active)
// 技能记录 (SkillAssignment): 员工 × 技能 [× 设备] 的熟练度
// 约束: 同一 (员工, 技能, 设备) 只能有一条在用记录,更新时覆盖
// ==========================================

use crate::domain::types::Gender;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Employee - 员工
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_id: String,   // 员工ID (UUID)
    pub name: String,          // 显示名称
    pub gender: Gender,        // 性别
    pub department_id: String, // 所属部门 (有且仅有一个)
    pub is_active: bool,       // 软删除标志
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// SkillAssignment - 员工技能记录
// ==========================================
// level 保存字面值: 评分时未识别的等级按 1 分处理,
// 分布统计按字面值分桶
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAssignment {
    pub assignment_id: String,
    pub employee_id: String,
    pub skill_id: String,
    pub machine_id: Option<String>,
    pub level: String,
    pub acquired_date: Option<NaiveDate>,
    pub assessed_date: Option<NaiveDate>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl Employee {
    /// 创建在用员工
    pub fn new(
        employee_id: String,
        name: String,
        gender: Gender,
        department_id: String,
        ts: NaiveDateTime,
    ) -> Self {
        Self {
            employee_id,
            name,
            gender,
            department_id,
            is_active: true,
            created_at: ts,
            updated_at: ts,
        }
    }
}
