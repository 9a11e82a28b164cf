// ==========================================
// 技能矩阵管理系统 - 技能领域模型
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 技能定义
///
/// 名称在在用技能中唯一; department_id 为空表示全厂通用技能
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub skill_id: String,
    pub name: String,
    pub category: String,
    pub is_machine_related: bool, // 设备相关技能
    pub is_critical: bool,        // 关键技能
    pub department_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Skill {
    /// 创建在用技能（默认非关键技能）
    pub fn new(
        skill_id: String,
        name: String,
        category: String,
        department_id: Option<String>,
        is_machine_related: bool,
        ts: NaiveDateTime,
    ) -> Self {
        Self {
            skill_id,
            name,
            category,
            is_machine_related,
            is_critical: false,
            department_id,
            is_active: true,
            created_at: ts,
            updated_at: ts,
        }
    }

    /// 标记为关键技能
    pub fn critical(mut self, is_critical: bool) -> Self {
        self.is_critical = is_critical;
        self
    }
}
