// ==========================================
// 技能矩阵管理系统 - 部门与设备领域模型
// ==========================================
// 所有权: 部门拥有员工与设备
// 约束: 在用部门名称唯一
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Department - 部门
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub department_id: String,       // 部门ID (UUID)
    pub name: String,                // 部门名称 (在用唯一)
    pub description: Option<String>, // 描述
    pub is_active: bool,             // 软删除标志
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ==========================================
// Machine - 设备
// ==========================================
// 每台设备归属且仅归属一个部门
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub machine_id: String,    // 设备ID (UUID)
    pub name: String,          // 设备名称
    pub machine_type: String,  // 设备类型
    pub department_id: String, // 所属部门
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Department {
    /// 创建在用部门
    ///
    /// # 参数
    /// - department_id: 部门ID (通常使用UUID)
    /// - ts: 创建时间（同时作为更新时间）
    pub fn new(
        department_id: String,
        name: String,
        description: Option<String>,
        ts: NaiveDateTime,
    ) -> Self {
        Self {
            department_id,
            name,
            description,
            is_active: true,
            created_at: ts,
            updated_at: ts,
        }
    }
}

impl Machine {
    pub fn new(
        machine_id: String,
        name: String,
        machine_type: String,
        department_id: String,
        ts: NaiveDateTime,
    ) -> Self {
        Self {
            machine_id,
            name,
            machine_type,
            department_id,
            is_active: true,
            created_at: ts,
            updated_at: ts,
        }
    }
}
