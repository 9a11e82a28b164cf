// ==========================================
// 技能矩阵管理系统 - 领域类型定义
// ==========================================
// 职责: 技能等级、性别等枚举类型
// 约束: 等级名称区分大小写,与前端/数据库字面值一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 技能等级 (Skill Level)
// ==========================================
// 有序枚举: Low < Medium < High < Advanced < Expert
// 注意: Advanced 与 Expert 计分相同 (均为 4 分)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    Low,      // 初级
    Medium,   // 中级
    High,     // 高级
    Advanced, // 资深
    Expert,   // 专家
}

impl SkillLevel {
    /// 全部规范等级（按序）
    pub const ALL: [SkillLevel; 5] = [
        SkillLevel::Low,
        SkillLevel::Medium,
        SkillLevel::High,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    /// 规范名称（字面值）
    pub fn name(&self) -> &'static str {
        match self {
            SkillLevel::Low => "Low",
            SkillLevel::Medium => "Medium",
            SkillLevel::High => "High",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }

    /// 按规范名称精确解析（区分大小写）
    ///
    /// # 返回
    /// - Some(SkillLevel): 名称属于五个规范名称之一
    /// - None: 非规范名称
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Low" => Some(SkillLevel::Low),
            "Medium" => Some(SkillLevel::Medium),
            "High" => Some(SkillLevel::High),
            "Advanced" => Some(SkillLevel::Advanced),
            "Expert" => Some(SkillLevel::Expert),
            _ => None,
        }
    }

    /// 等级分值 (1-4)
    pub fn points(&self) -> u8 {
        match self {
            SkillLevel::Low => 1,
            SkillLevel::Medium => 2,
            SkillLevel::High => 3,
            SkillLevel::Advanced | SkillLevel::Expert => 4,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==========================================
// 性别 (Gender)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// 从字符串解析（忽略大小写，支持 M/F 缩写）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            "other" | "o" => Some(Gender::Other),
            _ => None,
        }
    }

    /// 数据库存储值
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 部门停用策略 (Deactivation Policy)
// ==========================================
// 部门下仍有在职员工/在用设备时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeactivationPolicy {
    #[default]
    Reject,  // 拒绝停用
    Cascade, // 级联软删除员工、设备及其技能记录
}
