// ==========================================
// 技能矩阵管理系统 - 员工技能分
// ==========================================
// 员工分 = 全部技能记录分值的算术平均 (1-4)
// 无技能记录的员工没有分数（不是 0 分）,聚合时整体跳过
// ==========================================

use crate::engine::level_codec::level_to_points;
use crate::engine::snapshot::EmployeeSkills;
use serde::{Deserialize, Serialize};

/// 员工评分结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeScore {
    pub employee_id: String,
    pub name: String,
    pub department_id: String,
    pub skill_count: u32,
    /// 平均分 (1-4); 无技能记录时为 None
    pub score: Option<f64>,
    /// 百分制 round(score × 25); 无技能记录时为 None
    pub percentage: Option<u32>,
}

/// 计算等级列表的平均分
///
/// # 返回
/// - Some(f64): 平均分 (1.0-4.0)
/// - None: 列表为空
pub fn employee_score<S: AsRef<str>>(levels: &[S]) -> Option<f64> {
    if levels.is_empty() {
        return None;
    }
    let total: u32 = levels
        .iter()
        .map(|l| u32::from(level_to_points(l.as_ref())))
        .sum();
    Some(f64::from(total) / levels.len() as f64)
}

/// 1-4 分制 → 百分制 (× 25 后四舍五入,截断到 0-100)
pub fn to_percentage(score: f64) -> u32 {
    (score * 25.0).round().clamp(0.0, 100.0) as u32
}

/// 员工评分器（无状态）
pub struct EmployeeScoreCalculator;

impl EmployeeScoreCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, employee: &EmployeeSkills) -> EmployeeScore {
        let score = employee_score(&employee.levels);
        EmployeeScore {
            employee_id: employee.employee_id.clone(),
            name: employee.name.clone(),
            department_id: employee.department_id.clone(),
            skill_count: employee.levels.len() as u32,
            score,
            percentage: score.map(to_percentage),
        }
    }
}

impl Default for EmployeeScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(levels: &[&str]) -> EmployeeSkills {
        EmployeeSkills {
            employee_id: "E1".to_string(),
            name: "Alice".to_string(),
            department_id: "D1".to_string(),
            levels: levels.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_low_high_averages_to_two() {
        assert_eq!(employee_score(&["Low", "High"]), Some(2.0));
    }

    #[test]
    fn test_empty_assignments_have_no_score() {
        let empty: [&str; 0] = [];
        assert_eq!(employee_score(&empty), None);

        let result = EmployeeScoreCalculator::new().score(&employee(&[]));
        assert_eq!(result.skill_count, 0);
        assert_eq!(result.score, None);
        assert_eq!(result.percentage, None);
    }

    #[test]
    fn test_duplicate_skill_names_count_each_assignment() {
        // 同一技能在两台设备上各有一条记录: 两条都计入
        let result = EmployeeScoreCalculator::new().score(&employee(&["Expert", "Expert", "Low"]));
        assert_eq!(result.skill_count, 3);
        assert_eq!(result.score, Some(3.0));
        assert_eq!(result.percentage, Some(75));
    }

    #[test]
    fn test_unknown_level_counts_as_one_point() {
        assert_eq!(employee_score(&["Guru", "High"]), Some(2.0));
    }
}
