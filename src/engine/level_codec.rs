// ==========================================
// 技能矩阵管理系统 - 技能等级编解码
// ==========================================
// 规则: Low=1, Medium=2, High=3, Advanced=4, Expert=4
//       名称区分大小写,未识别的字符串按 1 分计
// 纯函数,无副作用
// ==========================================

use crate::domain::types::SkillLevel;
use std::collections::BTreeMap;

/// 未识别等级的默认分值
pub const DEFAULT_POINTS: u8 = 1;

/// 等级名称 → 分值 (1-4)
pub fn level_to_points(level: &str) -> u8 {
    SkillLevel::from_name(level)
        .map(|l| l.points())
        .unwrap_or(DEFAULT_POINTS)
}

/// 分值 → 等级名称（仅用于展示,不参与计分）
///
/// 4 分同时对应 Advanced/Expert,展示为 Advanced;
/// 超出 1-4 的分值先截断到区间内
pub fn points_to_level_name(points: u8) -> &'static str {
    match points.clamp(1, 4) {
        1 => SkillLevel::Low.name(),
        2 => SkillLevel::Medium.name(),
        3 => SkillLevel::High.name(),
        _ => SkillLevel::Advanced.name(),
    }
}

/// 零值等级分布 {Low:0, Medium:0, High:0, Advanced:0, Expert:0}
pub fn zero_breakdown() -> BTreeMap<String, u32> {
    SkillLevel::ALL
        .iter()
        .map(|l| (l.name().to_string(), 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_to_points_table() {
        let cases: [(&str, u8); 9] = [
            ("Low", 1),
            ("Medium", 2),
            ("High", 3),
            ("Advanced", 4),
            ("Expert", 4),
            ("Beginner", 1),
            ("low", 1),
            ("EXPERT", 1),
            ("", 1),
        ];
        for (input, expected) in cases {
            assert_eq!(level_to_points(input), expected, "level={:?}", input);
        }
    }

    #[test]
    fn test_points_to_level_name() {
        assert_eq!(points_to_level_name(1), "Low");
        assert_eq!(points_to_level_name(2), "Medium");
        assert_eq!(points_to_level_name(3), "High");
        assert_eq!(points_to_level_name(4), "Advanced");
        assert_eq!(points_to_level_name(0), "Low");
        assert_eq!(points_to_level_name(9), "Advanced");
    }

    #[test]
    fn test_zero_breakdown_keys() {
        let b = zero_breakdown();
        assert_eq!(b.len(), 5);
        assert!(b.values().all(|v| *v == 0));
        for key in ["Low", "Medium", "High", "Advanced", "Expert"] {
            assert!(b.contains_key(key));
        }
    }
}
