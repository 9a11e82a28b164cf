// ==========================================
// 技能矩阵管理系统 - 请求参数校验
// ==========================================
// ID: 必须为 UUID,格式错误 → InvalidArgument（未命中由调用方决定空结果或 NotFound）
// 等级: 仅接受五个规范名称（区分大小写）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::SkillLevel;
use chrono::NaiveDate;
use uuid::Uuid;

/// 名称最大长度
pub const MAX_NAME_LEN: usize = 200;

/// 校验并规范化 ID（小写连字符格式）
pub fn parse_id(field: &str, raw: &str) -> ApiResult<String> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| ApiError::InvalidArgument(format!("{} 不是合法的ID: {}", field, raw)))
}

/// 可选 ID（空字符串视为未提供）
pub fn parse_optional_id(field: &str, raw: Option<&str>) -> ApiResult<Option<String>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_id(field, s).map(Some),
        None => Ok(None),
    }
}

/// 校验技能等级
pub fn parse_level(raw: &str) -> ApiResult<SkillLevel> {
    SkillLevel::from_name(raw).ok_or_else(|| {
        ApiError::InvalidArgument(format!(
            "无法识别的技能等级: {}（可选: Low/Medium/High/Advanced/Expert）",
            raw
        ))
    })
}

/// 校验名称（去空白后非空,限制长度）
pub fn require_name(field: &str, raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidArgument(format!("{} 不能为空", field)));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::InvalidArgument(format!(
            "{} 长度不能超过 {}",
            field, MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// 解析日期字符串（YYYY-MM-DD）
pub fn parse_date(field: &str, raw: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| {
                ApiError::InvalidArgument(format!("{} 日期格式错误（应为YYYY-MM-DD）: {}", field, e))
            }),
        None => Ok(None),
    }
}
