// ==========================================
// 技能矩阵管理系统 - 技能 API
// ==========================================
// 约束: 在用技能名称唯一; department_id 为空表示全厂通用
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{parse_id, parse_optional_id, require_name};
use crate::db::now;
use crate::domain::Skill;
use crate::repository::{DepartmentRepository, SkillRepository};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSkillRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub is_machine_related: bool,
    #[serde(default)]
    pub is_critical: bool,
}

pub struct SkillApi {
    skill_repo: Arc<SkillRepository>,
    department_repo: Arc<DepartmentRepository>,
}

impl SkillApi {
    pub fn new(skill_repo: Arc<SkillRepository>, department_repo: Arc<DepartmentRepository>) -> Self {
        Self {
            skill_repo,
            department_repo,
        }
    }

    /// 创建技能
    ///
    /// # 返回
    /// - Err(Conflict): 已有同名在用技能
    pub fn create_skill(&self, req: CreateSkillRequest) -> ApiResult<Skill> {
        let name = require_name("name", &req.name)?;
        let category = require_name("category", &req.category)?;
        let department_id = parse_optional_id("departmentId", req.department_id.as_deref())?;
        if let Some(id) = &department_id {
            if self.department_repo.find_active_by_id(id)?.is_none() {
                return Err(ApiError::NotFound(format!("Department(id={})不存在", id)));
            }
        }
        if self.skill_repo.find_active_by_name(&name)?.is_some() {
            return Err(ApiError::Conflict(format!("技能名称已存在: {}", name)));
        }

        let skill = Skill::new(
            Uuid::new_v4().to_string(),
            name,
            category,
            department_id,
            req.is_machine_related,
            now(),
        )
        .critical(req.is_critical);
        self.skill_repo.insert(&skill)?;
        Ok(skill)
    }

    /// 在用技能列表
    ///
    /// # 参数
    /// - category: 分类过滤
    /// - department_id: 部门过滤（包含全厂通用技能）
    pub fn list_skills(
        &self,
        category: Option<&str>,
        department_id: Option<&str>,
    ) -> ApiResult<Vec<Skill>> {
        let department_id = parse_optional_id("departmentId", department_id)?;
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        Ok(self.skill_repo.list_active(category, department_id.as_deref())?)
    }

    /// 软删除技能（同时停用相关技能记录）
    pub fn delete_skill(&self, skill_id: &str) -> ApiResult<usize> {
        let id = parse_id("skillId", skill_id)?;
        Ok(self.skill_repo.deactivate(&id)?)
    }
}
