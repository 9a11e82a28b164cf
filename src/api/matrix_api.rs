// ==========================================
// 技能矩阵管理系统 - 技能矩阵 API
// ==========================================
// 矩阵: 行 = 部门在职员工, 列 = 部门技能 + 全厂通用技能 + 员工实际持有的其他技能
// 单元格: 等级字面值; 同一技能在多台设备上有记录时取分值最高者
// 覆盖度: 持有该技能的员工人数
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::parse_id;
use crate::config::ConfigManager;
use crate::domain::{Department, Skill};
use crate::engine::{
    level_to_points, points_to_level_name, Budget, DepartmentSnapshot, DepartmentStats,
    EmployeeScoreCalculator, EmployeeSkills, SkillAggregator,
};
use crate::importer::{ImportFormat, MatrixImportReport, MatrixImporter};
use crate::repository::{DepartmentRepository, SkillRepository};
use crate::services::ScoringService;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// 矩阵列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixSkill {
    pub skill_id: String,
    pub name: String,
    pub category: String,
    pub is_critical: bool,
    /// 持有该技能的员工数
    pub coverage: u32,
}

/// 矩阵行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub employee_id: String,
    pub name: String,
    /// skill_id → 等级字面值
    pub cells: BTreeMap<String, String>,
    pub score: Option<f64>,
    pub percentage: Option<u32>,
    /// 平均分四舍五入后的等级名（仅展示）
    pub display_level: Option<String>,
}

/// 部门技能矩阵
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsMatrix {
    pub department: Department,
    pub skills: Vec<MatrixSkill>,
    pub rows: Vec<MatrixRow>,
    pub summary: DepartmentStats,
}

// ==========================================
// MatrixApi
// ==========================================
pub struct MatrixApi {
    department_repo: Arc<DepartmentRepository>,
    skill_repo: Arc<SkillRepository>,
    scoring: Arc<ScoringService>,
    importer: Arc<MatrixImporter>,
    config_manager: Arc<ConfigManager>,
}

impl MatrixApi {
    pub fn new(
        department_repo: Arc<DepartmentRepository>,
        skill_repo: Arc<SkillRepository>,
        scoring: Arc<ScoringService>,
        importer: Arc<MatrixImporter>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            department_repo,
            skill_repo,
            scoring,
            importer,
            config_manager,
        }
    }

    fn require_department(&self, department_id: &str) -> ApiResult<Department> {
        let id = parse_id("departmentId", department_id)?;
        self.department_repo
            .find_active_by_id(&id)?
            .ok_or_else(|| ApiError::NotFound(format!("Department(id={})不存在", id)))
    }

    /// 构建部门技能矩阵
    #[tracing::instrument(skip(self))]
    pub fn build_matrix(&self, department_id: &str) -> ApiResult<SkillsMatrix> {
        let department = self.require_department(department_id)?;
        let budget = Budget::from_millis(self.config_manager.get_aggregation_budget_ms()?);

        let employees = self
            .scoring
            .store()
            .list_employees(Some(&department.department_id))?;
        let loaded = self.scoring.load_employee_assignments(employees, &budget)?;

        // 列: 部门技能 + 通用技能,再补齐员工持有的其他部门技能
        let mut columns: Vec<Skill> = self
            .skill_repo
            .list_active(None, Some(&department.department_id))?;
        let mut known: HashSet<String> = columns.iter().map(|s| s.skill_id.clone()).collect();
        for (_, assignments) in &loaded {
            for a in assignments {
                if known.insert(a.skill_id.clone()) {
                    if let Some(skill) = self.skill_repo.find_active_by_id(&a.skill_id)? {
                        columns.push(skill);
                    }
                }
            }
        }

        let calculator = EmployeeScoreCalculator::new();
        let mut coverage: BTreeMap<String, u32> = BTreeMap::new();
        let mut rows = Vec::with_capacity(loaded.len());
        let mut snapshot_employees = Vec::with_capacity(loaded.len());

        for (employee, assignments) in &loaded {
            budget.check("build_matrix")?;
            let mut cells: BTreeMap<String, String> = BTreeMap::new();
            for a in assignments {
                let replace = match cells.get(&a.skill_id) {
                    Some(existing) => level_to_points(&a.level) > level_to_points(existing),
                    None => true,
                };
                if replace {
                    cells.insert(a.skill_id.clone(), a.level.clone());
                }
            }
            for skill_id in cells.keys() {
                *coverage.entry(skill_id.clone()).or_insert(0) += 1;
            }

            let skills = EmployeeSkills::from_records(employee, assignments);
            let score = calculator.score(&skills);
            rows.push(MatrixRow {
                employee_id: employee.employee_id.clone(),
                name: employee.name.clone(),
                cells,
                score: score.score,
                percentage: score.percentage,
                display_level: score
                    .score
                    .map(|s| points_to_level_name(s.round() as u8).to_string()),
            });
            snapshot_employees.push(skills);
        }

        let machine_count = self
            .scoring
            .store()
            .list_machines(Some(&department.department_id))?
            .len() as u32;
        let snapshot = DepartmentSnapshot::new(&department, snapshot_employees, machine_count);
        let summary = SkillAggregator::new().aggregate_department(&snapshot, &budget)?;

        let skills = columns
            .into_iter()
            .map(|s| MatrixSkill {
                coverage: coverage.get(&s.skill_id).copied().unwrap_or(0),
                skill_id: s.skill_id,
                name: s.name,
                category: s.category,
                is_critical: s.is_critical,
            })
            .collect();

        Ok(SkillsMatrix {
            department,
            skills,
            rows,
            summary,
        })
    }

    /// 导入技能矩阵文件
    ///
    /// # 参数
    /// - format: csv | xlsx
    pub fn import_matrix(
        &self,
        department_id: &str,
        format: &str,
        bytes: &[u8],
    ) -> ApiResult<MatrixImportReport> {
        let id = parse_id("departmentId", department_id)?;
        let format = ImportFormat::parse(format)?;
        if bytes.is_empty() {
            return Err(ApiError::InvalidArgument("导入文件为空".to_string()));
        }
        Ok(self.importer.import(&id, format, bytes)?)
    }
}
