// ==========================================
// 技能矩阵管理系统 - 评分服务
// ==========================================
// 职责: 从 SkillStore 装载快照 → 调用聚合引擎
// 错误策略:
// - 列出部门/员工/设备失败 → UpstreamFailure,不返回部分数据
// - 单个员工/设备的技能记录存在脏数据 → 记录告警,跳过该员工/设备继续
// - 部门/设备ID未命中 → 空结果,不报错
// ==========================================

use crate::domain::{Department, Employee, Machine, SkillAssignment};
use crate::engine::{
    Budget, DepartmentSnapshot, DepartmentStats, EmployeeScore, EmployeeScoreCalculator,
    EmployeeSkills, EngineResult, MachineSkills, MachineStats, SkillAggregator,
};
use crate::repository::store::SkillStore;
use std::sync::Arc;

// ==========================================
// ScoringService
// ==========================================
pub struct ScoringService {
    store: Arc<dyn SkillStore>,
    aggregator: SkillAggregator,
    calculator: EmployeeScoreCalculator,
}

impl ScoringService {
    pub fn new(store: Arc<dyn SkillStore>) -> Self {
        Self {
            store,
            aggregator: SkillAggregator::new(),
            calculator: EmployeeScoreCalculator::new(),
        }
    }

    /// 解析部门过滤条件
    ///
    /// # 返回
    /// - Some(vec): 需要处理的部门（未命中时为空）
    fn resolve_departments(&self, department_id: Option<&str>) -> EngineResult<Vec<Department>> {
        match department_id {
            Some(id) => Ok(self.store.find_department(id)?.into_iter().collect()),
            None => Ok(self.store.list_departments()?),
        }
    }

    /// 装载员工技能记录（单员工脏数据跳过）
    pub fn load_employee_assignments(
        &self,
        employees: Vec<Employee>,
        budget: &Budget,
    ) -> EngineResult<Vec<(Employee, Vec<SkillAssignment>)>> {
        let mut loaded = Vec::with_capacity(employees.len());
        for employee in employees {
            budget.check("load_employee_assignments")?;
            match self.store.list_assignments_by_employee(&employee.employee_id) {
                Ok(assignments) => loaded.push((employee, assignments)),
                Err(e) if e.is_row_level() => {
                    tracing::warn!(
                        employee_id = %employee.employee_id,
                        error = %e,
                        "员工技能记录解析失败,跳过该员工"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(loaded)
    }

    /// 装载员工技能等级
    pub fn load_employee_skills(
        &self,
        employees: Vec<Employee>,
        budget: &Budget,
    ) -> EngineResult<Vec<EmployeeSkills>> {
        Ok(self
            .load_employee_assignments(employees, budget)?
            .iter()
            .map(|(employee, assignments)| EmployeeSkills::from_records(employee, assignments))
            .collect())
    }

    /// 装载部门快照
    pub fn department_snapshot(
        &self,
        department: &Department,
        budget: &Budget,
    ) -> EngineResult<DepartmentSnapshot> {
        let employees = self.store.list_employees(Some(&department.department_id))?;
        let machine_count = self.store.list_machines(Some(&department.department_id))?.len() as u32;
        let employees = self.load_employee_skills(employees, budget)?;
        Ok(DepartmentSnapshot::new(department, employees, machine_count))
    }

    /// 部门技能统计
    ///
    /// # 参数
    /// - department_id: 部门过滤（None 表示全部在用部门）
    #[tracing::instrument(skip(self, budget))]
    pub fn department_stats(
        &self,
        department_id: Option<&str>,
        budget: &Budget,
    ) -> EngineResult<Vec<DepartmentStats>> {
        let departments = self.resolve_departments(department_id)?;
        let mut stats = Vec::with_capacity(departments.len());
        for department in &departments {
            let snapshot = self.department_snapshot(department, budget)?;
            stats.push(self.aggregator.aggregate_department(&snapshot, budget)?);
        }
        tracing::info!(departments = stats.len(), "部门技能统计完成");
        Ok(stats)
    }

    /// 设备技能统计
    ///
    /// # 参数
    /// - department_id: 部门过滤
    /// - machine_id: 设备过滤（优先于部门过滤）
    #[tracing::instrument(skip(self, budget))]
    pub fn machine_stats(
        &self,
        department_id: Option<&str>,
        machine_id: Option<&str>,
        budget: &Budget,
    ) -> EngineResult<Vec<MachineStats>> {
        let machines: Vec<Machine> = match machine_id {
            Some(id) => self
                .store
                .find_machine(id)?
                .into_iter()
                .filter(|m| department_id.map_or(true, |d| m.department_id == d))
                .collect(),
            None => {
                if let Some(dept) = department_id {
                    if self.store.find_department(dept)?.is_none() {
                        return Ok(Vec::new());
                    }
                }
                self.store.list_machines(department_id)?
            }
        };

        let mut stats = Vec::with_capacity(machines.len());
        for machine in &machines {
            budget.check("load_machine_assignments")?;
            let assignments = match self.store.list_assignments_by_machine(&machine.machine_id) {
                Ok(a) => a,
                Err(e) if e.is_row_level() => {
                    tracing::warn!(
                        machine_id = %machine.machine_id,
                        error = %e,
                        "设备技能记录解析失败,跳过该设备"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let skills = MachineSkills::from_records(machine, &assignments);
            stats.push(self.aggregator.aggregate_machine(&skills, budget)?);
        }
        Ok(stats)
    }

    /// 员工技能分列表
    #[tracing::instrument(skip(self, budget))]
    pub fn employee_scores(
        &self,
        department_id: Option<&str>,
        budget: &Budget,
    ) -> EngineResult<Vec<EmployeeScore>> {
        let departments = self.resolve_departments(department_id)?;
        let mut scores = Vec::new();
        for department in &departments {
            let employees = self.store.list_employees(Some(&department.department_id))?;
            for employee in self.load_employee_skills(employees, budget)? {
                scores.push(self.calculator.score(&employee));
            }
        }
        Ok(scores)
    }

    pub fn store(&self) -> &Arc<dyn SkillStore> {
        &self.store
    }
}
