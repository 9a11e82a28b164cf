// ==========================================
// 技能矩阵管理系统 - 评分输入快照
// ==========================================
// 数据流: 存储记录 → 关联快照 (本模块) → 统计结果 (aggregator/performance)
// 快照只包含在用实体,由服务层一次性装载后交给纯函数计算
// ==========================================

use crate::domain::{Department, Employee, Machine, SkillAssignment};

/// 员工及其技能等级（关联后）
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeSkills {
    pub employee_id: String,
    pub name: String,
    pub department_id: String,
    /// 等级字面值,每条技能记录一项（不按技能名去重）
    pub levels: Vec<String>,
}

impl EmployeeSkills {
    pub fn from_records(employee: &Employee, assignments: &[SkillAssignment]) -> Self {
        Self {
            employee_id: employee.employee_id.clone(),
            name: employee.name.clone(),
            department_id: employee.department_id.clone(),
            levels: assignments.iter().map(|a| a.level.clone()).collect(),
        }
    }
}

/// 设备及其关联技能记录（关联后）
#[derive(Debug, Clone, PartialEq)]
pub struct MachineSkills {
    pub machine_id: String,
    pub name: String,
    pub machine_type: String,
    pub department_id: String,
    /// (employee_id, level): 同一员工在同一设备上的多项技能各占一项
    pub assignments: Vec<(String, String)>,
}

impl MachineSkills {
    pub fn from_records(machine: &Machine, assignments: &[SkillAssignment]) -> Self {
        Self {
            machine_id: machine.machine_id.clone(),
            name: machine.name.clone(),
            machine_type: machine.machine_type.clone(),
            department_id: machine.department_id.clone(),
            assignments: assignments
                .iter()
                .map(|a| (a.employee_id.clone(), a.level.clone()))
                .collect(),
        }
    }
}

/// 部门快照
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentSnapshot {
    pub department_id: String,
    pub name: String,
    pub employees: Vec<EmployeeSkills>,
    /// 在用设备数（仅记录,不参与绩效计分）
    pub machine_count: u32,
}

impl DepartmentSnapshot {
    pub fn new(department: &Department, employees: Vec<EmployeeSkills>, machine_count: u32) -> Self {
        Self {
            department_id: department.department_id.clone(),
            name: department.name.clone(),
            employees,
            machine_count,
        }
    }
}
