// ==========================================
// 基础数据 API 集成测试
// ==========================================
// 测试范围:
// 1. 部门: 重名冲突、停用策略 Reject / Cascade
// 2. 员工: 创建校验、调岗、软删除
// 3. 技能记录: upsert 覆盖、等级校验、移除
// 4. 设备/技能: 创建、过滤、删除
// ==========================================


use skills_matrix::api::{
    ApiError, CreateDepartmentRequest, CreateEmployeeRequest, CreateSkillRequest,
    UpsertSkillRequest,
};
use skills_matrix::domain::{DeactivationPolicy, Gender};
use test_helpers::TestEnv;

const UNKNOWN_ID: &str = "00000000-0000-4000-8000-000000000000";

// ==========================================
// 部门
// ==========================================

#[test]
fn test_create_department_重名冲突() {
    let env = TestEnv::new().expect("无法创建测试环境");
    env.department("Assembly");

    let err = env
        .state
        .department_api
        .create_department(CreateDepartmentRequest {
            name: "Assembly".to_string(),
            description: Some("dup".to_string()),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
    assert_eq!(err.code(), "CONFLICT");
}

#[test]
fn test_create_department_空名称() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let err = env
        .state
        .department_api
        .create_department(CreateDepartmentRequest {
            name: "   ".to_string(),
            description: None,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[test]
fn test_get_department_不存在() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let err = env
        .state
        .department_api
        .get_department(UNKNOWN_ID)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = env.state.department_api.get_department("x").unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[test]
fn test_deactivate_department_有成员时拒绝() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Assembly");
    env.employee(&dept, "E1");

    let err = env
        .state
        .department_api
        .deactivate_department(&dept, DeactivationPolicy::Reject)
        .unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));
    assert_eq!(err.status(), 422);

    // 部门仍在用
    assert!(env.state.department_api.get_department(&dept).is_ok());
}

#[test]
fn test_deactivate_department_空部门直接停用() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Empty");

    let result = env
        .state
        .department_api
        .deactivate_department(&dept, DeactivationPolicy::Reject)
        .expect("停用失败");
    assert_eq!(result.employees, 0);
    assert!(env.state.department_api.list_departments().unwrap().is_empty());

    // 停用后可重新使用名称
    env.department("Empty");
}

#[test]
fn test_deactivate_department_级联() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Assembly");
    let other = env.department("Other");
    let machine = env.machine(&dept, "M1");
    let skill = env.skill("Welding", None);
    let e1 = env.employee(&dept, "E1");
    let e2 = env.employee(&dept, "E2");
    let keep = env.employee(&other, "Keep");
    env.assign(&e1, &skill, Some(&machine), "High");
    env.assign(&e2, &skill, None, "Low");
    env.assign(&keep, &skill, None, "Medium");

    let result = env
        .state
        .department_api
        .deactivate_department(&dept, DeactivationPolicy::Cascade)
        .expect("级联停用失败");
    assert_eq!(result.policy, DeactivationPolicy::Cascade);
    assert_eq!(result.employees, 2);
    assert_eq!(result.machines, 1);
    assert_eq!(result.assignments, 2);

    assert_eq!(
        env.count_rows("SELECT COUNT(*) FROM employee_skill WHERE is_active = 1"),
        1
    );
    let remaining = env.state.employee_api.list_employees(None).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].employee_id, keep);

    let stats = env.state.dashboard_api.department_stats(None).unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].department_name, "Other");
}

// ==========================================
// 员工
// ==========================================

#[test]
fn test_create_employee_校验() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Assembly");

    let err = env
        .state
        .employee_api
        .create_employee(CreateEmployeeRequest {
            name: "E1".to_string(),
            gender: "unknown".to_string(),
            department_id: dept.clone(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));

    let err = env
        .state
        .employee_api
        .create_employee(CreateEmployeeRequest {
            name: "E1".to_string(),
            gender: "M".to_string(),
            department_id: UNKNOWN_ID.to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let created = env
        .state
        .employee_api
        .create_employee(CreateEmployeeRequest {
            name: "E1".to_string(),
            gender: "M".to_string(),
            department_id: dept.to_uppercase(),
        })
        .expect("创建失败");
    assert_eq!(created.gender, Gender::Male);
    assert_eq!(created.department_id, dept);
}

#[test]
fn test_change_department() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let a = env.department("A");
    let b = env.department("B");
    let e1 = env.employee(&a, "E1");

    let moved = env
        .state
        .employee_api
        .change_department(&e1, &b)
        .expect("调岗失败");
    assert_eq!(moved.department_id, b);
    assert!(env
        .state
        .employee_api
        .list_employees(Some(&a))
        .unwrap()
        .is_empty());
    assert_eq!(
        env.state.employee_api.list_employees(Some(&b)).unwrap().len(),
        1
    );
}

#[test]
fn test_delete_employee_同时停用技能记录() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("A");
    let skill = env.skill("Welding", None);
    let other = env.skill("Painting", None);
    let e1 = env.employee(&dept, "E1");
    env.assign(&e1, &skill, None, "High");
    env.assign(&e1, &other, None, "Low");

    let deactivated = env
        .state
        .employee_api
        .delete_employee(&e1)
        .expect("删除失败");
    assert_eq!(deactivated, 2);

    let err = env.state.employee_api.get_employee(&e1).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(
        env.count_rows("SELECT COUNT(*) FROM employee_skill WHERE is_active = 1"),
        0
    );
}

// ==========================================
// 技能记录
// ==========================================

#[test]
fn test_upsert_skill_覆盖已有记录() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("A");
    let skill = env.skill("Welding", None);
    let e1 = env.employee(&dept, "E1");

    let first = env
        .state
        .employee_api
        .upsert_skill(
            &e1,
            UpsertSkillRequest {
                skill_id: skill.clone(),
                machine_id: None,
                level: "Low".to_string(),
                acquired_date: Some("2023-05-01".to_string()),
                assessed_date: None,
            },
        )
        .expect("写入失败");
    assert!(first.created);

    let second = env
        .state
        .employee_api
        .upsert_skill(
            &e1,
            UpsertSkillRequest {
                skill_id: skill.clone(),
                machine_id: None,
                level: "Advanced".to_string(),
                acquired_date: None,
                assessed_date: Some("2024-01-15".to_string()),
            },
        )
        .expect("写入失败");
    assert!(!second.created);
    assert_eq!(second.assignment.assignment_id, first.assignment.assignment_id);
    assert_eq!(second.assignment.level, "Advanced");
    // 未提供的日期保留原值
    assert_eq!(
        second.assignment.acquired_date.map(|d| d.to_string()),
        Some("2023-05-01".to_string())
    );

    let detail = env.state.employee_api.get_employee(&e1).unwrap();
    assert_eq!(detail.skills.len(), 1);
}

#[test]
fn test_upsert_skill_同技能不同设备分别记录() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("A");
    let m1 = env.machine(&dept, "M1");
    let m2 = env.machine(&dept, "M2");
    let skill = env.skill("Turning", Some(&dept));
    let e1 = env.employee(&dept, "E1");

    env.assign(&e1, &skill, Some(&m1), "Low");
    env.assign(&e1, &skill, Some(&m2), "High");
    env.assign(&e1, &skill, None, "Medium");

    let detail = env.state.employee_api.get_employee(&e1).unwrap();
    assert_eq!(detail.skills.len(), 3);
}

#[test]
fn test_upsert_skill_等级必须为规范名称() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("A");
    let skill = env.skill("Welding", None);
    let e1 = env.employee(&dept, "E1");

    let err = env
        .state
        .employee_api
        .upsert_skill(
            &e1,
            UpsertSkillRequest {
                skill_id: skill,
                machine_id: None,
                level: "expert".to_string(),
                acquired_date: None,
                assessed_date: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[test]
fn test_upsert_skill_技能不存在() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("A");
    let e1 = env.employee(&dept, "E1");

    let err = env
        .state
        .employee_api
        .upsert_skill(
            &e1,
            UpsertSkillRequest {
                skill_id: UNKNOWN_ID.to_string(),
                machine_id: None,
                level: "Low".to_string(),
                acquired_date: None,
                assessed_date: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_remove_skill() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("A");
    let skill = env.skill("Welding", None);
    let e1 = env.employee(&dept, "E1");
    env.assign(&e1, &skill, None, "High");

    let detail = env.state.employee_api.get_employee(&e1).unwrap();
    let assignment_id = detail.skills[0].assignment_id.clone();

    env.state
        .employee_api
        .remove_skill(&e1, &assignment_id)
        .expect("移除失败");
    assert!(env
        .state
        .employee_api
        .get_employee(&e1)
        .unwrap()
        .skills
        .is_empty());

    // 移除后可重新写入同一组合
    env.assign(&e1, &skill, None, "Low");
}

#[test]
fn test_remove_skill_不能移除其他员工的记录() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("A");
    let skill = env.skill("Welding", None);
    let owner = env.employee(&dept, "Owner");
    let other = env.employee(&dept, "Other");
    env.assign(&owner, &skill, None, "High");

    let assignment_id = env.state.employee_api.get_employee(&owner).unwrap().skills[0]
        .assignment_id
        .clone();

    let err = env
        .state
        .employee_api
        .remove_skill(&other, &assignment_id)
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(
        env.state
            .employee_api
            .get_employee(&owner)
            .unwrap()
            .skills
            .len(),
        1
    );
}

// ==========================================
// 设备 / 技能
// ==========================================

#[test]
fn test_machine_按部门过滤与删除() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let a = env.department("A");
    let b = env.department("B");
    let m1 = env.machine(&a, "M1");
    env.machine(&b, "M2");

    assert_eq!(env.state.machine_api.list_machines(None).unwrap().len(), 2);
    assert_eq!(
        env.state.machine_api.list_machines(Some(&a)).unwrap().len(),
        1
    );

    env.state.machine_api.delete_machine(&m1).expect("删除失败");
    assert!(env
        .state
        .machine_api
        .list_machines(Some(&a))
        .unwrap()
        .is_empty());

    let err = env.state.machine_api.delete_machine(&m1).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_skill_重名与过滤() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let a = env.department("A");
    env.skill("Welding", Some(&a));
    env.skill("Safety", None);

    let err = env
        .state
        .skill_api
        .create_skill(CreateSkillRequest {
            name: "Welding".to_string(),
            category: "Technical".to_string(),
            department_id: None,
            is_machine_related: false,
            is_critical: false,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let all = env.state.skill_api.list_skills(None, None).unwrap();
    assert_eq!(all.len(), 2);

    let by_category = env
        .state
        .skill_api
        .list_skills(Some("Technical"), None)
        .unwrap();
    assert_eq!(by_category.len(), 2);
    assert!(env
        .state
        .skill_api
        .list_skills(Some("Soft"), None)
        .unwrap()
        .is_empty());
}

#[test]
fn test_skill_删除() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let skill = env.skill("Welding", None);

    env.state.skill_api.delete_skill(&skill).expect("删除失败");
    assert!(env.state.skill_api.list_skills(None, None).unwrap().is_empty());
}
