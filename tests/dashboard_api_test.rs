// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试范围:
// 1. 部门统计: 平均分、有效员工数、等级分布
// 2. 设备统计: operatorCount 按技能记录计数
// 3. 员工技能分
// 4. 脏数据跳过、参数校验
// ==========================================


use skills_matrix::api::ApiError;
use skills_matrix::config::config_keys;
use test_helpers::TestEnv;

#[test]
fn test_department_stats_平均分与有效员工() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Assembly");
    let welding = env.skill("Welding", Some(&dept));
    let painting = env.skill("Painting", None);

    let alice = env.employee(&dept, "Alice");
    let bob = env.employee(&dept, "Bob");
    let _carol = env.employee(&dept, "Carol"); // 无技能

    env.assign(&alice, &welding, None, "Low");
    env.assign(&alice, &painting, None, "High");
    env.assign(&bob, &welding, None, "Expert");

    let stats = env
        .state
        .dashboard_api
        .department_stats(Some(&dept))
        .expect("查询失败");

    assert_eq!(stats.len(), 1);
    let s = &stats[0];
    assert_eq!(s.department_name, "Assembly");
    assert_eq!(s.employee_count, 3);
    assert_eq!(s.valid_employee_count, 2);
    // Alice 平均 2, Bob 4 → 3 × 25
    assert_eq!(s.average_score, 75);
    assert_eq!(s.skill_breakdown.get("Low"), Some(&1));
    assert_eq!(s.skill_breakdown.get("High"), Some(&1));
    assert_eq!(s.skill_breakdown.get("Expert"), Some(&1));
    assert_eq!(s.skill_breakdown.get("Medium"), Some(&0));
}

#[test]
fn test_department_stats_全部部门与空部门() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let a = env.department("A");
    let _b = env.department("B");
    let skill = env.skill("Welding", None);
    let e = env.employee(&a, "E1");
    env.assign(&e, &skill, None, "Medium");

    let stats = env
        .state
        .dashboard_api
        .department_stats(None)
        .expect("查询失败");
    assert_eq!(stats.len(), 2);

    let empty = stats.iter().find(|s| s.department_name == "B").unwrap();
    assert_eq!(empty.average_score, 0);
    assert_eq!(empty.valid_employee_count, 0);
}

#[test]
fn test_department_stats_未知部门返回空() {
    let env = TestEnv::new().expect("无法创建测试环境");
    env.department("A");

    let stats = env
        .state
        .dashboard_api
        .department_stats(Some("00000000-0000-4000-8000-000000000000"))
        .expect("查询失败");
    assert!(stats.is_empty());
}

#[test]
fn test_department_stats_非法ID() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let err = env
        .state
        .dashboard_api
        .department_stats(Some("not-a-uuid"))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[test]
fn test_machine_stats_按记录计数() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Machining");
    let lathe = env.machine(&dept, "Lathe-01");
    let idle = env.machine(&dept, "Mill-02");
    let turning = env.skill("Turning", Some(&dept));
    let setup = env.skill("Setup", Some(&dept));

    let e1 = env.employee(&dept, "E1");
    let e2 = env.employee(&dept, "E2");
    // 同一员工在同一设备上两条记录 → 计为两个操作者
    env.assign(&e1, &turning, Some(&lathe), "High");
    env.assign(&e1, &setup, Some(&lathe), "Low");
    env.assign(&e2, &turning, Some(&lathe), "Advanced");

    let stats = env
        .state
        .dashboard_api
        .machine_stats(Some(&dept), None)
        .expect("查询失败");
    assert_eq!(stats.len(), 2);

    let lathe_stats = stats.iter().find(|m| m.machine_id == lathe).unwrap();
    assert_eq!(lathe_stats.operator_count, 3);
    // (3 + 1 + 4) / 3 × 25 = 66.67 → 67
    assert_eq!(lathe_stats.average_score, 67);
    assert_eq!(lathe_stats.skill_breakdown.get("Advanced"), Some(&1));

    let idle_stats = stats.iter().find(|m| m.machine_id == idle).unwrap();
    assert_eq!(idle_stats.operator_count, 0);
    assert_eq!(idle_stats.average_score, 0);

    // 按设备过滤
    let only = env
        .state
        .dashboard_api
        .machine_stats(None, Some(&lathe))
        .expect("查询失败");
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].machine_name, "Lathe-01");
}

#[test]
fn test_employee_scores_无技能员工() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("QA");
    let skill = env.skill("Inspection", None);
    let e1 = env.employee(&dept, "E1");
    let _e2 = env.employee(&dept, "E2");
    env.assign(&e1, &skill, None, "Medium");

    let scores = env
        .state
        .dashboard_api
        .employee_scores(Some(&dept))
        .expect("查询失败");
    assert_eq!(scores.len(), 2);

    let scored = scores.iter().find(|s| s.name == "E1").unwrap();
    assert_eq!(scored.skill_count, 1);
    assert_eq!(scored.score, Some(2.0));
    assert_eq!(scored.percentage, Some(50));

    let empty = scores.iter().find(|s| s.name == "E2").unwrap();
    assert_eq!(empty.skill_count, 0);
    assert_eq!(empty.score, None);
    assert_eq!(empty.percentage, None);
}

#[test]
fn test_未知等级字面值计1分() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Legacy");
    let skill = env.skill("Soldering", None);
    let e1 = env.employee(&dept, "E1");

    // 历史数据中的非规范等级直接写库
    env.raw_conn()
        .execute(
            "INSERT INTO employee_skill (assignment_id, employee_id, skill_id, machine_id, level, \
             is_active, updated_at) VALUES ('a-legacy', ?1, ?2, NULL, 'expert', 1, '2024-01-01 00:00:00')",
            rusqlite::params![e1, skill],
        )
        .expect("写入失败");

    let stats = env
        .state
        .dashboard_api
        .department_stats(Some(&dept))
        .expect("查询失败");
    assert_eq!(stats[0].average_score, 25);
    assert_eq!(stats[0].skill_breakdown.get("expert"), Some(&1));
}

#[test]
fn test_脏数据员工被跳过() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Paint");
    let skill = env.skill("Spraying", None);
    let good = env.employee(&dept, "Good");
    let broken = env.employee(&dept, "Broken");
    env.assign(&good, &skill, None, "High");

    // 日期列无法解析 → 行级错误
    env.raw_conn()
        .execute(
            "INSERT INTO employee_skill (assignment_id, employee_id, skill_id, machine_id, level, \
             assessed_date, is_active, updated_at) \
             VALUES ('a-broken', ?1, ?2, NULL, 'Expert', 'yesterday', 1, '2024-01-01 00:00:00')",
            rusqlite::params![broken, skill],
        )
        .expect("写入失败");

    let stats = env
        .state
        .dashboard_api
        .department_stats(Some(&dept))
        .expect("脏数据不应导致整体失败");
    // 被跳过的员工不进入快照,两个计数都不包含它
    assert_eq!(stats[0].employee_count, 1);
    assert_eq!(stats[0].valid_employee_count, 1);
    assert_eq!(stats[0].average_score, 75);
}

#[test]
fn test_员工行脏数据被跳过() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Paint");
    let skill = env.skill("Spraying", None);
    let good = env.employee(&dept, "Good");
    env.assign(&good, &skill, None, "High");

    // 性别列无法识别 → 员工行映射失败
    env.raw_conn()
        .execute(
            "INSERT INTO employee (employee_id, name, gender, department_id, is_active, \
             created_at, updated_at) \
             VALUES ('e-broken', 'Broken', 'Unknown', ?1, 1, \
             '2024-01-01 00:00:00', '2024-01-01 00:00:00')",
            rusqlite::params![dept],
        )
        .expect("写入失败");

    let stats = env
        .state
        .dashboard_api
        .department_stats(Some(&dept))
        .expect("脏数据不应导致整体失败");
    assert_eq!(stats[0].employee_count, 1);
    assert_eq!(stats[0].average_score, 75);

    let scores = env
        .state
        .dashboard_api
        .employee_scores(None)
        .expect("脏数据不应导致整体失败");
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].employee_id, good);

    let matrix = env.state.matrix_api.build_matrix(&dept).expect("构建失败");
    assert_eq!(matrix.rows.len(), 1);

    let summary = env
        .state
        .dashboard_api
        .recalculate_performance(Some(2024), None)
        .expect("脏数据不应导致重算失败");
    assert_eq!(summary.departments, 1);
}

#[test]
fn test_预算为0表示不限时() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Big");
    let skill = env.skill("Welding", None);
    let e = env.employee(&dept, "E1");
    env.assign(&e, &skill, None, "Low");

    env.state
        .config_manager
        .set_config_value(config_keys::AGGREGATION_BUDGET_MS, "0")
        .expect("写配置失败");

    let stats = env
        .state
        .dashboard_api
        .department_stats(None)
        .expect("查询失败");
    assert_eq!(stats[0].average_score, 25);
}
