// ==========================================
// 技能矩阵 API 集成测试
// ==========================================
// 测试范围:
// 1. CSV 导入: 自动建档、失败行报告、重复导入幂等
// 2. 矩阵构建: 行列、单元格取最高等级、覆盖度、部门汇总
// ==========================================


use skills_matrix::api::ApiError;
use test_helpers::TestEnv;

const MATRIX_CSV: &str = "\
employee_name,gender,skill_name,level,category,machine_name
Alice,F,Welding,High,Technical,
Alice,F,Turning,Low,,Lathe-01
Bob,M,Welding,Expert,,
Carol,X,Welding,Low,,
Dave,M,Welding,Guru,,
";

#[test]
fn test_import_matrix_建档与失败行() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Assembly");

    let report = env
        .state
        .matrix_api
        .import_matrix(&dept, "csv", MATRIX_CSV.as_bytes())
        .expect("导入失败");

    assert_eq!(report.department_id, dept);
    assert_eq!(report.total_rows, 5);
    assert_eq!(report.imported, 3);
    assert_eq!(report.created_employees, 2);
    assert_eq!(report.created_skills, 2);
    assert_eq!(report.created_machines, 1);

    let failed_rows: Vec<usize> = report.failed.iter().map(|f| f.row).collect();
    assert_eq!(failed_rows, vec![5, 6]);

    // 新技能挂在目标部门,未给分类时使用默认分类
    let skills = env.state.skill_api.list_skills(None, Some(&dept)).unwrap();
    let welding = skills.iter().find(|s| s.name == "Welding").unwrap();
    assert_eq!(welding.category, "Technical");
    assert_eq!(welding.department_id.as_deref(), Some(dept.as_str()));
    let turning = skills.iter().find(|s| s.name == "Turning").unwrap();
    assert_eq!(turning.category, "General");
    assert!(turning.is_machine_related);
}

#[test]
fn test_import_matrix_重复导入不重复建档() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Assembly");

    env.state
        .matrix_api
        .import_matrix(&dept, "csv", MATRIX_CSV.as_bytes())
        .expect("导入失败");
    let second = env
        .state
        .matrix_api
        .import_matrix(&dept, "CSV", MATRIX_CSV.as_bytes())
        .expect("导入失败");

    assert_eq!(second.imported, 3);
    assert_eq!(second.created_employees, 0);
    assert_eq!(second.created_skills, 0);
    assert_eq!(second.created_machines, 0);
    assert_eq!(
        env.count_rows("SELECT COUNT(*) FROM employee_skill WHERE is_active = 1"),
        3
    );
}

#[test]
fn test_import_matrix_参数错误() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Assembly");

    let err = env
        .state
        .matrix_api
        .import_matrix(&dept, "csv", b"")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));

    let err = env
        .state
        .matrix_api
        .import_matrix(&dept, "pdf", MATRIX_CSV.as_bytes())
        .unwrap_err();
    assert_eq!(err.status(), 400);

    let err = env
        .state
        .matrix_api
        .import_matrix(&dept, "csv", b"employee_name,level\nAlice,Low\n")
        .unwrap_err();
    assert_eq!(err.status(), 400);

    let err = env
        .state
        .matrix_api
        .import_matrix(
            "00000000-0000-4000-8000-000000000000",
            "csv",
            MATRIX_CSV.as_bytes(),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_build_matrix_导入后矩阵() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Assembly");
    env.skill("Safety", None); // 全厂通用技能,无人持有
    env.state
        .matrix_api
        .import_matrix(&dept, "csv", MATRIX_CSV.as_bytes())
        .expect("导入失败");

    let matrix = env.state.matrix_api.build_matrix(&dept).expect("构建失败");

    assert_eq!(matrix.department.name, "Assembly");
    assert_eq!(matrix.rows.len(), 2);
    assert_eq!(matrix.skills.len(), 3);

    let coverage = |name: &str| {
        matrix
            .skills
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.coverage)
    };
    assert_eq!(coverage("Welding"), Some(2));
    assert_eq!(coverage("Turning"), Some(1));
    assert_eq!(coverage("Safety"), Some(0));

    let alice = matrix.rows.iter().find(|r| r.name == "Alice").unwrap();
    assert_eq!(alice.cells.len(), 2);
    assert_eq!(alice.score, Some(2.0));
    assert_eq!(alice.percentage, Some(50));
    assert_eq!(alice.display_level.as_deref(), Some("Medium"));

    let bob = matrix.rows.iter().find(|r| r.name == "Bob").unwrap();
    assert_eq!(bob.percentage, Some(100));
    // Expert 与 Advanced 同为 4 分,展示为 Advanced
    assert_eq!(bob.display_level.as_deref(), Some("Advanced"));

    assert_eq!(matrix.summary.valid_employee_count, 2);
    assert_eq!(matrix.summary.average_score, 75);
}

#[test]
fn test_build_matrix_多设备取最高等级() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let dept = env.department("Machining");
    let m1 = env.machine(&dept, "M1");
    let m2 = env.machine(&dept, "M2");
    let turning = env.skill("Turning", Some(&dept));
    let e1 = env.employee(&dept, "E1");
    env.assign(&e1, &turning, Some(&m1), "Low");
    env.assign(&e1, &turning, Some(&m2), "Advanced");

    let matrix = env.state.matrix_api.build_matrix(&dept).expect("构建失败");
    let row = &matrix.rows[0];
    assert_eq!(row.cells.get(&turning).map(String::as_str), Some("Advanced"));
    // 员工分按全部记录计算: (1 + 4) / 2
    assert_eq!(row.score, Some(2.5));
    assert_eq!(matrix.skills[0].coverage, 1);
}

#[test]
fn test_build_matrix_包含其他部门技能列() {
    let env = TestEnv::new().expect("无法创建测试环境");
    let a = env.department("A");
    let b = env.department("B");
    let foreign = env.skill("Forklift", Some(&b));
    let e1 = env.employee(&a, "E1");
    env.assign(&e1, &foreign, None, "Medium");

    let matrix = env.state.matrix_api.build_matrix(&a).expect("构建失败");
    assert_eq!(matrix.skills.len(), 1);
    assert_eq!(matrix.skills[0].skill_id, foreign);
    assert_eq!(matrix.skills[0].coverage, 1);
}

#[test]
fn test_build_matrix_部门不存在() {
    let env = TestEnv::new().expect("无法创建测试环境");

    let err = env
        .state
        .matrix_api
        .build_matrix("00000000-0000-4000-8000-000000000000")
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
