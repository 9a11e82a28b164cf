// ==========================================
// 技能矩阵管理系统 - 应用状态
// ==========================================
// 职责: 创建共享连接,装配仓储 → 服务 → API
// 连接: 整个进程共享一个注入的 Arc<Mutex<Connection>>
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{DashboardApi, DepartmentApi, EmployeeApi, MachineApi, MatrixApi, SkillApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::MatrixImporter;
use crate::repository::{
    DepartmentRepository, EmployeeRepository, MachineRepository, SkillAssignmentRepository,
    SkillRepository, SkillStore, SqliteSkillStore,
};
use crate::services::{PerformanceService, ScoringService};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径（内存库为 ":memory:"）
    pub db_path: String,

    pub dashboard_api: Arc<DashboardApi>,
    pub department_api: Arc<DepartmentApi>,
    pub employee_api: Arc<EmployeeApi>,
    pub machine_api: Arc<MachineApi>,
    pub skill_api: Arc<SkillApi>,
    pub matrix_api: Arc<MatrixApi>,

    /// 配置管理器（运行期参数）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并统一 PRAGMA
    /// 2. 建表/迁移（幂等）
    /// 3. 装配所有 Repository / Service / API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;

        let mut state = Self::from_connection(Arc::new(Mutex::new(conn)));
        state.db_path = db_path;
        Ok(state)
    }

    /// 从已初始化的共享连接装配
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let department_repo = Arc::new(DepartmentRepository::new(conn.clone()));
        let employee_repo = Arc::new(EmployeeRepository::new(conn.clone()));
        let machine_repo = Arc::new(MachineRepository::new(conn.clone()));
        let skill_repo = Arc::new(SkillRepository::new(conn.clone()));
        let assignment_repo = Arc::new(SkillAssignmentRepository::new(conn.clone()));
        let store: Arc<dyn SkillStore> = Arc::new(SqliteSkillStore::new(conn.clone()));
        let config_manager = Arc::new(ConfigManager::new(conn));

        // ==========================================
        // 初始化Service层
        // ==========================================
        let scoring = Arc::new(ScoringService::new(store));
        let performance = Arc::new(PerformanceService::new(scoring.clone()));
        let importer = Arc::new(MatrixImporter::new(
            department_repo.clone(),
            employee_repo.clone(),
            skill_repo.clone(),
            machine_repo.clone(),
            assignment_repo.clone(),
        ));

        // ==========================================
        // 初始化API层
        // ==========================================
        let dashboard_api = Arc::new(DashboardApi::new(
            scoring.clone(),
            performance,
            config_manager.clone(),
        ));
        let department_api = Arc::new(DepartmentApi::new(department_repo.clone()));
        let employee_api = Arc::new(EmployeeApi::new(
            employee_repo,
            department_repo.clone(),
            skill_repo.clone(),
            machine_repo.clone(),
            assignment_repo,
        ));
        let machine_api = Arc::new(MachineApi::new(machine_repo, department_repo.clone()));
        let skill_api = Arc::new(SkillApi::new(skill_repo.clone(), department_repo.clone()));
        let matrix_api = Arc::new(MatrixApi::new(
            department_repo,
            skill_repo,
            scoring,
            importer,
            config_manager.clone(),
        ));

        tracing::info!("AppState初始化成功");

        Self {
            db_path: ":memory:".to_string(),
            dashboard_api,
            department_api,
            employee_api,
            machine_api,
            skill_api,
            matrix_api,
            config_manager,
        }
    }
}
