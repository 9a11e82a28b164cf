// ==========================================
// 技能矩阵管理系统 - HTTP 适配层
// ==========================================
// 框架: axum
// 信封: {"success": true, "data": ...} | {"success": false, "error": "...", "code": "..."}
// 阻塞: 所有仓储/服务调用放入 spawn_blocking
// 参数: Query/Json 解析失败同样走信封 (INVALID_ARGUMENT)
// ==========================================

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::signal;

use crate::api::{
    ApiError, ApiResponse, ApiResult, CreateDepartmentRequest, CreateEmployeeRequest,
    CreateMachineRequest, CreateSkillRequest, UpsertSkillRequest,
};
use crate::app::state::AppState;
use crate::domain::DeactivationPolicy;

type SharedState = Arc<AppState>;

// ==========================================
// 路由
// ==========================================

/// 构建路由
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // 驾驶舱
        .route("/api/dashboard/departments", get(department_stats_handler))
        .route("/api/dashboard/machines", get(machine_stats_handler))
        .route("/api/dashboard/employees", get(employee_scores_handler))
        .route("/api/dashboard/performance", get(performance_series_handler))
        .route(
            "/api/dashboard/performance/recalculate",
            post(recalculate_performance_handler),
        )
        // 部门
        .route(
            "/api/departments",
            get(list_departments_handler).post(create_department_handler),
        )
        .route(
            "/api/departments/{id}",
            get(get_department_handler).delete(deactivate_department_handler),
        )
        // 员工
        .route(
            "/api/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route(
            "/api/employees/{id}",
            get(get_employee_handler).delete(delete_employee_handler),
        )
        .route("/api/employees/{id}/department", put(change_department_handler))
        .route("/api/employees/{id}/skills", put(upsert_skill_handler))
        .route(
            "/api/employees/{id}/skills/{assignment_id}",
            delete(remove_skill_handler),
        )
        // 设备
        .route(
            "/api/machines",
            get(list_machines_handler).post(create_machine_handler),
        )
        .route("/api/machines/{id}", delete(delete_machine_handler))
        // 技能
        .route("/api/skills", get(list_skills_handler).post(create_skill_handler))
        .route("/api/skills/{id}", delete(delete_skill_handler))
        // 技能矩阵
        .route("/api/matrix/{department_id}", get(build_matrix_handler))
        .route("/api/matrix/{department_id}/import", post(import_matrix_handler))
        .with_state(state)
}

/// 启动 HTTP 服务（直到收到退出信号）
pub async fn serve(state: SharedState, bind_addr: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    let app = router(state);
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("无法监听地址 {}", bind_addr))?;

    tracing::info!("HTTP 服务监听: {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    tracing::info!("HTTP 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("无法监听 Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("收到 Ctrl+C 信号"),
        _ = terminate => tracing::info!("收到 SIGTERM 信号"),
    }
}

// ==========================================
// 公共工具：信封、阻塞调用、参数解析
// ==========================================

fn respond<T: Serialize>(status: StatusCode, result: ApiResult<T>) -> Response {
    match result {
        Ok(data) => (status, Json(ApiResponse::ok(data))).into_response(),
        Err(err) => {
            let status =
                StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                tracing::error!(code = err.code(), "请求失败: {}", err);
            } else {
                tracing::warn!(code = err.code(), "请求被拒绝: {}", err);
            }
            (status, Json(ApiResponse::<()>::failure(&err))).into_response()
        }
    }
}

/// 在阻塞线程池执行
async fn blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("后台任务失败: {}", e)))?
}

fn json_body<T: DeserializeOwned>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::InvalidArgument(format!("请求体格式错误: {}", e.body_text())))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|e| ApiError::InvalidArgument(format!("查询参数格式错误: {}", e.body_text())))
}

fn parse_year(raw: Option<&str>) -> ApiResult<Option<i32>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ApiError::InvalidArgument(format!("year 必须为整数: {}", s))),
        None => Ok(None),
    }
}

fn parse_flag(field: &str, raw: Option<&str>) -> ApiResult<Option<bool>> {
    match raw.map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => match s.as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(ApiError::InvalidArgument(format!(
                "{} 必须为 true/false: {}",
                field, s
            ))),
        },
    }
}

// ==========================================
// 查询参数
// ==========================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepartmentFilter {
    department_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MachineFilter {
    department_id: Option<String>,
    machine_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceQuery {
    year: Option<String>,
    department_id: Option<String>,
    recalculate: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecalculateQuery {
    year: Option<String>,
    department_id: Option<String>,
    current_month: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CascadeQuery {
    cascade: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkillFilter {
    category: Option<String>,
    department_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ImportQuery {
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeDepartmentRequest {
    department_id: String,
}

// ==========================================
// 健康检查
// ==========================================

async fn health_handler() -> Response {
    respond(
        StatusCode::OK,
        Ok(serde_json::json!({
            "status": "ok",
            "version": crate::VERSION,
        })),
    )
}

// ==========================================
// 驾驶舱
// ==========================================

async fn department_stats_handler(
    State(state): State<SharedState>,
    filter: Result<Query<DepartmentFilter>, QueryRejection>,
) -> Response {
    let result = match query_params(filter) {
        Ok(filter) => {
            blocking(move || {
                state
                    .dashboard_api
                    .department_stats(filter.department_id.as_deref())
            })
            .await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

async fn machine_stats_handler(
    State(state): State<SharedState>,
    filter: Result<Query<MachineFilter>, QueryRejection>,
) -> Response {
    let result = match query_params(filter) {
        Ok(filter) => {
            blocking(move || {
                state
                    .dashboard_api
                    .machine_stats(filter.department_id.as_deref(), filter.machine_id.as_deref())
            })
            .await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

async fn employee_scores_handler(
    State(state): State<SharedState>,
    filter: Result<Query<DepartmentFilter>, QueryRejection>,
) -> Response {
    let result = match query_params(filter) {
        Ok(filter) => {
            blocking(move || {
                state
                    .dashboard_api
                    .employee_scores(filter.department_id.as_deref())
            })
            .await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

async fn performance_series_handler(
    State(state): State<SharedState>,
    query: Result<Query<PerformanceQuery>, QueryRejection>,
) -> Response {
    let result = match query_params(query) {
        Ok(query) => {
            blocking(move || {
                let year = parse_year(query.year.as_deref())?;
                let recalculate = parse_flag("recalculate", query.recalculate.as_deref())?;
                state
                    .dashboard_api
                    .performance_series(year, query.department_id.as_deref(), recalculate)
            })
            .await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

async fn recalculate_performance_handler(
    State(state): State<SharedState>,
    query: Result<Query<RecalculateQuery>, QueryRejection>,
) -> Response {
    let result = match query_params(query) {
        Ok(query) => {
            blocking(move || {
                if parse_flag("currentMonth", query.current_month.as_deref())?.unwrap_or(false) {
                    return state.dashboard_api.recalculate_current_month();
                }
                let year = parse_year(query.year.as_deref())?;
                state
                    .dashboard_api
                    .recalculate_performance(year, query.department_id.as_deref())
            })
            .await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

// ==========================================
// 部门
// ==========================================

async fn list_departments_handler(State(state): State<SharedState>) -> Response {
    let result = blocking(move || state.department_api.list_departments()).await;
    respond(StatusCode::OK, result)
}

async fn create_department_handler(
    State(state): State<SharedState>,
    payload: Result<Json<CreateDepartmentRequest>, JsonRejection>,
) -> Response {
    let result = match json_body(payload) {
        Ok(req) => blocking(move || state.department_api.create_department(req)).await,
        Err(e) => Err(e),
    };
    respond(StatusCode::CREATED, result)
}

async fn get_department_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let result = blocking(move || state.department_api.get_department(&id)).await;
    respond(StatusCode::OK, result)
}

async fn deactivate_department_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    query: Result<Query<CascadeQuery>, QueryRejection>,
) -> Response {
    let result = match query_params(query) {
        Ok(query) => {
            blocking(move || {
                let policy = match parse_flag("cascade", query.cascade.as_deref())? {
                    Some(true) => DeactivationPolicy::Cascade,
                    _ => DeactivationPolicy::Reject,
                };
                state.department_api.deactivate_department(&id, policy)
            })
            .await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

// ==========================================
// 员工
// ==========================================

async fn list_employees_handler(
    State(state): State<SharedState>,
    filter: Result<Query<DepartmentFilter>, QueryRejection>,
) -> Response {
    let result = match query_params(filter) {
        Ok(filter) => {
            blocking(move || {
                state
                    .employee_api
                    .list_employees(filter.department_id.as_deref())
            })
            .await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

async fn create_employee_handler(
    State(state): State<SharedState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Response {
    let result = match json_body(payload) {
        Ok(req) => blocking(move || state.employee_api.create_employee(req)).await,
        Err(e) => Err(e),
    };
    respond(StatusCode::CREATED, result)
}

async fn get_employee_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let result = blocking(move || state.employee_api.get_employee(&id)).await;
    respond(StatusCode::OK, result)
}

async fn delete_employee_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let result = blocking(move || {
        state
            .employee_api
            .delete_employee(&id)
            .map(|assignments| serde_json::json!({ "employeeId": id, "deactivatedSkills": assignments }))
    })
    .await;
    respond(StatusCode::OK, result)
}

async fn change_department_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<ChangeDepartmentRequest>, JsonRejection>,
) -> Response {
    let result = match json_body(payload) {
        Ok(req) => {
            blocking(move || state.employee_api.change_department(&id, &req.department_id)).await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

async fn upsert_skill_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<UpsertSkillRequest>, JsonRejection>,
) -> Response {
    let result = match json_body(payload) {
        Ok(req) => blocking(move || state.employee_api.upsert_skill(&id, req)).await,
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

async fn remove_skill_handler(
    State(state): State<SharedState>,
    Path((employee_id, assignment_id)): Path<(String, String)>,
) -> Response {
    let result =
        blocking(move || state.employee_api.remove_skill(&employee_id, &assignment_id)).await;
    respond(StatusCode::OK, result)
}

// ==========================================
// 设备
// ==========================================

async fn list_machines_handler(
    State(state): State<SharedState>,
    filter: Result<Query<DepartmentFilter>, QueryRejection>,
) -> Response {
    let result = match query_params(filter) {
        Ok(filter) => {
            blocking(move || {
                state
                    .machine_api
                    .list_machines(filter.department_id.as_deref())
            })
            .await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

async fn create_machine_handler(
    State(state): State<SharedState>,
    payload: Result<Json<CreateMachineRequest>, JsonRejection>,
) -> Response {
    let result = match json_body(payload) {
        Ok(req) => blocking(move || state.machine_api.create_machine(req)).await,
        Err(e) => Err(e),
    };
    respond(StatusCode::CREATED, result)
}

async fn delete_machine_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let result = blocking(move || state.machine_api.delete_machine(&id)).await;
    respond(StatusCode::OK, result)
}

// ==========================================
// 技能
// ==========================================

async fn list_skills_handler(
    State(state): State<SharedState>,
    filter: Result<Query<SkillFilter>, QueryRejection>,
) -> Response {
    let result = match query_params(filter) {
        Ok(filter) => {
            blocking(move || {
                state
                    .skill_api
                    .list_skills(filter.category.as_deref(), filter.department_id.as_deref())
            })
            .await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

async fn create_skill_handler(
    State(state): State<SharedState>,
    payload: Result<Json<CreateSkillRequest>, JsonRejection>,
) -> Response {
    let result = match json_body(payload) {
        Ok(req) => blocking(move || state.skill_api.create_skill(req)).await,
        Err(e) => Err(e),
    };
    respond(StatusCode::CREATED, result)
}

async fn delete_skill_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let result = blocking(move || state.skill_api.delete_skill(&id)).await;
    respond(StatusCode::OK, result)
}

// ==========================================
// 技能矩阵
// ==========================================

async fn build_matrix_handler(
    State(state): State<SharedState>,
    Path(department_id): Path<String>,
) -> Response {
    let result = blocking(move || state.matrix_api.build_matrix(&department_id)).await;
    respond(StatusCode::OK, result)
}

async fn import_matrix_handler(
    State(state): State<SharedState>,
    Path(department_id): Path<String>,
    query: Result<Query<ImportQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    let result = match query_params(query) {
        Ok(query) => {
            blocking(move || {
                let format = query.format.as_deref().unwrap_or("csv");
                state.matrix_api.import_matrix(&department_id, format, &body)
            })
            .await
        }
        Err(e) => Err(e),
    };
    respond(StatusCode::OK, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("cascade", None).unwrap(), None);
        assert_eq!(parse_flag("cascade", Some("TRUE")).unwrap(), Some(true));
        assert_eq!(parse_flag("cascade", Some("0")).unwrap(), Some(false));
        assert!(parse_flag("cascade", Some("maybe")).is_err());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(Some("2024")).unwrap(), Some(2024));
        assert_eq!(parse_year(Some("")).unwrap(), None);
        assert!(matches!(
            parse_year(Some("twenty")),
            Err(ApiError::InvalidArgument(_))
        ));
    }
}
