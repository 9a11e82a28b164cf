// ==========================================
// HTTP 接口集成测试
// ==========================================
// 测试范围:
// 1. 响应信封: 成功 / 失败、错误码与 HTTP 状态
// 2. 路由: 基础数据、驾驶舱、技能矩阵导入
// 驱动方式: tower::ServiceExt::oneshot
// ==========================================


use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use skills_matrix::app::{router, AppState};
use test_helpers::TestEnv;
use tower::ServiceExt;

fn app(env: TestEnv) -> (Router, TestEnv) {
    let state = AppState::new(env.db_path.clone()).expect("无法创建AppState");
    (router(Arc::new(state)), env)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_department(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/departments",
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["departmentId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (app, _env) = app(TestEnv::new().unwrap());

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_创建部门与重名冲突() {
    let (app, _env) = app(TestEnv::new().unwrap());
    create_department(&app, "Assembly").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/departments",
        Some(json!({ "name": "Assembly" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "CONFLICT");
    assert!(body["error"].is_string());
    assert!(body.get("data").is_none());

    let (status, body) = send(&app, Method::GET, "/api/departments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_请求体格式错误走信封() {
    let (app, _env) = app(TestEnv::new().unwrap());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/departments",
        Some(json!({ "description": "no name" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_非法ID返回400() {
    let (app, _env) = app(TestEnv::new().unwrap());

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/dashboard/departments?departmentId=not-a-uuid",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");

    let (status, body) = send(&app, Method::GET, "/api/dashboard/performance?year=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_查询参数格式错误走信封() {
    let (app, _env) = app(TestEnv::new().unwrap());

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/dashboard/departments?departmentId=a&departmentId=b",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_不能通过其他员工路径移除技能() {
    let (app, _env) = app(TestEnv::new().unwrap());
    let dept = create_department(&app, "Assembly").await;

    let mut employees = Vec::new();
    for name in ["Owner", "Other"] {
        let (_, body) = send(
            &app,
            Method::POST,
            "/api/employees",
            Some(json!({ "name": name, "gender": "M", "departmentId": dept })),
        )
        .await;
        employees.push(body["data"]["employeeId"].as_str().unwrap().to_string());
    }
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/skills",
        Some(json!({ "name": "Welding", "category": "Technical" })),
    )
    .await;
    let skill_id = body["data"]["skillId"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        Method::PUT,
        &format!("/api/employees/{}/skills", employees[0]),
        Some(json!({ "skillId": skill_id, "level": "High" })),
    )
    .await;
    let assignment_id = body["data"]["assignment"]["assignmentId"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/employees/{}/skills/{}", employees[1], assignment_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/employees/{}/skills/{}", employees[0], assignment_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_员工技能与驾驶舱() {
    let (app, _env) = app(TestEnv::new().unwrap());
    let dept = create_department(&app, "Assembly").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/employees",
        Some(json!({ "name": "Alice", "gender": "F", "departmentId": dept })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let employee_id = body["data"]["employeeId"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/skills",
        Some(json!({ "name": "Welding", "category": "Technical" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let skill_id = body["data"]["skillId"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/employees/{}/skills", employee_id),
        Some(json!({ "skillId": skill_id, "level": "High" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created"], true);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/dashboard/departments?departmentId={}", dept),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"][0];
    assert_eq!(stats["departmentName"], "Assembly");
    assert_eq!(stats["averageScore"], 75);
    assert_eq!(stats["validEmployeeCount"], 1);

    let (status, body) = send(&app, Method::GET, "/api/dashboard/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["percentage"], 75);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/dashboard/performance?year=2020&recalculate=true",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let series = body["data"].as_array().unwrap();
    assert_eq!(series.len(), 12);
    assert_eq!(series[0]["month"], "Jan");
    assert_eq!(series[0]["Assembly"], 67);
}

#[tokio::test]
async fn test_停用部门_拒绝与级联() {
    let (app, _env) = app(TestEnv::new().unwrap());
    let dept = create_department(&app, "Assembly").await;
    send(
        &app,
        Method::POST,
        "/api/machines",
        Some(json!({ "name": "M1", "machineType": "CNC", "departmentId": dept })),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/departments/{}", dept), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "BUSINESS_RULE_VIOLATION");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/departments/{}?cascade=true", dept),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["machines"], 1);
    assert_eq!(body["data"]["policy"], "CASCADE");

    let (status, body) = send(&app, Method::GET, &format!("/api/departments/{}", dept), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_矩阵导入与查询() {
    let (app, _env) = app(TestEnv::new().unwrap());
    let dept = create_department(&app, "Assembly").await;

    let csv = "employee_name,gender,skill_name,level\nAlice,F,Welding,Medium\nBob,M,Welding,Guru\n";
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/matrix/{}/import?format=csv", dept))
        .header("content-type", "text/csv")
        .body(Body::from(csv))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["imported"], 1);
    assert_eq!(body["data"]["failed"][0]["row"], 3);

    let (status, body) = send(&app, Method::GET, &format!("/api/matrix/{}", dept), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rows"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["summary"]["averageScore"], 50);
}

#[tokio::test]
async fn test_重算接口() {
    let (app, _env) = app(TestEnv::new().unwrap());
    create_department(&app, "Assembly").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/dashboard/performance/recalculate?year=2020",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["year"], 2020);
    assert_eq!(body["data"]["recordsWritten"], 0);
    assert_eq!(body["data"]["skipped"][0]["months"].as_array().unwrap().len(), 12);
}
