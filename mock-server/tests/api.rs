use axum::http::{self, Request, StatusCode};
use axum::Router;
use caja_mock_server::app;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

async fn send(app: &Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

// --- list ---

#[tokio::test]
async fn list_members_empty() {
    let resp = send(&app(), get("/api/Socio")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let members: Vec<Value> = body_json(resp).await;
    assert!(members.is_empty());
}

#[tokio::test]
async fn contribution_types_are_seeded() {
    let resp = send(&app(), get("/api/TiposAportacion")).await;
    let types: Vec<Value> = body_json(resp).await;
    assert_eq!(types.len(), 2);
    assert_eq!(types[0]["idTipoAportacion"], 1);
    assert_eq!(types[0]["nombreTipo"], "Ordinaria");
}

#[tokio::test]
async fn unknown_collection_returns_404() {
    let resp = send(&app(), get("/api/Usuarios")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- create ---

#[tokio::test]
async fn create_member_returns_201_with_id() {
    let resp = send(
        &app(),
        json_request("POST", "/api/Socio", r#"{"nombres":"Ana","estado":"Activo"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let member: Value = body_json(resp).await;
    assert_eq!(member["idSocio"], 1);
    assert_eq!(member["nombres"], "Ana");
}

#[tokio::test]
async fn create_non_object_returns_422() {
    let resp = send(&app(), json_request("POST", "/api/Socio", "[1,2]")).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get / update / delete ---

#[tokio::test]
async fn get_member_not_found() {
    let resp = send(&app(), get("/api/Socio/99")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_member_bad_id_returns_400() {
    let resp = send(&app(), get("/api/Socio/not-a-number")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_member_not_found() {
    let resp = send(
        &app(),
        json_request("PUT", "/api/Socio/42", r#"{"nombres":"Nope"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_member_not_found() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/Socio/42")
        .body(String::new())
        .unwrap();
    let resp = send(&app(), request).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- nested filters ---

#[tokio::test]
async fn accounts_filter_by_member_and_embed_owner() {
    let app = app();
    send(&app, json_request("POST", "/api/Socio", r#"{"nombres":"Ana"}"#)).await;
    send(
        &app,
        json_request("POST", "/api/CuentasAhorro", r#"{"idSocio":1,"estado":"Activa"}"#),
    )
    .await;
    send(
        &app,
        json_request("POST", "/api/CuentasAhorro", r#"{"idSocio":2,"estado":"Cerrada"}"#),
    )
    .await;

    let accounts: Vec<Value> = body_json(send(&app, get("/api/CuentasAhorro/socio/1")).await).await;
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["idSocioNavigation"]["nombres"], "Ana");

    let closed: Vec<Value> = body_json(send(&app, get("/api/CuentasAhorro/estado/Cerrada")).await).await;
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0]["idSocio"], 2);
}

#[tokio::test]
async fn unknown_filter_segment_returns_404() {
    let resp = send(&app(), get("/api/Socio/ciudad/Quito")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn movements_between_dates_is_inclusive() {
    let app = app();
    for date in ["2024-01-01T08:00:00", "2024-01-15", "2024-02-01"] {
        let body = format!(r#"{{"idCuentaAhorro":1,"monto":10,"fechaMovimiento":"{date}"}}"#);
        send(&app, json_request("POST", "/api/MovimientosAhorro", &body)).await;
    }
    let resp = send(&app, get("/api/MovimientosAhorro/fecha/2024-01-01/2024-01-31")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let movements: Vec<Value> = body_json(resp).await;
    assert_eq!(movements.len(), 2);
}

#[tokio::test]
async fn account_summary_by_cedula_and_number() {
    let app = app();
    send(&app, json_request("POST", "/api/Socio", r#"{"cedula":"1020304050","nombres":"Ana"}"#)).await;
    send(
        &app,
        json_request(
            "POST",
            "/api/CuentasAhorro",
            r#"{"idSocio":1,"numeroCuenta":"00112233","saldoActual":500}"#,
        ),
    )
    .await;
    send(
        &app,
        json_request("POST", "/api/MovimientosAhorro", r#"{"idCuentaAhorro":1,"monto":20}"#),
    )
    .await;

    let resp = send(&app, get("/api/CuentasAhorro/resumen/1020304050/00112233")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: Value = body_json(resp).await;
    assert_eq!(summary["saldoActual"], 500);
    assert_eq!(summary["cuenta"]["idSocioNavigation"]["nombres"], "Ana");
    assert_eq!(summary["movimientos"].as_array().unwrap().len(), 1);

    let wrong_owner = send(&app, get("/api/CuentasAhorro/resumen/999999/00112233")).await;
    assert_eq!(wrong_owner.status(), StatusCode::NOT_FOUND);
    let not_accounts = send(&app, get("/api/Socio/resumen/1020304050/00112233")).await;
    assert_eq!(not_accounts.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let app = app();

    let resp = send(
        &app,
        json_request("POST", "/api/Aportaciones", r#"{"idSocio":3,"monto":100,"estado":"Pendiente"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = body_json(resp).await;
    let id = created["idAportacion"].as_i64().unwrap();

    let resp = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/Aportaciones/{id}"),
            r#"{"idSocio":3,"monto":100,"estado":"Aprobada"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = body_json(resp).await;
    assert_eq!(updated["estado"], "Aprobada");
    assert_eq!(updated["idAportacion"], id);

    let approved: Vec<Value> = body_json(send(&app, get("/api/Aportaciones/estado/Aprobada")).await).await;
    assert_eq!(approved.len(), 1);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/Aportaciones/{id}"))
        .body(String::new())
        .unwrap();
    let resp = send(&app, request).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = send(&app, get(&format!("/api/Aportaciones/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let remaining: Vec<Value> = body_json(send(&app, get("/api/Aportaciones")).await).await;
    assert!(remaining.is_empty());
}
