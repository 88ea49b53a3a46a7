//! Incident lifecycle: report, analyze fallback, triage, append-only audit
//! trail and exports.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use guardia::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

const DEFAULT_API_KEY: &str = "guardia_default_api_key_please_regenerate";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.ai.api_key = String::new();

    let state = guardia::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    guardia::api::router(state).await
}

fn authed(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Api-Key", DEFAULT_API_KEY);

    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn report_incident(app: &Router) -> String {
    let incident = serde_json::json!({
        "title": "Notebook Perdido",
        "description": "Notebook com planilhas de RH perdido no transporte.",
        "severity": "high",
        "affected_data_types": ["Nome", "CPF"]
    });

    let response = app
        .clone()
        .oneshot(authed("POST", "/api/incidents", Some(incident)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn report_creates_initial_audit_entry() {
    let app = spawn_app().await;
    let id = report_incident(&app).await;

    let response = app
        .clone()
        .oneshot(authed("GET", &format!("/api/incidents/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "open");
    assert_eq!(body["data"]["severity"], "high");

    let history = body["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["action"], "Incidente Reportado");
    assert_eq!(history[0]["description"], "Registro inicial do incidente.");
    assert_eq!(history[0]["user"], "Administrator");
}

#[tokio::test]
async fn status_updates_append_to_the_trail() {
    let app = spawn_app().await;
    let id = report_incident(&app).await;

    // Empty justification is rejected
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/incidents/{id}/status"),
            Some(serde_json::json!({"status": "investigating", "description": "  "})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A no-op transition to the current status is rejected
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/incidents/{id}/status"),
            Some(serde_json::json!({"status": "open", "description": "ainda aberto"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // An unknown status never deserializes
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/incidents/{id}/status"),
            Some(serde_json::json!({"status": "escalated", "description": "x"})),
        ))
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::OK);

    // Valid transitions append, in order
    for (status, justification) in [
        ("investigating", "Análise iniciada, logs coletados."),
        ("mitigated", "Acesso remoto do notebook bloqueado."),
        ("resolved", "Dispositivo recuperado, sem indício de acesso."),
    ] {
        let response = app
            .clone()
            .oneshot(authed(
                "POST",
                &format!("/api/incidents/{id}/status"),
                Some(serde_json::json!({"status": status, "description": justification})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(authed("GET", &format!("/api/incidents/{id}"), None))
        .await
        .unwrap();
    let body = json_body(response).await;

    assert_eq!(body["data"]["status"], "resolved");

    let history = body["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0]["action"], "Incidente Reportado");
    assert_eq!(history[1]["action"], "Status alterado para Investigando");
    assert_eq!(history[2]["action"], "Status alterado para Mitigado");
    assert_eq!(history[3]["action"], "Status alterado para Resolvido");
    assert_eq!(history[2]["description"], "Acesso remoto do notebook bloqueado.");
}

#[tokio::test]
async fn analyze_degrades_without_an_api_key() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/incidents/analyze",
            Some(serde_json::json!({
                "description": "Email com dados de clientes enviado ao destinatário errado."
            })),
        ))
        .await
        .unwrap();

    // Pass-through semantics: a missing key is a fallback answer, not an error.
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["severity"], "medium");
    assert!(
        body["data"]["analysis"]
            .as_str()
            .unwrap()
            .contains("Chave de API")
    );

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/incidents/analyze",
            Some(serde_json::json!({"description": ""})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn incident_not_found_is_indistinguishable_across_tenants() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/incidents/no-such-id", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/incidents/no-such-id/status",
            Some(serde_json::json!({"status": "resolved", "description": "x"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn audit_trail_exports_as_csv() {
    let app = spawn_app().await;
    let id = report_incident(&app).await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/incidents/{id}/status"),
            Some(serde_json::json!({
                "status": "false_positive",
                "description": "Notebook estava no armário do escritório."
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed(
            "GET",
            &format!("/api/incidents/{id}/audit/export?format=csv"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("Content-Type").unwrap(), "text/csv");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(text.starts_with("date,user,action,description\n"));
    assert!(text.contains("Incidente Reportado"));
    assert!(text.contains("Status alterado para Falso Positivo"));

    // Register export carries the same incident
    let response = app
        .clone()
        .oneshot(authed("GET", "/api/incidents/export?format=csv", None))
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("Notebook Perdido"));
    assert!(text.contains("Falso Positivo"));
}

#[tokio::test]
async fn remediation_plan_is_stored() {
    let app = spawn_app().await;
    let id = report_incident(&app).await;

    let response = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/incidents/{id}/remediation"),
            Some(serde_json::json!({
                "plan": "Criptografar discos de todos os notebooks corporativos."
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(
        body["data"]["remediation_plan"]
            .as_str()
            .unwrap()
            .starts_with("Criptografar")
    );
}
