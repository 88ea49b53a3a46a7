use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use guardia::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Default API key seeded by migration (must match m20260301_initial.rs)
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

#[tokio::test]
async fn test_auth_endpoints() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/system/status", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_seeded_admin() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": "admin@localhost",
                        "password": "wrong"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": "admin@localhost",
                        "password": "password"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["user"]["email"], "admin@localhost");
    assert_eq!(body["data"]["user"]["role"], "company_admin");
    assert_eq!(body["data"]["api_key"], DEFAULT_API_KEY);
}

#[tokio::test]
async fn test_ropa_crud() {
    let app = spawn_app().await;

    let new_entry = serde_json::json!({
        "process_name": "Folha de Pagamento",
        "department": "RH",
        "data_types": ["Nome", "CPF", "Dados Bancários"],
        "data_subjects": "Funcionários",
        "legal_basis": "Execução de Contrato",
        "retention_period": "5 Anos"
    });

    let response = app
        .clone()
        .oneshot(authed("POST", "/api/ropa", Some(new_entry)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["data_types"][1], "CPF");

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/ropa", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let update = serde_json::json!({
        "process_name": "Folha de Pagamento",
        "department": "Recursos Humanos",
        "data_types": ["Nome", "CPF"],
        "data_subjects": "Funcionários",
        "legal_basis": "Execução de Contrato",
        "retention_period": "10 Anos"
    });

    let response = app
        .clone()
        .oneshot(authed("PUT", &format!("/api/ropa/{id}"), Some(update)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["department"], "Recursos Humanos");

    let response = app
        .clone()
        .oneshot(authed("DELETE", &format!("/api/ropa/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed("DELETE", &format!("/api/ropa/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ropa_export_csv() {
    let app = spawn_app().await;

    let entry = serde_json::json!({
        "process_name": "Email Marketing",
        "department": "Marketing",
        "data_types": ["Email", "Nome"],
        "data_subjects": "Leads",
        "legal_basis": "Consentimento",
        "retention_period": "Até Revogação"
    });

    let response = app
        .clone()
        .oneshot(authed("POST", "/api/ropa", Some(entry)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/ropa/export?format=csv", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("Content-Type").unwrap(),
        "text/csv"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("process_name,department"));
    assert!(text.contains("Email Marketing"));
    assert!(text.contains("Email; Nome"));

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/ropa/export?format=pdf", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_documents_version_bump_and_publish() {
    let app = spawn_app().await;

    let new_doc = serde_json::json!({
        "title": "Política de Privacidade",
        "content": "<h1>Política de Privacidade</h1><p>Rascunho inicial.</p>",
        "doc_type": "privacy_policy"
    });

    let response = app
        .clone()
        .oneshot(authed("POST", "/api/documents", Some(new_doc)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["version"], 1);
    assert_eq!(body["data"]["is_published"], false);

    // Title-only change keeps the version
    let response = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/documents/{id}"),
            Some(serde_json::json!({
                "title": "Política de Privacidade v1",
                "content": "<h1>Política de Privacidade</h1><p>Rascunho inicial.</p>"
            })),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["version"], 1);

    // Content change bumps it
    let response = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/documents/{id}"),
            Some(serde_json::json!({
                "title": "Política de Privacidade v1",
                "content": "<h1>Política de Privacidade</h1><p>Texto revisado.</p>"
            })),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["version"], 2);

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/documents/{id}/publish"),
            Some(serde_json::json!({"is_published": true})),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["is_published"], true);
}

#[tokio::test]
async fn test_document_generation_without_key_saves_placeholder() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/documents/generate",
            Some(serde_json::json!({
                "title": "Política de Cookies",
                "doc_type": "privacy_policy"
            })),
        ))
        .await
        .unwrap();

    // Misconfigured AI degrades to a placeholder document, never an error.
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["ai_assisted"], false);
    assert_eq!(body["data"]["version"], 1);
    assert!(
        body["data"]["content"]
            .as_str()
            .unwrap()
            .contains("Erro de Configuração")
    );
}

#[tokio::test]
async fn test_awareness_quiz_flow() {
    let app = spawn_app().await;

    let post = serde_json::json!({
        "title": "🔒 A Importância de Senhas Fortes",
        "content": "## Proteja suas credenciais\n\nUse no mínimo 12 caracteres.",
        "category": "security",
        "is_published": true,
        "quiz": {
            "question": "Qual a recomendação mínima de caracteres para uma senha forte?",
            "options": ["4 caracteres", "8 caracteres", "12 caracteres", "6 caracteres"],
            "correct_answer_index": 2,
            "explanation": "Senhas com 12 ou mais caracteres são mais difíceis de quebrar."
        }
    });

    let response = app
        .clone()
        .oneshot(authed("POST", "/api/awareness", Some(post)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["view_count"], 0);

    // Views only increment
    for expected in 1..=2 {
        let response = app
            .clone()
            .oneshot(authed("POST", &format!("/api/awareness/{id}/view"), None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["data"]["view_count"], expected);
    }

    // Wrong answer
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/awareness/{id}/quiz"),
            Some(serde_json::json!({"answer_index": 0})),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["correct"], false);
    assert_eq!(body["data"]["correct_answer_index"], 2);

    // Right answer
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/awareness/{id}/quiz"),
            Some(serde_json::json!({"answer_index": 2})),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["correct"], true);

    // Out-of-range answer index
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/awareness/{id}/quiz"),
            Some(serde_json::json!({"answer_index": 7})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_awareness_rejects_malformed_quiz() {
    let app = spawn_app().await;

    let post = serde_json::json!({
        "title": "Quiz quebrado",
        "content": "corpo",
        "category": "security",
        "quiz": {
            "question": "?",
            "options": ["só", "duas"],
            "correct_answer_index": 0,
            "explanation": "x"
        }
    });

    let response = app
        .clone()
        .oneshot(authed("POST", "/api/awareness", Some(post)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_management_guards() {
    let app = spawn_app().await;

    // The seeded admin is the only active company_admin; it cannot deactivate
    let response = app
        .clone()
        .oneshot(authed("GET", "/api/settings/users", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    let admin_id = users[0]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/settings/users/{admin_id}"),
            Some(serde_json::json!({
                "name": "Administrator",
                "role": "company_admin",
                "is_active": false
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Adding a regular user works; short passwords are rejected
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/settings/users",
            Some(serde_json::json!({
                "email": "bob@acmecorp.com",
                "name": "Bob Silva",
                "role": "user",
                "password": "short"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/settings/users",
            Some(serde_json::json!({
                "email": "bob@acmecorp.com",
                "name": "Bob Silva",
                "role": "user",
                "password": "correct-horse-battery"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["is_active"], true);

    // Duplicate email within the tenant is rejected
    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            "/api/settings/users",
            Some(serde_json::json!({
                "email": "bob@acmecorp.com",
                "name": "Bob Again",
                "role": "user",
                "password": "correct-horse-battery"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tenant_settings_round_trip() {
    let app = spawn_app().await;

    let update = serde_json::json!({
        "name": "Acme Corp Ltda.",
        "contact_email": "contato@acmecorp.com",
        "settings": {
            "dpo_name": "Dr. João Silva",
            "dpo_email": "dpo@acmecorp.com",
            "privacy_committee": [
                {"id": "cm-1", "name": "Maria Souza", "function": "RH", "email": "maria.rh@acmecorp.com"}
            ],
            "theme": {
                "primary_color": "#059669",
                "sidebar_color": "#1e293b",
                "sidebar_text_color": "#ffffff"
            },
            "security": {
                "mfa_enabled": true,
                "session_timeout_minutes": 30,
                "password_policy": "strong"
            }
        }
    });

    let response = app
        .clone()
        .oneshot(authed("PUT", "/api/settings/tenant", Some(update)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/settings/tenant", None))
        .await
        .unwrap();
    let body = json_body(response).await;

    assert_eq!(body["data"]["name"], "Acme Corp Ltda.");
    // CNPJ is immutable from the API
    assert_eq!(body["data"]["cnpj"], "00.000.000/0001-00");
    assert_eq!(body["data"]["settings"]["dpo_name"], "Dr. João Silva");
    assert_eq!(
        body["data"]["settings"]["security"]["password_policy"],
        "strong"
    );
}

#[tokio::test]
async fn test_dashboard_stats() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/dashboard/stats", None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["mapped_processes"], 0);
    assert_eq!(body["data"]["open_incidents"], 0);

    for (name, dept) in [("Folha", "RH"), ("Recrutamento", "RH"), ("Leads", "Marketing")] {
        let entry = serde_json::json!({
            "process_name": name,
            "department": dept,
            "data_types": ["Nome"],
            "data_subjects": "Pessoas",
            "legal_basis": "Consentimento",
            "retention_period": "1 Ano"
        });
        let response = app
            .clone()
            .oneshot(authed("POST", "/api/ropa", Some(entry)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let incident = serde_json::json!({
        "title": "Notebook Perdido",
        "description": "Notebook corporativo perdido em transporte público.",
        "severity": "critical"
    });
    let response = app
        .clone()
        .oneshot(authed("POST", "/api/incidents", Some(incident)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/dashboard/stats", None))
        .await
        .unwrap();
    let body = json_body(response).await;

    assert_eq!(body["data"]["mapped_processes"], 3);
    assert_eq!(body["data"]["open_incidents"], 1);
    assert_eq!(body["data"]["critical_incidents"], 1);

    let departments = body["data"]["processes_by_department"].as_array().unwrap();
    let rh = departments.iter().find(|b| b["name"] == "RH").unwrap();
    assert_eq!(rh["value"], 2);
}

#[tokio::test]
async fn test_vendors_crud() {
    let app = spawn_app().await;

    let vendor = serde_json::json!({
        "name": "CloudHost BR",
        "service_provided": "Hospedagem de dados",
        "risk_level": "high",
        "has_signed_dpa": false
    });

    let response = app
        .clone()
        .oneshot(authed("POST", "/api/vendors", Some(vendor)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(authed(
            "PUT",
            &format!("/api/vendors/{id}"),
            Some(serde_json::json!({
                "name": "CloudHost BR",
                "service_provided": "Hospedagem de dados",
                "risk_level": "medium",
                "has_signed_dpa": true
            })),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["risk_level"], "medium");
    assert_eq!(body["data"]["has_signed_dpa"], true);

    let response = app
        .clone()
        .oneshot(authed("DELETE", &format!("/api/vendors/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_dsar_lifecycle() {
    let app = spawn_app().await;

    let request = serde_json::json!({
        "subject_name": "José das Couves",
        "subject_email": "jose@example.com",
        "request_type": "Eliminação de dados"
    });

    let response = app
        .clone()
        .oneshot(authed("POST", "/api/dsar", Some(request)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let protocol = body["data"]["protocol_number"].as_str().unwrap();
    assert!(protocol.starts_with("DSAR-"));
    assert_eq!(body["data"]["status"], "new");
    assert_eq!(body["data"]["overdue"], false);

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/dsar/{id}/status"),
            Some(serde_json::json!({"status": "processing"})),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "processing");

    let response = app
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/dsar/{id}/respond"),
            Some(serde_json::json!({
                "response_content": "Dados eliminados conforme solicitado."
            })),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "completed");
}

#[tokio::test]
async fn test_system_config_hides_secrets() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/system/config", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["data"]["server"]["port"].is_number());
    // Secrets never serialize
    assert!(body["data"]["ai"].get("api_key").is_none());
}
