pub mod auth;
pub mod logs;

use crate::application::use_cases::carbon::compute_footprint;
use crate::domain::carbon::CarbonInput;
use crate::domain::chat::{ChatAnswer, ChatSuggestionRequest};
use crate::domain::error::AppError;
use crate::domain::sensor::{DashboardResponse, SensorReading, SuggestionsResponse};
use crate::domain::user::{Credentials, RegisterResponse};
use crate::infrastructure::config::ServerConfig;
use crate::interfaces::state::AppState;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder, ResponseError};
use auth::AuthenticatedUser;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

pub use logs::{add_log, LogEntry};

pub struct HttpState {
    pub state: Arc<AppState>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// Logs the failure (client errors as warnings) and renders it as JSON.
fn failure(logs: &Mutex<Vec<LogEntry>>, source: &str, context: &str, e: AppError) -> HttpResponse {
    let level = if e.status_code().is_server_error() {
        "ERROR"
    } else {
        "WARN"
    };
    add_log(logs, level, source, &format!("{}: {}", context, e));
    e.error_response()
}

#[post("/register")]
async fn register_user(data: web::Data<HttpState>, req: web::Json<Credentials>) -> impl Responder {
    match data.state.auth_use_case.register(&req).await {
        Ok(()) => {
            add_log(
                &data.logs,
                "INFO",
                "Auth",
                &format!("Registered user {}", req.username),
            );
            HttpResponse::Ok().json(RegisterResponse {
                msg: "Registrazione avvenuta con successo".to_string(),
            })
        }
        Err(e) => failure(&data.logs, "Auth", "Registration failed", e),
    }
}

/// OAuth2 password flow: form-encoded `username` and `password`.
#[post("/token")]
async fn issue_token(data: web::Data<HttpState>, form: web::Form<Credentials>) -> impl Responder {
    match data.state.auth_use_case.login(&form).await {
        Ok(token) => HttpResponse::Ok().json(token),
        Err(e) => failure(&data.logs, "Auth", "Login failed", e),
    }
}

#[get("/sensors")]
async fn read_sensors(data: web::Data<HttpState>, _user: AuthenticatedUser) -> impl Responder {
    match data.state.sensor_use_case.read_current().await {
        Ok(reading) => HttpResponse::Ok().json(SensorReading { id: None, ..reading }),
        Err(e) => failure(&data.logs, "Sensors", "Sensor read failed", e),
    }
}

#[get("/dashboard")]
async fn get_dashboard(
    data: web::Data<HttpState>,
    _user: AuthenticatedUser,
    query: web::Query<LimitQuery>,
) -> impl Responder {
    match data.state.sensor_use_case.dashboard(query.limit).await {
        Ok(readings) => HttpResponse::Ok().json(DashboardResponse { data: readings }),
        Err(e) => failure(&data.logs, "Sensors", "Dashboard query failed", e),
    }
}

#[get("/suggestions")]
async fn get_suggestions(data: web::Data<HttpState>, _user: AuthenticatedUser) -> impl Responder {
    match data.state.advisory_use_case.suggestions().await {
        Ok(suggestions) => HttpResponse::Ok().json(SuggestionsResponse { suggestions }),
        Err(e) => failure(&data.logs, "Advisory", "Suggestions failed", e),
    }
}

#[post("/carbon_footprint")]
async fn calculate_carbon_footprint(
    data: web::Data<HttpState>,
    _user: AuthenticatedUser,
    req: web::Json<CarbonInput>,
) -> impl Responder {
    match compute_footprint(&req) {
        Ok(footprint) => HttpResponse::Ok().json(footprint),
        Err(e) => failure(&data.logs, "Carbon", "Carbon footprint rejected", e),
    }
}

#[post("/chat_suggestion")]
async fn post_chat_suggestion(
    data: web::Data<HttpState>,
    user: AuthenticatedUser,
    req: web::Json<ChatSuggestionRequest>,
) -> impl Responder {
    match data
        .state
        .chat_suggestion_use_case
        .execute(user.username(), &req)
        .await
    {
        Ok(answer) => HttpResponse::Ok().json(ChatAnswer { answer }),
        Err(e) => failure(&data.logs, "Chat", "Chat suggestion failed", e),
    }
}

#[get("/chat_suggestion/history")]
async fn get_chat_history(
    data: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<LimitQuery>,
) -> impl Responder {
    match data
        .state
        .chat_suggestion_use_case
        .history(user.username(), query.limit)
        .await
    {
        Ok(history) => HttpResponse::Ok().json(history),
        Err(e) => failure(&data.logs, "Chat", "Chat history failed", e),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>, _user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(logs::snapshot(&data.logs))
}

/// Routes plus extractor configs that render body errors as `{"detail": ..}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .service(register_user)
    .service(issue_token)
    .service(read_sensors)
    .service(get_dashboard)
    .service(get_suggestions)
    .service(calculate_carbon_footprint)
    .service(post_chat_suggestion)
    .service(get_chat_history)
    .service(get_logs);
}

pub fn start_server(
    state: Arc<AppState>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let data = web::Data::new(HttpState { state, logs });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(data.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::chat_suggestion::tests::StubLLM;
    use crate::domain::user::TokenResponse;
    use crate::infrastructure::bootstrap::build_state;
    use crate::infrastructure::config::{AppConfig, AuthConfig, DatabaseConfig};
    use crate::infrastructure::llm_clients::LLMClient;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use serde_json::{json, Value};

    async fn test_data(llm: Arc<dyn LLMClient + Send + Sync>) -> web::Data<HttpState> {
        let config = AppConfig {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                secret_key: "test-secret".to_string(),
                algorithm: "HS256".to_string(),
                bcrypt_cost: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        let state = build_state(&config, llm).await.unwrap();
        web::Data::new(HttpState {
            state: Arc::new(state),
            logs: Arc::new(Mutex::new(Vec::new())),
        })
    }

    async fn bearer(data: &web::Data<HttpState>) -> String {
        let creds = Credentials {
            username: "agronomo".to_string(),
            password: "sostenibile".to_string(),
        };
        data.state.auth_use_case.register(&creds).await.unwrap();
        let token = data.state.auth_use_case.login(&creds).await.unwrap();
        format!("Bearer {}", token.access_token)
    }

    #[actix_web::test]
    async fn test_register_and_token_flow() {
        let data = test_data(Arc::new(StubLLM::answering("ok"))).await;
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": "mario", "password": "pomodoro"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["msg"], "Registrazione avvenuta con successo");

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": "mario", "password": "altro"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Username già esistente");

        let req = test::TestRequest::post()
            .uri("/token")
            .set_form([("username", "mario"), ("password", "pomodoro"), ("grant_type", "password")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let token: TokenResponse = test::read_body_json(resp).await;
        assert_eq!(token.token_type, "bearer");

        let req = test::TestRequest::post()
            .uri("/token")
            .set_form([("username", "mario"), ("password", "sbagliata")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Credenziali non valide");
    }

    #[actix_web::test]
    async fn test_protected_routes_need_token() {
        let data = test_data(Arc::new(StubLLM::answering("ok"))).await;
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        for uri in ["/sensors", "/dashboard", "/suggestions", "/logs"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
        }

        let req = test::TestRequest::get()
            .uri("/dashboard")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Token non valido");
    }

    #[actix_web::test]
    async fn test_sensor_read_then_dashboard() {
        let data = test_data(Arc::new(StubLLM::answering("ok"))).await;
        let auth = bearer(&data).await;
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/sensors")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .to_request();
        let reading: Value = test::call_and_read_body_json(&app, req).await;
        assert!(reading.get("id").is_none());
        let salinity = reading["salinity"].as_f64().unwrap();
        assert!((0.1..=2.5).contains(&salinity));

        let req = test::TestRequest::get()
            .uri("/dashboard")
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0]["timestamp"], reading["timestamp"]);
        assert!(rows[0]["id"].is_i64());
    }

    #[actix_web::test]
    async fn test_carbon_footprint_endpoint() {
        let data = test_data(Arc::new(StubLLM::answering("ok"))).await;
        let auth = bearer(&data).await;
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/carbon_footprint")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .set_json(json!({"grano_kg": 1000.0, "verdura_kg": 500.0, "energia_kwh": 200.0}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totale_kgCO2eq"], 947.2);
        assert_eq!(body["dettaglio"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::post()
            .uri("/carbon_footprint")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .set_json(json!({"grano_kg": -1.0, "verdura_kg": 0.0, "energia_kwh": 0.0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/carbon_footprint")
            .insert_header((header::AUTHORIZATION, auth))
            .set_json(json!({"grano_kg": "tanto"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["detail"].is_string());
    }

    #[actix_web::test]
    async fn test_suggestions_endpoint() {
        let data = test_data(Arc::new(StubLLM::answering("ok"))).await;
        let auth = bearer(&data).await;
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/suggestions")
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["suggestions"], json!(["Le risorse sono ottimizzate."]));
    }

    #[actix_web::test]
    async fn test_chat_suggestion_and_history() {
        let data = test_data(Arc::new(StubLLM::answering("Irriga al mattino presto."))).await;
        let auth = bearer(&data).await;
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/chat_suggestion")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .set_json(json!({
                "user_input": "Quando irrigo?",
                "sensors": {"salinity": 1.2, "ph": 6.8, "soil_moisture": 22.5, "organic_matter": 3.1},
                "footprint": null
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["answer"], "Irriga al mattino presto.");

        let req = test::TestRequest::get()
            .uri("/chat_suggestion/history?limit=5")
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let history = body.as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["question"], "Quando irrigo?");
        assert_eq!(history[0]["username"], "agronomo");
    }

    #[actix_web::test]
    async fn test_chat_generation_error_is_500() {
        let data = test_data(Arc::new(StubLLM::failing("model crashed"))).await;
        let auth = bearer(&data).await;
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/chat_suggestion")
            .insert_header((header::AUTHORIZATION, auth))
            .set_json(json!({"user_input": "Consigli?", "sensors": {}}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Errore nel sistema di suggerimento.");

        let logs = logs::snapshot(&data.logs);
        assert!(logs.iter().any(|entry| entry.level == "ERROR" && entry.source == "Chat"));
    }
}
