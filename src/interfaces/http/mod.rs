use crate::application::AppendSubmissionUseCase;
use crate::domain::error::{AppError, Result};
use crate::domain::submission::Submission;
use crate::infrastructure::blob_store::{BlobStoreFactory, GitHubStoreFactory};
use crate::infrastructure::config::{ConfigLoader, ServerSettings};
use actix_web::dev::Server;
use actix_web::http::{header, Method, StatusCode};
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, ResponseError};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};


pub const APPEND_PATH: &str = "/append";
/// Path the static form posted to when the handler ran as a serverless function.
pub const LEGACY_APPEND_PATH: &str = "/.netlify/functions/append-csv";

pub struct HttpState {
    pub config_loader: ConfigLoader,
    pub store_factory: Arc<dyn BlobStoreFactory>,
    pub append_use_case: AppendSubmissionUseCase,
}

impl HttpState {
    pub fn from_settings(settings: &ServerSettings) -> Self {
        Self {
            config_loader: ConfigLoader::from_env(),
            store_factory: Arc::new(GitHubStoreFactory::new(
                reqwest::Client::new(),
                &settings.api_base_url,
                &settings.user_agent,
            )),
            append_use_case: AppendSubmissionUseCase::new(
                &settings.csv_path,
                &settings.commit_message,
            ),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(AppError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self))
            .json(json!({ "error": self.message() }))
    }
}

/// Permissive CORS headers added to every response.
///
/// `actix_cors::Cors` skips these when the request has no `Origin` and answers
/// preflight with 200; callers here expect them always and a 204 preflight.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    for path in [APPEND_PATH, LEGACY_APPEND_PATH] {
        cfg.service(
            web::resource(path)
                .route(web::post().to(append))
                .route(web::method(Method::OPTIONS).to(preflight))
                .default_service(web::to(method_not_allowed)),
        );
    }
}

async fn append(
    req: HttpRequest,
    body: web::Bytes,
    data: web::Data<HttpState>,
) -> Result<HttpResponse> {
    let result = handle_append(&req, &body, &data).await;
    if let Err(err) = &result {
        log_failure(&req, err);
    }
    result
}

async fn handle_append(req: &HttpRequest, body: &[u8], data: &HttpState) -> Result<HttpResponse> {
    let store_config = data.config_loader.load_store_config()?;

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let submission = Submission::from_body(content_type, body)?;

    let store = data.store_factory.connect(&store_config);
    data.append_use_case
        .execute(store.as_ref(), &submission)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse> {
    let err = AppError::MethodNotAllowed("Method not allowed".to_string());
    log_failure(&req, &err);
    Err(err)
}

fn log_failure(req: &HttpRequest, err: &AppError) {
    if err.status_code() < 500 {
        warn!("Rejected {} {}: {}", req.method(), req.path(), err);
    } else {
        error!("Failed {} {}: {}", req.method(), req.path(), err);
    }
}

pub fn start_server(settings: &ServerSettings, state: HttpState) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run();

    Ok(server)
}
