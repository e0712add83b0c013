use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::Compress;
use actix_web::{error::InternalError, http::header, web, App, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod attendance;
pub mod config;
pub mod docx;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::attendance::handlers::save_attendance,
        crate::attendance::handlers::save_comparecimento
    ),
    components(
        schemas(
            attendance::models::AttendanceRequest,
            attendance::models::ComparecimentoRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Ensaio Local", description = "Attendance list and comparecimento documents.")
    ),
    servers(
        (url = "http://127.0.0.1:5000", description = "Localhost server")
    )
)]
pub struct ApiDoc;

/// JSON extractor settings: rejected bodies answer with an `ErrorResponse`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response =
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

/// Register state, routes and the static directory on an app or test service.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let static_dir = state.config.static_dir.clone();
        cfg.app_data(state)
            .app_data(json_config())
            .configure(attendance::handlers::config)
            .service(Files::new("/static", static_dir));
    }
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("Failed to read configuration")?;
    if !config.template_available() {
        log::warn!(
            "Comparecimento template {} not found; POST /save_comparecimento will fail until it is deployed",
            config.comparecimento_template.display()
        );
    }
    let bind = (config.host.clone(), config.port);
    let origins = config.allowed_origins.clone();
    let app_state = web::Data::new(AppState::new(config));

    let prometheus = PrometheusMetricsBuilder::new("ensaio_local_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create Prometheus metrics middleware: {e}"))?;

    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let prometheus = prometheus.clone();
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .configure(configure(app_state.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
