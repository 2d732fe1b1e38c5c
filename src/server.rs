/// HTTP server for the dashboard page and its JSON API
use actix_web::error::{BlockingError, InternalError};
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::messages::{DashboardRequest, DashboardResponse, ErrorResponse};
use crate::pipeline;
use crate::render::{index_page, render_dashboard};
use crate::report::Report;

/// Read-only state shared by every worker
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        AppState { config }
    }
}

fn respond<T: Serialize>(result: Result<crate::Result<T>, BlockingError>) -> HttpResponse {
    match result {
        Ok(Ok(body)) => HttpResponse::Ok().json(body),
        Ok(Err(e @ crate::Error::Render(_))) => {
            log::error!("dashboard failed to render: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "internal server error".to_string(),
            })
        }
        Ok(Err(e)) => {
            log::warn!("rejected upload: {}", e);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: e.to_string(),
            })
        }
        Err(e) => {
            log::error!("pipeline task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "internal server error".to_string(),
            })
        }
    }
}

/// The page shell
async fn index() -> HttpResponse {
    match index_page() {
        Ok(page) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page),
        Err(e) => {
            log::error!("index page failed to render: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Run the pipeline and return the rendered dashboard
async fn dashboard(
    state: web::Data<AppState>,
    body: web::Json<DashboardRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    let config = state.config.dashboard.clone();

    let result = web::block(move || -> crate::Result<DashboardResponse> {
        let dashboard = pipeline::run(request.csv.as_bytes(), &request.filter(), &config)?;
        let html = render_dashboard(&dashboard)?;
        Ok(DashboardResponse {
            rows: dashboard.report.rows,
            choices: dashboard.choices,
            selected: dashboard.selected,
            html,
        })
    })
    .await;

    respond(result)
}

/// Run the pipeline and return the structured report
async fn report(state: web::Data<AppState>, body: web::Json<DashboardRequest>) -> HttpResponse {
    let request = body.into_inner();
    let config = state.config.dashboard.clone();

    let result = web::block(move || -> crate::Result<Report> {
        let dashboard = pipeline::run(request.csv.as_bytes(), &request.filter(), &config)?;
        Ok(dashboard.report)
    })
    .await;

    respond(result)
}

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok"
    }))
}

/// JSON body limits; malformed or oversized bodies get the same error shape
/// as pipeline failures.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let body = ErrorResponse {
                error: err.to_string(),
            };
            InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
        })
}

/// Register the routes. Callers provide `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/dashboard", web::post().to(dashboard))
        .route("/api/report", web::post().to(report))
        .route("/health", web::get().to(health_check));
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let host = config.host.clone();
    let port = config.port;
    let limit = config.max_upload_bytes;
    let state = web::Data::new(AppState::new(config));

    log::info!("catalog dashboard listening on http://{}:{}/", host, port);
    log::info!("upload limit: {} bytes", limit);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(json_config(limit))
            .wrap(middleware::Logger::default())
            .wrap(
                actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    const CATALOG: &str = "category,discounted_price,actual_price,rating,rating_count\n\
        Electronics|Laptops,₹999,\"₹1,999\",4.1,\"1,000\"\n\
        Electronics|Phones,\"₹1,999\",\"₹2,499\",3.9,50\n\
        Home|Kitchen,₹49,₹99,4.5,12\n";

    macro_rules! app {
        ($config:expr) => {{
            let config: ServerConfig = $config;
            let limit = config.max_upload_bytes;
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState::new(config)))
                    .app_data(json_config(limit))
                    .configure(configure),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_health() {
        let app = app!(ServerConfig::default());
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[actix_web::test]
    async fn test_index_shows_idle_prompt() {
        let app = app!(ServerConfig::default());
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("Please upload a CSV file to start exploring."));
    }

    #[actix_web::test]
    async fn test_dashboard() {
        let app = app!(ServerConfig::default());
        let req = test::TestRequest::post()
            .uri("/api/dashboard")
            .set_json(json!({ "csv": CATALOG, "categories": ["Phones", "Kitchen"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["choices"], json!(["Laptops", "Phones", "Kitchen"]));
        assert_eq!(body["selected"], json!(["Kitchen", "Phones"]));
        assert_eq!(body["rows"], json!(2));
        assert!(body["html"].as_str().unwrap().contains("Preview of Data"));
    }

    #[actix_web::test]
    async fn test_dashboard_with_short_rows() {
        let app = app!(ServerConfig::default());
        let req = test::TestRequest::post()
            .uri("/api/dashboard")
            .set_json(json!({ "csv": "category,discounted_price,rating\nA|B,10,4.0\nA|C,20\nA|D\n" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["rows"], json!(3));
        assert_eq!(body["choices"], json!(["B", "C", "D"]));
    }

    #[actix_web::test]
    async fn test_report() {
        let app = app!(ServerConfig::default());
        let req = test::TestRequest::post()
            .uri("/api/report")
            .set_json(json!({ "csv": CATALOG }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["rows"], json!(3));
        assert_eq!(body["category_counts"].as_array().unwrap().len(), 3);
        assert_eq!(body["price_comparison"][0]["category"], json!("Phones"));
    }

    #[actix_web::test]
    async fn test_empty_upload_is_bad_request() {
        let app = app!(ServerConfig::default());
        let req = test::TestRequest::post()
            .uri("/api/dashboard")
            .set_json(json!({ "csv": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], json!("CSV is empty"));
    }

    #[actix_web::test]
    async fn test_oversized_upload_is_rejected() {
        let app = app!(ServerConfig {
            max_upload_bytes: 32,
            ..ServerConfig::default()
        });
        let req = test::TestRequest::post()
            .uri("/api/dashboard")
            .set_json(json!({ "csv": CATALOG }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}
