use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use platform_api::ApiError;
use products_hr::{EmployeeService, EmployeeStore};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, instrument};

use crate::{
    config::AppConfig,
    directory::fetch_employee,
    graphql::{self, SchemaType},
    principal::Principal,
    render::{self, Renderer},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EmployeeStore>,
    pub service: Arc<dyn EmployeeService>,
    pub schema: SchemaType,
    pub renderer: Arc<Renderer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn EmployeeStore>,
        service: Arc<dyn EmployeeService>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            schema: graphql::build_schema(service.clone()),
            renderer: Arc::new(Renderer::new()?),
            store,
            service,
            config,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "directory server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT])
        .allow_methods([Method::POST, Method::GET])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/directory/employee/{id}", get(employee_handler))
        .route("/graphql", post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[instrument(
    name = "http.employee",
    skip_all,
    fields(employee_id = %id, user = ?principal.user, role = %principal.role())
)]
async fn employee_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> HttpResult<Response> {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok());
    let format = render::negotiate(accept).ok_or_else(|| {
        HttpError::new(
            StatusCode::NOT_ACCEPTABLE,
            "supported types: application/json, application/xml, text/html",
        )
    })?;
    let view = fetch_employee(state.service.as_ref(), &id, principal.role())?;
    let body = state
        .renderer
        .render(format, &view)
        .map_err(HttpError::internal)?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

async fn graphql_handler(
    State(state): State<AppState>,
    principal: Principal,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let request = request.into_inner().data(principal.role());
    state.schema.execute(request).await.into()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        employees: state.store.len(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    employees: usize,
    version: &'static str,
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        ApiError::from(err).into()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        Self {
            status: StatusCode::from_u16(err.status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http_body_util::BodyExt;
    use products_hr::{DefaultEmployeeService, Employee, InMemoryEmployeeStore};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn router() -> Router {
        let store: Arc<dyn EmployeeStore> = Arc::new(
            InMemoryEmployeeStore::from_employees([Employee::new(
                "1",
                "Max Power",
                "The Leader",
                Some(640_000),
            )])
            .unwrap(),
        );
        let service = Arc::new(DefaultEmployeeService::new(store.clone()));
        let state = AppState::new(Arc::new(AppConfig::default()), store, service).unwrap();
        build_router(state)
    }

    async fn get(
        uri: &str,
        accept: Option<&str>,
        authorities: Option<&str>,
    ) -> (StatusCode, HeaderMap, String) {
        let mut request = http::Request::builder().uri(uri);
        if let Some(accept) = accept {
            request = request.header(header::ACCEPT, accept);
        }
        if let Some(authorities) = authorities {
            request = request.header("x-granted-authorities", authorities);
        }
        let response = router()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn hr_json_includes_salary() {
        let (status, headers, body) =
            get("/directory/employee/1", Some("application/json"), Some("ROLE_HR")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            body,
            json!({"id": "1", "name": "Max Power", "title": "The Leader", "salary": 640000})
        );
    }

    #[tokio::test]
    async fn employee_html_hides_salary() {
        let (status, _, body) =
            get("/directory/employee/1", Some("text/html"), Some("ROLE_EMPLOYEE")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.trim().starts_with("<table"));
        assert!(body.contains(">Max Power<"));
        assert!(body.contains(">Salary:<"));
        assert!(!body.contains("640000"));
    }

    #[tokio::test]
    async fn hr_and_employee_resolves_hr() {
        let (_, headers, body) = get(
            "/directory/employee/1",
            Some("application/xml"),
            Some("ROLE_EMPLOYEE,ROLE_HR"),
        )
        .await;
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("application/xml"));
        assert!(body.starts_with("<?xml"));
        assert!(body.contains("<salary>640000</salary>"));
    }

    #[tokio::test]
    async fn anonymous_caller_gets_empty_view() {
        let (status, _, body) = get("/directory/employee/1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "{}");
    }

    #[tokio::test]
    async fn unknown_employee_is_404() {
        let (status, _, body) =
            get("/directory/employee/unknown-id", None, Some("ROLE_HR")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "employee unknown-id not found");
    }

    #[tokio::test]
    async fn unsupported_accept_is_406() {
        let (status, _, _) =
            get("/directory/employee/1", Some("image/png"), Some("ROLE_HR")).await;
        assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn internal_errors_are_masked() {
        let response = HttpError::internal(anyhow::anyhow!("template exploded")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), b"internal server error");
    }

    #[tokio::test]
    async fn health_reports_directory_size() {
        let (status, headers, body) = get("/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key("x-request-id"));
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["employees"], json!(1));
    }

    #[tokio::test]
    async fn graphql_uses_forwarded_role() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-granted-authorities", "ROLE_EMPLOYEE")
            .body(Body::from(
                json!({"query": r#"{ employee(id: "1") { name salary } }"#}).to_string(),
            ))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["data"],
            json!({"employee": {"name": "Max Power", "salary": null}})
        );
    }
}
