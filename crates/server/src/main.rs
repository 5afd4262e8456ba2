use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use server_api::{add_category, list_categories, list_operations, update_operation_category};
use shared::{
    domain::{CategorySummary, OperationSummary},
    error::{ApiError, ErrorCode},
    pages::{PageKey, USE_PAGE},
    protocol::{AddCategoryRequest, UpdateCategoryRequest, UpdateCategoryResponse},
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod use_page;

use app_state::AppState;
use config::load_settings;
use server_api::ApiContext;
use use_page::{load_use_template, render_use_page};

const MAX_FORM_BYTES: usize = 16 * 1024;

#[derive(Debug, Deserialize)]
struct PageQuery {
    p: Option<String>,
    s: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let storage = Storage::new(&settings.database_url).await.map_err(|error| {
        error!(
            database_url = %settings.database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
        templates_dir: settings.templates_dir.clone(),
        context_path: settings.context_path.clone(),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(
        %addr,
        context_path = %settings.context_path,
        templates_dir = %settings.templates_dir.display(),
        "server listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let ctx = state.context_path.clone();
    let at = |path: &str| mounted(&ctx, path);

    let mut router = Router::new()
        .route(&at("/"), get(use_page))
        .route(&at("/healthz"), get(healthz))
        .route(&at("/account/update_cat.json"), post(http_update_category))
        .route(&at("/account/operations.json"), get(http_list_operations))
        .route(&at("/options/category"), get(http_list_categories))
        .route(&at("/options/category/add"), post(http_add_category));
    if ctx != "/" {
        router = router.route(&format!("{ctx}/"), get(use_page));
    }

    router
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .with_state(state)
}

/// Prefixes `path` with the context path; the root of a non-root context has
/// no trailing slash.
fn mounted(context_path: &str, path: &str) -> String {
    match (context_path, path) {
        ("/", path) => path.to_string(),
        (ctx, "/") => ctx.to_string(),
        (ctx, path) => format!("{ctx}{path}"),
    }
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.storage.health_check().await.map_err(|error| {
        error!(%error, "health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

async fn use_page(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PageQuery>,
) -> Result<Html<String>, (StatusCode, Json<ApiError>)> {
    if let Some(page) = q.p.as_deref().filter(|page| *page != USE_PAGE) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(
                ErrorCode::NotFound,
                format!("unknown page '{page}'"),
            )),
        ));
    }

    let key = PageKey::from_selector(q.s.as_deref());
    let body = load_use_template(&state.templates_dir, key)
        .await
        .map_err(|e| {
            let message = format!("{e:#}");
            error!(page = ?key, error = %message, "failed to include use page template");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(ErrorCode::Internal, message)),
            )
        })?;
    Ok(Html(render_use_page(key, &body)))
}

async fn http_update_category(
    State(state): State<Arc<AppState>>,
    Form(req): Form<UpdateCategoryRequest>,
) -> Result<Json<UpdateCategoryResponse>, (StatusCode, Json<ApiError>)> {
    update_operation_category(&state.api, req)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                operation_id = req.op,
                category = req.cat,
                error = %e.message,
                "category update failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(e))
        })
}

async fn http_list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategorySummary>>, (StatusCode, Json<ApiError>)> {
    list_categories(&state.api)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(e)))
}

async fn http_add_category(
    State(state): State<Arc<AppState>>,
    Form(req): Form<AddCategoryRequest>,
) -> Result<Json<CategorySummary>, (StatusCode, Json<ApiError>)> {
    add_category(&state.api, &req.name)
        .await
        .map(Json)
        .map_err(|e| (status_for(&e), Json(e)))
}

async fn http_list_operations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OperationSummary>>, (StatusCode, Json<ApiError>)> {
    list_operations(&state.api)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(e)))
}

fn status_for(err: &ApiError) -> StatusCode {
    match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
