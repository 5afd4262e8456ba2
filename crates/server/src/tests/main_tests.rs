use super::*;
use axum::{body, body::Body, http::Request};
use chrono::NaiveDate;
use shared::domain::{CategoryId, OperationId};
use std::path::PathBuf;
use tower::ServiceExt;

fn views_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../views")
}

async fn test_app_at(context_path: &str) -> (Router, Storage, OperationId, CategoryId) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let category = storage.create_category("Courses").await.expect("category");
    let operation = storage
        .insert_operation(
            NaiveDate::from_ymd_opt(2013, 1, 15).expect("date"),
            "CB AUCHAN",
            -5610,
        )
        .await
        .expect("operation");

    let app = build_router(Arc::new(AppState {
        api: ApiContext {
            storage: storage.clone(),
        },
        templates_dir: views_dir(),
        context_path: context_path.to_string(),
    }));
    (app, storage, operation, category)
}

async fn test_app() -> (Router, Storage, OperationId, CategoryId) {
    test_app_at("/").await
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

fn form_post(uri: &str, form: String) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .expect("request")
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let (app, ..) = test_app().await;
    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn use_page_renders_selected_sub_page() {
    let (app, ..) = test_app().await;
    let response = app
        .oneshot(
            Request::get("/?p=use.htm&s=operations.htm")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    let active: Vec<&str> = html
        .lines()
        .filter(|line| line.contains("class=\"active\""))
        .collect();
    assert_eq!(active.len(), 1);
    assert!(active[0].contains(">Operations</a>"));
    assert!(html.contains("<h2>Operations</h2>"));
}

#[tokio::test]
async fn use_page_defaults_to_first_for_unknown_or_missing_selector() {
    let (app, ..) = test_app().await;
    for uri in ["/", "/?p=use.htm", "/?p=use.htm&s=nope.htm", "/?s=Sync.htm"] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let html = body_string(response).await;
        assert!(html.contains("<h2>Premier lancement</h2>"), "{uri}");
        assert!(html.contains("<li class=\"active\"><a href=\"?p=use.htm&s=first.htm\">"));
    }
}

#[tokio::test]
async fn other_pages_are_not_served() {
    let (app, ..) = test_app().await;
    let response = app
        .oneshot(
            Request::get("/?p=account.htm")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_template_is_a_server_error() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let empty = tempfile::tempdir().expect("tempdir");
    let app = build_router(Arc::new(AppState {
        api: ApiContext { storage },
        templates_dir: empty.path().to_path_buf(),
        context_path: "/".into(),
    }));

    let response = app
        .oneshot(
            Request::get("/?s=costs.htm")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn update_category_route_assigns_category() {
    let (app, storage, op, cat) = test_app().await;
    let response = app
        .oneshot(form_post(
            "/account/update_cat.json",
            format!("cat={}&op={}", cat.0, op.0),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json");
    assert_eq!(json, serde_json::json!({ "isOk": true }));

    let stored = storage.get_operation(op).await.expect("get").expect("op");
    assert_eq!(stored.category_id, Some(cat));
}

#[tokio::test]
async fn update_category_route_reports_missing_operation() {
    let (app, _storage, _op, cat) = test_app().await;
    let response = app
        .oneshot(form_post(
            "/account/update_cat.json",
            format!("cat={}&op=9999", cat.0),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("json");
    assert_eq!(json["isOk"], serde_json::json!(false));
    assert_eq!(json["errorName"], serde_json::json!("Opération [9999] inexistante."));
}

#[tokio::test]
async fn update_category_route_rejects_malformed_form() {
    let (app, ..) = test_app().await;
    let response = app
        .oneshot(form_post("/account/update_cat.json", "cat=abc&op=1".into()))
        .await
        .expect("response");
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn category_options_routes_list_and_add() {
    let (app, ..) = test_app().await;
    let response = app
        .clone()
        .oneshot(form_post("/options/category/add", "name=Loisirs".into()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(form_post("/options/category/add", "name=".into()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(form_post("/options/category/add", "name=Loisirs".into()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::get("/options/category")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let categories: Vec<CategorySummary> =
        serde_json::from_str(&body_string(response).await).expect("json");
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Courses", "Loisirs"]);
}

#[tokio::test]
async fn operations_route_lists_operations() {
    let (app, _storage, op, _cat) = test_app().await;
    let response = app
        .oneshot(
            Request::get("/account/operations.json")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let ops: Vec<OperationSummary> =
        serde_json::from_str(&body_string(response).await).expect("json");
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].operation_id, op);
    assert_eq!(ops[0].category_id, None);
}

#[tokio::test]
async fn routes_are_mounted_under_context_path() {
    let (app, _storage, op, cat) = test_app_at("/bankit").await;

    for uri in ["/bankit", "/bankit/", "/bankit/?p=use.htm&s=sync.htm"] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }

    let response = app
        .clone()
        .oneshot(form_post(
            "/bankit/account/update_cat.json",
            format!("cat={}&op={}", cat.0, op.0),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::get("/account/update_cat.json")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn mounted_paths_respect_root_context() {
    assert_eq!(mounted("/", "/healthz"), "/healthz");
    assert_eq!(mounted("/", "/"), "/");
    assert_eq!(mounted("/bankit", "/"), "/bankit");
    assert_eq!(mounted("/bankit", "/healthz"), "/bankit/healthz");
}
