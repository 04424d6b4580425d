use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::handlers;
use crate::AppState;

/// Build the HTTP surface.
///
/// `:tenant` is a numeric id on the CRUD routes and a tenant name on upload.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");

            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        })
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/tenant", post(handlers::tenant::create_tenant))
        .route(
            "/tenant/:tenant",
            get(handlers::tenant::get_tenant)
                .put(handlers::tenant::update_tenant)
                .delete(handlers::tenant::delete_tenant),
        )
        .route("/tenant/:tenant/upload", post(handlers::upload::upload_to_tenant))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(trace)
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryTenantStore;
    use crate::storage::LocalStorage;
    use axum::http::{header, Method, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "tenant-test-boundary";

    fn app(home: &TempDir) -> Router {
        let state = Arc::new(AppState {
            store: Arc::new(MemoryTenantStore::new()),
            storage: LocalStorage::new(home.path()),
            db_pool: None,
        });
        router(state, 1024 * 1024)
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/plain\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                ),
            }
            body.extend_from_slice(data.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(res: Response) -> Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn tenant_lifecycle_with_upload() {
        let home = TempDir::new().unwrap();
        let app = app(&home);

        // create tom
        let res = app
            .clone()
            .oneshot(json_request(Method::POST, "/tenant", r#"{"name":"tom"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(res).await,
            json!({"id": 1, "name": "tom", "md5": "34b7da764b21d298ef307d04d8152dc5"})
        );

        // rename tenant 1 to jerry; the fingerprint stays the one of "tom"
        let res = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/tenant/1",
                r#"{"id":1,"name":"jerry","md5":"34b7da764b21d298ef307d04d8152dc5"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let jerry = json!({"id": 1, "name": "jerry", "md5": "34b7da764b21d298ef307d04d8152dc5"});
        assert_eq!(json_body(res).await, jerry);

        let res = app.clone().oneshot(empty_request(Method::GET, "/tenant/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await, jerry);

        // upload lands in the shard of the original name
        let contents = "hello from abc\n";
        let res = app
            .clone()
            .oneshot(multipart_request(
                "/tenant/jerry/upload",
                &[("files", Some("abc.txt"), contents)],
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            json_body(res).await,
            json!([{"filename": "abc.txt", "content_type": "text/plain", "size": contents.len()}])
        );
        let stored = std::fs::read(home.path().join("34b7").join("abc.txt")).unwrap();
        assert_eq!(stored, contents.as_bytes());

        // delete, then the tenant is gone
        let res = app.clone().oneshot(empty_request(Method::DELETE, "/tenant/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = app.oneshot(empty_request(Method::GET, "/tenant/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_and_malformed_ids_are_not_found() {
        let home = TempDir::new().unwrap();
        let app = app(&home);

        for uri in ["/tenant/99", "/tenant/abc", "/tenant/-1"] {
            let res = app.clone().oneshot(empty_request(Method::GET, uri)).await.unwrap();
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "GET {}", uri);
            let body = json_body(res).await;
            assert_eq!(body["message"], "Unable to get tenant details");
        }

        let res = app
            .clone()
            .oneshot(json_request(Method::PUT, "/tenant/7", r#"{"name":"ghost"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = app.oneshot(empty_request(Method::DELETE, "/tenant/7")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sequential_creates_get_distinct_increasing_ids() {
        let home = TempDir::new().unwrap();
        let app = app(&home);

        let mut ids = Vec::new();
        for name in ["tom", "jerry"] {
            let res = app
                .clone()
                .oneshot(json_request(Method::POST, "/tenant", &json!({"name": name}).to_string()))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::CREATED);
            ids.push(json_body(res).await["id"].as_i64().unwrap());
        }

        assert!(ids[1] > ids[0]);
    }

    #[tokio::test]
    async fn malformed_body_is_reported_and_service_keeps_serving() {
        let home = TempDir::new().unwrap();
        let app = app(&home);

        let res = app
            .clone()
            .oneshot(json_request(Method::POST, "/tenant", r#"{"name":"tom""#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(res).await["message"], "Unable to bind request to tenant");

        let res = app
            .oneshot(json_request(Method::POST, "/tenant", r#"{"name":"tom"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn upload_to_unknown_tenant_writes_nothing() {
        let home = TempDir::new().unwrap();
        let app = app(&home);

        let res = app
            .oneshot(multipart_request(
                "/tenant/nobody/upload",
                &[("files", Some("abc.txt"), "data")],
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(std::fs::read_dir(home.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn upload_resolves_tenant_before_reading_the_form() {
        let home = TempDir::new().unwrap();
        let app = app(&home);

        // not a multipart body, but the tenant does not exist
        let res = app
            .clone()
            .oneshot(json_request(Method::POST, "/tenant/nobody/upload", r#"{"name":"x"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(res).await["message"], "Unable to get tenant details");

        let res = app
            .clone()
            .oneshot(json_request(Method::POST, "/tenant", r#"{"name":"tom"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        // known tenant, no multipart content type
        let res = app
            .oneshot(empty_request(Method::POST, "/tenant/tom/upload"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(res).await["message"], "Error accessing multipart form");
        assert!(!home.path().join("34b7").exists());
    }

    #[tokio::test]
    async fn upload_skips_other_fields_and_keeps_order() {
        let home = TempDir::new().unwrap();
        let app = app(&home);

        let res = app
            .clone()
            .oneshot(json_request(Method::POST, "/tenant", r#"{"name":"acme"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let shard = json_body(res).await["md5"].as_str().unwrap()[..4].to_string();

        let res = app
            .oneshot(multipart_request(
                "/tenant/acme/upload",
                &[
                    ("files", Some("one.txt"), "1"),
                    ("comment", None, "not a file"),
                    ("avatar", Some("skip.png"), "png"),
                    ("files", Some("two.txt"), "22"),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = json_body(res).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|file| file["filename"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["one.txt", "two.txt"]);

        let dir = home.path().join(&shard);
        assert_eq!(std::fs::read(dir.join("two.txt")).unwrap(), b"22");
        assert!(!dir.join("skip.png").exists());
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let home = TempDir::new().unwrap();
        let app = app(&home);

        let res = app.clone().oneshot(empty_request(Method::GET, "/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get("x-request-id").is_some());
        assert_eq!(json_body(res).await["database"], "not configured");

        let req = Request::builder()
            .uri("/tenant/1")
            .header("x-request-id", "req-test-123")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.headers().get("x-request-id").unwrap(), "req-test-123");
    }
}
