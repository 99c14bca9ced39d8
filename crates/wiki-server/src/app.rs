//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// Unknown paths and unsupported methods on known paths both answer 404.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index::get_index))
        .route("/wiki/{page}", get(handlers::pages::get_page))
        .route("/create", post(handlers::forms::create_page))
        .route("/save", post(handlers::forms::save_page))
        .route("/delete", post(handlers::forms::delete_page))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use wiki_renderer::MarkdownRenderer;
    use wiki_store::PageStore;

    use super::*;

    struct TestApp {
        _dir: TempDir,
        store: PageStore,
        router: Router,
    }

    impl TestApp {
        async fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store = PageStore::connect(dir.path().join("wiki.sqlite"), 4)
                .await
                .unwrap();
            store.ensure_schema().await.unwrap();
            let router = create_router(Arc::new(AppState {
                store: store.clone(),
                markdown: MarkdownRenderer::new(),
            }));
            Self {
                _dir: dir,
                store,
                router,
            }
        }

        async fn get(&self, uri: &str) -> Response<Body> {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn post(&self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
            let request = Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(serde_urlencoded::to_string(fields).unwrap()))
                .unwrap();
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn save_new(&self, title: &str, markdown: &str) -> Response<Body> {
            self.post(
                "/save",
                &[
                    ("id", "-1"),
                    ("title", title),
                    ("markdown", markdown),
                    ("newPage", "yes"),
                ],
            )
            .await
        }
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response<Body>) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_index_empty() {
        let app = TestApp::new().await;
        let response = app.get("/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        let html = body_text(response).await;
        assert!(html.contains("<title>Wiki Home</title>"));
        assert!(html.contains(r#"action="/create""#));
    }

    #[tokio::test]
    async fn test_security_headers() {
        let app = TestApp::new().await;
        let response = app.get("/").await;

        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert!(response.headers().contains_key("content-security-policy"));
    }

    #[tokio::test]
    async fn test_unknown_page_is_new() {
        let app = TestApp::new().await;
        let response = app.get("/wiki/Unwritten").await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1>A new page</h1>"));
        assert!(html.contains("Feel-free to write in Markdown!~"));
        assert!(html.contains(r#"name="newPage" value="yes""#));
        assert!(html.contains(r#"name="id" value="-1""#));
        assert!(app.store.list_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_new_then_view_and_list() {
        let app = TestApp::new().await;

        let response = app.save_new("Rust", "Hello *world*").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/wiki/Rust");

        app.save_new("Apple", "fruit").await;

        let html = body_text(app.get("/wiki/Rust").await).await;
        assert!(html.contains("<p>Hello <em>world</em></p>"));
        assert!(html.contains(r#"name="newPage" value="no""#));
        assert!(html.contains(r#"action="/delete""#));

        let index = body_text(app.get("/").await).await;
        let apple = index.find(r#"href="/wiki/Apple""#).unwrap();
        let rust = index.find(r#"href="/wiki/Rust""#).unwrap();
        assert!(apple < rust);
    }

    #[tokio::test]
    async fn test_saved_content_round_trips_exactly() {
        let app = TestApp::new().await;
        let markdown = "# T\n\n<script>x</script>\n  trailing  \n";
        app.save_new("Exact", markdown).await;

        let page = app.store.get_by_name("Exact").await.unwrap().unwrap();
        assert_eq!(page.content, markdown);
    }

    #[tokio::test]
    async fn test_update_existing_page() {
        let app = TestApp::new().await;
        let id = app.store.insert("Notes", "old").await.unwrap();
        let id_field = id.to_string();

        let response = app
            .post(
                "/save",
                &[
                    ("id", id_field.as_str()),
                    ("title", "Notes"),
                    ("markdown", "new"),
                    ("newPage", "no"),
                ],
            )
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/wiki/Notes");
        let page = app.store.get_by_name("Notes").await.unwrap().unwrap();
        assert_eq!(page.content, "new");
    }

    #[tokio::test]
    async fn test_update_missing_id_fails() {
        let app = TestApp::new().await;
        let response = app
            .post(
                "/save",
                &[
                    ("id", "404"),
                    ("title", "Ghost"),
                    ("markdown", "boo"),
                    ("newPage", "no"),
                ],
            )
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_update_unparsable_id_is_bad_request() {
        let app = TestApp::new().await;
        let response = app
            .post(
                "/save",
                &[("id", "abc"), ("title", "X"), ("markdown", "y"), ("newPage", "no")],
            )
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_new_page_fails_without_overwrite() {
        let app = TestApp::new().await;
        app.save_new("Home", "original").await;

        let response = app.save_new("Home", "intruder").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let page = app.store.get_by_name("Home").await.unwrap().unwrap();
        assert_eq!(page.content, "original");
    }

    #[tokio::test]
    async fn test_concurrent_saves_keep_one_value() {
        let app = TestApp::new().await;
        let id = app.store.insert("Race", "initial").await.unwrap().to_string();
        let id = id.as_str();

        let first_fields = [
            ("id", id),
            ("title", "Race"),
            ("markdown", "first"),
            ("newPage", "no"),
        ];
        let second_fields = [
            ("id", id),
            ("title", "Race"),
            ("markdown", "second"),
            ("newPage", "no"),
        ];
        let (first, second) = tokio::join!(
            app.post("/save", &first_fields),
            app.post("/save", &second_fields)
        );

        assert_eq!(first.status(), StatusCode::SEE_OTHER);
        assert_eq!(second.status(), StatusCode::SEE_OTHER);
        let content = app.store.get_by_name("Race").await.unwrap().unwrap().content;
        assert!(content == "first" || content == "second", "got {content:?}");
    }

    #[tokio::test]
    async fn test_create_redirects() {
        let app = TestApp::new().await;

        let response = app.post("/create", &[("name", "")]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = app.post("/create", &[]).await;
        assert_eq!(location(&response), "/");

        let response = app.post("/create", &[("name", "Test")]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/wiki/Test");

        assert!(app.store.list_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_encodes_name_and_page_route_decodes_it() {
        let app = TestApp::new().await;

        let response = app.post("/create", &[("name", "Café Menu")]).await;
        let target = location(&response).to_owned();
        assert_eq!(target, "/wiki/Caf%C3%A9%20Menu");

        app.save_new("Café Menu", "Espresso").await;
        let html = body_text(app.get(&target).await).await;
        assert!(html.contains("<title>Café Menu</title>"));
        assert!(html.contains("<p>Espresso</p>"));
    }

    #[tokio::test]
    async fn test_dot_named_page_is_reachable() {
        let app = TestApp::new().await;

        let response = app.save_new("..", "Up one level").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = location(&response).to_owned();
        assert_eq!(target, "/wiki/%2E%2E");

        let html = body_text(app.get(&target).await).await;
        assert!(html.contains("<p>Up one level</p>"));
        assert!(html.contains(r#"name="newPage" value="no""#));
    }

    #[tokio::test]
    async fn test_save_blank_title_is_bad_request() {
        let app = TestApp::new().await;

        assert_eq!(
            app.save_new("", "orphan").await.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            app.save_new("   ", "orphan").await.status(),
            StatusCode::BAD_REQUEST
        );
        assert!(app.store.list_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let app = TestApp::new().await;
        let id = app.store.insert("Doomed", "x").await.unwrap();

        let id_field = id.to_string();
        let response = app.post("/delete", &[("id", id_field.as_str())]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(app.store.get_by_name("Doomed").await.unwrap(), None);

        let response = app.post("/delete", &[("id", "12345")]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = app.post("/delete", &[("id", "not-a-number")]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = TestApp::new().await;
        assert_eq!(app.get("/nowhere").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.get("/wiki/a/b").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_is_not_found() {
        let app = TestApp::new().await;
        assert_eq!(app.get("/save").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.post("/", &[]).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.post("/wiki/Home", &[]).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let app = TestApp::new().await;
        app.store.close().await;

        assert_eq!(
            app.get("/").await.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            app.get("/wiki/Anything").await.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            app.save_new("Anything", "x").await.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
