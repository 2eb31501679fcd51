//! Web server module for pagoda.
//!
//! Builds the render engine from the static configuration, registers the
//! page route and the asset route, and serves plain HTTP. The engine is
//! read-only after construction and shared across request tasks; a failed
//! construction aborts the process before the listener ever binds. The
//! outbound connectivity probe runs as a background task at startup so it
//! is not stranded behind the blocking serve call.
//!
use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use pagodarender::{Engine, RenderEngine, RenderRequest};

use crate::config::CONFIG;
use crate::props::IndexRouteProps;

/// Page file rendered for the root route
const INDEX_FILE: &str = "pages/_document.tsx";
/// Document title for the root route
const INDEX_TITLE: &str = "Pages app";

/// Application state shared across request handlers
pub(crate) struct AppState {
    /// Engine the page and asset routes delegate to
    pub(crate) engine: Arc<dyn RenderEngine>,
}

/// Build the render engine and serve HTTP until shutdown
pub async fn run() {
    let engine = match Engine::new(CONFIG.engine_config()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("💥 Render engine failed to start: {e:#}");
            std::process::exit(1);
        }
    };
    println!(
        "📦 Page types written to {}",
        CONFIG.generated_types_path.display()
    );

    tokio::spawn(connectivity_probe(CONFIG.probe_url.as_str()));

    let state = Arc::new(AppState {
        engine: Arc::new(engine),
    });
    let app = router(&CONFIG.asset_route, state);

    let addr = format!("0.0.0.0:{}", CONFIG.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    println!("🌐 Pagoda serving on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}

/// Router over the page route and the asset route
fn router(asset_route: &str, state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route(&format!("{}/{{*path}}", asset_route), get(frontend_asset))
        .with_state(state)
}

/// One outbound GET as a connectivity check. Failure is logged and never
/// fatal.
async fn connectivity_probe(url: &str) {
    match reqwest::get(url).await {
        Ok(response) => println!("🌍 Connectivity probe {} -> {}", url, response.status()),
        Err(e) => {
            eprintln!("⚠️ Cant connect to {}", url);
            eprintln!("   {}", e);
        }
    }
}

/// Render the index page with freshly sampled props
async fn index_page(State(state): State<Arc<AppState>>) -> Response {
    let request = index_request(IndexRouteProps::sample());
    match state.engine.render_route(&request) {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            eprintln!("❌ Render failed for {}: {e:#}", request.file);
            (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong").into_response()
        }
    }
}

/// The render request for the root route, parameterized on props so tests
/// can pin the count
fn index_request(props: IndexRouteProps) -> RenderRequest {
    RenderRequest {
        file: INDEX_FILE.to_string(),
        title: INDEX_TITLE.to_string(),
        meta_tags: HashMap::from([
            ("og:title".to_string(), "Example app".to_string()),
            ("description".to_string(), "Hello world!".to_string()),
        ]),
        props: serde_json::to_value(&props).unwrap_or_else(|_| serde_json::json!({})),
    }
}

/// Serve one frontend asset, 404 on anything the engine rejects
async fn frontend_asset(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.engine.load_asset(&path) {
        Ok(asset) => ([(header::CONTENT_TYPE, asset.content_type)], asset.bytes).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use pagodarender::Asset;

    /// Echoes its inputs back so tests see exactly what the server passed
    /// to the engine
    struct EchoEngine;

    impl RenderEngine for EchoEngine {
        fn render_route(&self, request: &RenderRequest) -> anyhow::Result<Vec<u8>> {
            let mut tags: Vec<(&String, &String)> = request.meta_tags.iter().collect();
            tags.sort();
            let mut line = format!("{}|{}", request.file, request.title);
            for (key, value) in tags {
                line.push_str(&format!("|{}={}", key, value));
            }
            line.push_str(&format!("|{}", request.props));
            Ok(line.into_bytes())
        }

        fn load_asset(&self, _rel_path: &str) -> anyhow::Result<Asset> {
            bail!("no assets in the stub")
        }
    }

    struct BrokenEngine;

    impl RenderEngine for BrokenEngine {
        fn render_route(&self, _request: &RenderRequest) -> anyhow::Result<Vec<u8>> {
            bail!("boom")
        }

        fn load_asset(&self, _rel_path: &str) -> anyhow::Result<Asset> {
            bail!("boom")
        }
    }

    fn state_with(engine: impl RenderEngine + 'static) -> Arc<AppState> {
        Arc::new(AppState {
            engine: Arc::new(engine),
        })
    }

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn index_request_pins_file_title_tags_and_props() {
        let request = index_request(IndexRouteProps { initial_count: 42 });
        assert_eq!(request.file, "pages/_document.tsx");
        assert_eq!(request.title, "Pages app");
        assert_eq!(request.meta_tags["og:title"], "Example app");
        assert_eq!(request.meta_tags["description"], "Hello world!");
        assert_eq!(request.props, serde_json::json!({ "initialCount": 42 }));
    }

    #[tokio::test]
    async fn index_is_rendered_through_the_engine() {
        let response = index_page(State(state_with(EchoEngine))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_of(response).await;
        assert!(body.starts_with("pages/_document.tsx|Pages app"));
        assert!(body.contains("|description=Hello world!"));
        assert!(body.contains("|og:title=Example app"));
    }

    /// The count injected per request stays in [0, 100)
    #[tokio::test]
    async fn injected_count_stays_in_range() {
        for _ in 0..50 {
            let body = body_of(index_page(State(state_with(EchoEngine))).await).await;
            let (_, rest) = body.rsplit_once("\"initialCount\":").unwrap();
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            let count: i32 = digits.parse().unwrap();
            assert!((0..100).contains(&count), "count {} out of range", count);
        }
    }

    #[tokio::test]
    async fn render_failure_maps_to_a_generic_500() {
        let response = index_page(State(state_with(BrokenEngine))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // error detail stays in the log, not the response
        let body = body_of(response).await;
        assert_eq!(body, "Something went wrong");
    }

    #[tokio::test]
    async fn assets_the_engine_rejects_are_a_404() {
        let response = frontend_asset(
            Path("nope.css".to_string()),
            State(state_with(EchoEngine)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Full round trip over a real listener on an ephemeral port
    #[tokio::test]
    async fn router_serves_the_page_over_http() {
        let app = router("/assets", state_with(EchoEngine));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = response.text().await.unwrap();
        assert!(body.starts_with("pages/_document.tsx|Pages app"));
        assert!(!body.is_empty());
    }
}
