//! HTTP server for the blog
//!
//! Pages are rendered per request from a snapshot of the shared index.
//! With `watch` enabled, content changes trigger a reload that swaps the
//! whole index at once.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::generator::Generator;
use crate::helpers::FEED_PATHS;
use crate::index::{PostIndex, SharedIndex};
use crate::Folio;

/// Server state
pub struct AppState {
    folio: Folio,
    index: SharedIndex,
    generator: Generator,
}

impl AppState {
    pub fn new(folio: Folio, index: PostIndex) -> Result<Self> {
        let generator = Generator::new(&folio.config)?;
        Ok(Self {
            folio,
            index: SharedIndex::new(index),
            generator,
        })
    }

    pub fn index(&self) -> &SharedIndex {
        &self.index
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<usize>,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/blog") }))
        .route("/blog", get(listing_handler))
        .route("/blog/", get(listing_handler))
        .route("/blog/:slug", get(post_handler))
        .route(FEED_PATHS[0], get(feed_handler))
        .route(FEED_PATHS[1], get(feed_handler))
        .route("/api/posts", get(api_list_handler))
        .route("/api/posts/:slug", get(api_post_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool) -> Result<()> {
    let index = folio.build_index()?;
    tracing::info!("Serving {} articles", index.len());
    let state = Arc::new(AppState::new(folio.clone(), index)?);

    if watch {
        let watch_state = Arc::clone(&state);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(watch_state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}/blog", ip, port);
    if watch {
        println!("Watching {:?} for changes...", folio.content_dir);
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Watch the content directory and swap in a fresh index on change
fn watch_and_reload(state: Arc<AppState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Debounce to avoid multiple rapid reloads
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&state.folio.content_dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", state.folio.content_dir);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                for event in &events {
                    tracing::info!("File changed: {}", event.path.display());
                }
                // Reloads run one at a time on this thread
                if let Err(e) = state.folio.reload(&state.index) {
                    tracing::error!("Reload failed, keeping previous index: {:#}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

async fn listing_handler(State(state): State<Arc<AppState>>) -> Response {
    let index = state.index.snapshot();
    html_or_error(state.generator.listing_html(&index), StatusCode::OK)
}

async fn post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let index = state.index.snapshot();
    match index.find_by_slug(&slug) {
        Some(article) => html_or_error(state.generator.post_html(&index, article), StatusCode::OK),
        None => not_found(&state),
    }
}

async fn feed_handler(State(state): State<Arc<AppState>>) -> Response {
    let index = state.index.snapshot();
    (
        [(header::CONTENT_TYPE, "application/atom+xml; charset=utf-8")],
        state.generator.atom_feed(&index),
    )
        .into_response()
}

async fn api_list_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Response {
    let index = state.index.snapshot();
    let posts = match params.limit {
        Some(n) => index.list_recent(n),
        None => index.list_all(),
    };
    Json(posts).into_response()
}

async fn api_post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let index = state.index.snapshot();
    match index.find_by_slug(&slug) {
        Some(article) => Json(article).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not found", "slug": slug })),
        )
            .into_response(),
    }
}

/// Static files from the public directory, with the 404 page on a miss
async fn fallback_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let mut service = ServeDir::new(&state.folio.public_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found(&state),
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("Failed to serve static file: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn not_found(state: &AppState) -> Response {
    html_or_error(state.generator.not_found_html(), StatusCode::NOT_FOUND)
}

fn html_or_error(result: Result<String>, status: StatusCode) -> Response {
    match result {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Render failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_article;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> Arc<AppState> {
        let folio = Folio::new(dir.path()).unwrap();
        let article = parse_article(
            "hello",
            std::path::Path::new("hello.mdx"),
            "---\ntitle: Hello\npublishedAt: 2024-01-05\n---\nHi there",
        )
        .unwrap();
        let index = PostIndex::new(vec![article]).unwrap();
        Arc::new(AppState::new(folio, index).unwrap())
    }

    #[tokio::test]
    async fn test_post_found() {
        let dir = TempDir::new().unwrap();
        let response = post_handler(State(state(&dir)), Path("hello".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_not_found_is_404() {
        let dir = TempDir::new().unwrap();
        let response = post_handler(State(state(&dir)), Path("does-not-exist".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            api_post_handler(State(state(&dir)), Path("does-not-exist".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_listing_and_feed() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        assert_eq!(listing_handler(State(Arc::clone(&state))).await.status(), StatusCode::OK);

        let response = feed_handler(State(Arc::clone(&state))).await;
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/atom+xml; charset=utf-8"
        );

        let response = api_list_handler(State(state), Query(ListParams { limit: Some(0) })).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn get_raw(state: Arc<AppState>, path: &str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8_lossy(&response).into_owned()
    }

    #[tokio::test]
    async fn test_feed_served_at_rss_and_atom() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        for path in ["/rss", "/atom.xml"] {
            let response = get_raw(Arc::clone(&state), path).await;
            assert!(response.starts_with("HTTP/1.1 200"), "{path}: {response}");
            assert!(response.contains("application/atom+xml"), "{path}");
            assert!(response.contains("<feed xmlns=\"http://www.w3.org/2005/Atom\">"));
        }
    }

    #[tokio::test]
    async fn test_swap_visible_to_handlers() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        state.index().replace(PostIndex::default());
        let response = post_handler(State(Arc::clone(&state)), Path("hello".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
