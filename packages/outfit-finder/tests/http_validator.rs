//! HttpValidator against a local axum server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Redirect},
    routing::get,
    Router,
};
use outfit_finder::{HttpValidator, PageValidator, RejectReason};
use url::Url;

const PRODUCT_HTML: &str =
    "<html><head><title>Linen Shirt &amp; Co | Store</title></head><body>ok</body></html>";

async fn product() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], PRODUCT_HTML)
}

async fn refuse_head() -> impl IntoResponse {
    StatusCode::METHOD_NOT_ALLOWED
}

async fn jpeg_bytes() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/jpeg")], vec![0xFFu8, 0xD8, 0xFF])
}

async fn json() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "{}")
}

async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, [(header::CONTENT_TYPE, "text/html")], "<html>gone</html>")
}

async fn moved() -> impl IntoResponse {
    Redirect::temporary("/product")
}

async fn late_title() -> impl IntoResponse {
    let body = format!(
        "<html><body>{}<title>Too far</title></body></html>",
        "x".repeat(300 * 1024)
    );
    ([(header::CONTENT_TYPE, "text/html")], body)
}

async fn counted(State(hits): State<Arc<AtomicUsize>>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    ([(header::CONTENT_TYPE, "text/html")], "<html></html>")
}

/// Start the fixture server; returns its base URL and a hit counter.
async fn serve() -> (Url, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route("/product", get(product))
        .route("/head-refused", get(product).head(refuse_head))
        .route("/disguised.html", get(jpeg_bytes))
        .route("/data", get(json))
        .route("/missing", get(missing))
        .route("/moved", get(moved))
        .route("/late-title", get(late_title))
        .route("/photos/item.jpg", get(counted))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{}/", addr)).unwrap(), hits)
}

fn validator() -> HttpValidator {
    HttpValidator::new(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_html_page_accepted_from_head() {
    let (base, _) = serve().await;
    let url = base.join("product").unwrap();

    let validation = validator().validate(&url).await;

    assert!(validation.is_accepted());
    assert_eq!(validation.status, Some(200));
    assert!(validation.title.is_none());
}

#[tokio::test]
async fn test_title_fetched_and_decoded() {
    let (base, _) = serve().await;
    let url = base.join("product").unwrap();

    let validation = validator().with_titles(true).validate(&url).await;

    assert!(validation.is_accepted());
    assert_eq!(validation.title.as_deref(), Some("Linen Shirt & Co | Store"));
}

#[tokio::test]
async fn test_head_refused_falls_back_to_get() {
    let (base, _) = serve().await;
    let url = base.join("head-refused").unwrap();

    let validation = validator().validate(&url).await;

    assert!(validation.is_accepted());
}

#[tokio::test]
async fn test_non_html_rejected_regardless_of_status() {
    let (base, _) = serve().await;

    let image = validator().validate(&base.join("disguised.html").unwrap()).await;
    assert!(matches!(image.rejection, Some(RejectReason::NotHtml(ref ct)) if ct.starts_with("image/")));
    assert_eq!(image.status, Some(200));

    let data = validator().validate(&base.join("data").unwrap()).await;
    assert!(matches!(data.rejection, Some(RejectReason::NotHtml(_))));
}

#[tokio::test]
async fn test_image_path_rejected_before_any_request() {
    let (base, hits) = serve().await;
    let url = base.join("photos/item.jpg").unwrap();

    let validation = validator().validate(&url).await;

    assert_eq!(validation.rejection, Some(RejectReason::ImageUrl));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_page_rejected_with_status() {
    let (base, _) = serve().await;

    let validation = validator().validate(&base.join("missing").unwrap()).await;

    assert_eq!(validation.rejection, Some(RejectReason::Status(404)));
}

#[tokio::test]
async fn test_redirect_target_recorded() {
    let (base, _) = serve().await;

    let validation = validator().validate(&base.join("moved").unwrap()).await;

    assert!(validation.is_accepted());
    assert_eq!(validation.final_url.path(), "/product");
}

#[tokio::test]
async fn test_title_past_body_cap_ignored() {
    let (base, _) = serve().await;

    let validation = validator()
        .with_titles(true)
        .validate(&base.join("late-title").unwrap())
        .await;

    assert!(validation.is_accepted());
    assert!(validation.title.is_none());
}

#[tokio::test]
async fn test_unreachable_host_rejected() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{}/product", addr)).unwrap();
    let validation = validator().validate(&url).await;

    assert!(matches!(validation.rejection, Some(RejectReason::Unreachable(_))));
}
