#![cfg(feature = "middleware")]

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use shoefast_client::middleware::{SessionAuthConfig, session_guard};
use shoefast_client::{ApiClient, ClientConfig};
use tower::ServiceExt;

use common::token_expiring_in;

fn config() -> SessionAuthConfig {
    let client = ApiClient::new(ClientConfig::parse("http://127.0.0.1:9").unwrap());
    SessionAuthConfig::new(client).with_secure_cookies(false)
}

fn app(config: &SessionAuthConfig) -> Router {
    Router::new()
        .route("/", get(|| async { "home" }))
        .route("/login", get(|| async { "login" }))
        .route("/mis-disenos", get(|| async { "designs" }))
        .route("/_next/static/app.js", get(|| async { "js" }))
        .layer(axum::middleware::from_fn_with_state(
            config.guard_state(),
            session_guard,
        ))
}

fn request(path: &str, cookie: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Should redirect")
        .to_str()
        .unwrap()
}

fn set_cookies(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn assert_session_cleared(response: &axum::response::Response) {
    let cookies = set_cookies(response);
    for name in ["auth_token", "user_email"] {
        assert!(
            cookies
                .iter()
                .any(|c| c.starts_with(&format!("{name}=;")) && c.contains("Max-Age=0")),
            "{name} should be removed, got {cookies:?}"
        );
    }
}

#[tokio::test]
async fn missing_token_redirects_to_login() {
    let config = config();
    for path in ["/", "/mis-disenos"] {
        let response = app(&config).oneshot(request(path, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/login");
        assert!(set_cookies(&response).is_empty());
    }
}

#[tokio::test]
async fn login_page_is_reachable_without_token() {
    let response = app(&config()).oneshot(request("/login", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn valid_token_reaches_protected_page() {
    let cookie = format!("auth_token={}; user_email=a@b.com", token_expiring_in(3600));
    let response = app(&config())
        .oneshot(request("/mis-disenos", Some(cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response).is_empty());
}

#[tokio::test]
async fn expired_token_redirects_and_strips_both_cookies() {
    let cookie = format!("auth_token={}; user_email=a@b.com", token_expiring_in(-10));
    let response = app(&config()).oneshot(request("/", Some(cookie))).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_session_cleared(&response);
}

#[tokio::test]
async fn malformed_token_behaves_like_expired() {
    let cookie = "auth_token=not-a-jwt; user_email=a@b.com".to_string();
    let response = app(&config())
        .oneshot(request("/mis-disenos", Some(cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_session_cleared(&response);
}

#[tokio::test]
async fn valid_token_on_login_page_renders_by_default() {
    let cookie = format!("auth_token={}", token_expiring_in(3600));
    let response = app(&config())
        .oneshot(request("/login", Some(cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn valid_token_on_login_page_can_go_home() {
    let config = config().with_redirect_authenticated_login(true);
    let cookie = format!("auth_token={}", token_expiring_in(3600));
    let response = app(&config)
        .oneshot(request("/login", Some(cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn static_assets_skip_the_guard() {
    let response = app(&config())
        .oneshot(request("/_next/static/app.js", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
