//! End-to-end session refresh tests against a mock backend.

use futures_util::future::join_all;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::Barrier;

use session_client::auth::LoginRequest;
use session_client::{user_message, ApiError, CredentialPair, LogoutReason, RefreshError};

mod common;

const REFRESH: &str = "/api/auth/refresh-token";

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let barrier = Arc::new(Barrier::new(3));
    let backend = common::start_programmable_backend(move |req| {
        let barrier = barrier.clone();
        async move {
            if req.path == REFRESH {
                tokio::time::sleep(Duration::from_millis(200)).await;
                return (200, common::token_envelope("T2", "R2"));
            }
            match req.bearer() {
                Some("T2") => (200, common::ok_envelope(json!({ "path": req.path }))),
                _ => {
                    barrier.wait().await;
                    (401, String::new())
                }
            }
        }
    })
    .await;

    let client = common::client_for(&backend);
    client.credentials().set(&CredentialPair::new("T1", "R1"));

    let results = join_all(["/orders", "/cart", "/reviews"].map(|p| client.get(p))).await;

    for (result, path) in results.into_iter().zip(["/orders", "/cart", "/reviews"]) {
        assert_eq!(result.unwrap(), json!({ "path": format!("/api{}", path) }));
    }
    assert_eq!(backend.count(REFRESH), 1);

    let retries: Vec<_> = backend
        .requests()
        .into_iter()
        .filter(|r| r.path != REFRESH && r.bearer() == Some("T2"))
        .collect();
    assert_eq!(retries.len(), 3);
    assert_eq!(client.credentials().get(), Some(CredentialPair::new("T2", "R2")));
    assert!(!client.coordinator().is_refreshing());
}

#[tokio::test]
async fn test_refresh_failure_rejects_everything() {
    let barrier = Arc::new(Barrier::new(3));
    let backend = common::start_programmable_backend(move |req| {
        let barrier = barrier.clone();
        async move {
            if req.path == REFRESH {
                tokio::time::sleep(Duration::from_millis(100)).await;
                let body = json!({ "success": false, "error": "Invalid refresh token", "statusCode": 400 });
                return (400, body.to_string());
            }
            barrier.wait().await;
            (401, String::new())
        }
    })
    .await;

    let client = common::client_for(&backend);
    client.credentials().set(&CredentialPair::new("T1", "R1"));
    let mut logouts = client.subscribe_logout();

    let results = join_all(["/orders", "/cart", "/reviews"].map(|p| client.get(p))).await;

    for result in results {
        let err = result.unwrap_err();
        assert!(
            matches!(err, ApiError::RefreshFailed(RefreshError::Rejected { status: 400, ref message }) if message == "Invalid refresh token"),
            "unexpected error {:?}",
            err
        );
        assert_eq!(user_message(&err), "Your session has expired. Please log in again.");
    }

    assert_eq!(backend.count(REFRESH), 1);
    assert!(client.credentials().is_empty());

    let event = logouts.try_recv().unwrap();
    assert_eq!(event.reason, LogoutReason::RefreshFailed);
    assert_eq!(event.redirect_to, "/login");
    assert!(matches!(logouts.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_no_refresh_token_logs_out_without_refresh() {
    let backend = common::start_programmable_backend(|_| async { (401, String::new()) }).await;
    let client = common::client_for(&backend);
    let mut logouts = client.subscribe_logout();

    let err = client.get("/orders").await.unwrap_err();

    assert!(matches!(err, ApiError::LoggedOut));
    assert_eq!(backend.count(REFRESH), 0);
    assert_eq!(backend.requests()[0].authorization, None);
    assert_eq!(logouts.try_recv().unwrap().reason, LogoutReason::MissingRefreshToken);
}

#[tokio::test]
async fn test_retried_request_is_not_refreshed_twice() {
    let backend = common::start_programmable_backend(|req| async move {
        if req.path == REFRESH {
            (200, common::token_envelope("T2", "R2"))
        } else {
            (401, String::new())
        }
    })
    .await;

    let client = common::client_for(&backend);
    client.credentials().set(&CredentialPair::new("T1", "R1"));

    let err = client.get("/orders").await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }));
    assert_eq!(backend.count(REFRESH), 1);

    let attempts: Vec<_> = backend
        .requests()
        .into_iter()
        .filter(|r| r.path == "/api/orders")
        .collect();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].bearer(), Some("T1"));
    assert_eq!(attempts[1].bearer(), Some("T2"));
    assert!(attempts[0].request_id.is_some());
    assert_eq!(attempts[0].request_id, attempts[1].request_id);
}

#[tokio::test]
async fn test_domain_error_passes_through() {
    let backend = common::start_programmable_backend(|_| async {
        let body = json!({ "success": false, "error": "Product not found", "statusCode": 404 });
        (404, body.to_string())
    })
    .await;

    let client = common::client_for(&backend);
    client.credentials().set(&CredentialPair::new("T1", "R1"));

    let err = client.get("/products/99").await.unwrap_err();
    assert!(matches!(err, ApiError::Domain { status: 404, .. }));
    assert_eq!(user_message(&err), "Product not found");
    assert_eq!(backend.count(REFRESH), 0);
    assert_eq!(client.credentials().get(), Some(CredentialPair::new("T1", "R1")));
}

#[tokio::test]
async fn test_login_then_logout() {
    let backend = common::start_programmable_backend(|req| async move {
        match (req.method.as_str(), req.path.as_str()) {
            ("POST", "/api/auth/login") => {
                let body = json!({
                    "success": true,
                    "data": {
                        "accessToken": "T1",
                        "refreshToken": "R1",
                        "user": { "id": "u1", "email": "admin@ecommerce.com", "fullName": "Admin", "roles": ["ROLE_ADMIN"] }
                    }
                });
                (200, body.to_string())
            }
            ("GET", "/api/auth/me") if req.bearer() == Some("T1") => (
                200,
                common::ok_envelope(json!({ "id": "u1", "email": "admin@ecommerce.com", "fullName": "Admin" })),
            ),
            ("POST", "/api/auth/logout") => (200, json!({ "success": true, "message": "Logged out" }).to_string()),
            _ => (404, String::new()),
        }
    })
    .await;

    let client = common::client_for(&backend);
    let auth = client
        .login(&LoginRequest {
            email: "admin@ecommerce.com".into(),
            password: "Admin@123".into(),
            expected_role: Some("ROLE_ADMIN".into()),
        })
        .await
        .unwrap();
    assert!(auth.user.unwrap().has_role("ROLE_ADMIN"));
    assert_eq!(client.credentials().get(), Some(CredentialPair::new("T1", "R1")));

    let login = &backend.requests()[0];
    let body: serde_json::Value = serde_json::from_str(&login.body).unwrap();
    assert_eq!(body["expectedRole"], "ROLE_ADMIN");

    let me = client.current_user().await.unwrap();
    assert_eq!(me.email, "admin@ecommerce.com");

    client.logout().await;
    assert!(client.credentials().is_empty());
    assert_eq!(backend.count("/api/auth/logout"), 1);
}
