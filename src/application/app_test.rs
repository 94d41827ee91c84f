use super::App;
use crate::domain::models::Route;
use crate::domain::services::AuthStore;
use crate::infrastructure::api::ApiError;

fn signed_out_app(url: &str) -> App {
    return App::assemble(url, AuthStore::in_memory());
}

#[tokio::test]
async fn it_lands_on_the_dashboard_after_a_valid_login() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(
            r#"{
                "access_token": "token-new",
                "token_type": "bearer",
                "user": {
                    "id": "user-1",
                    "email": "dev@example.com",
                    "username": "dev",
                    "theme": "dark",
                    "subscription_tier": "free",
                    "created_at": "2024-01-01T00:00:00Z"
                }
            }"#,
        )
        .create();

    let app = signed_out_app(&server.url());
    assert_eq!(app.router.lock().unwrap().current(), Route::Login);

    app.sign_in("dev@example.com", "hunter2").await.unwrap();
    mock.assert();

    let auth = app.auth.lock().unwrap();
    assert!(auth.is_authenticated);
    assert_eq!(auth.user.as_ref().unwrap().username, "dev");
    assert!(!auth.token.as_ref().unwrap().is_empty());
    drop(auth);

    assert_eq!(app.router.lock().unwrap().current().path(), "/");
}

#[tokio::test]
async fn it_keeps_the_form_editable_after_bad_credentials() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/auth/login")
        .with_status(401)
        .with_body(r#"{"detail": "Invalid credentials"}"#)
        .create();

    let app = signed_out_app(&server.url());
    let res = app.sign_in("dev@example.com", "wrong").await;
    mock.assert();

    // The backend's detail is what the form shows.
    match res {
        Err(ApiError::Unauthorized(detail)) => assert_eq!(detail, "Invalid credentials"),
        other => panic!("Expected an unauthorized error, got {other:?}"),
    }
    assert!(!app.auth.lock().unwrap().is_authenticated);
}

#[tokio::test]
async fn it_signs_out_locally() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_body(
            r#"{
                "access_token": "token-new",
                "token_type": "bearer",
                "user": {"id": "user-1", "email": "dev@example.com", "username": "dev", "theme": "dark", "subscription_tier": "free", "created_at": "t"}
            }"#,
        )
        .create();

    let app = signed_out_app(&server.url());
    app.sign_in("dev@example.com", "hunter2").await.unwrap();
    mock.assert();

    app.sign_out();

    assert!(!app.auth.lock().unwrap().is_authenticated);
    assert_eq!(app.router.lock().unwrap().current(), Route::Login);
}
