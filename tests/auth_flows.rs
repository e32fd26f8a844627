mod common;

use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aquago_driver::auth::Session;
use aquago_driver::config::ClientOptions;
use aquago_driver::screens::{LoginScreen, SignupScreen, NOT_A_DRIVER};
use aquago_driver::store::LocalStore;
use aquago_driver::AquaGo;
use common::{config_for, expiring_session_json, mount_refresh, session_json, setup, DRIVER_ID};

#[tokio::test]
async fn login_without_driver_profile_signs_out() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, store) = setup(&server, dir.path()).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json(DRIVER_ID)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/driver_profiles"))
        .and(query_param("id", "eq.driver-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let login = LoginScreen::new(app.clone(), store.clone());
    let err = login.login("driver@example.com", "secret1").await.unwrap_err();

    assert_eq!(err.message(), NOT_A_DRIVER);
    assert_eq!(err.message(), "You are a driver to login");
    assert!(app.auth().get_session().is_none());
    assert!(store.user_id().await.is_none());
}

#[tokio::test]
async fn login_caches_user_and_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, store) = setup(&server, dir.path()).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json(DRIVER_ID)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/driver_profiles"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": DRIVER_ID, "name": "Ravi" }])))
        .mount(&server)
        .await;

    let session = LoginScreen::new(app.clone(), store.clone())
        .login(" driver@example.com ", "secret1")
        .await
        .unwrap();

    assert_eq!(session.user_id, DRIVER_ID);
    assert_eq!(store.user_id().await.as_deref(), Some(DRIVER_ID));
    assert_eq!(store.session().await.unwrap().access_token, "user-token");
}

#[tokio::test]
async fn login_shows_server_message() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, store) = setup(&server, dir.path()).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let login = LoginScreen::new(app, store);
    let err = login.login("driver@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.message(), "Invalid login credentials");

    let err = login.login("", "").await.unwrap_err();
    assert_eq!(err.message(), "Please fill in all fields");
}

#[tokio::test]
async fn restore_validates_cached_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, store) = setup(&server, dir.path()).await;

    let session: Session = serde_json::from_value(session_json(DRIVER_ID)).unwrap();
    store.set_session(&session).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": DRIVER_ID })))
        .mount(&server)
        .await;

    let restored = LoginScreen::new(app.clone(), store.clone()).restore().await.unwrap();
    assert_eq!(restored.user_id, DRIVER_ID);
    assert!(app.auth().get_session().is_some());
}

#[tokio::test]
async fn restore_forgets_rejected_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, store) = setup(&server, dir.path()).await;

    let session: Session = serde_json::from_value(session_json(DRIVER_ID)).unwrap();
    store.set_session(&session).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "msg": "invalid JWT" })))
        .mount(&server)
        .await;

    assert!(LoginScreen::new(app.clone(), store).restore().await.is_none());
    assert!(app.auth().get_session().is_none());
}

#[tokio::test]
async fn restore_refreshes_an_expired_access_token() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, store) = setup(&server, dir.path()).await;

    let stale: Session = serde_json::from_value(expiring_session_json(DRIVER_ID, -600)).unwrap();
    assert!(stale.is_expired());
    store.set_session(&stale).await.unwrap();

    mount_refresh(&server, 200, 1).await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": DRIVER_ID })))
        .expect(1)
        .mount(&server)
        .await;

    let restored = LoginScreen::new(app.clone(), store.clone()).restore().await.unwrap();

    assert_eq!(restored.user_id, DRIVER_ID);
    assert_eq!(app.auth().get_session().unwrap().access_token, "fresh-token");
    let cached = store.session().await.unwrap();
    assert_eq!(cached.access_token, "fresh-token");
    assert_eq!(cached.refresh_token, "next-refresh-token");
    assert!(!cached.is_expired());
}

#[tokio::test]
async fn restore_gives_up_when_refresh_is_rejected() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, store) = setup(&server, dir.path()).await;

    let stale: Session = serde_json::from_value(expiring_session_json(DRIVER_ID, -600)).unwrap();
    store.set_session(&stale).await.unwrap();

    mount_refresh(&server, 400, 1).await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": DRIVER_ID })))
        .expect(0)
        .mount(&server)
        .await;

    assert!(LoginScreen::new(app.clone(), store).restore().await.is_none());
    assert!(app.auth().get_session().is_none());
}

#[tokio::test]
async fn restore_drops_expired_session_without_auto_refresh() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, &dir.path().join("session.json"));
    let options = ClientOptions::default().with_auto_refresh_token(false);
    let app = AquaGo::from_config(&config, options).unwrap();
    let store = Arc::new(LocalStore::open(&config.cache_path).await.unwrap());

    let stale: Session = serde_json::from_value(expiring_session_json(DRIVER_ID, -600)).unwrap();
    store.set_session(&stale).await.unwrap();
    mount_refresh(&server, 200, 0).await;

    assert!(LoginScreen::new(app.clone(), store).restore().await.is_none());
    assert!(app.auth().get_session().is_none());
}

#[tokio::test]
async fn refresh_session_requires_a_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _store) = setup(&server, dir.path()).await;

    assert!(app.auth().refresh_session().await.is_err());
    assert!(app.auth().refresh_if_expiring().await.unwrap().is_none());
}

#[tokio::test]
async fn logout_clears_the_cache() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, store) = setup(&server, dir.path()).await;

    let session: Session = serde_json::from_value(session_json(DRIVER_ID)).unwrap();
    app.auth().set_session(session.clone());
    store.set_session(&session).await.unwrap();
    store.set_user_id(DRIVER_ID).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    LoginScreen::new(app.clone(), store.clone()).logout().await;

    assert!(app.auth().get_session().is_none());
    assert!(store.user_id().await.is_none());
    assert!(store.session().await.is_none());
}

#[tokio::test]
async fn signup_creates_profile_row() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _store) = setup(&server, dir.path()).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_json(json!({ "email": "new@example.com", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "new-driver",
            "email": "new@example.com"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/driver_profiles"))
        .and(body_json(json!([{ "id": "new-driver", "email": "new@example.com", "name": "Ravi" }])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = SignupScreen::new(app)
        .sign_up(" Ravi ", "new@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(outcome.user_id, "new-driver");
}

#[tokio::test]
async fn signup_reports_profile_failure() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _store) = setup(&server, dir.path()).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": "new-driver" } })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/driver_profiles"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "duplicate key" })))
        .mount(&server)
        .await;

    let err = SignupScreen::new(app)
        .sign_up("Ravi", "new@example.com", "secret1")
        .await
        .unwrap_err();
    assert_eq!(
        err.message(),
        "Account created but profile setup failed. Please contact support."
    );
}

#[tokio::test]
async fn signup_without_user_asks_for_confirmation() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _store) = setup(&server, dir.path()).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": null })))
        .mount(&server)
        .await;

    let err = SignupScreen::new(app)
        .sign_up("Ravi", "new@example.com", "secret1")
        .await
        .unwrap_err();
    assert_eq!(
        err.message(),
        "Check your inbox to confirm your email before logging in."
    );
}

#[tokio::test]
async fn signup_validates_before_calling_the_server() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _store) = setup(&server, dir.path()).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let screen = SignupScreen::new(app);
    let cases = [
        ("", "new@example.com", "secret1", "Please fill in all fields"),
        ("Ravi", "not-an-email", "secret1", "Please enter a valid email address"),
        ("Ravi", "new@example.com", "12345", "Password must be at least 6 characters long"),
    ];
    for (name, email, password, expected) in cases {
        let err = screen.sign_up(name, email, password).await.unwrap_err();
        assert_eq!(err.message(), expected);
    }
}
