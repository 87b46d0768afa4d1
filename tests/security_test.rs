use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use meetup_travel::api;
use meetup_travel::auth::{ROLE_ADMIN, ROLE_USER, create_jwt, decode_jwt, hash_password, verify_password};
use meetup_travel::db;
use meetup_travel::infrastructure::AppState;
use meetup_travel::services::user_service::{self, NewUser};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(post_json(
            "/auth/login",
            &json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_password_hashing() {
    let password = "super_secret_password";
    let hash = hash_password(password).expect("Failed to hash password");

    assert_ne!(password, hash);
    assert!(verify_password(password, &hash).unwrap());
    assert!(!verify_password("wrong_password", &hash).unwrap());
}

#[tokio::test]
async fn test_jwt_creation_and_verification() {
    let token = create_jwt("guide@meetup.travel", 7, ROLE_USER).expect("Failed to create JWT");
    assert!(!token.is_empty());

    let claims = decode_jwt(&token).expect("Failed to verify JWT");
    assert_eq!(claims.sub, "guide@meetup.travel");
    assert_eq!(claims.user_id, 7);
    assert_eq!(claims.role, ROLE_USER);
    assert!(!claims.is_admin());
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let db = setup_test_db().await;
    let app = api::api_router(AppState::new(db));

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            &json!({
                "email": "Traveller@Example.com",
                "password": "hunter22",
                "fullName": "Mai Nguyen"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let profile = body_json(response).await;
    assert_eq!(profile["email"], "traveller@example.com");
    assert_eq!(profile["role"], ROLE_USER);
    assert!(profile.get("passwordHash").is_none());

    // Same email, any casing
    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            &json!({
                "email": "traveller@example.com",
                "password": "another1",
                "fullName": "Someone Else"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = login(&app, "traveller@example.com", "hunter22").await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = body_json(response).await;
    let token = session["token"].as_str().unwrap().to_string();
    assert_eq!(session["fullName"], "Mai Nguyen");

    let response = app
        .oneshot(get_with_token("/users/profile", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["id"], session["userId"]);
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let db = setup_test_db().await;
    user_service::register(
        &db,
        NewUser {
            email: "mai@example.com".to_string(),
            password: "hunter22".to_string(),
            full_name: "Mai Nguyen".to_string(),
            phone_number: None,
        },
    )
    .await
    .unwrap();
    let app = api::api_router(AppState::new(db));

    let wrong_password = login(&app, "mai@example.com", "wrong").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(wrong_password).await;

    let unknown_user = login(&app, "nobody@example.com", "hunter22").await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user = body_json(unknown_user).await;

    assert_eq!(wrong_password["error"], unknown_user["error"]);
    assert_eq!(wrong_password["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let db = setup_test_db().await;
    let app = api::api_router(AppState::new(db));

    let response = app
        .clone()
        .oneshot(get_with_token("/bookings", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get_with_token("/bookings", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_user_role() {
    let db = setup_test_db().await;
    let user = user_service::register(
        &db,
        NewUser {
            email: "mai@example.com".to_string(),
            password: "hunter22".to_string(),
            full_name: "Mai Nguyen".to_string(),
            phone_number: None,
        },
    )
    .await
    .unwrap();
    let other = user_service::create_user(
        &db,
        NewUser {
            email: "admin@example.com".to_string(),
            password: "admin123".to_string(),
            full_name: "Admin".to_string(),
            phone_number: None,
        },
        ROLE_ADMIN,
    )
    .await
    .unwrap();
    let app = api::api_router(AppState::new(db));

    let user_token = create_jwt(&user.email, user.id, ROLE_USER).unwrap();
    let admin_token = create_jwt(&other.email, other.id, ROLE_ADMIN).unwrap();

    for uri in ["/bookings", "/users"] {
        let response = app
            .clone()
            .oneshot(get_with_token(uri, Some(&user_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "GET {}", uri);

        let response = app
            .clone()
            .oneshot(get_with_token(uri, Some(&admin_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
    }

    // Users read only their own account
    let response = app
        .clone()
        .oneshot(get_with_token(
            &format!("/users/{}", user.id),
            Some(&user_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_with_token(
            &format!("/users/{}", other.id),
            Some(&user_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/tours")
                .method("POST")
                .header(header::AUTHORIZATION, format!("Bearer {}", user_token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"title":"Sneaky tour","price":"1.00"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_reports_database() {
    let db = setup_test_db().await;
    let app = api::api_router(AppState::new(db));

    let response = app
        .oneshot(get_with_token("/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let health = body_json(response).await;
    assert_eq!(health["status"], "UP");
    assert_eq!(health["userCount"], 0);
}
