use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::router;
use crate::AppState;
use crate::config::Config;
use crate::enums::UserRole;
use crate::models::{NewUser, User, UserChanges};
use crate::repository::UserRepository;
use crate::repository::memory::MemoryRepository;
use crate::utils::{generate_access_token, hash_password};

struct TestApp {
    app: Router,
    state: AppState,
    repo: MemoryRepository,
}

fn setup_with(config: Config) -> TestApp {
    let repo = MemoryRepository::default();
    let state = AppState::new(config, repo.clone());
    TestApp {
        app: router(state.clone()),
        state,
        repo,
    }
}

fn setup() -> TestApp {
    setup_with(Config::for_tests())
}

impl TestApp {
    async fn seed_user(&self, email: &str, role: UserRole) -> User {
        let mut user = NewUser::new(email.into(), hash_password("password123", 4).unwrap(), None);
        user.role = role;
        UserRepository::create(&self.repo, user).await.unwrap()
    }

    fn token_for(&self, user: &User) -> String {
        generate_access_token(user.id, user.token_version, &self.state.config)
            .unwrap()
            .0
    }

    /// Send a request and return (status, parsed JSON body or Null).
    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={}&password={}", email, password)))
            .unwrap();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = setup();
    let (status, body) = app.send("GET", "/v1/videos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
    assert!(body["error_message"].is_string());

    let (status, _) = app.send("GET", "/v1/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_admin_is_forbidden_on_admin_routes() {
    let app = setup();
    let user = app.seed_user("plain@example.com", UserRole::User).await;
    let token = app.token_for(&user);

    let (status, body) = app.send("GET", "/v1/admin/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);

    // the role check runs before the body is looked at
    let (status, _) = app
        .send("POST", "/v1/admin/users", Some(&token), Some(json!({"email": "nope"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("GET", "/v1/admin/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_manages_users() {
    let app = setup();
    let admin = app.seed_user("admin@example.com", UserRole::Admin).await;
    let token = app.token_for(&admin);
    let new_user = json!({
        "email": "Casey@Example.com",
        "password": "password123",
        "full_name": "Casey",
    });

    let (status, created) = app
        .send("POST", "/v1/admin/users", Some(&token), Some(new_user.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], "casey@example.com");
    assert_eq!(created["role"], "user");
    assert!(created.get("hashed_password").is_none());

    let (status, body) = app
        .send("POST", "/v1/admin/users", Some(&token), Some(new_user))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let id = created["id"].as_str().unwrap();
    let (status, updated) = app
        .send(
            "PATCH",
            &format!("/v1/admin/users/{}", id),
            Some(&token),
            Some(json!({"role": "admin", "full_name": null})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "admin");
    assert_eq!(updated["full_name"], Value::Null);

    let (status, page) = app
        .send("GET", "/v1/admin/users?page=1&size=10", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);

    let (status, _) = app
        .send("DELETE", &format!("/v1/admin/users/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .send("GET", &format!("/v1/admin/users/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn video_entry_lifecycle() {
    let app = setup();
    let user = app.seed_user("creator@example.com", UserRole::User).await;
    let token = app.token_for(&user);

    let (status, first) = app
        .send(
            "POST",
            "/v1/videos",
            Some(&token),
            Some(json!({"platform": "tiktok", "description": "first clip"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["video_number"], 1);

    let (_, second) = app
        .send("POST", "/v1/videos", Some(&token), Some(json!({"platform": "tiktok"})))
        .await;
    assert_eq!(second["video_number"], 2);

    let id = first["id"].as_str().unwrap();
    let (status, patched) = app
        .send(
            "PATCH",
            &format!("/v1/videos/{}", id),
            Some(&token),
            Some(json!({"description": "renamed"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["description"], "renamed");
    assert_eq!(patched["video_number"], 1);

    let (status, page) = app
        .send("GET", "/v1/videos?platform=tiktok", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["items"][0]["video_number"], 1);

    let (status, _) = app
        .send("DELETE", &format!("/v1/videos/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = app
        .send("GET", &format!("/v1/videos/{}", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn invalid_video_input_is_unprocessable() {
    let app = setup();
    let user = app.seed_user("creator@example.com", UserRole::User).await;
    let token = app.token_for(&user);

    let (status, body) = app
        .send("POST", "/v1/videos", Some(&token), Some(json!({"platform": "vimeo"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);

    let (status, _) = app
        .send(
            "POST",
            "/v1/videos",
            Some(&token),
            Some(json!({"platform": "tiktok", "video_number": -1})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .send("GET", "/v1/videos?size=500", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn entries_of_other_users_are_not_found() {
    let app = setup();
    let owner = app.seed_user("owner@example.com", UserRole::User).await;
    let other = app.seed_user("other@example.com", UserRole::User).await;

    let (_, entry) = app
        .send(
            "POST",
            "/v1/videos",
            Some(&app.token_for(&owner)),
            Some(json!({"platform": "instagram"})),
        )
        .await;
    let uri = format!("/v1/videos/{}", entry["id"].as_str().unwrap());

    let other_token = app.token_for(&other);
    let (status, _) = app.send("GET", &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.send("DELETE", &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn copy_to_youtube_shortens_the_description() {
    let app = setup();
    let user = app.seed_user("creator@example.com", UserRole::User).await;
    let token = app.token_for(&user);
    let long = "word ".repeat(30);

    let (_, source) = app
        .send(
            "POST",
            "/v1/videos",
            Some(&token),
            Some(json!({"platform": "tiktok", "description": long})),
        )
        .await;

    let (status, copy) = app
        .send(
            "POST",
            &format!("/v1/videos/{}/copy", source["id"].as_str().unwrap()),
            Some(&token),
            Some(json!({"target_platform": "youtube"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copy["platform"], "youtube");
    assert_eq!(copy["video_number"], 1);
    let description = copy["description"].as_str().unwrap();
    assert!(description.chars().count() <= 100);
    assert!(description.ends_with("..."));
    assert_eq!(copy["youtube_description"], copy["description"]);
}

#[tokio::test]
async fn register_then_manage_own_profile() {
    let app = setup();
    let (status, user) = app
        .send(
            "POST",
            "/v1/users",
            None,
            Some(json!({"email": "new@example.com", "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["is_active"], true);

    let (status, _) = app
        .send(
            "POST",
            "/v1/users",
            None,
            Some(json!({"email": "short@example.com", "password": "short"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, session) = app.login("new@example.com", "password123").await;
    assert_eq!(status, StatusCode::OK);
    let token = session["access_token"].as_str().unwrap();

    let (status, updated) = app
        .send("PATCH", "/v1/users/me", Some(token), Some(json!({"full_name": "Newt"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["full_name"], "Newt");

    let (status, me) = app.send("GET", "/v1/users/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["full_name"], "Newt");
}

#[tokio::test]
async fn login_and_refresh_flow() {
    let app = setup();
    app.seed_user("flow@example.com", UserRole::User).await;

    let (status, _) = app.login("flow@example.com", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, session) = app.login("flow@example.com", "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["token_type"], "bearer");
    assert_eq!(session["user"]["email"], "flow@example.com");

    let access = session["access_token"].as_str().unwrap();
    let (status, me) = app.send("GET", "/v1/auth/me", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "flow@example.com");

    let refresh = session["refresh_token"].clone();
    let (status, rotated) = app
        .send("POST", "/v1/auth/refresh", None, Some(json!({"refresh_token": refresh})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(rotated["refresh_token"], refresh);

    let (status, _) = app
        .send("POST", "/v1/auth/refresh", None, Some(json!({"refresh_token": refresh})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            "POST",
            "/v1/auth/logout",
            None,
            Some(json!({"refresh_token": rotated["refresh_token"]})),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .send(
            "POST",
            "/v1/auth/refresh",
            None,
            Some(json!({"refresh_token": rotated["refresh_token"]})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_all_invalidates_issued_access_tokens() {
    let app = setup();
    let user = app.seed_user("everywhere@example.com", UserRole::User).await;
    let token = app.token_for(&user);

    let (status, _) = app.send("GET", "/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("POST", "/v1/auth/logout-all", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send("GET", "/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_revokes_sessions() {
    let app = setup();
    let user = app.seed_user("rotate@example.com", UserRole::User).await;
    let token = app.token_for(&user);

    let (status, _) = app
        .send(
            "POST",
            "/v1/auth/change-password",
            Some(&token),
            Some(json!({"current_password": "password123", "new_password": "another-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send("GET", "/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.login("rotate@example.com", "another-pass").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn inactive_users_are_rejected() {
    let app = setup();
    let user = app.seed_user("sleepy@example.com", UserRole::User).await;
    let token = app.token_for(&user);

    UserRepository::update(
        &app.repo,
        user.id,
        UserChanges {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let (status, _) = app.send("GET", "/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.login("sleepy@example.com", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn root_base_uri_mounts_routes_at_top_level() {
    let app = setup_with(Config {
        api_base_uri: "/".into(),
        ..Config::for_tests()
    });

    let (status, _) = app.send("GET", "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.send("GET", "/v1/auth/me", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_unprocessable() {
    let app = setup();
    let admin = app.seed_user("admin@example.com", UserRole::Admin).await;
    let token = app.token_for(&admin);

    let (status, body) = app
        .send("GET", "/v1/videos/not-a-uuid", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);
    assert!(body["error_message"].is_string());

    let (status, body) = app
        .send("DELETE", "/v1/admin/users/42", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);

    // auth still comes first
    let (status, _) = app.send("GET", "/v1/videos/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn exhausted_video_numbers_are_a_conflict() {
    let app = setup();
    let user = app.seed_user("maxed@example.com", UserRole::User).await;
    let token = app.token_for(&user);

    let (status, _) = app
        .send(
            "POST",
            "/v1/videos",
            Some(&token),
            Some(json!({"platform": "tiktok", "video_number": i32::MAX})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send("POST", "/v1/videos", Some(&token), Some(json!({"platform": "tiktok"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
}
