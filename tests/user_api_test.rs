//! Integration tests for the user API.
//!
//! These drive the full router against an in-memory repository, so every
//! request exercises routing, body validation, the handler, and the error
//! mapping without needing a database.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use user_api::domain::{User, UserRecord};
use user_api::repository::{RepoError, RepoResult, UserRepository};
use user_api::routes::create_router;
use user_api::state::AppState;

/// In-memory repository with the same outcome semantics as the SeaORM store:
/// duplicate email conflicts on create, not-found on update and delete, and
/// identifiers matched as opaque strings.
#[derive(Default)]
struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id.to_string() == id).cloned())
    }

    async fn create(&self, record: UserRecord) -> RepoResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == record.email) {
            return Err(RepoError::Conflict("email".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: record.name,
            email: record.email,
            age: record.age,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: &str, record: UserRecord) -> RepoResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id.to_string() == id)
            .ok_or(RepoError::NotFound)?;
        user.name = record.name;
        user.email = record.email;
        user.age = record.age;
        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id.to_string() != id);
        if users.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

fn app() -> Router {
    create_router(AppState::new(Arc::new(InMemoryUsers::default())))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request is valid")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request is valid")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

fn valid_user_body() -> Value {
    json!({"name": "John Doe", "email": "john.doe@example.com", "age": 30})
}

#[tokio::test]
async fn create_returns_201_with_assigned_id_and_unchanged_fields() {
    let app = app();

    let response = app
        .oneshot(json_request("POST", "/users", valid_user_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert!(body["id"].is_string());
    assert_eq!(body["name"], "John Doe");
    assert_eq!(body["email"], "john.doe@example.com");
    assert_eq!(body["age"], 30);
}

#[tokio::test]
async fn create_then_get_round_trips_all_fields() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/users", valid_user_body()))
        .await
        .unwrap();
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(empty_request("GET", &format!("/users/{}", id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn create_trims_name_before_persisting() {
    let app = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/users",
            json!({"name": "  John Doe  ", "email": "john@example.com", "age": 30}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["name"], "John Doe");
}

#[tokio::test]
async fn invalid_payload_reports_one_error_per_rule_in_order() {
    let app = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/users",
            json!({"name": "", "email": "bad", "age": 10}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["errors"],
        json!([
            "Name is required",
            "Invalid email address",
            "Age must be at least 18"
        ])
    );
}

#[tokio::test]
async fn malformed_body_is_a_validation_failure() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_email_is_rejected_on_second_create() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/users", valid_user_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(
            "POST",
            "/users",
            json!({"name": "Other Person", "email": "john.doe@example.com", "age": 40}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Email already in use");
}

#[tokio::test]
async fn get_unknown_id_returns_404_with_message() {
    let app = app();

    let response = app
        .oneshot(empty_request("GET", &format!("/users/{}", Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn get_malformed_id_behaves_like_unknown_id() {
    let app = app();

    let response = app
        .oneshot(empty_request("GET", "/users/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_users_in_insertion_order() {
    let app = app();

    for (name, email) in [("A", "a@example.com"), ("B", "b@example.com")] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/users",
                json!({"name": name, "email": email, "age": 30}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(empty_request("GET", "/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn update_replaces_all_fields() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/users", valid_user_body()))
        .await
        .unwrap();
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/users/{}", id),
            json!({"name": "Jane Roe", "email": "jane.roe@example.com", "age": 45}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], "Jane Roe");
    assert_eq!(updated["email"], "jane.roe@example.com");
    assert_eq!(updated["age"], 45);

    let response = app
        .oneshot(empty_request("GET", &format!("/users/{}", id)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, updated);
}

#[tokio::test]
async fn update_unknown_id_returns_400_not_404() {
    let app = app();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/users/{}", Uuid::new_v4()),
            valid_user_body(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid data");
}

#[tokio::test]
async fn update_with_invalid_payload_returns_violations() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/users", valid_user_body()))
        .await
        .unwrap();
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/users/{}", id),
            json!({"name": "Jane", "email": "jane@example.com", "age": 101}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"], json!(["Age must be less than or equal to 100"]));
}

#[tokio::test]
async fn delete_then_get_returns_404() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/users", valid_user_body()))
        .await
        .unwrap();
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/users/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User deleted successfully");

    let response = app
        .oneshot(empty_request("GET", &format!("/users/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_id_returns_500() {
    let app = app();

    let response = app
        .oneshot(empty_request(
            "DELETE",
            &format!("/users/{}", Uuid::new_v4()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Something went wrong");
}
