//! Shared fixtures for the HTTP tests: an in-memory user store and a canned
//! text generator standing in for PostgreSQL and Gemini.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use argon2::Params;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use webud_api::{
    jwt::{JwtConfig, JwtService},
    llm::{LlmError, TextGenerator},
    models::{NewUser, UpdateUser, User},
    password::Passwords,
    repositories::{StoreError, UserStore},
    routes::create_router,
    state::AppState,
    templates::TemplateLibrary,
};

pub const SECRET: &str = "integration-test-secret";

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: users.len() as i64 + 1,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password: new_user.password_hash.clone(),
            profile_picture: None,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update_profile(
        &self,
        id: i64,
        update: &UpdateUser,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().await;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(picture) = &update.profile_picture {
            user.profile_picture = picture.clone();
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_password(
        &self,
        id: i64,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().await;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        user.password = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

/// Generator answering every prompt with the same text, or failing
pub enum CannedGenerator {
    Reply(String),
    Fail,
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        match self {
            CannedGenerator::Reply(text) => Ok(text.clone()),
            CannedGenerator::Fail => Err(LlmError::EmptyResponse),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryUserStore>,
    pub jwt: JwtService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_generator(CannedGenerator::Reply("Hello from the model".into()))
    }

    pub fn with_generator(generator: CannedGenerator) -> Self {
        let store = Arc::new(MemoryUserStore::default());
        let jwt = JwtService::new(JwtConfig {
            secret: SECRET.to_string(),
            algorithm: "HS256".to_string(),
            access_token_expiry: chrono::Duration::minutes(30),
        })
        .unwrap();

        let state = AppState {
            user_store: store.clone(),
            jwt_service: jwt.clone(),
            passwords: Passwords::new(Params::new(1024, 1, 1, None).unwrap()),
            text_generator: Arc::new(generator),
            templates: TemplateLibrary::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")),
            chat_chunk_delay: Duration::ZERO,
        };

        Self {
            router: create_router(state),
            store,
            jwt,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Register then log in, returning the bearer token
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                serde_json::json!({"name": name, "email": email, "password": password}),
            ))
            .await;
        assert_eq!(response.status(), 201);

        let response = self.send(login_request(email, password)).await;
        assert_eq!(response.status(), 200);
        body_json(response).await["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={email}&password={password}")))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
