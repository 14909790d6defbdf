//! # Common Test Utilities
//!
//! In-memory application setup, fixtures and request helpers shared by the
//! API integration tests.

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex, Once},
    time::Duration,
};

use async_trait::async_trait;
use auth::{JwtConfig, PasswordConfig, create_access_token, hash_password, secrecy::{ExposeSecret, SecretString}};
use axum::{
    Router,
    body::{Body, to_bytes},
};
use chrono::Utc;
use entity::{sea_orm_active_enums::UserRole, users};
use http::{Method, Request, StatusCode, header};
use migration::{DatabaseConfig, connect_and_migrate, connect_writer, run_all_seeds, seeds::DEMO_PASSWORD};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::Value;
use server::{
    AppState,
    create_app_router,
    notifications::{MailError, Mailer, Notification},
};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-signing-secret-32-bytes!";
pub const MANAGER_EMAIL: &str = "manager@company.com";
pub const ALICE_EMAIL: &str = "employee1@company.com";
pub const BOB_EMAIL: &str = "employee2@company.com";

static INIT: Once = Once::new();

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Mailer that keeps every message, optionally failing each delivery.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> { self.sent.lock().unwrap().clone() }

    /// Waits for the spawned dispatch task to hand over `count` messages.
    pub async fn wait_for(&self, count: usize) -> Vec<Notification> {
        for _ in 0 .. 100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(MailError::Unavailable("smtp relay down".to_string()));
        }
        Ok(())
    }
}

/// A migrated, seeded deployment, in memory unless built with
/// [`TestApp::with_database`].
pub struct TestApp {
    pub state:  AppState,
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub async fn new() -> Self { Self::with_mailer(RecordingMailer::default()).await }

    pub async fn with_mailer(mailer: RecordingMailer) -> Self { Self::build(&DatabaseConfig::in_memory(), mailer).await }

    /// A deployment over `config`, with the separate write connection the
    /// server uses for file databases.
    pub async fn with_database(config: &DatabaseConfig) -> Self { Self::build(config, RecordingMailer::default()).await }

    async fn build(config: &DatabaseConfig, mailer: RecordingMailer) -> Self {
        init_test_env();

        let db = connect_and_migrate(config).await.expect("migrated database");
        run_all_seeds(&db, &PasswordConfig::minimal())
            .await
            .expect("seed data");
        let writer = connect_writer(config, &db).await.expect("write connection");

        let mailer = Arc::new(mailer);
        let state = AppState::new(db, JwtConfig::for_secret(TEST_JWT_SECRET))
            .with_writer(writer)
            .with_password_config(PasswordConfig::minimal())
            .with_mailer(mailer.clone());

        Self {
            router: create_app_router(state.clone()),
            state,
            mailer,
        }
    }

    pub async fn user(&self, email: &str) -> users::Model {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.state.db)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("no user {email}"))
    }

    /// Inserts a verified user whose password is the demo password.
    pub async fn insert_user(&self, email: &str, role: UserRole, manager_id: Option<i32>) -> users::Model {
        let password = SecretString::from(DEMO_PASSWORD.to_string());
        let hash = hash_password(&password, Some(PasswordConfig::minimal())).unwrap();

        users::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(hash.expose_secret().to_string()),
            full_name: Set(email.split('@').next().unwrap_or(email).to_string()),
            role: Set(role),
            manager_id: Set(manager_id),
            is_verified: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.state.db)
        .await
        .unwrap()
    }

    pub async fn token_for(&self, email: &str) -> String {
        let user = self.user(email).await;
        create_access_token(&self.state.jwt_config, user.id, &user.email, user.role).unwrap()
    }

    /// Sends one request through the full router.
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => {
                builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap()
            },
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        }
        else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) { self.send(Method::GET, uri, Some(token), None).await }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }
}
