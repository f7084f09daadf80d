//! Router-level tests over the in-memory repositories.

mod catalogue;

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
    response::Response,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    config::SessionLifetimes,
    models::{
        session::Session,
        settings::SettingsChanges,
        store::{Store, StoreInput},
        user::{NewUser, User},
    },
    repositories::{PlatformRepository, StoreRepository, UserRepository, memory::MemoryDatabase},
    routes,
    services::storage::MemoryObjectStore,
    state::AppState,
};

/// JSON reply of the router.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A signed-in user.
pub struct Caller {
    pub user_id: Uuid,
    pub token: String,
}

pub struct TestApp {
    pub db: Arc<MemoryDatabase>,
    pub objects: Arc<MemoryObjectStore>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Arc::new(MemoryDatabase::new());
        let objects = Arc::new(MemoryObjectStore::default());
        let router = routes::router(AppState::in_memory(db.clone(), objects.clone()));

        Self { db, objects, router }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.send(request).await;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        Reply { status, headers, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Reply {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Reply {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> Reply {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Reply {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn update_settings(&self, changes: SettingsChanges) {
        self.db.update_settings(changes, Utc::now()).await.unwrap();
    }

    /// A user with a live session, bypassing password hashing.
    pub async fn user(&self, email: &str) -> Caller {
        let user = User::new(
            NewUser {
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                password: String::new(),
                phone: None,
            },
            "not-a-hash".to_string(),
            Utc::now(),
        );
        self.db.register(&user).await.unwrap();
        self.session_for(user.id).await
    }

    pub async fn session_for(&self, user_id: Uuid) -> Caller {
        let (session, tokens) = Session::issue(user_id, SessionLifetimes::default(), Utc::now());
        self.db.create_session(&session).await.unwrap();

        Caller {
            user_id,
            token: tokens.access_token,
        }
    }

    /// A platform admin.
    pub async fn admin(&self) -> Caller {
        let admin = crate::services::bootstrap::admin_user("root@example.com", "not-a-hash".to_string());
        self.db.register(&admin).await.unwrap();
        self.session_for(admin.id).await
    }

    /// An active store and its signed-in owner.
    pub async fn store(&self, name: &str) -> (Uuid, Caller) {
        let owner = self.user(&format!("owner@{}.test", name.to_lowercase())).await;
        let store = Store::new(
            StoreInput {
                name: name.to_string(),
                address: "1 Market Street".to_string(),
                city: "Dhaka".to_string(),
                country: "Bangladesh".to_string(),
                postcode: "1207".to_string(),
                email: format!("hello@{}.test", name.to_lowercase()),
                phone: "0123456789".to_string(),
                description: None,
            },
            Utc::now(),
        );
        self.db.create_with_owner(&store, owner.user_id).await.unwrap();

        (store.id, owner)
    }
}

/// Body of a product create request.
pub fn product_body(sku: &str) -> Value {
    serde_json::json!({
        "name": "Green Tea",
        "sku": sku,
        "unit": "box",
        "price": 1_250,
        "stock": 10,
        "is_shippable": true,
        "is_published": true
    })
}
