//! In-memory repositories and request helpers for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;

use crate::applications::{
    repo::ApplicationRepo,
    repo_types::{Application, ApplicationChanges, NewApplication},
};
use crate::error::StoreError;
use crate::resources::{
    repo::ResourceRepo,
    repo_types::{NewResource, Resource},
};
use crate::state::AppState;
use crate::users::{
    repo::UserRepo,
    repo_types::{NewUser, User},
};

pub const TEST_SECRET: &str = "test-jwt-secret";

struct Table<T> {
    next_id: i32,
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Default)]
pub struct MemoryUsers(Mutex<Table<User>>);

#[async_trait]
impl UserRepo for MemoryUsers {
    async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        let mut table = self.0.lock().unwrap();
        if table.rows.iter().any(|u| u.user_name == new.user_name) {
            return Err(StoreError::Conflict("users_user_name_key".into()));
        }
        let user = User {
            id: table.next_id(),
            full_name: new.full_name,
            user_name: new.user_name,
            password: new.password_hash,
            date_created: OffsetDateTime::now_utc(),
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.0.lock().unwrap().rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|u| u.user_name == user_name)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryApplications(Mutex<Table<Application>>);

#[async_trait]
impl ApplicationRepo for MemoryApplications {
    async fn insert(&self, new: NewApplication) -> Result<Application, StoreError> {
        let mut table = self.0.lock().unwrap();
        let app = Application {
            id: table.next_id(),
            job_name: new.job_name,
            company_name: new.company_name,
            website_url: new.website_url,
            date_applied: new.date_applied,
            contact_name: new.contact_name,
            contact_phone: new.contact_phone,
            contact_email: new.contact_email,
            interview_date: new.interview_date,
            status: new.status,
            notes: new.notes,
            user_id: new.user_id,
        };
        table.rows.push(app.clone());
        Ok(app)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Application>, StoreError> {
        Ok(self.0.lock().unwrap().rows.iter().find(|a| a.id == id).cloned())
    }

    async fn get_by_owner(&self, user_id: i32) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: i32,
        changes: ApplicationChanges,
    ) -> Result<Option<Application>, StoreError> {
        let mut table = self.0.lock().unwrap();
        let Some(app) = table.rows.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        fn set(target: &mut String, value: Option<String>) {
            if let Some(v) = value {
                *target = v;
            }
        }
        fn set_opt(target: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *target = value;
            }
        }
        set(&mut app.job_name, changes.job_name);
        set(&mut app.company_name, changes.company_name);
        set_opt(&mut app.website_url, changes.website_url);
        set_opt(&mut app.date_applied, changes.date_applied);
        set_opt(&mut app.contact_name, changes.contact_name);
        set_opt(&mut app.contact_phone, changes.contact_phone);
        set_opt(&mut app.contact_email, changes.contact_email);
        set_opt(&mut app.interview_date, changes.interview_date);
        set(&mut app.status, changes.status);
        set_opt(&mut app.notes, changes.notes);
        Ok(Some(app.clone()))
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let mut table = self.0.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|a| a.id != id);
        Ok((before - table.rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryResources(Mutex<Table<Resource>>);

#[async_trait]
impl ResourceRepo for MemoryResources {
    async fn insert(&self, new: NewResource) -> Result<Resource, StoreError> {
        let mut table = self.0.lock().unwrap();
        let resource = Resource {
            id: table.next_id(),
            resource_name: new.resource_name,
            resource_url: new.resource_url,
            kind: new.kind,
            notes: new.notes,
            user_id: new.user_id,
        };
        table.rows.push(resource.clone());
        Ok(resource)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Resource>, StoreError> {
        Ok(self.0.lock().unwrap().rows.iter().find(|r| r.id == id).cloned())
    }

    async fn get_by_owner(&self, user_id: i32) -> Result<Vec<Resource>, StoreError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let mut table = self.0.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|r| r.id != id);
        Ok((before - table.rows.len()) as u64)
    }
}

/// Inserts a user hashed at bcrypt's minimum cost.
pub async fn seed_user(state: &AppState, user_name: &str, password: &str) -> User {
    state
        .users
        .insert(NewUser {
            full_name: format!("{user_name} full name"),
            user_name: user_name.into(),
            password_hash: bcrypt::hash(password, 4).unwrap(),
        })
        .await
        .unwrap()
}

pub fn bearer(state: &AppState, user: &User) -> String {
    format!("Bearer {}", state.jwt.issue(&user.user_name, user.id).unwrap())
}

pub fn test_app(state: &AppState) -> Router {
    crate::app::build_app(state.clone())
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, json) = send_raw(app, method, uri, auth, body).await;
    (status, json)
}

pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, headers, json)
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    auth: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    send(app, Method::POST, uri, auth, Some(body)).await
}

pub async fn get(app: &Router, uri: &str, auth: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, auth, None).await
}
