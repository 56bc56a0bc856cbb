//! 通讯录 HTTP API 客户端
//!
//! 负责所有远端目录相关的 HTTP 请求

use crate::directory::contact::models::{derive_email, User};
use crate::directory::contact::types::{CreateUserReq, CreateUserResp};
use crate::directory::error::{DirectoryError, DirectoryResult};
use crate::directory::types::{handle_http_response, OPERATION_ID_HEADER};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, error, info};
use uuid::Uuid;

/// 远端目录服务
///
/// 两个操作互不排队，也不支持取消；并发调用时以最后完成的响应为准。
#[async_trait]
pub trait DirectoryRemote: Send + Sync {
    /// 拉取全部用户（保持服务器顺序）
    async fn fetch_all(&self) -> DirectoryResult<Vec<User>>;

    /// 创建用户，名称去除首尾空白后不能为空
    async fn create(&self, name: &str) -> DirectoryResult<User>;
}

/// 目录服务的 HTTP API 客户端
pub struct DirectoryApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl DirectoryApi {
    /// 创建新的目录 API 客户端
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.api_base_url)
    }

    async fn get_users(&self) -> Result<Vec<User>> {
        let operation_id = Uuid::new_v4().to_string();
        let url = self.users_url();

        info!("[DirectoryAPI] 📡 请求用户列表");
        debug!("[DirectoryAPI]   请求URL: {}, 操作ID: {}", url, operation_id);

        let response = self
            .client
            .get(&url)
            .header(OPERATION_ID_HEADER, &operation_id)
            .send()
            .await
            .context("请求失败")?;

        let mut users: Vec<User> = handle_http_response(response, "用户列表").await?;
        // 服务器未返回邮箱的用户，按名称生成
        for user in users.iter_mut().filter(|u| u.email.trim().is_empty()) {
            user.email = derive_email(&user.name);
        }

        info!("[DirectoryAPI] ✅ 用户列表响应，用户数: {}", users.len());
        Ok(users)
    }

    async fn post_user(&self, name: &str, email: &str) -> Result<CreateUserResp> {
        let operation_id = Uuid::new_v4().to_string();
        let url = self.users_url();

        info!("[DirectoryAPI] 📡 请求创建用户: {}", name);
        debug!("[DirectoryAPI]   请求URL: {}, 操作ID: {}", url, operation_id);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header(OPERATION_ID_HEADER, &operation_id)
            .json(&CreateUserReq { name, email })
            .send()
            .await
            .context("请求失败")?;

        let resp: CreateUserResp = handle_http_response(response, "创建用户").await?;

        info!("[DirectoryAPI] ✅ 创建用户响应，服务器分配ID: {}", resp.id);
        Ok(resp)
    }
}

#[async_trait]
impl DirectoryRemote for DirectoryApi {
    async fn fetch_all(&self) -> DirectoryResult<Vec<User>> {
        self.get_users().await.map_err(|e| {
            error!("[DirectoryAPI] 拉取用户列表失败: {:#}", e);
            DirectoryError::RemoteFetch(format!("{:#}", e))
        })
    }

    async fn create(&self, name: &str) -> DirectoryResult<User> {
        let name = name.trim();
        if name.is_empty() {
            debug!("[DirectoryAPI] 名称为空，拒绝创建");
            return Err(DirectoryError::Validation);
        }

        let derived = derive_email(name);
        let resp = self.post_user(name, &derived).await.map_err(|e| {
            error!("[DirectoryAPI] 创建用户失败: {:#}", e);
            DirectoryError::RemoteCreate(format!("{:#}", e))
        })?;

        Ok(User {
            id: resp.id,
            name: name.to_string(),
            email: resp.email.unwrap_or(derived),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::test_support::init_test_logger;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Stub {
        hits: Arc<AtomicUsize>,
        echo_email: bool,
        omit_email: bool,
        fail: bool,
        last_body: Arc<Mutex<Option<Value>>>,
    }

    async fn list_users(State(stub): State<Stub>) -> (StatusCode, Json<Value>) {
        stub.hits.fetch_add(1, Ordering::SeqCst);
        if stub.fail {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
        }
        if stub.omit_email {
            return (
                StatusCode::OK,
                Json(json!([
                    {"id": 3, "name": "Clementine  Bauch"},
                    {"id": 4, "name": "Dana", "email": null},
                    {"id": 5, "name": "Eve", "email": "eve@x.com"}
                ])),
            );
        }
        (
            StatusCode::OK,
            Json(json!([
                {"id": 1, "name": "Ana", "email": "ana@x.com", "phone": "555"},
                {"id": 2, "name": "Bob", "email": "bob@x.com"}
            ])),
        )
    }

    async fn create_user(
        State(stub): State<Stub>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        stub.hits.fetch_add(1, Ordering::SeqCst);
        if stub.fail {
            return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})));
        }
        *stub.last_body.lock().unwrap() = Some(body.clone());
        let resp = if stub.echo_email {
            json!({"id": 11, "name": body["name"], "email": "server@example.org"})
        } else {
            json!({"id": 11})
        };
        (StatusCode::CREATED, Json(resp))
    }

    async fn spawn_stub(stub: Stub) -> String {
        let app = Router::new()
            .route("/users", get(list_users).post(create_user))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn api(base: String) -> DirectoryApi {
        DirectoryApi::new(reqwest::Client::new(), base)
    }

    #[tokio::test]
    async fn fetch_all_keeps_server_order() {
        init_test_logger();
        let base = spawn_stub(Stub::default()).await;

        let users = api(base).fetch_all().await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Ana");
        assert_eq!(users[1].id, 2);
    }

    #[tokio::test]
    async fn fetch_all_derives_missing_email_from_name() {
        init_test_logger();
        let stub = Stub {
            omit_email: true,
            ..Stub::default()
        };
        let base = spawn_stub(stub).await;

        let users = api(base).fetch_all().await.unwrap();

        let emails: Vec<_> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(
            emails,
            vec!["clementine.bauch@example.com", "dana@example.com", "eve@x.com"]
        );
    }

    #[tokio::test]
    async fn fetch_all_maps_http_failure() {
        init_test_logger();
        let stub = Stub {
            fail: true,
            ..Stub::default()
        };
        let base = spawn_stub(stub).await;

        let err = api(base).fetch_all().await.unwrap_err();
        assert!(matches!(err, DirectoryError::RemoteFetch(_)));
    }

    #[tokio::test]
    async fn fetch_all_maps_transport_failure() {
        init_test_logger();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = api(format!("http://{}", addr)).fetch_all().await.unwrap_err();
        assert!(matches!(err, DirectoryError::RemoteFetch(_)));
    }

    #[tokio::test]
    async fn create_sends_derived_email_and_falls_back_to_it() {
        init_test_logger();
        let stub = Stub::default();
        let base = spawn_stub(stub.clone()).await;

        let user = api(base).create("  Bob Lee ").await.unwrap();

        assert_eq!(
            user,
            User {
                id: 11,
                name: "Bob Lee".to_string(),
                email: "bob.lee@example.com".to_string(),
            }
        );
        let body = stub.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(body, json!({"name": "Bob Lee", "email": "bob.lee@example.com"}));
    }

    #[tokio::test]
    async fn create_prefers_server_email() {
        init_test_logger();
        let stub = Stub {
            echo_email: true,
            ..Stub::default()
        };
        let base = spawn_stub(stub).await;

        let user = api(base).create("Bob Lee").await.unwrap();
        assert_eq!(user.email, "server@example.org");
    }

    #[tokio::test]
    async fn create_rejects_blank_name_without_request() {
        init_test_logger();
        let stub = Stub::default();
        let base = spawn_stub(stub.clone()).await;
        let api = api(base);

        for name in ["", "   ", "\t\n"] {
            assert_eq!(api.create(name).await, Err(DirectoryError::Validation));
        }
        assert_eq!(stub.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_maps_http_failure() {
        init_test_logger();
        let stub = Stub {
            fail: true,
            ..Stub::default()
        };
        let base = spawn_stub(stub).await;

        let err = api(base).create("Bob").await.unwrap_err();
        assert!(matches!(err, DirectoryError::RemoteCreate(_)));
    }
}
