//! 用户数据提供方 - 业务能力层
//!
//! 用户、凭据、求职偏好、预置问答由外部系统维护，这里只负责取回并折叠成 `UserProfile`

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::error::ProviderError;
use crate::models::loaders::{load_profile_toml, profile_path};
use crate::models::profile::{ProfileRow, UserProfile};

#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn fetch_session_config(&self, user_id: u64) -> Result<UserProfile, ProviderError>;
}

/// 通过 HTTP 接口 `GET {base}/user/{id}/data` 获取
pub struct HttpProfileProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProfileProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ProfileProvider for HttpProfileProvider {
    async fn fetch_session_config(&self, user_id: u64) -> Result<UserProfile, ProviderError> {
        let endpoint = format!("{}/user/{}/data", self.base_url, user_id);
        debug!("请求用户数据: {}", endpoint);

        let response =
            self.client
                .get(&endpoint)
                .send()
                .await
                .map_err(|e| ProviderError::RequestFailed {
                    endpoint: endpoint.clone(),
                    message: e.to_string(),
                })?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ProviderError::UserNotFound { user_id }),
            status if !status.is_success() => {
                return Err(ProviderError::BadResponse {
                    endpoint,
                    status: status.as_u16(),
                })
            }
            _ => {}
        }

        let rows: Vec<ProfileRow> =
            response
                .json()
                .await
                .map_err(|e| ProviderError::ParseFailed {
                    source_name: endpoint.clone(),
                    message: e.to_string(),
                })?;

        let row_count = rows.len();
        let profile =
            UserProfile::from_rows(rows).ok_or(ProviderError::UserNotFound { user_id })?;

        info!(
            "✓ 已获取用户 {} 的资料 ({} 行, 预置问答 {} 条)",
            user_id,
            row_count,
            profile.screening_answers.len()
        );
        Ok(profile)
    }
}

/// 从本地目录读取 `<folder>/<user_id>.toml`
pub struct TomlProfileProvider {
    folder: String,
}

impl TomlProfileProvider {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
        }
    }
}

#[async_trait]
impl ProfileProvider for TomlProfileProvider {
    async fn fetch_session_config(&self, user_id: u64) -> Result<UserProfile, ProviderError> {
        let path = profile_path(&self.folder, user_id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(ProviderError::UserNotFound { user_id });
        }
        load_profile_toml(&path).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_rows_are_folded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/1/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "email": "dev@example.com", "password": "secret", "phone": "5550100",
                    "job_title": "Rust Engineer", "question": "Years of Rust?", "answer": "4"
                },
                {
                    "email": "dev@example.com", "password": "secret", "phone": "5550100",
                    "job_title": "Rust Engineer", "question": null, "answer": null
                }
            ])))
            .mount(&server)
            .await;

        let provider = HttpProfileProvider::new(format!("{}/", server.uri()));
        let profile = provider.fetch_session_config(1).await.unwrap();

        assert_eq!(profile.email, "dev@example.com");
        assert_eq!(profile.screening_answers.len(), 1);
    }

    #[tokio::test]
    async fn http_404_means_unknown_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/9/data"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = HttpProfileProvider::new(server.uri());
        let err = provider.fetch_session_config(9).await.unwrap_err();
        assert!(matches!(err, ProviderError::UserNotFound { user_id: 9 }));
    }

    #[tokio::test]
    async fn http_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = HttpProfileProvider::new(server.uri());
        let err = provider.fetch_session_config(1).await.unwrap_err();
        assert!(matches!(err, ProviderError::BadResponse { status: 500, .. }));
    }

    #[tokio::test]
    async fn toml_provider_reads_user_file() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(
            dir.path().join("3.toml"),
            "email = \"a@b.c\"\npassword = \"pw\"\njob_title = \"Dev\"\n",
        )
        .await
        .unwrap();

        let provider = TomlProfileProvider::new(dir.path().to_str().unwrap());
        assert_eq!(provider.fetch_session_config(3).await.unwrap().job_title, "Dev");
        assert!(matches!(
            provider.fetch_session_config(4).await.unwrap_err(),
            ProviderError::UserNotFound { user_id: 4 }
        ));
    }
}
