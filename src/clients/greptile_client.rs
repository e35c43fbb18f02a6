/// 代码索引服务 HTTP 客户端
///
/// 封装所有与远程索引服务相关的调用逻辑
use crate::clients::CodeIndexApi;
use crate::config::Config;
use crate::error::RemoteServiceError;
use crate::models::{IndexingStatus, RepositoryRef};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// 查询消息的固定ID
const QUERY_MESSAGE_ID: &str = "health-query";

const GITHUB_TOKEN_HEADER: &str = "x-github-token";

/// 状态接口响应
#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
}

pub struct GreptileClient {
    client: Client,
    base_url: String,
    /// 每个请求都携带的鉴权头
    headers: HeaderMap,
}

impl GreptileClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, RemoteServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RemoteServiceError::request_failed("client", e))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            headers: Self::build_auth_headers(&config.api_key, &config.github_token)?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 构建鉴权头，凭据不是合法请求头时直接报错，不会发出缺少凭据的请求
    fn build_auth_headers(
        api_key: &str,
        github_token: &str,
    ) -> Result<HeaderMap, RemoteServiceError> {
        let invalid = |header: &str| RemoteServiceError::InvalidHeader {
            header: header.to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| invalid("authorization"))?,
        );
        headers.insert(
            GITHUB_TOKEN_HEADER,
            HeaderValue::from_str(github_token).map_err(|_| invalid(GITHUB_TOKEN_HEADER))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// 发送请求并返回响应体文本，非 2xx 视为错误
    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<String, RemoteServiceError> {
        let response = request
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| RemoteServiceError::request_failed(endpoint, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteServiceError::request_failed(endpoint, e))?;

        if !status.is_success() {
            return Err(RemoteServiceError::bad_status(endpoint, status.as_u16(), body));
        }

        debug!("{} -> {} ({} 字节)", endpoint, status, body.len());
        Ok(body)
    }

    /// 构建查询请求体
    fn build_query_body(repo: &RepositoryRef, question: &str, session_id: &str) -> Value {
        json!({
            "messages": [
                {
                    "id": QUERY_MESSAGE_ID,
                    "content": question,
                    "role": "user"
                }
            ],
            "repositories": [repo],
            "sessionId": session_id
        })
    }
}

#[async_trait]
impl CodeIndexApi for GreptileClient {
    async fn fetch_status(
        &self,
        repo: &RepositoryRef,
    ) -> Result<IndexingStatus, RemoteServiceError> {
        let endpoint = self.endpoint(&format!("repositories/{}", repo.repo_id()));
        let result = self.send(&endpoint, self.client.get(&endpoint)).await;
        status_from_response(&endpoint, result)
    }

    async fn register(&self, repo: &RepositoryRef) -> Result<(), RemoteServiceError> {
        let endpoint = self.endpoint("repositories");
        let body = self
            .send(&endpoint, self.client.post(&endpoint).json(repo))
            .await?;
        debug!("注册仓库结果: {}", body);
        Ok(())
    }

    async fn query(
        &self,
        repo: &RepositoryRef,
        question: &str,
        session_id: &str,
    ) -> Result<String, RemoteServiceError> {
        let endpoint = self.endpoint("query");
        let payload = Self::build_query_body(repo, question, session_id);
        debug!("查询 Payload: {}", payload);
        self.send(&endpoint, self.client.post(&endpoint).json(&payload))
            .await
    }
}

/// 解析状态接口的结果
///
/// 404 表示仓库还没注册过，按 `Absent` 处理以便走注册流程；其他非 2xx 仍是错误
fn status_from_response(
    endpoint: &str,
    result: Result<String, RemoteServiceError>,
) -> Result<IndexingStatus, RemoteServiceError> {
    let body = match result {
        Ok(body) => body,
        Err(RemoteServiceError::BadStatus { status: 404, .. }) => {
            debug!("{} 返回 404，仓库尚未注册", endpoint);
            return Ok(IndexingStatus::Absent);
        }
        Err(e) => return Err(e),
    };

    let parsed: StatusResponse =
        serde_json::from_str(&body).map_err(|source| RemoteServiceError::InvalidBody {
            endpoint: endpoint.to_string(),
            source,
        })?;

    Ok(IndexingStatus::parse(parsed.status.as_deref()))
}
