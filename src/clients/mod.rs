pub mod greptile_client;

pub use greptile_client::GreptileClient;

use crate::error::RemoteServiceError;
use crate::models::{IndexingStatus, RepositoryRef};
use async_trait::async_trait;

/// 代码索引服务的远程接口
///
/// 就绪检查和批量查询都只依赖这个 trait
#[async_trait]
pub trait CodeIndexApi: Send + Sync {
    /// 查询仓库当前的索引状态
    async fn fetch_status(&self, repo: &RepositoryRef)
        -> Result<IndexingStatus, RemoteServiceError>;

    /// 提交仓库索引请求，重复注册由服务端去重
    async fn register(&self, repo: &RepositoryRef) -> Result<(), RemoteServiceError>;

    /// 提交一条单轮对话查询，返回原始响应体
    async fn query(
        &self,
        repo: &RepositoryRef,
        question: &str,
        session_id: &str,
    ) -> Result<String, RemoteServiceError>;
}
