//! 批量查询执行器 - 编排层
//!
//! ## 职责
//!
//! 1. **就绪检查**：执行任何查询之前调用一次 `ensure_ready`，失败则整批失败
//! 2. **顺序查询**：按输入顺序逐条提交，整批共用同一个会话ID
//! 3. **失败隔离**：单条查询失败只记录到该条结果，不影响后续查询
//!
//! 没有并发，也没有单条查询的重试

use crate::clients::CodeIndexApi;
use crate::error::ReadinessError;
use crate::models::{AnalysisQuerySpec, BatchReport, QueryResult, RepositoryRef};
use crate::services::response_decoder::{decode_answer, DecodedAnswer};
use crate::services::ReadinessMonitor;
use crate::utils::logging::{log_query_done, log_query_start};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct QueryBatchExecutor {
    api: Arc<dyn CodeIndexApi>,
    monitor: ReadinessMonitor,
    session_id: String,
}

impl QueryBatchExecutor {
    pub fn new(
        api: Arc<dyn CodeIndexApi>,
        monitor: ReadinessMonitor,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            monitor,
            session_id: session_id.into(),
        }
    }

    /// 执行整批查询
    ///
    /// 只有就绪检查失败时返回错误；结果与输入一一对应并保持顺序
    pub async fn run(
        &self,
        specs: &[AnalysisQuerySpec],
        repo: &RepositoryRef,
    ) -> Result<BatchReport, ReadinessError> {
        self.monitor.ensure_ready(repo).await?;

        info!("开始查询代码库数据，共 {} 条", specs.len());

        let mut report = BatchReport::new();
        for (index, spec) in specs.iter().enumerate() {
            log_query_start(index + 1, specs.len(), &spec.key);
            let result = self.run_one(spec, repo).await;
            report.push(result);
        }

        Ok(report)
    }

    /// 执行单条查询，所有错误都转换为结果
    async fn run_one(&self, spec: &AnalysisQuerySpec, repo: &RepositoryRef) -> QueryResult {
        let raw = match self
            .api
            .query(repo, &spec.description, &self.session_id)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                error!("❌ {} 查询失败: {}", spec.key, e);
                return QueryResult::failed(&spec.key, e.to_string());
            }
        };

        let decoded = decode_answer(&raw);
        if let DecodedAnswer::Malformed(err) = &decoded {
            warn!("⚠️ {} 响应结构异常: {}", spec.key, err);
        }

        let text = decoded.into_text();
        log_query_done(&spec.key, &text);
        QueryResult::answer(&spec.key, text)
    }
}
