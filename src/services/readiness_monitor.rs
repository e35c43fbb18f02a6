//! 索引就绪检查 - 业务能力层
//!
//! 只负责"确认仓库已完成索引"，在此之前不会发送任何分析查询
//!
//! 流程：
//! 1. 查询状态，已完成则直接返回
//! 2. 否则提交一次注册请求
//! 3. 按固定间隔轮询状态，直到 completed 或超过最大次数

use crate::clients::CodeIndexApi;
use crate::config::Config;
use crate::error::ReadinessError;
use crate::models::{IndexingStatus, RepositoryRef};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 轮询策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// 两次轮询之间的等待时间
    pub interval: Duration,
    /// 最大轮询次数，None 表示不限
    pub max_attempts: Option<u32>,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let max_attempts = match config.max_poll_attempts {
            0 => None,
            n => Some(n),
        };
        Self::new(Duration::from_secs(config.poll_interval_secs), max_attempts)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), Some(60))
    }
}

/// 就绪检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessOutcome {
    /// 首次查询即为 completed
    AlreadyIndexed,
    /// 注册后经过 `polls` 次轮询完成
    Indexed { polls: u32 },
}

pub struct ReadinessMonitor {
    api: Arc<dyn CodeIndexApi>,
    policy: PollPolicy,
}

impl ReadinessMonitor {
    pub fn new(api: Arc<dyn CodeIndexApi>, policy: PollPolicy) -> Self {
        Self { api, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// 确保仓库可查询
    ///
    /// 仓库仍在索引中不算错误；只有状态查询/注册请求本身失败，
    /// 或超过最大轮询次数时才返回错误
    pub async fn ensure_ready(
        &self,
        repo: &RepositoryRef,
    ) -> Result<ReadinessOutcome, ReadinessError> {
        let status = self.api.fetch_status(repo).await?;
        if status.is_completed() {
            info!("✓ 仓库 {} 已完成索引", repo);
            return Ok(ReadinessOutcome::AlreadyIndexed);
        }

        info!("📥 仓库 {} 当前状态: {}，提交索引请求...", repo, status);
        self.api.register(repo).await?;

        let mut polls: u32 = 0;
        let mut last_status = status;
        loop {
            if let Some(max) = self.policy.max_attempts {
                if polls >= max {
                    warn!("⚠️ 仓库 {} 轮询 {} 次后仍未完成索引", repo, polls);
                    return Err(ReadinessError::TimedOut {
                        attempts: polls,
                        last_status: last_status.to_string(),
                    });
                }
            }

            tokio::time::sleep(self.policy.interval).await;
            last_status = self.api.fetch_status(repo).await?;
            polls += 1;

            match &last_status {
                IndexingStatus::Completed => {
                    info!("✓ 索引完成 (轮询 {} 次)，仓库可以查询", polls);
                    return Ok(ReadinessOutcome::Indexed { polls });
                }
                // 服务端可能会重试，继续等待
                IndexingStatus::Failed => {
                    warn!("索引状态: {} (第 {} 次轮询)", last_status, polls)
                }
                other => info!("⏳ 索引状态: {} (第 {} 次轮询)", other, polls),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteServiceError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 按顺序返回预设状态的假服务
    #[derive(Default)]
    struct ScriptedStatus {
        statuses: Mutex<VecDeque<Result<IndexingStatus, RemoteServiceError>>>,
        fetches: Mutex<u32>,
        registrations: Mutex<u32>,
    }

    impl ScriptedStatus {
        fn with(statuses: &[&str]) -> Arc<Self> {
            let queue = statuses
                .iter()
                .map(|s| Ok(IndexingStatus::parse(Some(s))))
                .collect();
            Arc::new(Self {
                statuses: Mutex::new(queue),
                ..Default::default()
            })
        }

        fn fetches(&self) -> u32 {
            *self.fetches.lock().unwrap()
        }

        fn registrations(&self) -> u32 {
            *self.registrations.lock().unwrap()
        }
    }

    #[async_trait]
    impl CodeIndexApi for ScriptedStatus {
        async fn fetch_status(
            &self,
            _repo: &RepositoryRef,
        ) -> Result<IndexingStatus, RemoteServiceError> {
            *self.fetches.lock().unwrap() += 1;
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(IndexingStatus::Processing))
        }

        async fn register(&self, _repo: &RepositoryRef) -> Result<(), RemoteServiceError> {
            *self.registrations.lock().unwrap() += 1;
            Ok(())
        }

        async fn query(
            &self,
            _repo: &RepositoryRef,
            _question: &str,
            _session_id: &str,
        ) -> Result<String, RemoteServiceError> {
            unreachable!("就绪检查不应发送查询")
        }
    }

    fn repo() -> RepositoryRef {
        RepositoryRef::new("github", "owner/repo", "main")
    }

    fn fast_policy(max_attempts: Option<u32>) -> PollPolicy {
        PollPolicy::new(Duration::ZERO, max_attempts)
    }

    #[tokio::test]
    async fn test_already_completed_is_fast_path() {
        let api = ScriptedStatus::with(&["completed"]);
        let monitor = ReadinessMonitor::new(api.clone(), fast_policy(None));

        let outcome = monitor.ensure_ready(&repo()).await.unwrap();

        assert_eq!(outcome, ReadinessOutcome::AlreadyIndexed);
        assert_eq!(api.fetches(), 1);
        assert_eq!(api.registrations(), 0);
    }

    #[tokio::test]
    async fn test_processing_then_completed() {
        let api = ScriptedStatus::with(&["processing", "processing", "completed"]);
        let monitor = ReadinessMonitor::new(api.clone(), fast_policy(None));

        let outcome = monitor.ensure_ready(&repo()).await.unwrap();

        assert_eq!(outcome, ReadinessOutcome::Indexed { polls: 2 });
        assert_eq!(api.fetches(), 3);
        assert_eq!(api.registrations(), 1);
    }

    #[tokio::test]
    async fn test_submitted_processing_completed() {
        let api = ScriptedStatus::with(&["submitted", "processing", "completed"]);
        let monitor = ReadinessMonitor::new(api.clone(), fast_policy(Some(10)));

        let outcome = monitor.ensure_ready(&repo()).await.unwrap();

        assert_eq!(outcome, ReadinessOutcome::Indexed { polls: 2 });
        assert_eq!(api.fetches(), 3);
    }

    #[tokio::test]
    async fn test_failed_status_keeps_polling() {
        let api = ScriptedStatus::with(&["failed", "failed", "completed"]);
        let monitor = ReadinessMonitor::new(api.clone(), fast_policy(None));

        assert!(monitor.ensure_ready(&repo()).await.is_ok());
        assert_eq!(api.fetches(), 3);
    }

    #[tokio::test]
    async fn test_times_out_after_max_attempts() {
        let api = ScriptedStatus::with(&["submitted"]);
        let monitor = ReadinessMonitor::new(api.clone(), fast_policy(Some(3)));

        let err = monitor.ensure_ready(&repo()).await.unwrap_err();

        match err {
            ReadinessError::TimedOut {
                attempts,
                last_status,
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(last_status, "processing");
            }
            other => panic!("期望 TimedOut, 实际: {:?}", other),
        }
        assert_eq!(api.fetches(), 4);
        assert_eq!(api.registrations(), 1);
    }

    #[tokio::test]
    async fn test_status_transport_error_is_fatal() {
        let api = Arc::new(ScriptedStatus::default());
        api.statuses
            .lock()
            .unwrap()
            .push_back(Err(RemoteServiceError::bad_status("repositories", 401, "unauthorized")));
        let monitor = ReadinessMonitor::new(api.clone(), fast_policy(None));

        let err = monitor.ensure_ready(&repo()).await.unwrap_err();

        assert!(matches!(err, ReadinessError::Remote(_)));
        assert_eq!(api.registrations(), 0);
    }

    #[test]
    fn test_policy_from_config() {
        let config = Config {
            poll_interval_secs: 5,
            max_poll_attempts: 0,
            ..Config::default()
        };
        let policy = PollPolicy::from_config(&config);
        assert_eq!(policy.interval, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, None);
    }
}
