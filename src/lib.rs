//! # Repo Health Monitor
//!
//! 通过远程代码索引服务对仓库做健康检查的 Rust 应用程序
//!
//! ## 架构设计
//!
//! ### ① 远程接口层（Clients）
//! - `clients/` - `CodeIndexApi` trait 及其 HTTP 实现 `GreptileClient`
//!
//! ### ② 业务能力层（Services）
//! - `ReadinessMonitor` - 确认仓库已完成索引（带上限的轮询）
//! - `response_decoder` - 把响应体解析为带类型的回答
//! - `health_analyzer` - 根据回答给出健康评级
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_executor` - 顺序执行整批查询，单条失败隔离
//! - `orchestrator/app` - 应用入口，组装各组件并输出报告
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{CodeIndexApi, GreptileClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnalysisQuerySpec, BatchReport, IndexingStatus, QueryOutcome, QueryResult, RepositoryRef};
pub use orchestrator::{App, QueryBatchExecutor};
pub use services::{PollPolicy, ReadinessMonitor, ReadinessOutcome};
