//! 应用入口 - 编排层
//!
//! 负责加载查询、组装客户端/就绪检查/执行器，并输出最终报告

use crate::clients::{CodeIndexApi, GreptileClient};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    default_query_specs, load_query_specs, AnalysisQuerySpec, BatchReport, RepositoryRef,
};
use crate::orchestrator::QueryBatchExecutor;
use crate::services::{analyze, HealthReport, PollPolicy, ReadinessMonitor};
use crate::utils::logging::{init_report_file, log_startup, print_final_stats};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 应用主结构
pub struct App {
    config: Config,
    repo: RepositoryRef,
    specs: Vec<AnalysisQuerySpec>,
    executor: QueryBatchExecutor,
}

impl App {
    /// 初始化应用，配置错误在任何远程调用之前返回
    pub async fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        let client = GreptileClient::new(&config)?;
        Self::with_api(config, Arc::new(client)).await
    }

    /// 使用指定的远程接口初始化
    pub async fn with_api(config: Config, api: Arc<dyn CodeIndexApi>) -> AppResult<Self> {
        config.validate()?;

        let specs = load_specs(&config).await?;
        let repo = RepositoryRef::from_config(&config);

        let monitor = ReadinessMonitor::new(api.clone(), PollPolicy::from_config(&config));
        let executor = QueryBatchExecutor::new(api, monitor, config.session_id.clone());

        Ok(Self {
            config,
            repo,
            specs,
            executor,
        })
    }

    /// 运行整批查询并写出报告
    pub async fn run(&self) -> AppResult<BatchReport> {
        log_startup(&self.repo.to_string(), self.specs.len());

        let report = self.executor.run(&self.specs, &self.repo).await?;
        let health = analyze(&report);

        self.write_report(&report, &health)?;

        print_final_stats(&report, &self.config.output_report_file);

        Ok(report)
    }

    fn write_report(&self, report: &BatchReport, health: &HealthReport) -> AppResult<()> {
        let path = &self.config.output_report_file;
        let file_error = |source| AppError::File {
            path: path.clone(),
            source,
        };

        init_report_file(path, &self.repo.to_string()).map_err(file_error)?;

        let mut content = String::from("Codebase Health Report:\n");
        info!("\n📋 代码健康评估:");
        for (metric, rating) in &health.entries {
            info!("{}: {}", metric, rating);
            content.push_str(&format!("{}: {}\n", metric, rating));
        }

        content.push_str("\nRaw Data:\n");
        for result in report {
            let marker = if result.is_failed() { " [FAILED]" } else { "" };
            content.push_str(&format!("{}{}: {}\n", result.key, marker, result.text()));
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(file_error)?;
        file.write_all(content.as_bytes()).map_err(file_error)?;

        Ok(())
    }
}

/// 加载查询列表，未配置文件时使用内置查询
async fn load_specs(config: &Config) -> AppResult<Vec<AnalysisQuerySpec>> {
    match &config.queries_file {
        Some(path) => Ok(load_query_specs(Path::new(path)).await?),
        None => {
            info!("未配置查询文件，使用内置查询");
            Ok(default_query_specs())
        }
    }
}
