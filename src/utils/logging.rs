/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::models::BatchReport;
use std::fs;
use std::io;
use tracing::info;

/// 初始化报告文件
///
/// # 参数
/// - `report_file_path`: 报告文件路径
/// - `repository`: 仓库描述
pub fn init_report_file(report_file_path: &str, repository: &str) -> io::Result<()> {
    let header = format!(
        "{}\n代码健康报告 - {}\n仓库: {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        repository,
        "=".repeat(60)
    );
    fs::write(report_file_path, header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `repository`: 仓库描述
/// - `total_queries`: 查询数量
pub fn log_startup(repository: &str, total_queries: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 代码健康检查");
    info!("📦 目标仓库: {}", repository);
    info!("📋 查询数量: {}", total_queries);
    info!("{}", "=".repeat(60));
}

/// 记录单条查询开始
pub fn log_query_start(index: usize, total: usize, key: &str) {
    info!("🔍 [{}/{}] 正在查询: {}", index, total, key);
}

/// 记录单条查询完成
pub fn log_query_done(key: &str, text: &str) {
    info!("✓ {} 查询结果: {}", key, truncate_text(text, 120));
}

/// 打印最终统计信息，列出失败的查询
pub fn print_final_stats(report: &BatchReport, report_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部查询完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.succeeded(), report.len());
    info!("❌ 失败: {}", failed_summary(report));
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", report_file_path);
}

/// 失败数量及对应的查询 key，如 `2 (bugs, coverage)`
pub fn failed_summary(report: &BatchReport) -> String {
    let failed: Vec<&str> = report
        .iter()
        .filter(|r| r.is_failed())
        .map(|r| r.key.as_str())
        .collect();
    if failed.is_empty() {
        "0".to_string()
    } else {
        format!("{} ({})", failed.len(), failed.join(", "))
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
