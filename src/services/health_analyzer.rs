//! 健康度评估 - 业务能力层
//!
//! 从查询回答中读取数值并给出评级，任何缺失或无法解析的值都只会得到 `UnableToDetermine`

use crate::models::BatchReport;
use crate::services::response_decoder::extract_json_payload;
use serde_json::Value;
use std::fmt::Display;

/// 健康评级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthRating {
    Excellent,
    Good,
    Moderate,
    Poor,
    High,
    UnableToDetermine,
}

impl Display for HealthRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            HealthRating::Excellent => "Excellent",
            HealthRating::Good => "Good",
            HealthRating::Moderate => "Moderate",
            HealthRating::Poor => "Poor",
            HealthRating::High => "High",
            HealthRating::UnableToDetermine => "Unable to determine",
        };
        write!(f, "{}", label)
    }
}

/// 健康报告，保持指标顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    pub entries: Vec<(String, HealthRating)>,
}

impl HealthReport {
    pub fn get(&self, metric: &str) -> Option<HealthRating> {
        self.entries
            .iter()
            .find(|(name, _)| name == metric)
            .map(|(_, rating)| *rating)
    }
}

/// 根据批量查询结果评估健康度
pub fn analyze(report: &BatchReport) -> HealthReport {
    let complexity = payload_of(report, "complexity_hotspots");

    let average_complexity = complexity
        .as_ref()
        .and_then(|v| number_field(v, "average_complexity"))
        .map(rate_average_complexity)
        .unwrap_or(HealthRating::UnableToDetermine);

    let high_complexity = complexity
        .as_ref()
        .and_then(|v| count_field(v, "count"))
        .map(rate_count)
        .unwrap_or(HealthRating::UnableToDetermine);

    let outdated_dependencies = payload_of(report, "outdated_dependencies")
        .and_then(|v| count_field(&v, "outdated_dependencies"))
        .map(rate_count)
        .unwrap_or(HealthRating::UnableToDetermine);

    HealthReport {
        entries: vec![
            ("complexity".to_string(), average_complexity),
            ("high_complexity".to_string(), high_complexity),
            ("outdated_dependencies".to_string(), outdated_dependencies),
        ],
    }
}

/// 平均复杂度评级
fn rate_average_complexity(avg: f64) -> HealthRating {
    if avg < 5.0 {
        HealthRating::Good
    } else if avg < 10.0 {
        HealthRating::Moderate
    } else {
        HealthRating::High
    }
}

/// 计数类指标评级
fn rate_count(count: u64) -> HealthRating {
    match count {
        0 => HealthRating::Excellent,
        1..=4 => HealthRating::Good,
        5..=9 => HealthRating::Moderate,
        _ => HealthRating::Poor,
    }
}

/// 失败的查询没有可用数据
fn payload_of(report: &BatchReport, key: &str) -> Option<Value> {
    report
        .get(key)
        .filter(|r| !r.is_failed())
        .and_then(|r| extract_json_payload(r.text()))
}

/// 数值字段，兼容数字和数字字符串
fn number_field(value: &Value, field: &str) -> Option<f64> {
    match value.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn count_field(value: &Value, field: &str) -> Option<u64> {
    let n = number_field(value, field)?;
    (n >= 0.0 && n.fract() == 0.0).then_some(n as u64)
}
