//! 响应解析 - 业务能力层
//!
//! 把查询接口的原始响应体解析成带类型的结果，结构错误只会降级为占位文本

use crate::error::{MalformedReason, MalformedResponseError};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// 缺少 message 字段时的占位文本
pub const MISSING_MESSAGE_PLACEHOLDER: &str = "No message found in response.";

/// 解析后的回答
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedAnswer {
    Success(String),
    Malformed(MalformedResponseError),
}

impl DecodedAnswer {
    /// 转换为可展示的文本
    pub fn into_text(self) -> String {
        match self {
            DecodedAnswer::Success(text) => text,
            DecodedAnswer::Malformed(err) => match err.reason {
                MalformedReason::MissingMessage => MISSING_MESSAGE_PLACEHOLDER.to_string(),
                reason => format!("Error extracting message: {}", reason),
            },
        }
    }
}

/// 从原始响应体中提取 message 字段
pub fn decode_answer(raw: &str) -> DecodedAnswer {
    let malformed = |reason| {
        DecodedAnswer::Malformed(MalformedResponseError {
            reason,
            raw: raw.to_string(),
        })
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => return malformed(MalformedReason::InvalidJson(e.to_string())),
    };

    let Some(object) = value.as_object() else {
        return malformed(MalformedReason::NotAnObject);
    };

    match object.get("message") {
        None | Some(Value::Null) => malformed(MalformedReason::MissingMessage),
        Some(Value::String(text)) => DecodedAnswer::Success(text.clone()),
        Some(_) => malformed(MalformedReason::MessageNotString),
    }
}

fn fenced_json_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("静态正则表达式无效")
    })
}

/// 尽力从回答文本中找出第一个 JSON 对象
///
/// 依次尝试：整段文本、```json 代码块、第一个 `{` 到最后一个 `}` 之间的内容
pub fn extract_json_payload(answer: &str) -> Option<Value> {
    let as_object = |s: &str| {
        serde_json::from_str::<Value>(s)
            .ok()
            .filter(Value::is_object)
    };

    if let Some(v) = as_object(answer.trim()) {
        return Some(v);
    }

    if let Some(v) = fenced_json_regex()
        .captures_iter(answer)
        .find_map(|caps| caps.get(1).and_then(|m| as_object(m.as_str())))
    {
        return Some(v);
    }

    let start = answer.find('{')?;
    let end = answer.rfind('}')?;
    if end <= start {
        return None;
    }
    as_object(&answer[start..=end])
}
