use std::fmt::Display;

/// 仓库索引状态
///
/// 每次轮询都重新获取，不做缓存
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexingStatus {
    Submitted,
    Processing,
    Completed,
    Failed,
    /// 服务返回了未知的状态值
    Unknown(String),
    /// 响应中没有 status 字段
    Absent,
}

impl IndexingStatus {
    /// 从服务返回的 status 字段解析
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => IndexingStatus::Absent,
            Some(s) => match s.to_ascii_lowercase().as_str() {
                "submitted" => IndexingStatus::Submitted,
                "processing" => IndexingStatus::Processing,
                "completed" => IndexingStatus::Completed,
                "failed" => IndexingStatus::Failed,
                _ => IndexingStatus::Unknown(s.to_string()),
            },
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, IndexingStatus::Completed)
    }
}

impl Display for IndexingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexingStatus::Submitted => write!(f, "submitted"),
            IndexingStatus::Processing => write!(f, "processing"),
            IndexingStatus::Completed => write!(f, "completed"),
            IndexingStatus::Failed => write!(f, "failed"),
            IndexingStatus::Unknown(s) => write!(f, "{}", s),
            IndexingStatus::Absent => write!(f, "<none>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!(IndexingStatus::parse(Some("completed")), IndexingStatus::Completed);
        assert_eq!(IndexingStatus::parse(Some("PROCESSING")), IndexingStatus::Processing);
        assert_eq!(IndexingStatus::parse(Some("submitted")), IndexingStatus::Submitted);
        assert_eq!(IndexingStatus::parse(Some("failed")), IndexingStatus::Failed);
    }

    #[test]
    fn test_parse_absent_and_unknown() {
        assert_eq!(IndexingStatus::parse(None), IndexingStatus::Absent);
        assert_eq!(
            IndexingStatus::parse(Some("cloning")),
            IndexingStatus::Unknown("cloning".to_string())
        );
        assert!(!IndexingStatus::parse(Some("cloning")).is_completed());
    }
}
