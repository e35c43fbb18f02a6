use serde::Deserialize;

/// 一条分析查询
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisQuerySpec {
    /// 唯一标识
    pub key: String,
    /// 自然语言问题
    pub description: String,
}

impl AnalysisQuerySpec {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// 单条查询的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// 提取到的回答（可能是占位文本）
    Answer(String),
    /// 提交失败的错误描述
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub key: String,
    pub outcome: QueryOutcome,
}

impl QueryResult {
    pub fn answer(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            outcome: QueryOutcome::Answer(text.into()),
        }
    }

    pub fn failed(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            outcome: QueryOutcome::Failed(description.into()),
        }
    }

    /// 回答文本或错误描述
    pub fn text(&self) -> &str {
        match &self.outcome {
            QueryOutcome::Answer(text) | QueryOutcome::Failed(text) => text,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, QueryOutcome::Failed(_))
    }
}

/// 一次批量查询的全部结果，保持输入顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    results: Vec<QueryResult>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: QueryResult) {
        self.results.push(result);
    }

    pub fn get(&self, key: &str) -> Option<&QueryResult> {
        self.results.iter().find(|r| r.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| !r.is_failed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }
}

impl<'a> IntoIterator for &'a BatchReport {
    type Item = &'a QueryResult;
    type IntoIter = std::slice::Iter<'a, QueryResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
