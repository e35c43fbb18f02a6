use crate::error::ConfigError;
use crate::models::query::AnalysisQuerySpec;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

/// 查询文件结构
///
/// ```toml
/// [[queries]]
/// key = "bugs"
/// description = "Identify any bugs in the codebase."
/// ```
#[derive(Debug, Deserialize)]
struct QueryFile {
    #[serde(default)]
    queries: Vec<AnalysisQuerySpec>,
}

/// 从 TOML 文件加载查询列表，保持文件中的顺序
pub async fn load_query_specs(path: &Path) -> Result<Vec<AnalysisQuerySpec>, ConfigError> {
    let path_str = path.display().to_string();

    if !path.exists() {
        return Err(ConfigError::QueriesFileNotFound { path: path_str });
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::QueriesFileUnreadable {
            path: path_str.clone(),
            source,
        })?;

    let specs = parse_query_specs(&content, &path_str)?;
    tracing::info!("从 {} 加载了 {} 条查询", path_str, specs.len());
    Ok(specs)
}

fn parse_query_specs(content: &str, path: &str) -> Result<Vec<AnalysisQuerySpec>, ConfigError> {
    let file: QueryFile =
        toml::from_str(content).map_err(|source| ConfigError::QueriesFileParseFailed {
            path: path.to_string(),
            source,
        })?;

    if file.queries.is_empty() {
        return Err(ConfigError::EmptyQuerySet {
            path: path.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for spec in &file.queries {
        if !seen.insert(spec.key.as_str()) {
            return Err(ConfigError::DuplicateQueryKey {
                key: spec.key.clone(),
            });
        }
    }

    Ok(file.queries)
}

/// 内置的健康检查查询
///
/// complexity_hotspots 额外要求返回 average_complexity，供健康评估使用
pub fn default_query_specs() -> Vec<AnalysisQuerySpec> {
    vec![
        AnalysisQuerySpec::new(
            "outdated_dependencies",
            "Count the number of outdated dependencies in this codebase. \
             Provide the count as a single integer. \
             Format your response as JSON with a single key 'outdated_dependencies'.",
        ),
        AnalysisQuerySpec::new(
            "security_vulnerabilities",
            "List any security vulnerabilities found in the codebase, including the specific files and lines where they occur. \
             Provide the details as a JSON object with keys 'vulnerabilities', 'file', 'line', and 'count'.",
        ),
        AnalysisQuerySpec::new(
            "code_smells",
            "Identify any potential code smells in the codebase, including specific files, lines, and a level of badness where they occur. \
             Provide the details as a JSON object with keys 'code_smells' and 'count'.",
        ),
        AnalysisQuerySpec::new(
            "test_coverage",
            "What percentage of the codebase is covered by tests? \
             Provide the test coverage as a single number with two decimal places. \
             Format your response as JSON with a single key 'test_coverage'.",
        ),
        AnalysisQuerySpec::new(
            "documentation_coverage",
            "What percentage of the codebase is documented? \
             Provide the documentation coverage as a single number with two decimal places. \
             Format your response as JSON with a single key 'documentation_coverage'.",
        ),
        AnalysisQuerySpec::new(
            "bugs",
            "Identify any bugs in the codebase. \
             Provide the details as a JSON object with keys 'bugs' and 'count'.",
        ),
        AnalysisQuerySpec::new(
            "technical_debt",
            "Analyze the technical debt in the codebase. \
             Provide the technical debt as a single number with two decimal places. \
             Format your response as JSON with a single key 'technical_debt'.",
        ),
        AnalysisQuerySpec::new(
            "complexity_hotspots",
            "Identify any complexity hotspots in the codebase. \
             Provide the details as a JSON object with keys 'complexity_hotspots', 'count' and 'average_complexity'.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_file_order() {
        let content = r#"
            [[queries]]
            key = "coverage"
            description = "test coverage %"

            [[queries]]
            key = "bugs"
            description = "find bugs"
        "#;
        let specs = parse_query_specs(content, "inline").unwrap();
        let keys: Vec<_> = specs.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["coverage", "bugs"]);
    }

    #[test]
    fn test_parse_rejects_duplicate_key() {
        let content = r#"
            [[queries]]
            key = "bugs"
            description = "a"

            [[queries]]
            key = "bugs"
            description = "b"
        "#;
        assert!(matches!(
            parse_query_specs(content, "inline"),
            Err(ConfigError::DuplicateQueryKey { key }) if key == "bugs"
        ));
    }

    #[test]
    fn test_parse_rejects_empty_and_invalid() {
        assert!(matches!(
            parse_query_specs("", "inline"),
            Err(ConfigError::EmptyQuerySet { .. })
        ));
        assert!(matches!(
            parse_query_specs("[[queries]]\nkey = 1", "inline"),
            Err(ConfigError::QueriesFileParseFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let path = std::env::temp_dir().join("repo_health_monitor_no_such_queries.toml");
        let result = load_query_specs(&path).await;
        assert!(matches!(result, Err(ConfigError::QueriesFileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_from_file_on_disk() {
        let path = std::env::temp_dir().join(format!(
            "repo_health_monitor_{}_loader_queries.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[[queries]]\nkey = \"bugs\"\ndescription = \"find bugs\"\n").unwrap();

        let specs = load_query_specs(&path).await.unwrap();

        assert_eq!(specs, vec![AnalysisQuerySpec::new("bugs", "find bugs")]);
    }

    #[test]
    fn test_complexity_query_asks_for_average() {
        let specs = default_query_specs();
        let complexity = specs
            .iter()
            .find(|s| s.key == "complexity_hotspots")
            .unwrap();
        // 健康评估需要 average_complexity 字段
        assert!(complexity.description.contains("'average_complexity'"));
    }

    #[test]
    fn test_default_specs_have_unique_keys() {
        let specs = default_query_specs();
        assert_eq!(specs.len(), 8);
        let keys: HashSet<_> = specs.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys.len(), specs.len());
    }
}
