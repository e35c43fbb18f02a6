use crate::config::Config;
use serde::Serialize;
use std::fmt::Display;

/// 目标仓库
///
/// 由配置构造一次，之后不可变。序列化结果即为注册接口的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRef {
    /// 代码托管平台，如 `github`
    pub remote: String,
    /// `owner/repo`
    pub repository: String,
    pub branch: String,
}

impl RepositoryRef {
    pub fn new(
        remote: impl Into<String>,
        repository: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            remote: remote.into(),
            repository: repository.into(),
            branch: branch.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.remote, &config.repository, &config.branch)
    }

    /// 状态接口使用的仓库ID
    ///
    /// 格式为 `remote:branch:owner/repo` 整体做 URL 编码，
    /// 例如 `github%3Amain%3AAravindVengarai%2Fflask`
    pub fn repo_id(&self) -> String {
        let raw = format!("{}:{}:{}", self.remote, self.branch, self.repository);
        url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
    }
}

impl Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}@{}", self.remote, self.repository, self.branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_id_encoding() {
        let repo = RepositoryRef::new("github", "AravindVengarai/flask", "main");
        assert_eq!(repo.repo_id(), "github%3Amain%3AAravindVengarai%2Fflask");
    }

    #[test]
    fn test_registration_body_shape() {
        let repo = RepositoryRef::new("github", "owner/repo", "dev");
        let body = serde_json::to_value(&repo).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"remote": "github", "repository": "owner/repo", "branch": "dev"})
        );
    }
}
