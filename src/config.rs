use crate::error::ConfigError;
use reqwest::header::HeaderValue;
use std::str::FromStr;

/// 程序配置
///
/// 只在进程启动时从环境变量构造一次，之后以引用的方式传给各个组件
#[derive(Clone, Debug)]
pub struct Config {
    // --- 代码索引服务 ---
    pub api_base_url: String,
    pub api_key: String,
    pub github_token: String,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 目标仓库 ---
    pub remote: String,
    /// `owner/repo`
    pub repository: String,
    pub branch: String,
    // --- 轮询 ---
    /// 两次状态查询之间的等待时间（秒）
    pub poll_interval_secs: u64,
    /// 最大轮询次数，0 表示不限
    pub max_poll_attempts: u32,
    // --- 查询 ---
    /// 整批查询共用的会话ID
    pub session_id: String,
    /// 自定义查询文件（TOML），为空时使用内置查询
    pub queries_file: Option<String>,
    // --- 输出 ---
    pub output_report_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.greptile.com/v2".to_string(),
            api_key: String::new(),
            github_token: String::new(),
            request_timeout_secs: 120,
            remote: "github".to_string(),
            repository: String::new(),
            branch: "main".to_string(),
            poll_interval_secs: 60,
            max_poll_attempts: 60,
            session_id: "health-monitor-session".to_string(),
            queries_file: None,
            output_report_file: "health_report.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            api_base_url: env_string("GREPTILE_BASE_URL").unwrap_or(default.api_base_url),
            api_key: env_string("GREPTILE_API_KEY").unwrap_or(default.api_key),
            github_token: env_string("GITHUB_TOKEN").unwrap_or(default.github_token),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS")?
                .unwrap_or(default.request_timeout_secs),
            remote: env_string("REPO_REMOTE").unwrap_or(default.remote),
            repository: env_string("REPO_NAME").unwrap_or(default.repository),
            branch: env_string("REPO_BRANCH").unwrap_or(default.branch),
            poll_interval_secs: env_parse("POLL_INTERVAL_SECS")?
                .unwrap_or(default.poll_interval_secs),
            max_poll_attempts: env_parse("MAX_POLL_ATTEMPTS")?.unwrap_or(default.max_poll_attempts),
            session_id: env_string("QUERY_SESSION_ID").unwrap_or(default.session_id),
            queries_file: env_string("QUERIES_FILE").or(default.queries_file),
            output_report_file: env_string("OUTPUT_REPORT_FILE")
                .unwrap_or(default.output_report_file),
            verbose_logging: env_parse("VERBOSE_LOGGING")?.unwrap_or(default.verbose_logging),
        })
    }

    /// 检查必填项，必须在任何远程调用之前执行
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("GREPTILE_API_KEY", &self.api_key),
            ("GITHUB_TOKEN", &self.github_token),
            ("REPO_NAME", &self.repository),
        ];
        for (var_name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingValue {
                    var_name: var_name.to_string(),
                });
            }
        }

        // 凭据会原样放进请求头
        for (var_name, value) in [
            ("GREPTILE_API_KEY", &self.api_key),
            ("GITHUB_TOKEN", &self.github_token),
        ] {
            if HeaderValue::from_str(value).is_err() {
                return Err(ConfigError::InvalidHeaderValue {
                    var_name: var_name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// 读取非空环境变量
fn env_string(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok().filter(|v| !v.trim().is_empty())
}

/// 读取并解析环境变量，解析失败返回错误而不是静默使用默认值
fn env_parse<T: FromStr>(var_name: &str) -> Result<Option<T>, ConfigError> {
    match env_string(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            api_key: "key".to_string(),
            github_token: "token".to_string(),
            repository: "owner/repo".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_repository() {
        let config = Config {
            repository: "  ".to_string(),
            ..valid_config()
        };
        match config.validate() {
            Err(ConfigError::MissingValue { var_name }) => assert_eq!(var_name, "REPO_NAME"),
            other => panic!("期望 MissingValue, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_token_with_carriage_return() {
        let config = Config {
            github_token: "gh-token\r".to_string(),
            ..valid_config()
        };
        match config.validate() {
            Err(ConfigError::InvalidHeaderValue { var_name }) => {
                assert_eq!(var_name, "GITHUB_TOKEN")
            }
            other => panic!("期望 InvalidHeaderValue, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_env_parse_reports_bad_number() {
        // 使用专属变量名，避免与其他测试冲突
        std::env::set_var("REPO_HEALTH_MONITOR_TEST_NUMBER", "sixty");
        let result = env_parse::<u64>("REPO_HEALTH_MONITOR_TEST_NUMBER");
        std::env::remove_var("REPO_HEALTH_MONITOR_TEST_NUMBER");

        assert!(matches!(
            result,
            Err(ConfigError::EnvVarParseFailed { ref value, .. }) if value == "sixty"
        ));
    }

    #[test]
    fn test_env_parse_missing_is_none() {
        let result = env_parse::<u32>("REPO_HEALTH_MONITOR_TEST_UNSET").unwrap();
        assert_eq!(result, None);
    }
}
