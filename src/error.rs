use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 远程服务错误
    #[error("远程服务错误: {0}")]
    Remote(#[from] RemoteServiceError),
    /// 索引就绪错误
    #[error("索引就绪错误: {0}")]
    Readiness(#[from] ReadinessError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 远程服务错误（网络、鉴权、HTTP 状态码）
#[derive(Debug, Error)]
pub enum RemoteServiceError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回非 2xx 状态码
    #[error("API返回错误响应 ({endpoint}): status={status}, body={body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 凭据无法作为请求头发送
    #[error("请求头 {header} 的值无效")]
    InvalidHeader { header: String },
    /// 必须解析的响应体无法解析
    #[error("API响应无法解析 ({endpoint}): {source}")]
    InvalidBody {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 响应结构不符合预期
///
/// 只在单条查询的结果提取中使用，最终会降级为占位文本
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct MalformedResponseError {
    pub reason: MalformedReason,
    /// 原始响应体
    pub raw: String,
}

/// 结构错误的具体原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// 没有 message 字段
    #[error("响应中缺少 message 字段")]
    MissingMessage,
    /// message 字段不是字符串
    #[error("message 字段不是字符串")]
    MessageNotString,
    /// 顶层不是 JSON 对象
    #[error("响应不是 JSON 对象")]
    NotAnObject,
    /// 不是合法 JSON
    #[error("JSON解析失败: {0}")]
    InvalidJson(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 必填配置为空
    #[error("缺少必填配置: {var_name}")]
    MissingValue { var_name: String },
    /// 配置值无法作为 HTTP 请求头（包含换行等控制字符）
    #[error("配置 {var_name} 的值不能作为请求头发送")]
    InvalidHeaderValue { var_name: String },
    /// 查询文件不存在
    #[error("查询文件不存在: {path}")]
    QueriesFileNotFound { path: String },
    /// 查询文件读取失败
    #[error("读取查询文件失败 ({path}): {source}")]
    QueriesFileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 查询文件解析失败
    #[error("查询文件解析失败 ({path}): {source}")]
    QueriesFileParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 查询集合为空
    #[error("查询集合为空: {path}")]
    EmptyQuerySet { path: String },
    /// 查询 key 重复
    #[error("查询 key 重复: {key}")]
    DuplicateQueryKey { key: String },
}

/// 索引就绪检查错误
#[derive(Debug, Error)]
pub enum ReadinessError {
    /// 状态查询或注册请求失败
    #[error(transparent)]
    Remote(#[from] RemoteServiceError),
    /// 超过最大轮询次数仍未完成
    #[error("等待索引超时: 已轮询 {attempts} 次, 最后状态: {last_status}")]
    TimedOut { attempts: u32, last_status: String },
}

impl RemoteServiceError {
    /// 创建网络请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        RemoteServiceError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建状态码错误
    pub fn bad_status(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        RemoteServiceError::BadStatus {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
