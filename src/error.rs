use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 判题站 API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 比赛业务错误
    #[error("比赛错误: {0}")]
    Contest(#[from] ContestError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 判题站 API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 判题站返回非零 code
    #[error("判题站返回错误 ({endpoint}): code={code}, msg={message}")]
    BadResponse {
        endpoint: String,
        code: i64,
        message: String,
    },
    /// 返回体中缺少 data
    #[error("判题站返回空结果: {endpoint}")]
    EmptyResponse { endpoint: String },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 上层收到的失败结果（ApiResult::failure 携带的信息）
    #[error("{operation}失败: {message}")]
    Failed { operation: String, message: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件格式错误
    #[error("配置文件格式错误 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 比赛业务错误
#[derive(Debug, Error)]
pub enum ContestError {
    /// 配置文件缺少 contestId
    #[error("无效的配置文件：配置文件中缺少contestId")]
    MissingContestId,
    /// 题目不存在
    #[error("题目\"{index}\"不存在")]
    ProblemNotFound { index: String },
    /// 题目详情缺少提交所需的 ID
    #[error("题目\"{index}\"缺少提交所需的ID: {missing}")]
    MissingSubmitIds { index: String, missing: String },
    /// 提交被判题站拒绝
    #[error("提交失败: {message}")]
    SubmitRejected { message: String },
    /// 代码为空
    #[error("代码不能为空")]
    EmptySource,
    /// 无法确定编译器
    #[error("无法识别的编译器: {name}")]
    UnknownCompiler { name: String },
    /// 当前没有打开的比赛
    #[error("请先打开比赛文件夹")]
    NoActiveContest,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少身份凭证
    #[error("未授权，请先设置 NOWCODER_TOKEN")]
    MissingToken,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 由失败的 ApiResult 创建错误
    pub fn api_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Api(ApiError::Failed {
            operation: operation.into(),
            message: message.into(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建题目不存在错误
    pub fn problem_not_found(index: impl Into<String>) -> Self {
        AppError::Contest(ContestError::ProblemNotFound {
            index: index.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_error_message() {
        let err = AppError::api_failed("获取题目列表", "请求失败: timeout");
        assert_eq!(err.to_string(), "API错误: 获取题目列表失败: 请求失败: timeout");

        let err = AppError::problem_not_found("C");
        assert_eq!(err.to_string(), "比赛错误: 题目\"C\"不存在");
    }

    #[test]
    fn test_source_is_kept() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AppError::file_read_failed("nowcoderac.json", io);
        let source = err.source().and_then(|s| s.source());
        assert!(source.is_some());
    }
}
