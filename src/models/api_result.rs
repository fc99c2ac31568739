//! 统一的接口结果封装
//!
//! 所有访问判题站的操作都返回 [`ApiResult`]，而不是抛出错误。

use serde::Serialize;

/// 成功 / 失败二选一的结果
///
/// 不变式：`success == true` 当且仅当 `data` 存在且 `error` 不存在。
/// 字段私有，只能通过 [`ApiResult::success`] 与 [`ApiResult::failure`] 构造；
/// 只实现序列化，反序列化会绕过构造函数。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResult<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 转换数据类型，失败信息原样保留
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self.into_result() {
            Ok(data) => ApiResult::success(f(data)),
            Err(message) => ApiResult::failure(message),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.data, self.error) {
            (Some(data), None) => Ok(data),
            (_, Some(message)) => Err(message),
            (None, None) => Err("返回空结果".to_string()),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for ApiResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => ApiResult::success(data),
            Err(e) => ApiResult::failure(e.to_string()),
        }
    }
}
