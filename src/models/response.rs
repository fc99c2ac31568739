use crate::error::ApiError;
use crate::models::ApiResult;
use serde::Deserialize;

/// 判题站 JSON 接口的统一返回体 `{code, msg, data}`
///
/// `code == 0` 表示成功。
#[derive(Debug, Clone, Deserialize)]
pub struct Response<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Response<T> {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// 按 code / data 转换为 [`ApiResult`]
    pub fn into_api_result(self, endpoint: &str) -> ApiResult<T> {
        if !self.is_success() {
            return ApiResult::failure(
                ApiError::BadResponse {
                    endpoint: endpoint.to_string(),
                    code: self.code,
                    message: self.msg,
                }
                .to_string(),
            );
        }
        match self.data {
            Some(data) => ApiResult::success(data),
            None => ApiResult::failure(
                ApiError::EmptyResponse {
                    endpoint: endpoint.to_string(),
                }
                .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_zero_code_is_failure() {
        let resp: Response<u64> =
            serde_json::from_str(r#"{"code": 1, "msg": "请先登录", "data": null}"#).unwrap();
        let result = resp.into_api_result("/nccommon/submit_cd");
        assert!(!result.is_success());
        assert!(result.error().unwrap().contains("请先登录"));
    }

    #[test]
    fn test_missing_data_is_failure() {
        let resp: Response<u64> = serde_json::from_str(r#"{"code": 0, "msg": "OK"}"#).unwrap();
        let result = resp.into_api_result("/nccommon/status");
        assert!(result.error().unwrap().contains("空结果"));
    }

    #[test]
    fn test_success() {
        let resp: Response<u64> =
            serde_json::from_str(r#"{"code": 0, "msg": "OK", "data": 12345}"#).unwrap();
        assert_eq!(resp.into_api_result("/nccommon/submit_cd").into_result(), Ok(12345));
    }
}
