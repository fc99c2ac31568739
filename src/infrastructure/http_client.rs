//! HTTP 客户端 - 基础设施层
//!
//! 持有唯一的 reqwest Client，只暴露"发请求"的能力

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// HTTP 客户端
///
/// 职责：
/// - 持有唯一的 Client 资源（cookie、UA、超时在创建时确定）
/// - 暴露 HTML GET / JSON GET / 表单 POST
/// - 不认识 Problem / Submission
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// 创建新的 HTTP 客户端
    ///
    /// 凭证非空时以 cookie `t={token}` 附加到每个请求
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        if !config.token.trim().is_empty() {
            let cookie = HeaderValue::from_str(&format!("t={}", config.token.trim()))
                .map_err(|e| AppError::Other(format!("凭证包含非法字符: {}", e)))?;
            headers.insert(header::COOKIE, cookie);
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Other(format!("创建 HTTP 客户端失败: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 拼接完整地址，`path` 已是完整 URL 时原样返回
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET 请求并返回响应文本（HTML 页面）
    pub async fn get_text(&self, path: &str) -> AppResult<String> {
        let url = self.url(path);
        debug!("GET {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::api_request_failed(path, e))?;
        resp.text()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))
    }

    /// GET 请求并把响应体解析为 JSON
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let body = self.get_text(path).await?;
        parse_json(path, &body)
    }

    /// 以 `application/x-www-form-urlencoded` 提交表单并解析 JSON 响应
    pub async fn post_form<F, T>(&self, path: &str, form: &F) -> AppResult<T>
    where
        F: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        let resp = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::api_request_failed(path, e))?;
        let body = resp
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;
        parse_json(path, &body)
    }
}

fn parse_json<T: DeserializeOwned>(endpoint: &str, body: &str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| {
        debug!("无法解析的响应: {}", crate::utils::truncate_text(body, 200));
        AppError::Api(ApiError::JsonParseFailed {
            endpoint: endpoint.to_string(),
            source: e,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_base(base_url: &str) -> HttpClient {
        let config = Config {
            base_url: base_url.to_string(),
            token: "abc".to_string(),
            ..Config::default()
        };
        HttpClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_join() {
        let client = client_with_base("https://ac.nowcoder.com/");
        assert_eq!(
            client.url("/acm/contest/problem-list?id=1"),
            "https://ac.nowcoder.com/acm/contest/problem-list?id=1"
        );
        assert_eq!(client.url("nccommon/status"), "https://ac.nowcoder.com/nccommon/status");
        assert_eq!(client.url("https://other/x"), "https://other/x");
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let config = Config {
            token: "a\nb".to_string(),
            ..Config::default()
        };
        assert!(HttpClient::new(&config).is_err());
    }

    #[test]
    fn test_parse_json_error_names_endpoint() {
        let err = parse_json::<u64>("/nccommon/status", "<html>").unwrap_err();
        assert!(err.to_string().contains("/nccommon/status"));
    }
}
