//! 判题站 API 客户端
//!
//! 封装所有与判题站接口相关的调用逻辑，每个操作都返回 [`ApiResult`]

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::HttpClient;
use crate::models::{
    ApiResult, ContestInfo, ContestProblemList, ProblemExtra, ProblemInfo, RealtimeRank, Response,
    SubmissionList, SubmissionListItem, SubmissionStatus, SubmitRequest,
};
use crate::parser::{parse_contest_page, parse_problem_page};
use async_trait::async_trait;
use tracing::debug;

/// 判题站接口
///
/// 网络错误、非零 code、缺少 data 或无法解析的返回体都以
/// `ApiResult::failure` 表示，实现方不应返回 panic 或错误类型。
#[async_trait]
pub trait JudgeApi: Send + Sync {
    /// 获取比赛题目列表
    async fn fetch_problem_list(&self, contest_id: u64) -> ApiResult<Vec<ProblemInfo>>;

    /// 获取并解析题目页面
    async fn fetch_problem_extra(&self, contest_id: u64, index: &str) -> ApiResult<ProblemExtra>;

    /// 提交代码，成功时返回提交 ID
    async fn submit_solution(&self, request: &SubmitRequest) -> ApiResult<u64>;

    /// 查询提交状态
    async fn fetch_submission_status(
        &self,
        submission_id: u64,
        tag_id: &str,
        sub_tag_id: &str,
    ) -> ApiResult<SubmissionStatus>;

    /// 获取自己的提交记录
    async fn fetch_submissions(&self, contest_id: u64) -> ApiResult<Vec<SubmissionListItem>>;

    /// 获取实时排名
    async fn fetch_realtime_rank(&self, contest_id: u64) -> ApiResult<RealtimeRank>;

    /// 获取比赛信息（开始 / 结束时间）
    async fn fetch_contest_info(&self, contest_id: u64) -> ApiResult<ContestInfo>;
}

/// 基于 HTTP 的判题站客户端
pub struct NowcoderClient {
    http: HttpClient,
}

impl NowcoderClient {
    /// 创建新的判题站客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }
}

/// 将 `{code, msg, data}` 请求结果转换为 [`ApiResult`]
fn unwrap_envelope<T>(endpoint: &str, result: AppResult<Response<T>>) -> ApiResult<T> {
    match result {
        Ok(resp) => resp.into_api_result(endpoint),
        Err(e) => {
            debug!("{} 请求失败: {}", endpoint, e);
            ApiResult::failure(e.to_string())
        }
    }
}

#[async_trait]
impl JudgeApi for NowcoderClient {
    async fn fetch_problem_list(&self, contest_id: u64) -> ApiResult<Vec<ProblemInfo>> {
        let path = format!("/acm/contest/problem-list?id={}", contest_id);
        let result = self.http.get_json::<Response<ContestProblemList>>(&path).await;
        unwrap_envelope(&path, result).map(|list| list.data)
    }

    async fn fetch_problem_extra(&self, contest_id: u64, index: &str) -> ApiResult<ProblemExtra> {
        let path = format!("/acm/contest/{}/{}", contest_id, index);
        self.http
            .get_text(&path)
            .await
            .map(|html| parse_problem_page(&html))
            .into()
    }

    async fn submit_solution(&self, request: &SubmitRequest) -> ApiResult<u64> {
        let path = "/nccommon/submit_cd";
        debug!(
            "提交代码: questionId={}, language={}",
            request.question_id, request.language_name
        );
        let result = self.http.post_form::<_, Response<u64>>(path, request).await;
        unwrap_envelope(path, result)
    }

    async fn fetch_submission_status(
        &self,
        submission_id: u64,
        tag_id: &str,
        sub_tag_id: &str,
    ) -> ApiResult<SubmissionStatus> {
        let path = format!(
            "/nccommon/status?submissionId={}&tagId={}&subTagId={}",
            submission_id, tag_id, sub_tag_id
        );
        self.http.get_json::<SubmissionStatus>(&path).await.into()
    }

    async fn fetch_submissions(&self, contest_id: u64) -> ApiResult<Vec<SubmissionListItem>> {
        let path = format!(
            "/acm-heavy/acm/contest/status-list?id={}&pageSize=50&onlyMyStatusFilter=true",
            contest_id
        );
        let result = self.http.get_json::<Response<SubmissionList>>(&path).await;
        unwrap_envelope(&path, result).map(|list| list.data)
    }

    async fn fetch_realtime_rank(&self, contest_id: u64) -> ApiResult<RealtimeRank> {
        let path = format!(
            "/acm-heavy/acm/contest/real-time-rank-data?id={}&searchUserName=&onlyMyFollow=false&limit=0",
            contest_id
        );
        let result = self.http.get_json::<Response<RealtimeRank>>(&path).await;
        unwrap_envelope(&path, result)
    }

    async fn fetch_contest_info(&self, contest_id: u64) -> ApiResult<ContestInfo> {
        let path = format!("/acm/contest/{}", contest_id);
        match self.http.get_text(&path).await {
            Ok(html) => match parse_contest_page(&html) {
                Some(info) => ApiResult::success(info),
                None => ApiResult::failure("比赛页面中没有比赛信息"),
            },
            Err(e) => ApiResult::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_transport_error_keeps_message() {
        let result: ApiResult<u64> = unwrap_envelope(
            "/nccommon/submit_cd",
            Err(AppError::Other("connection refused".into())),
        );
        assert!(!result.is_success());
        assert!(result.error().unwrap().contains("connection refused"));
    }

    #[test]
    fn test_envelope_success() {
        let resp: Response<u64> = serde_json::from_str(r#"{"code":0,"msg":"OK","data":12345}"#).unwrap();
        let result = unwrap_envelope("/nccommon/submit_cd", Ok(resp));
        assert_eq!(result.data(), Some(&12345));
    }
}
