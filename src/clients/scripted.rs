//! 按脚本应答的判题站，单元测试使用

use crate::clients::JudgeApi;
use crate::models::{
    ApiResult, ContestInfo, ProblemExtra, ProblemInfo, RealtimeRank, SubmissionListItem,
    SubmissionStatus, SubmitRequest,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct ScriptedJudge {
    problems: Vec<ProblemInfo>,
    extras: Mutex<HashMap<String, ProblemExtra>>,
    submit_result: Mutex<ApiResult<u64>>,
    last_submit: Mutex<Option<SubmitRequest>>,
    /// 依次返回的状态，用完后一直返回"等待判题"
    statuses: Mutex<VecDeque<ApiResult<SubmissionStatus>>>,
    rank_error: Mutex<Option<String>>,
    pub problem_list_calls: AtomicUsize,
    pub extra_calls: AtomicUsize,
    pub status_queries: AtomicUsize,
}

impl Default for ScriptedJudge {
    fn default() -> Self {
        Self {
            problems: Vec::new(),
            extras: Mutex::new(HashMap::new()),
            submit_result: Mutex::new(ApiResult::success(1)),
            last_submit: Mutex::new(None),
            statuses: Mutex::new(VecDeque::new()),
            rank_error: Mutex::new(None),
            problem_list_calls: AtomicUsize::new(0),
            extra_calls: AtomicUsize::new(0),
            status_queries: AtomicUsize::new(0),
        }
    }
}

impl ScriptedJudge {
    /// 每道题的四个 ID 为 `q-{index}`、`t-{index}` 等
    pub fn with_problems(indexes: &[&str]) -> Self {
        let problems = indexes
            .iter()
            .map(|index| ProblemInfo {
                index: index.to_string(),
                title: format!("题目 {}", index),
                ..Default::default()
            })
            .collect();
        let extras = indexes
            .iter()
            .map(|index| {
                let extra = ProblemExtra {
                    question_id: format!("q-{}", index),
                    tag_id: format!("t-{}", index),
                    sub_tag_id: format!("s-{}", index),
                    done_question_id: format!("d-{}", index),
                    content: "## 题目描述\n\n".to_string(),
                    examples: Vec::new(),
                };
                (index.to_string(), extra)
            })
            .collect();
        Self {
            problems,
            extras: Mutex::new(extras),
            ..Default::default()
        }
    }

    pub fn set_extra(&self, index: &str, extra: ProblemExtra) {
        self.extras.lock().unwrap().insert(index.to_string(), extra);
    }

    pub fn set_submit_result(&self, result: ApiResult<u64>) {
        *self.submit_result.lock().unwrap() = result;
    }

    pub fn last_submit(&self) -> Option<SubmitRequest> {
        self.last_submit.lock().unwrap().clone()
    }

    /// 追加一批状态码，`judgeReplyDesc` 为 `desc`
    pub fn push_statuses(&self, codes: &[i64], desc: &str) {
        let mut statuses = self.statuses.lock().unwrap();
        for &code in codes {
            statuses.push_back(ApiResult::success(SubmissionStatus {
                status: code,
                judge_reply_desc: desc.to_string(),
                ..Default::default()
            }));
        }
    }

    pub fn push_status_result(&self, result: ApiResult<SubmissionStatus>) {
        self.statuses.lock().unwrap().push_back(result);
    }

    pub fn fail_rank(&self, message: &str) {
        *self.rank_error.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl JudgeApi for ScriptedJudge {
    async fn fetch_problem_list(&self, _contest_id: u64) -> ApiResult<Vec<ProblemInfo>> {
        self.problem_list_calls.fetch_add(1, Ordering::SeqCst);
        ApiResult::success(self.problems.clone())
    }

    async fn fetch_problem_extra(&self, _contest_id: u64, index: &str) -> ApiResult<ProblemExtra> {
        self.extra_calls.fetch_add(1, Ordering::SeqCst);
        match self.extras.lock().unwrap().get(index) {
            Some(extra) => ApiResult::success(extra.clone()),
            None => ApiResult::failure("请求失败: 404"),
        }
    }

    async fn submit_solution(&self, request: &SubmitRequest) -> ApiResult<u64> {
        *self.last_submit.lock().unwrap() = Some(request.clone());
        self.submit_result.lock().unwrap().clone()
    }

    async fn fetch_submission_status(
        &self,
        submission_id: u64,
        _tag_id: &str,
        _sub_tag_id: &str,
    ) -> ApiResult<SubmissionStatus> {
        self.status_queries.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                ApiResult::success(SubmissionStatus {
                    id: submission_id,
                    ..Default::default()
                })
            })
    }

    async fn fetch_submissions(&self, _contest_id: u64) -> ApiResult<Vec<SubmissionListItem>> {
        ApiResult::success(vec![SubmissionListItem {
            submission_id: 1,
            index: "A".into(),
            status_message: "答案正确".into(),
            ..Default::default()
        }])
    }

    async fn fetch_realtime_rank(&self, _contest_id: u64) -> ApiResult<RealtimeRank> {
        match self.rank_error.lock().unwrap().clone() {
            Some(message) => ApiResult::failure(message),
            None => ApiResult::success(RealtimeRank::default()),
        }
    }

    async fn fetch_contest_info(&self, _contest_id: u64) -> ApiResult<ContestInfo> {
        ApiResult::success(ContestInfo {
            start_time: 0,
            end_time: 3_600_000,
            extra: Default::default(),
        })
    }
}
