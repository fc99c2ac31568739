//! 比赛会话 - 业务能力层
//!
//! 一个 [`ContestService`] 对应一个比赛目录：持有比赛配置、
//! 题目 / 提交 / 排名缓存和事件主题。题目列表会写回配置文件，
//! 其余缓存只在内存中。

use crate::clients::JudgeApi;
use crate::error::{AppError, AppResult, ContestError};
use crate::models::{
    ApiResult, Compiler, ContestConfig, ContestInfo, Problem, ProblemExtra, RealtimeRank,
    SubmissionListItem, SubmissionStatus, SubmitRequest,
};
use crate::services::cache_slot::CacheSlot;
use crate::services::cancel_signal::CancelSignal;
use crate::services::config_store::ConfigStore;
use crate::services::event_bus::Topic;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// 会话发布的事件
#[derive(Clone, Default)]
pub struct SessionEvents {
    /// 题目列表或题目详情有变化
    pub problems_updated: Topic<Vec<Problem>>,
    /// 某次提交得到最终结果
    pub submission_status_changed: Topic<SubmissionStatus>,
    pub submissions_updated: Topic<Vec<SubmissionListItem>>,
    pub rank_updated: Topic<RealtimeRank>,
}

/// 比赛会话
pub struct ContestService {
    contest_id: u64,
    folder: PathBuf,
    api: Arc<dyn JudgeApi>,
    store: Arc<dyn ConfigStore>,
    problems: CacheSlot<Vec<Problem>>,
    submissions: CacheSlot<Vec<SubmissionListItem>>,
    rank: CacheSlot<RealtimeRank>,
    contest_info: CacheSlot<ContestInfo>,
    /// 串行化题目详情的获取
    extra_lock: Mutex<()>,
    /// 串行化配置写入
    save_lock: Mutex<()>,
    events: SessionEvents,
    cancel: CancelSignal,
}

impl ContestService {
    fn new(
        folder: PathBuf,
        config: ContestConfig,
        api: Arc<dyn JudgeApi>,
        store: Arc<dyn ConfigStore>,
    ) -> Self {
        let events = SessionEvents::default();
        events.problems_updated.publish(config.problems.clone());
        let initial = (!config.problems.is_empty()).then_some(config.problems);

        Self {
            contest_id: config.contest_id,
            folder,
            api,
            store,
            problems: CacheSlot::new(initial),
            submissions: CacheSlot::default(),
            rank: CacheSlot::default(),
            contest_info: CacheSlot::default(),
            extra_lock: Mutex::new(()),
            save_lock: Mutex::new(()),
            events,
            cancel: CancelSignal::new(),
        }
    }

    /// 打开已有的比赛配置
    ///
    /// # 参数
    /// * `folder` - 比赛目录
    /// * `api` - 判题站接口
    /// * `store` - 该目录的配置存储
    ///
    /// # 返回
    /// 配置缺少 contestId 时返回 [`ContestError::MissingContestId`]
    pub async fn open(
        folder: impl Into<PathBuf>,
        api: Arc<dyn JudgeApi>,
        store: Arc<dyn ConfigStore>,
    ) -> AppResult<Self> {
        let config = store.load().await?;
        config.validate()?;
        info!(
            "📂 打开比赛 #{} ({} 道已缓存题目)",
            config.contest_id,
            config.problems.len()
        );
        Ok(Self::new(folder.into(), config, api, store))
    }

    /// 创建比赛配置，已存在时覆盖
    pub async fn create(
        folder: impl Into<PathBuf>,
        contest_id: u64,
        api: Arc<dyn JudgeApi>,
        store: Arc<dyn ConfigStore>,
    ) -> AppResult<Self> {
        let config = ContestConfig::new(contest_id);
        config.validate()?;
        store.save(&config).await?;
        info!("🆕 创建比赛 #{}: {}", contest_id, store.location());
        Ok(Self::new(folder.into(), config, api, store))
    }

    pub fn contest_id(&self) -> u64 {
        self.contest_id
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    /// 会话的取消信号，轮询判题结果时使用
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    /// 取消该会话上正在进行的轮询
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// 当前配置（题目列表取自缓存）
    pub async fn config(&self) -> ContestConfig {
        ContestConfig {
            contest_id: self.contest_id,
            problems: self.problems.peek().await.unwrap_or_default(),
        }
    }

    async fn save_config(&self) -> AppResult<()> {
        let _guard = self.save_lock.lock().await;
        let config = self.config().await;
        self.store.save(&config).await
    }

    /// 获取题目列表，没有缓存时刷新
    ///
    /// 刷新后保留已经获取过的题目详情，并写回配置文件。
    pub async fn problems(&self, force: bool) -> AppResult<Vec<Problem>> {
        let mut refreshed = false;
        let problems = self
            .problems
            .get_or_refresh(force, |previous| {
                refreshed = true;
                self.fetch_problems(previous.unwrap_or_default())
            })
            .await?;

        if refreshed {
            self.save_config().await?;
            self.events.problems_updated.publish(problems.clone());
        }
        Ok(problems)
    }

    async fn fetch_problems(&self, previous: Vec<Problem>) -> AppResult<Vec<Problem>> {
        let infos = self
            .api
            .fetch_problem_list(self.contest_id)
            .await
            .into_result()
            .map_err(|e| AppError::api_failed("获取题目列表", e))?;

        info!("📋 比赛 #{} 共 {} 道题目", self.contest_id, infos.len());
        Ok(infos
            .into_iter()
            .map(|info| {
                let extra = previous
                    .iter()
                    .find(|p| p.info.index == info.index)
                    .and_then(|p| p.extra.clone());
                Problem { info, extra }
            })
            .collect())
    }

    /// 按索引查找题目，题目列表为空时先刷新
    pub async fn problem(&self, index: &str, force: bool) -> AppResult<Option<Problem>> {
        let problems = self.problems(force).await?;
        Ok(problems.into_iter().find(|p| p.info.index == index))
    }

    /// 获取题目详情
    ///
    /// 已有详情且不强制刷新时直接返回，否则请求题目页面并写回配置。
    pub async fn problem_extra(&self, index: &str, force: bool) -> AppResult<ProblemExtra> {
        let problem = self
            .problem(index, false)
            .await?
            .ok_or_else(|| AppError::problem_not_found(index))?;
        if let (Some(extra), false) = (problem.extra, force) {
            return Ok(extra);
        }

        let _guard = self.extra_lock.lock().await;
        if !force {
            // 排队期间可能已经被其它调用者获取
            let cached = self
                .problems
                .update(|problems| find_extra(problems, index))
                .await
                .flatten();
            if let Some(extra) = cached {
                return Ok(extra);
            }
        }

        let extra = self
            .api
            .fetch_problem_extra(self.contest_id, index)
            .await
            .into_result()
            .map_err(|e| AppError::api_failed(format!("获取题目\"{}\"详情", index), e))?;
        debug!("题目 {} 详情: {} 个样例", index, extra.examples.len());

        let snapshot = self
            .problems
            .update(|problems| {
                if let Some(p) = problems.iter_mut().find(|p| p.info.index == index) {
                    p.extra = Some(extra.clone());
                }
                problems.clone()
            })
            .await;
        self.save_config().await?;
        if let Some(problems) = snapshot {
            self.events.problems_updated.publish(problems);
        }
        Ok(extra)
    }

    /// 提交代码
    ///
    /// # 返回
    /// 判题站分配的提交 ID；请求失败或被拒绝时直接返回错误，不重试
    pub async fn submit_solution(
        &self,
        code: &str,
        index: &str,
        compiler: Compiler,
    ) -> AppResult<u64> {
        if code.trim().is_empty() {
            return Err(ContestError::EmptySource.into());
        }
        let extra = self.problem_extra(index, false).await?;
        let missing = extra.missing_submit_ids();
        if !missing.is_empty() {
            return Err(ContestError::MissingSubmitIds {
                index: index.to_string(),
                missing: missing.join(", "),
            }
            .into());
        }

        let request = SubmitRequest::new(&extra, code, compiler);
        let submission_id = self
            .api
            .submit_solution(&request)
            .await
            .into_result()
            .map_err(|message| ContestError::SubmitRejected { message })?;
        info!("📤 题目 {} 已提交, 提交ID: {}", index, submission_id);
        Ok(submission_id)
    }

    /// 查询一次提交状态，失败以 [`ApiResult::failure`] 返回
    pub async fn submission_status(
        &self,
        submission_id: u64,
        tag_id: &str,
        sub_tag_id: &str,
    ) -> ApiResult<SubmissionStatus> {
        self.api
            .fetch_submission_status(submission_id, tag_id, sub_tag_id)
            .await
    }

    /// 确认提交的最终状态，通知订阅者
    pub fn confirm_submission_status(&self, status: SubmissionStatus) {
        self.events.submission_status_changed.publish(status);
    }

    /// 获取提交记录
    pub async fn submissions(&self, force: bool) -> AppResult<Vec<SubmissionListItem>> {
        let mut refreshed = false;
        let submissions = self
            .submissions
            .get_or_refresh(force, |_| {
                refreshed = true;
                async {
                    self.api
                        .fetch_submissions(self.contest_id)
                        .await
                        .into_result()
                        .map_err(|e| AppError::api_failed("获取提交记录", e))
                }
            })
            .await?;

        if refreshed {
            self.events.submissions_updated.publish(submissions.clone());
        }
        Ok(submissions)
    }

    /// 获取实时排名
    pub async fn realtime_rank(&self, force: bool) -> AppResult<RealtimeRank> {
        let mut refreshed = false;
        let rank = self
            .rank
            .get_or_refresh(force, |_| {
                refreshed = true;
                async {
                    self.api
                        .fetch_realtime_rank(self.contest_id)
                        .await
                        .into_result()
                        .map_err(|e| AppError::api_failed("获取实时排名", e))
                }
            })
            .await?;

        if refreshed {
            self.events.rank_updated.publish(rank.clone());
        }
        Ok(rank)
    }

    /// 获取比赛信息（开始 / 结束时间）
    pub async fn contest_info(&self, force: bool) -> AppResult<ContestInfo> {
        self.contest_info
            .get_or_refresh(force, |_| async {
                self.api
                    .fetch_contest_info(self.contest_id)
                    .await
                    .into_result()
                    .map_err(|e| AppError::api_failed("获取比赛信息", e))
            })
            .await
    }
}

fn find_extra(problems: &[Problem], index: &str) -> Option<ProblemExtra> {
    problems
        .iter()
        .find(|p| p.info.index == index)
        .and_then(|p| p.extra.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::scripted::ScriptedJudge;
    use crate::services::config_store::MemoryStore;
    use std::sync::atomic::Ordering;

    async fn open_session(judge: Arc<ScriptedJudge>, store: Arc<MemoryStore>) -> ContestService {
        ContestService::open("/tmp/contest", judge, store).await.unwrap()
    }

    #[tokio::test]
    async fn test_open_requires_contest_id() {
        let store = Arc::new(MemoryStore::new(Some(ContestConfig::default())));
        let err = ContestService::open("/tmp/contest", Arc::new(ScriptedJudge::default()), store)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Contest(ContestError::MissingContestId)));
    }

    #[tokio::test]
    async fn test_problems_are_fetched_once_and_persisted() {
        let judge = Arc::new(ScriptedJudge::with_problems(&["A", "B"]));
        let store = Arc::new(MemoryStore::new(Some(ContestConfig::new(100))));
        let session = open_session(Arc::clone(&judge), Arc::clone(&store)).await;

        assert_eq!(session.problems(false).await.unwrap().len(), 2);
        assert_eq!(session.problems(false).await.unwrap().len(), 2);
        assert_eq!(judge.problem_list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.snapshot().unwrap().problems.len(), 2);
        assert_eq!(
            session.events().problems_updated.latest().map(|p| p.len()),
            Some(2)
        );
    }

    #[tokio::test]
    async fn test_problem_extra_fetch_on_miss() {
        let judge = Arc::new(ScriptedJudge::with_problems(&["A"]));
        let store = Arc::new(MemoryStore::new(Some(ContestConfig::new(100))));
        let session = open_session(Arc::clone(&judge), Arc::clone(&store)).await;

        let extra = session.problem_extra("A", false).await.unwrap();
        assert_eq!(extra.question_id, "q-A");
        session.problem_extra("A", false).await.unwrap();
        assert_eq!(judge.extra_calls.load(Ordering::SeqCst), 1);

        let saved = store.snapshot().unwrap();
        assert!(saved.find_problem("A").unwrap().has_details());

        // 刷新题目列表不会丢掉已获取的详情
        let problems = session.problems(true).await.unwrap();
        assert!(problems[0].has_details());

        let err = session.problem_extra("Z", false).await.unwrap_err();
        assert_eq!(err.to_string(), "比赛错误: 题目\"Z\"不存在");
    }

    #[tokio::test]
    async fn test_submit_validations() {
        let judge = Arc::new(ScriptedJudge::with_problems(&["A"]));
        let store = Arc::new(MemoryStore::new(Some(ContestConfig::new(100))));
        let session = open_session(Arc::clone(&judge), store).await;

        let err = session.submit_solution("  ", "A", Compiler::Python3).await.unwrap_err();
        assert!(matches!(err, AppError::Contest(ContestError::EmptySource)));

        judge.set_submit_result(ApiResult::success(12345));
        let id = session.submit_solution("print(1)", "A", Compiler::Python3).await.unwrap();
        assert_eq!(id, 12345);
        let request = judge.last_submit().unwrap();
        assert_eq!(request.language_name, "Python3");
        assert_eq!(request.question_id, "q-A");

        judge.set_submit_result(ApiResult::failure("判题站返回错误: 请先登录"));
        let err = session.submit_solution("print(1)", "A", Compiler::Python3).await.unwrap_err();
        assert!(err.to_string().contains("请先登录"));
    }

    #[tokio::test]
    async fn test_submit_with_missing_ids() {
        let judge = Arc::new(ScriptedJudge::with_problems(&["A"]));
        judge.set_extra(
            "A",
            ProblemExtra {
                question_id: "1".into(),
                ..Default::default()
            },
        );
        let store = Arc::new(MemoryStore::new(Some(ContestConfig::new(100))));
        let session = open_session(judge, store).await;

        let err = session.submit_solution("x", "A", Compiler::CppGcc).await.unwrap_err();
        assert!(err.to_string().contains("tagId, subTagId, doneQuestionId"));
    }

    #[tokio::test]
    async fn test_failed_fetch_surfaces_cause() {
        let judge = Arc::new(ScriptedJudge::default());
        judge.fail_rank("请求失败: timeout");
        let store = Arc::new(MemoryStore::new(Some(ContestConfig::new(100))));
        let session = open_session(judge, store).await;

        let err = session.realtime_rank(false).await.unwrap_err();
        assert_eq!(err.to_string(), "API错误: 获取实时排名失败: 请求失败: timeout");
        assert!(session.events().rank_updated.latest().is_none());
    }

    #[tokio::test]
    async fn test_submissions_publish_on_refresh() {
        let judge = Arc::new(ScriptedJudge::default());
        let store = Arc::new(MemoryStore::new(Some(ContestConfig::new(100))));
        let session = open_session(judge, store).await;

        let list = session.submissions(false).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(
            session.events().submissions_updated.latest().map(|l| l.len()),
            Some(1)
        );
    }
}
