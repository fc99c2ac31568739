//! 比赛空间 - 当前会话的协调者
//!
//! 持有当前打开的 [`ContestService`]，把会话事件转发到长期存在的主题上。
//! 订阅者只需订阅一次 [`SpaceEvents`]，切换比赛时无需重新订阅。

use crate::clients::JudgeApi;
use crate::error::{AppResult, ContestError, FileError};
use crate::models::{Problem, RealtimeRank, SubmissionListItem, SubmissionStatus};
use crate::services::config_store::{ConfigStore, JsonFileStore};
use crate::services::contest_service::ContestService;
use crate::services::event_bus::{Subscription, Topic};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// 比赛空间对外的事件
#[derive(Clone, Default)]
pub struct SpaceEvents {
    /// 当前比赛变化，None 表示没有打开的比赛
    pub session_changed: Topic<Option<u64>>,
    pub problems_updated: Topic<Vec<Problem>>,
    pub submission_status_changed: Topic<SubmissionStatus>,
    pub submissions_updated: Topic<Vec<SubmissionListItem>>,
    /// None 表示排名已清空
    pub rank_updated: Topic<Option<RealtimeRank>>,
}

/// 比赛空间
pub struct ContestSpace {
    api: Arc<dyn JudgeApi>,
    config_file_name: String,
    current: Mutex<Option<Arc<ContestService>>>,
    relay: Mutex<Option<Subscription>>,
    events: SpaceEvents,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ContestSpace {
    pub fn new(api: Arc<dyn JudgeApi>, config_file_name: impl Into<String>) -> Self {
        Self {
            api,
            config_file_name: config_file_name.into(),
            current: Mutex::new(None),
            relay: Mutex::new(None),
            events: SpaceEvents::default(),
        }
    }

    pub fn events(&self) -> &SpaceEvents {
        &self.events
    }

    /// 当前会话
    pub fn current(&self) -> Option<Arc<ContestService>> {
        lock(&self.current).clone()
    }

    /// 当前会话，没有时返回 [`ContestError::NoActiveContest`]
    pub fn require_current(&self) -> AppResult<Arc<ContestService>> {
        self.current()
            .ok_or_else(|| ContestError::NoActiveContest.into())
    }

    /// 打开比赛目录（目录下必须已有配置文件）
    pub async fn open(&self, folder: &Path) -> AppResult<Arc<ContestService>> {
        let store = JsonFileStore::in_folder(folder, &self.config_file_name);
        if !store.exists() {
            return Err(FileError::NotFound {
                path: store.path().display().to_string(),
            }
            .into());
        }
        self.open_with_store(folder, Arc::new(store)).await
    }

    /// 使用指定的配置存储打开比赛
    pub async fn open_with_store(
        &self,
        folder: &Path,
        store: Arc<dyn ConfigStore>,
    ) -> AppResult<Arc<ContestService>> {
        let session =
            Arc::new(ContestService::open(folder, Arc::clone(&self.api), store).await?);
        self.switch_to(Some(Arc::clone(&session)));
        Ok(session)
    }

    /// 创建比赛目录和配置文件，已存在时覆盖
    pub async fn create(&self, folder: &Path, contest_id: u64) -> AppResult<Arc<ContestService>> {
        let store = JsonFileStore::in_folder(folder, &self.config_file_name);
        self.create_with_store(folder, contest_id, Arc::new(store))
            .await
    }

    pub async fn create_with_store(
        &self,
        folder: &Path,
        contest_id: u64,
        store: Arc<dyn ConfigStore>,
    ) -> AppResult<Arc<ContestService>> {
        let session = Arc::new(
            ContestService::create(folder, contest_id, Arc::clone(&self.api), store).await?,
        );
        self.switch_to(Some(Arc::clone(&session)));
        Ok(session)
    }

    /// 关闭当前比赛
    pub fn close(&self) {
        self.switch_to(None);
    }

    /// 切换当前会话
    ///
    /// 旧会话上的轮询会被取消；转发改为新会话，新会话已有的最新值会立即转发，
    /// 没有值的主题发布空值，让订阅者清空旧数据。
    fn switch_to(&self, session: Option<Arc<ContestService>>) {
        let previous = std::mem::replace(&mut *lock(&self.current), session.clone());
        if let Some(previous) = previous {
            info!("🔁 关闭比赛 #{}", previous.contest_id());
            previous.cancel();
        }

        // 先取消旧的转发，再订阅新会话
        drop(lock(&self.relay).take());
        self.events
            .session_changed
            .publish(session.as_ref().map(|s| s.contest_id()));

        let Some(session) = session else {
            self.events.problems_updated.publish(Vec::new());
            self.events.submissions_updated.publish(Vec::new());
            self.events.rank_updated.publish(None);
            return;
        };

        let source = session.events();
        if source.submissions_updated.latest().is_none() {
            self.events.submissions_updated.publish(Vec::new());
        }
        if source.rank_updated.latest().is_none() {
            self.events.rank_updated.publish(None);
        }

        let problems = self.events.problems_updated.clone();
        let status = self.events.submission_status_changed.clone();
        let submissions = self.events.submissions_updated.clone();
        let rank = self.events.rank_updated.clone();
        let relay = Subscription::merge(vec![
            source
                .problems_updated
                .subscribe(move |v| problems.publish(v.clone())),
            source
                .submission_status_changed
                .subscribe(move |v| status.publish(v.clone())),
            source
                .submissions_updated
                .subscribe(move |v| submissions.publish(v.clone())),
            source
                .rank_updated
                .subscribe(move |v| rank.publish(Some(v.clone()))),
        ]);
        *lock(&self.relay) = Some(relay);
        info!("🎯 当前比赛: #{}", session.contest_id());
    }

    /// 并发刷新当前比赛的题目、提交记录和排名
    ///
    /// 单项失败只记录警告；刷新结果通过事件转发给订阅者。
    pub async fn refresh_all(&self) -> AppResult<()> {
        let session = self.require_current()?;
        let (problems, submissions, rank) = futures::join!(
            session.problems(true),
            session.submissions(true),
            session.realtime_rank(true)
        );
        if let Err(e) = problems {
            warn!("⚠️ 刷新题目列表失败: {}", e);
        }
        if let Err(e) = submissions {
            warn!("⚠️ 刷新提交记录失败: {}", e);
        }
        if let Err(e) = rank {
            warn!("⚠️ 刷新实时排名失败: {}", e);
        }
        Ok(())
    }
}

impl Drop for ContestSpace {
    fn drop(&mut self) {
        if let Some(session) = lock(&self.current).take() {
            session.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::scripted::ScriptedJudge;
    use crate::models::ContestConfig;
    use crate::services::config_store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn space() -> ContestSpace {
        ContestSpace::new(Arc::new(ScriptedJudge::with_problems(&["A", "B"])), "nowcoderac.json")
    }

    fn store(contest_id: u64) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new(Some(ContestConfig::new(contest_id))))
    }

    #[tokio::test]
    async fn test_switch_cancels_previous_session() {
        let space = space();
        let first = space.open_with_store(Path::new("/a"), store(1)).await.unwrap();
        let signal = first.cancel_signal();
        assert!(!signal.is_cancelled());

        space.open_with_store(Path::new("/b"), store(2)).await.unwrap();
        assert!(signal.is_cancelled());
        assert_eq!(space.current().unwrap().contest_id(), 2);
        assert_eq!(space.events().session_changed.latest(), Some(Some(2)));
    }

    #[tokio::test]
    async fn test_events_are_relayed_from_current_session_only() {
        let space = space();
        let first = space.open_with_store(Path::new("/a"), store(1)).await.unwrap();

        let seen = Arc::new(AtomicUsize::new(0));
        let seen2 = Arc::clone(&seen);
        let _sub = space
            .events()
            .submission_status_changed
            .subscribe(move |_| {
                seen2.fetch_add(1, Ordering::SeqCst);
            });

        first.confirm_submission_status(SubmissionStatus::default());
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        let second = space.open_with_store(Path::new("/b"), store(2)).await.unwrap();
        first.confirm_submission_status(SubmissionStatus::default());
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        second.confirm_submission_status(SubmissionStatus::default());
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_all_updates_relay() {
        let space = space();
        space.open_with_store(Path::new("/a"), store(1)).await.unwrap();
        assert_eq!(space.events().problems_updated.latest(), Some(Vec::new()));

        space.refresh_all().await.unwrap();
        assert_eq!(
            space.events().problems_updated.latest().map(|p| p.len()),
            Some(2)
        );
        assert_eq!(
            space.events().submissions_updated.latest().map(|s| s.len()),
            Some(1)
        );
        assert!(matches!(space.events().rank_updated.latest(), Some(Some(_))));
    }

    #[tokio::test]
    async fn test_close_clears_views() {
        let space = space();
        space.open_with_store(Path::new("/a"), store(1)).await.unwrap();
        space.refresh_all().await.unwrap();

        space.close();
        assert!(space.current().is_none());
        assert_eq!(space.events().problems_updated.latest(), Some(Vec::new()));
        assert_eq!(space.events().rank_updated.latest(), Some(None));
        assert!(space.refresh_all().await.is_err());
    }
}
