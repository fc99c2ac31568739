//! 缓存槽：有缓存直接返回，否则刷新
//!
//! 同一个槽的刷新串行执行，排在刷新之后的调用者直接复用刷新结果。

use crate::error::AppResult;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

pub struct CacheSlot<T> {
    value: Mutex<Option<T>>,
    /// 每完成一次刷新加一
    generation: AtomicU64,
}

impl<T: Clone> Default for CacheSlot<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T: Clone> CacheSlot<T> {
    pub fn new(initial: Option<T>) -> Self {
        Self {
            value: Mutex::new(initial),
            generation: AtomicU64::new(0),
        }
    }

    /// 读取缓存，必要时刷新
    ///
    /// # 参数
    /// * `force` - 忽略已有缓存
    /// * `fetch` - 刷新函数，只在真正需要时调用，参数为刷新前的缓存
    ///
    /// # 返回
    /// 缓存值或刷新后的值；刷新失败时缓存保持不变
    pub async fn get_or_refresh<F, Fut>(&self, force: bool, fetch: F) -> AppResult<T>
    where
        F: FnOnce(Option<T>) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let observed = self.generation.load(Ordering::SeqCst);
        let mut guard = self.value.lock().await;

        if let Some(value) = guard.as_ref() {
            let refreshed_while_waiting = self.generation.load(Ordering::SeqCst) != observed;
            if !force || refreshed_while_waiting {
                return Ok(value.clone());
            }
        }

        let value = fetch(guard.clone()).await?;
        *guard = Some(value.clone());
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    /// 当前缓存（不触发刷新）
    pub async fn peek(&self) -> Option<T> {
        self.value.lock().await.clone()
    }

    /// 原地修改缓存，槽为空时返回 None
    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.value.lock().await.as_mut().map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cached_value_is_reused() {
        let slot = CacheSlot::new(None);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let v = slot
                .get_or_refresh(false, |_| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .await
                .unwrap();
            assert_eq!(v, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let v = slot
            .get_or_refresh(true, |prev| async move { Ok(prev.unwrap_or(0) + 1) })
            .await
            .unwrap();
        assert_eq!(v, 43);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_old_value() {
        let slot = CacheSlot::new(Some(1));
        let err = slot
            .get_or_refresh(true, |_| async { Err::<i32, _>(AppError::Other("boom".into())) })
            .await;
        assert!(err.is_err());
        assert_eq!(slot.peek().await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_refreshes_share_one_fetch() {
        let slot = Arc::new(CacheSlot::new(Some(0)));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let slot = Arc::clone(&slot);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    slot.get_or_refresh(true, |_| async move {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
                    })
                    .await
                })
            })
            .collect();

        for task in futures::future::join_all(tasks).await {
            assert_eq!(task.unwrap().unwrap(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let slot = CacheSlot::new(Some(vec![1, 2]));
        slot.update(|v| v.push(3)).await;
        assert_eq!(slot.peek().await, Some(vec![1, 2, 3]));

        let empty: CacheSlot<Vec<i32>> = CacheSlot::default();
        assert!(empty.update(|v| v.len()).await.is_none());
    }
}
