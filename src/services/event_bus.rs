//! 事件总线 - 业务能力层
//!
//! 一个 [`Topic`] 对应一种事件：多个订阅者互不影响，
//! 新订阅者会立即收到最近一次发布的值。

use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct TopicState<T> {
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
    latest: Option<T>,
}

/// 发布 / 订阅主题
///
/// 克隆得到的 Topic 与原值共享订阅者列表。
pub struct Topic<T> {
    state: Arc<Mutex<TopicState<T>>>,
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Send + 'static> Default for Topic<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(state: &Mutex<TopicState<T>>) -> MutexGuard<'_, TopicState<T>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Clone + Send + 'static> Topic<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(TopicState {
                next_id: 0,
                subscribers: Vec::new(),
                latest: None,
            })),
        }
    }

    /// 注册订阅者
    ///
    /// 已经发布过值时立即用最近的值回调一次。
    /// 返回的 [`Subscription`] 被丢弃时自动取消订阅。
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let callback: Callback<T> = Arc::new(callback);
        let (id, latest) = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, Arc::clone(&callback)));
            (id, state.latest.clone())
        };

        if let Some(value) = latest {
            callback(&value);
        }

        let weak: Weak<Mutex<TopicState<T>>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                lock(&state).subscribers.retain(|(sid, _)| *sid != id);
            }
        })
    }

    /// 发布新值并通知所有订阅者
    ///
    /// 回调在锁外执行，订阅者可以在回调中再次订阅或发布。
    pub fn publish(&self, value: T) {
        let subscribers: Vec<Callback<T>> = {
            let mut state = lock(&self.state);
            state.latest = Some(value.clone());
            state.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in subscribers {
            callback(&value);
        }
    }

    /// 最近一次发布的值
    pub fn latest(&self) -> Option<T> {
        lock(&self.state).latest.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }
}

/// 订阅句柄，丢弃时取消订阅
#[must_use = "丢弃 Subscription 会立即取消订阅"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// 组合多个订阅，一起取消
    pub fn merge(subscriptions: Vec<Subscription>) -> Self {
        Self::new(move || drop(subscriptions))
    }

    /// 显式取消订阅
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
