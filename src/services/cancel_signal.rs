use std::sync::Arc;
use tokio::sync::watch;

/// 协作式取消信号
///
/// 会话持有一份，轮询循环持有克隆；调用 [`CancelSignal::cancel`] 后
/// 所有克隆都会观察到取消。
#[derive(Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// 等待取消，已经取消时立即返回
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // 发送端由 self 持有，wait_for 不会因通道关闭而失败
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}
