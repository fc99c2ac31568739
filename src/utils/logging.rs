/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 优先使用 `RUST_LOG`，否则根据 `verbose` 选择 `debug` 或 `info`。
/// 重复调用是安全的（测试中会多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `contest_id`: 当前比赛ID（未打开比赛时为 None）
pub fn log_startup(contest_id: Option<u64>) {
    info!("{}", "=".repeat(60));
    info!("🚀 NowCoder 比赛助手启动");
    match contest_id {
        Some(id) => info!("📋 当前比赛: {}", id),
        None => info!("📋 未打开比赛"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录判题完成信息
pub fn log_judge_finished(index: &str, submission_id: u64, verdict: &str) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 题目 {} 提交 #{} 判题完成: {}", index, submission_id, verdict);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
