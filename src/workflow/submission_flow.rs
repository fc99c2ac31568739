//! 提交流程 - 流程层
//!
//! 核心职责：定义"一次提交"的完整处理流程
//!
//! 流程顺序：
//! 1. 校验题目详情并提交代码
//! 2. 按固定间隔轮询判题状态，直到终态、超时或会话被取消
//! 3. 终态时分类结果并发布一次状态变化事件

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{JudgeStatus, SubmissionStatus};
use crate::services::ContestService;
use crate::utils::logging;
use crate::workflow::submission_ctx::SubmissionCtx;

/// 超时时给用户的提示
pub const TIMEOUT_MESSAGE: &str = "获取判题结果超时，请前往NowCoder网站查看结果";

/// 判题结果分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictKind {
    Accepted,
    /// 编译错误，附带编译信息
    CompileError,
    /// 其它所有非通过的终态
    Rejected,
}

/// 终态判题结果
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub kind: VerdictKind,
    pub status: SubmissionStatus,
}

impl Verdict {
    pub fn classify(status: SubmissionStatus) -> Self {
        let kind = match status.judge_status() {
            JudgeStatus::Accepted => VerdictKind::Accepted,
            JudgeStatus::CompileError => VerdictKind::CompileError,
            _ => VerdictKind::Rejected,
        };
        Self { kind, status }
    }

    pub fn is_accepted(&self) -> bool {
        self.kind == VerdictKind::Accepted
    }

    /// 展示给用户的结果描述
    pub fn message(&self) -> String {
        let status = &self.status;
        if self.is_accepted() {
            return format!("提交成功: {}", status.judge_reply_desc);
        }
        let mut message = format!("提交结果: {}\n{}", status.judge_reply_desc, status.desc);
        if self.kind == VerdictKind::CompileError && !status.memo.is_empty() {
            message.push_str(&format!("\n编译错误: {}", status.memo));
        }
        message
    }
}

/// 轮询结束的方式
#[derive(Debug, Clone, PartialEq)]
pub enum JudgeOutcome {
    Finished(Verdict),
    /// 轮询次数用尽仍未出结果
    TimedOut,
    /// 会话被关闭或切换
    Cancelled,
}

impl JudgeOutcome {
    pub fn message(&self) -> String {
        match self {
            JudgeOutcome::Finished(verdict) => verdict.message(),
            JudgeOutcome::TimedOut => TIMEOUT_MESSAGE.to_string(),
            JudgeOutcome::Cancelled => "已取消等待判题结果".to_string(),
        }
    }
}

/// 一次提交的处理报告
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub submission_id: u64,
    pub outcome: JudgeOutcome,
    /// 实际发出的状态查询次数
    pub queries: u32,
}

/// 提交流程
///
/// - 不持有会话，只依赖 [`ContestService`] 提供的业务能力
/// - 同一次提交的状态查询严格串行
pub struct SubmissionFlow {
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl SubmissionFlow {
    pub fn new(config: &Config) -> Self {
        Self::with_polling(config.poll_interval(), config.max_poll_attempts)
    }

    pub fn with_polling(poll_interval: Duration, max_poll_attempts: u32) -> Self {
        Self {
            poll_interval,
            max_poll_attempts,
        }
    }

    /// 提交代码并等待判题结果
    ///
    /// # 返回
    /// 提交失败时返回错误（不重试）；提交成功后总是返回报告，
    /// 超时和取消体现在 [`JudgeOutcome`] 中
    pub async fn run(
        &self,
        session: &ContestService,
        ctx: &SubmissionCtx,
    ) -> AppResult<SubmissionReport> {
        info!("{} 📤 正在提交代码...", ctx);
        let submission_id = session
            .submit_solution(&ctx.code, &ctx.index, ctx.compiler)
            .await?;
        let extra = session.problem_extra(&ctx.index, false).await?;

        info!("{} ⏳ 等待判题结果, 提交ID: {}", ctx, submission_id);
        let (outcome, queries) = self
            .poll(session, submission_id, &extra.tag_id, &extra.sub_tag_id)
            .await;

        match &outcome {
            JudgeOutcome::Finished(verdict) => logging::log_judge_finished(
                &ctx.index,
                submission_id,
                &verdict.status.judge_reply_desc,
            ),
            JudgeOutcome::TimedOut => warn!("{} ⚠️ {}", ctx, TIMEOUT_MESSAGE),
            JudgeOutcome::Cancelled => info!("{} 🛑 会话已切换，停止轮询", ctx),
        }

        Ok(SubmissionReport {
            submission_id,
            outcome,
            queries,
        })
    }

    /// 轮询判题状态
    ///
    /// 只在两次查询之间等待；查询失败和“等待判题”都继续轮询。
    ///
    /// # 返回
    /// `(结果, 查询次数)`
    pub async fn poll(
        &self,
        session: &ContestService,
        submission_id: u64,
        tag_id: &str,
        sub_tag_id: &str,
    ) -> (JudgeOutcome, u32) {
        let cancel = session.cancel_signal();
        let mut queries = 0;

        while queries < self.max_poll_attempts {
            if cancel.is_cancelled() {
                return (JudgeOutcome::Cancelled, queries);
            }
            if queries > 0 {
                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = cancel.cancelled() => return (JudgeOutcome::Cancelled, queries),
                }
            }

            queries += 1;
            let result = session
                .submission_status(submission_id, tag_id, sub_tag_id)
                .await
                .into_result();
            match result {
                Err(message) => {
                    warn!(
                        "⚠️ 第 {} 次查询提交 #{} 状态失败: {}",
                        queries, submission_id, message
                    );
                }
                Ok(status) if !status.judge_status().is_terminal() => {
                    debug!("提交 #{} 第 {} 次查询: 等待判题", submission_id, queries);
                }
                Ok(status) => {
                    let verdict = Verdict::classify(status.clone());
                    session.confirm_submission_status(status);
                    return (JudgeOutcome::Finished(verdict), queries);
                }
            }
        }

        (JudgeOutcome::TimedOut, queries)
    }
}
