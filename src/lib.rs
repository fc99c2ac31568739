//! # NowCoder Contest
//!
//! NowCoder 比赛助手：管理比赛目录、抓取题面并转换为 Markdown、
//! 提交代码并轮询判题结果
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 连接，只暴露能力
//! - `HttpClient` - 带凭证 cookie 的 HTML / JSON / 表单请求
//!
//! ### ② 接口与解析（Clients / Parser）
//! - `clients/` - `JudgeApi` 判题站接口，所有操作返回 `ApiResult`
//! - `parser/` - 题目页面、比赛页面解析，HTML 转 Markdown
//!
//! ### ③ 业务能力层（Services）
//! - `ContestService` - 一个比赛会话：配置、缓存、事件
//! - `ContestSpace` - 当前会话的协调者，切换比赛时转发事件、取消轮询
//! - `problem_document` / `countdown` - 题面文档、比赛倒计时
//!
//! ### ④ 流程层（Workflow）
//! - `SubmissionCtx` - 上下文封装（题目 + 代码 + 编译器）
//! - `SubmissionFlow` - 流程编排（提交 → 轮询 → 终态分类）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/app` - 命令行命令处理
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{JudgeApi, NowcoderClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ApiResult, Compiler, ContestConfig, Problem, ProblemExtra};
pub use orchestrator::App;
pub use services::{ContestService, ContestSpace};
pub use workflow::{JudgeOutcome, SubmissionCtx, SubmissionFlow};
