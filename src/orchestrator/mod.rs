//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层把命令行命令翻译成对下层的调用，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! app::App (处理一条命令)
//!     ↓
//! workflow::SubmissionFlow (处理一次提交)
//!     ↓
//! services (能力层：比赛空间 / 比赛会话 / 题面文档 / 倒计时)
//!     ↓
//! clients + infrastructure (判题站接口 / HttpClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层创建判题站客户端
//! 2. **向下依赖**：编排层 → workflow → services → clients → infrastructure
//! 3. **无业务逻辑**：只做调度和输出，不做具体业务判断

pub mod app;

pub use app::App;
