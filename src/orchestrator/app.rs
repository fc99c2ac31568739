//! 命令处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是命令行的入口，负责把每条命令翻译成对比赛空间的调用。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建判题站客户端和比赛空间，订阅空间事件
//! 2. **比赛目录**：创建 / 打开比赛目录
//! 3. **题目**：列出题目、写出题面文档、创建代码文件与 cph 题目文件
//! 4. **提交**：识别编译器，委托 [`SubmissionFlow`] 提交并等待结果
//! 5. **查看**：提交记录、实时排名、比赛倒计时

use crate::clients::{JudgeApi, NowcoderClient};
use crate::config::Config;
use crate::error::{AppError, AppResult, ContestError};
use crate::models::{Compiler, Problem, RealtimeRank, SubmissionListItem};
use crate::services::countdown::{self, Countdown};
use crate::services::{cph_prob, problem_document, ContestService, ContestSpace, Subscription};
use crate::utils::logging;
use crate::workflow::{SubmissionCtx, SubmissionFlow, SubmissionReport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    space: ContestSpace,
    flow: SubmissionFlow,
    _subscriptions: Subscription,
}

impl App {
    /// 初始化应用（使用真实的判题站客户端）
    pub fn initialize(config: Config) -> AppResult<Self> {
        let api = Arc::new(NowcoderClient::new(&config)?);
        Ok(Self::with_api(config, api))
    }

    /// 使用指定的判题站接口初始化应用
    pub fn with_api(config: Config, api: Arc<dyn JudgeApi>) -> Self {
        let space = ContestSpace::new(api, config.config_file_name.clone());
        let events = space.events();
        let subscriptions = Subscription::merge(vec![
            events.submission_status_changed.subscribe(|status| {
                info!(
                    "🔔 提交 #{} 状态更新: {}",
                    status.id, status.judge_reply_desc
                );
            }),
            events.problems_updated.subscribe(|problems| {
                debug!("题目列表更新: {} 道题目", problems.len());
            }),
        ]);

        Self {
            flow: SubmissionFlow::new(&config),
            config,
            space,
            _subscriptions: subscriptions,
        }
    }

    pub fn space(&self) -> &ContestSpace {
        &self.space
    }

    async fn open(&self, folder: &Path) -> AppResult<Arc<ContestService>> {
        let session = self.space.open(folder).await?;
        logging::log_startup(Some(session.contest_id()));
        Ok(session)
    }

    /// 创建比赛目录并拉取题目列表
    pub async fn create(&self, folder: &Path, contest_id: u64) -> AppResult<Vec<Problem>> {
        let session = self.space.create(folder, contest_id).await?;
        logging::log_startup(Some(contest_id));
        let problems = session.problems(true).await?;
        print_problems(&problems);
        Ok(problems)
    }

    /// 列出题目
    pub async fn problems(&self, folder: &Path, force: bool) -> AppResult<Vec<Problem>> {
        let session = self.open(folder).await?;
        let problems = session.problems(force).await?;
        print_problems(&problems);
        Ok(problems)
    }

    /// 拉取最新题面并写入 `{index}.md`
    pub async fn open_problem(&self, folder: &Path, index: &str) -> AppResult<PathBuf> {
        let session = self.open(folder).await?;
        let problem = session
            .problem(index, false)
            .await?
            .ok_or_else(|| AppError::problem_not_found(index))?;
        let extra = session.problem_extra(index, true).await?;
        let path =
            problem_document::write_problem_document(session.folder(), &problem.info, &extra)
                .await?;
        println!("{}", path.display());
        Ok(path)
    }

    /// 创建带编译器标记的代码文件
    ///
    /// `cph` 为 true 时同时生成 cph 题目文件，样例作为测试用例。
    pub async fn create_code_file(
        &self,
        folder: &Path,
        index: &str,
        language: &str,
        cph: bool,
    ) -> AppResult<PathBuf> {
        let compiler = Compiler::from_name(language).ok_or_else(|| ContestError::UnknownCompiler {
            name: language.to_string(),
        })?;
        let session = self.open(folder).await?;
        let mut problem = session
            .problem(index, false)
            .await?
            .ok_or_else(|| AppError::problem_not_found(index))?;

        let (path, created) =
            problem_document::create_code_file(session.folder(), index, compiler).await?;
        if !created {
            info!("📄 代码文件已存在: {}", path.display());
        }

        if cph {
            match session.problem_extra(index, false).await {
                Ok(extra) => problem.extra = Some(extra),
                Err(e) => warn!("⚠️ 获取题目详情失败，cph 题目文件不含样例: {}", e),
            }
            let file_name = format!("{}.{}", index, compiler.ext());
            cph_prob::write_prob_if_absent(session.folder(), &file_name, &problem).await?;
        }
        println!("{}", path.display());
        Ok(path)
    }

    /// 提交代码文件并等待判题结果
    ///
    /// # 参数
    /// - `file`: 代码文件
    /// - `language`: 代码中没有编译器标记时使用的编译器名
    pub async fn submit(
        &self,
        folder: &Path,
        index: &str,
        file: &Path,
        language: Option<&str>,
    ) -> AppResult<SubmissionReport> {
        self.config.require_token()?;
        let code = tokio::fs::read_to_string(file)
            .await
            .map_err(|e| AppError::file_read_failed(file.display().to_string(), e))?;
        let compiler = resolve_compiler(&code, file, language)?;

        let session = self.open(folder).await?;
        let ctx = SubmissionCtx::new(index, code, compiler);
        let report = self.flow.run(&session, &ctx).await?;
        println!("{}", report.outcome.message());

        let (submissions, rank) =
            futures::join!(session.submissions(true), session.realtime_rank(true));
        if let Err(e) = submissions {
            warn!("⚠️ 刷新提交记录失败: {}", e);
        }
        if let Err(e) = rank {
            warn!("⚠️ 刷新实时排名失败: {}", e);
        }
        Ok(report)
    }

    /// 列出自己的提交记录
    pub async fn submissions(&self, folder: &Path) -> AppResult<Vec<SubmissionListItem>> {
        self.config.require_token()?;
        let session = self.open(folder).await?;
        let items = session.submissions(true).await?;
        if items.is_empty() {
            println!("暂无提交记录");
        }
        for item in &items {
            println!(
                "{} | {}",
                item,
                countdown::format_timestamp(item.submit_time)
            );
        }
        Ok(items)
    }

    /// 显示实时排名前 `limit` 名
    pub async fn rank(&self, folder: &Path, limit: usize) -> AppResult<RealtimeRank> {
        let session = self.open(folder).await?;
        let rank = session.realtime_rank(true).await?;
        print_rank(&rank, limit);
        Ok(rank)
    }

    /// 显示比赛倒计时，`watch` 时每秒刷新直到比赛结束或 Ctrl-C
    pub async fn countdown(&self, folder: &Path, watch: bool) -> AppResult<Countdown> {
        let session = self.open(folder).await?;
        let contest = session.contest_info(false).await?;
        println!(
            "比赛时间: {} ~ {}",
            countdown::format_timestamp(contest.start_time),
            countdown::format_timestamp(contest.end_time)
        );

        let mut current = Countdown::now(&contest);
        println!("{}  ({})", current, current.describe());
        if !watch {
            return Ok(current);
        }

        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.tick().await;
        while current != Countdown::Ended {
            tokio::select! {
                _ = ticker.tick() => {
                    current = Countdown::now(&contest);
                    println!("{}", current);
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
        Ok(current)
    }
}

/// 确定提交使用的编译器
///
/// 优先使用代码头部的编译器标记，其次是命令行指定的编译器名。
fn resolve_compiler(code: &str, file: &Path, language: Option<&str>) -> AppResult<Compiler> {
    let ext = file.extension().and_then(|e| e.to_str());
    if let Some(compiler) = Compiler::detect_in_code(code, ext) {
        debug!("从代码头部识别编译器: {}", compiler.name());
        return Ok(compiler);
    }
    let name = language.unwrap_or_default();
    Compiler::from_name(name).ok_or_else(|| {
        ContestError::UnknownCompiler {
            name: if name.is_empty() {
                "未指定".to_string()
            } else {
                name.to_string()
            },
        }
        .into()
    })
}

fn print_problems(problems: &[Problem]) {
    for problem in problems {
        let info = &problem.info;
        println!(
            "{}. {}  (通过 {}/{}){}",
            info.index,
            info.title,
            info.accepted_count,
            info.submit_count,
            if problem.has_details() { "" } else { "  *" }
        );
    }
}

fn print_rank(rank: &RealtimeRank, limit: usize) {
    let headers: Vec<&str> = rank.problem_data.iter().map(|p| p.name.as_str()).collect();
    println!("排名 | 用户 | 通过 | 罚时 | {}", headers.join(" "));
    for row in rank.rank_data.iter().take(limit) {
        let marks: Vec<String> = row
            .score_list
            .iter()
            .map(|score| match (score.accepted, score.failed_count) {
                (true, 0) => "+".to_string(),
                (true, n) => format!("+{}", n),
                (false, 0) => ".".to_string(),
                (false, n) => format!("-{}", n),
            })
            .collect();
        println!(
            "{} | {} | {} | {} | {}",
            row.ranking,
            logging::truncate_text(&row.user_name, 16),
            row.accepted_count,
            row.penalty_time,
            marks.join(" ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::scripted::ScriptedJudge;
    use crate::models::{CphProb, ProblemExample, ProblemExtra};

    #[test]
    fn test_header_wins_over_language_flag() {
        let code = "// Nowcoder Compiler: Rust\nfn main() {}";
        let compiler = resolve_compiler(code, Path::new("A.rs"), Some("Python3")).unwrap();
        assert_eq!(compiler, Compiler::Rust);
    }

    #[test]
    fn test_language_flag_fallback() {
        let compiler = resolve_compiler("print(1)", Path::new("A.py"), Some("Python3")).unwrap();
        assert_eq!(compiler, Compiler::Python3);

        let err = resolve_compiler("print(1)", Path::new("A.py"), None).unwrap_err();
        assert_eq!(err.to_string(), "比赛错误: 无法识别的编译器: 未指定");
    }

    #[tokio::test]
    async fn test_code_command_writes_cph_prob() {
        let dir = std::env::temp_dir().join(format!("nowcoder-app-code-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let judge = ScriptedJudge::with_problems(&["A", "B"]);
        judge.set_extra(
            "A",
            ProblemExtra {
                examples: vec![ProblemExample {
                    input: "1 2".into(),
                    output: "3".into(),
                    tips: None,
                }],
                ..Default::default()
            },
        );
        let app = App::with_api(Config::default(), Arc::new(judge));
        app.space().create(&dir, 100).await.unwrap();

        let path = app
            .create_code_file(&dir, "A", "C++(g++ 13)", true)
            .await
            .unwrap();
        assert!(path.ends_with("A.cpp"));

        let folder = std::fs::canonicalize(&dir).unwrap();
        let prob_path = cph_prob::prob_path(&folder, "A.cpp");
        let prob: CphProb =
            serde_json::from_str(&std::fs::read_to_string(&prob_path).unwrap()).unwrap();
        assert_eq!(prob.name, "A. 题目 A");
        assert_eq!(prob.tests.len(), 1);
        assert_eq!(prob.tests[0].output, "3");

        app.create_code_file(&dir, "B", "C++(g++ 13)", false)
            .await
            .unwrap();
        assert!(!cph_prob::prob_path(&folder, "B.cpp").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
