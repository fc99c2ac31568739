use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nowcoder_contest::utils::logging;
use nowcoder_contest::{App, Config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nowcoder", about = "NowCoder 比赛助手", version)]
struct Cli {
    /// 程序配置文件（TOML）
    #[arg(short, long, default_value = "nowcoder.toml")]
    config: PathBuf,

    /// 比赛目录
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 创建比赛目录并拉取题目列表
    Create {
        /// 比赛 ID
        contest_id: u64,
    },
    /// 列出题目
    Problems {
        /// 忽略缓存重新拉取
        #[arg(short, long)]
        force: bool,
    },
    /// 把题面写入 {index}.md
    Open { index: String },
    /// 创建带编译器标记的代码文件
    Code {
        index: String,
        /// 编译器名，例如 "C++(g++ 13)"、"Python3"
        #[arg(short, long, default_value = "C++(g++ 13)")]
        lang: String,
        /// 不生成 cph 题目文件
        #[arg(long)]
        no_cph: bool,
    },
    /// 提交代码并等待判题结果
    Submit {
        index: String,
        /// 代码文件
        file: PathBuf,
        /// 代码中没有编译器标记时使用的编译器
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// 查看自己的提交记录
    Submissions,
    /// 查看实时排名
    Rank {
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// 比赛倒计时
    Countdown {
        /// 每秒刷新
        #[arg(short, long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(&cli.config)
        .with_context(|| format!("加载配置失败: {}", cli.config.display()))?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行命令
    let app = App::initialize(config).context("初始化判题站客户端失败")?;
    let dir = cli.dir.as_path();
    let result = match cli.command {
        Commands::Create { contest_id } => app.create(dir, contest_id).await.map(drop),
        Commands::Problems { force } => app.problems(dir, force).await.map(drop),
        Commands::Open { index } => app.open_problem(dir, &index).await.map(drop),
        Commands::Code { index, lang, no_cph } => app
            .create_code_file(dir, &index, &lang, !no_cph)
            .await
            .map(drop),
        Commands::Submit { index, file, lang } => {
            app.submit(dir, &index, &file, lang.as_deref()).await.map(drop)
        }
        Commands::Submissions => app.submissions(dir).await.map(drop),
        Commands::Rank { limit } => app.rank(dir, limit).await.map(drop),
        Commands::Countdown { watch } => app.countdown(dir, watch).await.map(drop),
    };

    if let Err(e) = &result {
        tracing::error!("❌ {}", e);
    }
    result.context("命令执行失败")
}
