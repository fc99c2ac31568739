//! cph 题目文件
//!
//! 代码文件 `{folder}/{file}` 对应的样例保存在
//! `{folder}/.cph/.{file}_{md5(源文件路径)}.prob`，cph 插件打开代码文件时据此加载测试用例。

use crate::error::{AppError, AppResult};
use crate::models::{CphProb, CphTest, Problem};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CPH_DIR: &str = ".cph";
const TIME_LIMIT_MS: u64 = 3000;
const MEMORY_LIMIT_MB: u64 = 1024;

/// 路径字符串的 md5（32 位小写十六进制）
pub fn path_hash(src_path: &str) -> String {
    format!("{:x}", md5::compute(src_path.as_bytes()))
}

pub fn prob_path(folder: &Path, src_file_name: &str) -> PathBuf {
    let src_path = folder.join(src_file_name);
    folder.join(CPH_DIR).join(format!(
        ".{}_{}.prob",
        src_file_name,
        path_hash(&src_path.to_string_lossy())
    ))
}

/// 由题目生成 `.prob` 内容，样例按顺序转成测试用例
///
/// 还没有获取详情的题目生成空的测试列表。
pub fn build_prob(folder: &Path, src_file_name: &str, problem: &Problem) -> CphProb {
    let src_path = folder.join(src_file_name).to_string_lossy().into_owned();
    let now = Utc::now().timestamp_millis();
    let tests = problem
        .extra
        .iter()
        .flat_map(|extra| extra.examples.iter())
        .enumerate()
        .map(|(i, example)| CphTest {
            id: now + i as i64,
            input: example.input.clone(),
            output: example.output.clone(),
        })
        .collect();

    CphProb {
        name: format!("{}. {}", problem.info.index, problem.info.title),
        url: src_path.clone(),
        tests,
        interactive: false,
        time_limit: TIME_LIMIT_MS,
        memory_limit: MEMORY_LIMIT_MB,
        src_path,
        group: "local".to_string(),
        local: true,
    }
}

/// 写入 `.prob` 文件；已有可读的 `.prob` 时不修改
///
/// `folder` 会先转换为绝对路径，与 cph 插件计算哈希时使用的路径一致。
///
/// # 返回
/// `(路径, 是否新建)`
pub async fn write_prob_if_absent(
    folder: &Path,
    src_file_name: &str,
    problem: &Problem,
) -> AppResult<(PathBuf, bool)> {
    let folder = tokio::fs::canonicalize(folder)
        .await
        .unwrap_or_else(|_| folder.to_path_buf());
    let path = prob_path(&folder, src_file_name);

    if let Ok(existing) = tokio::fs::read_to_string(&path).await {
        if serde_json::from_str::<CphProb>(&existing).is_ok() {
            debug!("cph 题目文件已存在: {}", path.display());
            return Ok((path, false));
        }
    }

    let dir = folder.join(CPH_DIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;
    let prob = build_prob(&folder, src_file_name, problem);
    let json = serde_json::to_string(&prob)
        .map_err(|e| AppError::Other(format!("序列化 cph 题目文件失败: {}", e)))?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
    info!(
        "🧪 cph 题目文件已创建: {} ({} 组样例)",
        path.display(),
        prob.tests.len()
    );
    Ok((path, true))
}
