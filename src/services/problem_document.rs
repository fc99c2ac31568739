//! 比赛目录中的题目文件
//!
//! - `{index}.md`：题面文档
//! - `{index}.{ext}`：代码文件，第一行是编译器标记

use crate::error::{AppError, AppResult};
use crate::models::{Compiler, ProblemExtra, ProblemInfo};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

/// 生成题面 Markdown
///
/// 标题行 + 题面 + 样例（输入、输出、可选的说明）
pub fn render_problem_document(info: &ProblemInfo, extra: &ProblemExtra) -> String {
    let mut doc = format!("# {}. {}\n\n", info.index, info.title);
    doc.push_str(&extra.content);

    if !extra.examples.is_empty() {
        doc.push_str("## 样例\n\n");
        for (i, example) in extra.examples.iter().enumerate() {
            let _ = writeln!(doc, "### 样例 {}", i + 1);
            let _ = write!(doc, "**输入**:\n```\n{}\n```\n\n", example.input);
            let _ = write!(doc, "**输出**:\n```\n{}\n```\n\n", example.output);
            if let Some(tips) = &example.tips {
                let _ = write!(doc, "**说明**:  \n\n{}\n\n", tips);
            }
        }
    }
    doc
}

pub fn document_path(folder: &Path, index: &str) -> PathBuf {
    folder.join(format!("{}.md", index))
}

pub fn code_path(folder: &Path, index: &str, compiler: Compiler) -> PathBuf {
    folder.join(format!("{}.{}", index, compiler.ext()))
}

/// 写入题面文档，已存在时覆盖
///
/// # 返回
/// 文档路径
pub async fn write_problem_document(
    folder: &Path,
    info: &ProblemInfo,
    extra: &ProblemExtra,
) -> AppResult<PathBuf> {
    let path = document_path(folder, &info.index);
    tokio::fs::create_dir_all(folder)
        .await
        .map_err(|e| AppError::file_write_failed(folder.display().to_string(), e))?;
    tokio::fs::write(&path, render_problem_document(info, extra))
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
    info!("📝 题面已写入: {}", path.display());
    Ok(path)
}

/// 创建代码文件，只写入编译器标记；已存在时不修改
///
/// # 返回
/// `(路径, 是否新建)`
pub async fn create_code_file(
    folder: &Path,
    index: &str,
    compiler: Compiler,
) -> AppResult<(PathBuf, bool)> {
    let path = code_path(folder, index, compiler);
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Ok((path, false));
    }
    tokio::fs::create_dir_all(folder)
        .await
        .map_err(|e| AppError::file_write_failed(folder.display().to_string(), e))?;
    tokio::fs::write(&path, compiler.header_line())
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
    info!("📄 代码文件已创建: {}", path.display());
    Ok((path, true))
}
