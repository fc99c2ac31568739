//! 提交上下文
//!
//! 封装"我正在给哪道题提交什么代码"这一信息

use crate::models::Compiler;
use std::fmt::Display;

/// 一次提交所需的上下文
#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    /// 题目索引，例如 "A"
    pub index: String,

    /// 源代码
    pub code: String,

    pub compiler: Compiler,
}

impl SubmissionCtx {
    pub fn new(index: impl Into<String>, code: impl Into<String>, compiler: Compiler) -> Self {
        Self {
            index: index.into(),
            code: code.into(),
            compiler,
        }
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[题目 {} 编译器 {}]", self.index, self.compiler.name())
    }
}
