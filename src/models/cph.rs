use serde::{Deserialize, Serialize};

/// Competitive Companion / cph 插件读取的 `.prob` 题目文件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CphProb {
    /// `"{index}. {title}"`
    pub name: String,
    pub url: String,
    pub tests: Vec<CphTest>,
    pub interactive: bool,
    /// 毫秒
    pub time_limit: u64,
    /// MB
    pub memory_limit: u64,
    pub src_path: String,
    pub group: String,
    pub local: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CphTest {
    pub id: i64,
    pub input: String,
    pub output: String,
}
