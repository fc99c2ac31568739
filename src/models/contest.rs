use crate::error::{AppResult, ContestError};
use crate::models::problem::Problem;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 比赛目录下的配置文件内容（`nowcoderac.json`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestConfig {
    #[serde(default)]
    pub contest_id: u64,
    #[serde(default)]
    pub problems: Vec<Problem>,
}

impl ContestConfig {
    pub fn new(contest_id: u64) -> Self {
        Self {
            contest_id,
            problems: Vec::new(),
        }
    }

    /// 缺少 contestId 的配置视为无效
    pub fn validate(&self) -> AppResult<()> {
        if self.contest_id == 0 {
            return Err(ContestError::MissingContestId.into());
        }
        Ok(())
    }

    pub fn find_problem(&self, index: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.info.index == index)
    }
}

/// 比赛页面中 `window.pageInfo` 携带的比赛信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestInfo {
    /// 开始时间（毫秒时间戳）
    pub start_time: i64,
    /// 结束时间（毫秒时间戳）
    pub end_time: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
