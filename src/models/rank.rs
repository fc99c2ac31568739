use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 实时排名快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RealtimeRank {
    pub basic_info: RankBasicInfo,
    pub rank_data: Vec<RankRow>,
    pub problem_data: Vec<RankProblem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RealtimeRank {
    /// 按用户名查找排名行
    pub fn find_user(&self, user_name: &str) -> Option<&RankRow> {
        self.rank_data.iter().find(|row| row.user_name == user_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RankBasicInfo {
    pub contest_id: u64,
    pub page_count: u32,
    pub page_size: u32,
    pub page_current: u32,
    pub rank_count: u32,
    pub contest_begin_time: i64,
    pub contest_end_time: i64,
}

/// 一名选手的排名
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RankRow {
    pub ranking: u32,
    pub uid: u64,
    pub user_name: String,
    pub school: String,
    pub accepted_count: u32,
    pub penalty_time: i64,
    pub score_list: Vec<RankScore>,
}

/// 选手在某道题上的得分状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RankScore {
    pub accepted: bool,
    pub failed_count: u32,
    pub accepted_time: i64,
    pub first_blood: bool,
    pub problem_id: u64,
}

/// 排名表头中的题目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RankProblem {
    pub name: String,
    pub problem_id: u64,
    pub accepted_count: u32,
    pub submit_count: u32,
}
