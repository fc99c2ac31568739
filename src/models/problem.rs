use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 题目基本信息（来自题目列表接口）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProblemInfo {
    pub score: i64,
    pub accepted_count: i64,
    pub submit_count: i64,
    pub tag_id: i64,
    /// 题目索引，例如 "A"
    pub index: String,
    pub my_status: String,
    pub problem_id: i64,
    pub title: String,
    /// 其余未建模的字段，原样保存
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 题目的额外信息（从题目页面解析）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProblemExtra {
    pub tag_id: String,
    pub question_id: String,
    pub sub_tag_id: String,
    pub done_question_id: String,
    /// Markdown 格式的题面
    pub content: String,
    pub examples: Vec<ProblemExample>,
}

impl ProblemExtra {
    /// 返回提交所需但为空的 ID 字段名
    pub fn missing_submit_ids(&self) -> Vec<&'static str> {
        [
            ("questionId", &self.question_id),
            ("tagId", &self.tag_id),
            ("subTagId", &self.sub_tag_id),
            ("doneQuestionId", &self.done_question_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect()
    }

    pub fn can_submit(&self) -> bool {
        self.missing_submit_ids().is_empty()
    }
}

/// 题目样例
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemExample {
    pub input: String,
    pub output: String,
    pub tips: Option<String>,
}

/// 完整题目信息
///
/// `extra` 为 None 表示尚未获取详情，通过
/// [`ContestService::problem_extra`](crate::services::ContestService::problem_extra) 按需获取。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub info: ProblemInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<ProblemExtra>,
}

impl Problem {
    pub fn new(info: ProblemInfo) -> Self {
        Self { info, extra: None }
    }

    pub fn index(&self) -> &str {
        &self.info.index
    }

    pub fn has_details(&self) -> bool {
        self.extra.is_some()
    }
}

/// 比赛题目列表接口的 data 部分
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContestProblemList {
    pub data: Vec<ProblemInfo>,
    pub basic_info: ContestBasicInfo,
}

/// 比赛基本信息
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContestBasicInfo {
    pub contest_id: u64,
    pub page_count: u32,
    pub problem_count: u32,
    pub page_size: u32,
    pub page_current: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_info_keeps_unknown_fields() {
        let json = r#"{"index":"A","title":"签到","problemId":1001,"tagId":7,"score":100,"info":{"x":1}}"#;
        let info: ProblemInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.index, "A");
        assert_eq!(info.problem_id, 1001);
        assert!(info.extra.contains_key("info"));

        let back = serde_json::to_value(&info).unwrap();
        assert_eq!(back["info"]["x"], 1);
        assert_eq!(back["problemId"], 1001);
    }

    #[test]
    fn test_missing_submit_ids() {
        let extra = ProblemExtra {
            tag_id: "1".into(),
            question_id: "2".into(),
            ..Default::default()
        };
        assert_eq!(extra.missing_submit_ids(), vec!["subTagId", "doneQuestionId"]);
        assert!(!extra.can_submit());
    }

    #[test]
    fn test_problem_without_extra_serializes_without_field() {
        let problem = Problem::new(ProblemInfo {
            index: "B".into(),
            ..Default::default()
        });
        let value = serde_json::to_value(&problem).unwrap();
        assert!(value.get("extra").is_none());
        assert!(!problem.has_details());
    }
}
