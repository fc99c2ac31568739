use crate::models::compiler::Compiler;
use crate::models::problem::ProblemExtra;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 提交状态代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JudgeStatus {
    /// 等待判题
    Waiting,
    /// 答案正确
    Accepted,
    /// 答案错误
    WrongAnswer,
    /// 编译错误
    CompileError,
    /// 其它终态（超时、段错误等）
    Other(i64),
}

impl JudgeStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => JudgeStatus::Waiting,
            5 => JudgeStatus::Accepted,
            4 => JudgeStatus::WrongAnswer,
            12 => JudgeStatus::CompileError,
            other => JudgeStatus::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            JudgeStatus::Waiting => 0,
            JudgeStatus::Accepted => 5,
            JudgeStatus::WrongAnswer => 4,
            JudgeStatus::CompileError => 12,
            JudgeStatus::Other(code) => code,
        }
    }

    /// 除了“等待判题”以外都是终态
    pub fn is_terminal(self) -> bool {
        self != JudgeStatus::Waiting
    }
}

impl fmt::Display for JudgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JudgeStatus::Waiting => write!(f, "等待判题"),
            JudgeStatus::Accepted => write!(f, "答案正确"),
            JudgeStatus::WrongAnswer => write!(f, "答案错误"),
            JudgeStatus::CompileError => write!(f, "编译错误"),
            JudgeStatus::Other(code) => write!(f, "状态 {}", code),
        }
    }
}

/// 提交状态（判题站 `/nccommon/status` 返回）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionStatus {
    pub id: u64,
    pub status: i64,
    pub judge_reply_desc: String,
    pub desc: String,
    /// 编译信息，编译错误时有值
    pub memo: String,
    pub time_consumption: i64,
    pub memory_consumption: i64,
    pub right_hundred_rate: f64,
    pub all_case_num: Option<i64>,
    pub right_case_num: Option<i64>,
    pub language: Option<String>,
    pub is_complete: Option<bool>,
}

impl SubmissionStatus {
    pub fn judge_status(&self) -> JudgeStatus {
        JudgeStatus::from_code(self.status)
    }
}

/// `/nccommon/submit_cd` 的表单
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub question_id: String,
    pub tag_id: String,
    pub sub_tag_id: String,
    pub content: String,
    pub language: String,
    pub language_name: String,
    pub done_question_id: String,
}

impl SubmitRequest {
    pub fn new(extra: &ProblemExtra, code: &str, compiler: Compiler) -> Self {
        Self {
            question_id: extra.question_id.clone(),
            tag_id: extra.tag_id.clone(),
            sub_tag_id: extra.sub_tag_id.clone(),
            content: code.to_string(),
            language: compiler.id().to_string(),
            language_name: compiler.name().to_string(),
            done_question_id: extra.done_question_id.clone(),
        }
    }
}

/// 提交列表接口的 data 部分
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionList {
    pub data: Vec<SubmissionListItem>,
    pub is_contest_finished: bool,
    pub basic_info: SubmissionListBasicInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionListBasicInfo {
    pub basic_uid: u64,
    pub contest_id: u64,
    pub page_count: u32,
    pub page_size: u32,
    pub status_count: u32,
    pub search_user_name: String,
    pub page_current: u32,
}

/// 提交记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionListItem {
    pub submission_id: u64,
    pub index: String,
    pub status_message: String,
    pub language: String,
    pub language_name: String,
    pub language_category_name: String,
    pub user_name: String,
    pub user_id: u64,
    pub problem_id: u64,
    /// 毫秒时间戳
    pub submit_time: i64,
    pub time: Option<i64>,
    pub memory: Option<i64>,
    pub length: i64,
    pub color_level: i64,
    pub is_team: bool,
}

impl fmt::Display for SubmissionListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dash = || "---".to_string();
        write!(
            f,
            "#{} {} - {} | 语言:{} | 时间:{}ms | 内存:{}KB",
            self.submission_id,
            self.index,
            self.status_message,
            self.language,
            self.time.map(|t| t.to_string()).unwrap_or_else(dash),
            self.memory.map(|m| m.to_string()).unwrap_or_else(dash),
        )
    }
}
