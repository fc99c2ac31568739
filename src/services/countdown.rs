//! 比赛倒计时

use crate::models::ContestInfo;
use chrono::{Local, TimeZone, Utc};
use std::fmt;

/// 比赛所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// 未开始，距开始的毫秒数
    NotStarted(i64),
    /// 进行中，距结束的毫秒数
    Running(i64),
    Ended,
}

impl Countdown {
    /// 按给定时刻计算（毫秒时间戳）
    pub fn at(info: &ContestInfo, now_ms: i64) -> Self {
        if now_ms > info.end_time {
            Countdown::Ended
        } else if now_ms < info.start_time {
            Countdown::NotStarted(info.start_time - now_ms)
        } else {
            Countdown::Running(info.end_time - now_ms)
        }
    }

    pub fn now(info: &ContestInfo) -> Self {
        Self::at(info, Utc::now().timestamp_millis())
    }

    /// 详细描述，例如 `比赛倒计时: 1小时2分3秒`
    pub fn describe(&self) -> String {
        match *self {
            Countdown::NotStarted(ms) => {
                let (h, m, s) = split_hms(ms);
                format!("距离比赛开始: {}小时{}分{}秒", h, m, s)
            }
            Countdown::Running(ms) => {
                let (h, m, s) = split_hms(ms);
                format!("比赛倒计时: {}小时{}分{}秒", h, m, s)
            }
            Countdown::Ended => "比赛已结束".to_string(),
        }
    }
}

fn split_hms(ms: i64) -> (i64, i64, i64) {
    let total = ms.max(0) / 1000;
    (total / 3600, total % 3600 / 60, total % 60)
}

/// `HH:MM:SS`，未开始时带 `-` 前缀
impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, ms) = match *self {
            Countdown::NotStarted(ms) => ("-", ms),
            Countdown::Running(ms) => ("", ms),
            Countdown::Ended => return write!(f, "比赛已结束"),
        };
        let (h, m, s) = split_hms(ms);
        write!(f, "{}{:02}:{:02}:{:02}", prefix, h, m, s)
    }
}

/// 毫秒时间戳转本地时间 `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ms.to_string(),
    }
}
