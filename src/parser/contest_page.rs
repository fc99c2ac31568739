use crate::models::ContestInfo;
use crate::parser::find_page_info_script;
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;
use tracing::debug;

fn page_info_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)window\.pageInfo\s*=\s*(\{.*?\});").expect("pageInfo 正则无效")
    })
}

/// 解析比赛页面中的 `window.pageInfo`
///
/// 缺少脚本、匹配失败或 JSON 无效时返回 None。
pub fn parse_contest_page(html: &str) -> Option<ContestInfo> {
    let document = Html::parse_document(html);
    let Some(script) = find_page_info_script(&document) else {
        debug!("比赛页面中没有 window.pageInfo 脚本");
        return None;
    };

    let captures = page_info_regex().captures(&script)?;
    match serde_json::from_str::<ContestInfo>(&captures[1]) {
        Ok(info) => Some(info),
        Err(e) => {
            debug!("pageInfo 解析失败: {}", e);
            None
        }
    }
}
