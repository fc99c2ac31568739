//! 页面解析：HTML 题面转 Markdown，题目页面与比赛页面的信息提取

pub mod contest_page;
pub mod markdown;
pub mod problem_page;

pub use contest_page::parse_contest_page;
pub use markdown::{element_to_markdown, html_to_markdown};
pub use problem_page::parse_problem_page;

use scraper::{Html, Selector};

/// 页面元数据所在脚本的标记
const PAGE_INFO_MARKER: &str = "window.pageInfo";

/// 解析固定的 CSS 选择器
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("CSS 选择器无效")
}

/// 找到包含 `window.pageInfo` 的 `<script>`，返回其文本
fn find_page_info_script(document: &Html) -> Option<String> {
    document
        .select(&selector("script"))
        .map(|script| script.text().collect::<String>())
        .find(|text| text.contains(PAGE_INFO_MARKER))
}
