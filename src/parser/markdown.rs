//! HTML -> Markdown 转换
//!
//! 深度优先遍历 DOM，按标签输出对应的 Markdown 标记。
//! 判题站模板里常见 `<b><u>..</u></b>`、相邻的 `<strong>` 之类的嵌套，
//! 拼接子节点时会合并同类强调标记，最后再清理空标记。

use scraper::{ElementRef, Html, Node};

/// 公式图片的地址特征，命中时输出 `$alt$`
const EQUATION_PATH: &str = "nowcoder.com/equation";
/// Markdown 硬换行
const HARD_BREAK: &str = "  \n";
/// 不同数量的 `*` 相邻时插入的分隔符
const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// 将 HTML 片段转换为 Markdown
pub fn html_to_markdown(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    element_to_markdown(fragment.root_element())
}

/// 将元素的所有子节点转换为 Markdown（不包含元素自身的标记）
pub fn element_to_markdown(element: ElementRef<'_>) -> String {
    post_process(render_children(element))
}

fn render_children(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    // 上一个非空片段是否来自强调元素
    let mut after_emphasis = false;
    for child in element.children() {
        let (fragment, emphasis) = match child.value() {
            Node::Text(text) => (render_text(text), false),
            Node::Element(_) => match ElementRef::wrap(child) {
                Some(el) => (render_element(el), is_emphasis(el)),
                None => continue,
            },
            _ => continue,
        };
        if append_fragment(&mut out, &fragment, emphasis, after_emphasis && emphasis) {
            after_emphasis = emphasis;
        }
    }
    out
}

fn is_emphasis(element: ElementRef<'_>) -> bool {
    matches!(element.value().name(), "strong" | "b" | "em" | "i" | "u")
}

/// 文本节点：去掉首尾空白，内部换行变为硬换行
///
/// 已经是硬换行的行尾不会重复追加空格，因此对输出再转换一次结果不变。
fn render_text(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.contains('\n') {
        return trimmed.to_string();
    }
    trimmed
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join(HARD_BREAK)
}

fn render_element(element: ElementRef<'_>) -> String {
    let name = element.value().name();
    match name {
        "img" => render_image(element),
        "br" => HARD_BREAK.to_string(),
        "p" | "div" => format!("{}{}", render_children(element), HARD_BREAK),
        "strong" | "b" => format!("**{}**", render_children(element)),
        "em" | "i" => format!("*{}*", render_children(element)),
        "u" => render_underline(element),
        "code" => format!("`{}`", render_children(element)),
        "pre" => format!("\n```\n{}\n```\n", render_children(element)),
        "ul" | "ol" => render_children(element),
        "li" => format!("- {}\n", render_children(element)),
        "table" => format!("\n{}\n", render_children(element)),
        "tr" => format!("{}\n", render_children(element)),
        "th" | "td" => format!("| {} ", render_children(element)),
        "blockquote" => render_blockquote(&render_children(element)),
        _ => render_children(element),
    }
}

fn render_image(element: ElementRef<'_>) -> String {
    let src = element.value().attr("src").unwrap_or_default();
    let alt = element.value().attr("alt").unwrap_or_default();
    if src.contains(EQUATION_PATH) {
        format!(" ${}$ ", alt)
    } else {
        format!(" ![{}]({}) ", alt, src)
    }
}

/// `<u><strong>..</strong></u>` 按加粗处理，其余输出 `__..__`
fn render_underline(element: ElementRef<'_>) -> String {
    let first_strong = element
        .first_child()
        .and_then(ElementRef::wrap)
        .filter(|child| child.value().name() == "strong");
    match first_strong {
        Some(strong) => format!("**{}**", strong.text().collect::<String>().trim()),
        None => format!("__{}__", render_children(element)),
    }
}

fn render_blockquote(content: &str) -> String {
    let quoted = content
        .trim_end_matches('\n')
        .lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n", quoted)
}

/// 拼接一个子节点的输出
///
/// - 块结束（或开头）后紧跟的空格会被去掉；
/// - 只由 `*` 组成的强调片段（空的加粗、斜体）直接丢弃；
/// - `seam` 表示两个强调元素相邻：结尾的 `*` 与开头的 `*` 数量相同则合并为同一段强调，
///   数量不同则插入零宽空格，避免字符被并入相邻的强调。文本里的 `*` 原样保留。
///
/// # 返回
/// 是否追加了内容
fn append_fragment(out: &mut String, fragment: &str, emphasis: bool, seam: bool) -> bool {
    let mut fragment = fragment;
    if out.is_empty() || out.ends_with('\n') {
        fragment = fragment.trim_start_matches(' ');
    }
    if fragment.is_empty() || (emphasis && fragment.trim_start_matches('*').is_empty()) {
        return false;
    }

    if seam {
        let trailing = out.len() - out.trim_end_matches('*').len();
        let leading = fragment.len() - fragment.trim_start_matches('*').len();
        if trailing > 0 && leading > 0 {
            if trailing == leading {
                out.truncate(out.len() - trailing);
                fragment = &fragment[leading..];
            } else {
                out.push(ZERO_WIDTH_SPACE);
            }
        }
    }
    out.push_str(fragment);
    true
}

/// 清理空标记与加粗/下划线的边界
fn post_process(markdown: String) -> String {
    markdown
        .replace("****", "")
        .replace("____", "")
        .replace("**__", "**")
        .replace("__**", "**")
}
