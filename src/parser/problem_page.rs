use crate::models::{ProblemExample, ProblemExtra};
use crate::parser::markdown::element_to_markdown;
use crate::parser::{find_page_info_script, selector};
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

/// 解析题目页面
///
/// 页面结构缺失时对应字段为空字符串或空列表，不会返回错误。
///
/// # 参数
/// * `html` - 题目页面的完整 HTML
///
/// # 返回
/// 提交所需的四个 ID、Markdown 题面和样例
pub fn parse_problem_page(html: &str) -> ProblemExtra {
    let document = Html::parse_document(html);
    let script = find_page_info_script(&document).unwrap_or_default();

    let extra = ProblemExtra {
        tag_id: extract_id(&script, "tagId"),
        question_id: extract_id(&script, "questionId"),
        sub_tag_id: extract_id(&script, "subTagId"),
        done_question_id: extract_id(&script, "doneQuestionId"),
        content: parse_content(&document),
        examples: parse_examples(&document),
    };

    debug!(
        "题目页面解析完成: questionId={}, 样例数={}",
        extra.question_id,
        extra.examples.len()
    );
    extra
}

/// 从脚本中读取 `name: 'value'` 形式的字段
fn extract_id(script: &str, name: &str) -> String {
    let pattern = format!(r#"\b{}:\s*['"]([^'"]+)['"]"#, regex::escape(name));
    Regex::new(&pattern)
        .ok()
        .and_then(|re| re.captures(script).map(|caps| caps[1].to_string()))
        .unwrap_or_default()
}

fn parse_content(document: &Html) -> String {
    let description = document
        .select(&selector(".subject-describe .subject-question"))
        .next()
        .map(element_to_markdown)
        .unwrap_or_default();
    let input = section_after_heading(document, "输入描述:");
    let output = section_after_heading(document, "输出描述:");

    format!(
        "## 题目描述\n\n{}\n\n## 输入描述\n\n{}\n\n## 输出描述\n\n{}\n\n",
        description, input, output
    )
}

/// 标题 `h2` 之后紧邻的 `pre` 转换为 Markdown
fn section_after_heading(document: &Html, label: &str) -> String {
    document
        .select(&selector("h2"))
        .find(|h2| h2.text().collect::<String>().contains(label))
        .and_then(|h2| h2.next_siblings().find_map(ElementRef::wrap))
        .filter(|next| next.value().name() == "pre")
        .map(element_to_markdown)
        .unwrap_or_default()
}

fn parse_examples(document: &Html) -> Vec<ProblemExample> {
    let input_sel = selector(".question-oi-mod:first-child .question-oi-cont pre");
    let output_sel = selector(".question-oi-mod:nth-child(2) .question-oi-cont pre");
    let tips_sel = selector(".question-oi-mod:nth-child(3) .question-oi-cont pre");

    document
        .select(&selector(".question-oi"))
        .filter_map(|block| {
            let input = first_text(block, &input_sel);
            let output = first_text(block, &output_sel);
            if input.is_empty() || output.is_empty() {
                return None;
            }
            let tips = block
                .select(&tips_sel)
                .next()
                .map(element_to_markdown)
                .filter(|tips| !tips.trim().is_empty());
            Some(ProblemExample {
                input,
                output,
                tips,
            })
        })
        .collect()
}

fn first_text(block: ElementRef<'_>, sel: &scraper::Selector) -> String {
    block
        .select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><head>
<script>
  window.pageInfo = {
    questionId: '10086',
    tagId: "2001",
    subTagId: '3002',
    doneQuestionId: '4003'
  };
</script>
</head><body>
<div class="subject-describe">
  <div class="subject-question">给定 <b>n</b> 个数，求和。<img src="https://www.nowcoder.com/equation?tex=n" alt="n"></div>
</div>
<h2>输入描述:</h2><pre>第一行一个整数 n</pre>
<h2>输出描述:</h2><pre>输出答案</pre>
<div class="question-oi">
  <div class="question-oi-mod"><div class="question-oi-cont"><pre>
3
1 2 3
</pre></div></div>
  <div class="question-oi-mod"><div class="question-oi-cont"><pre>6</pre></div></div>
  <div class="question-oi-mod"><div class="question-oi-cont"><pre>1+2+3=6</pre></div></div>
</div>
<div class="question-oi">
  <div class="question-oi-mod"><div class="question-oi-cont"><pre>1</pre></div></div>
  <div class="question-oi-mod"><div class="question-oi-cont"><pre>1</pre></div></div>
</div>
<div class="question-oi">
  <div class="question-oi-mod"><div class="question-oi-cont"><pre>  </pre></div></div>
  <div class="question-oi-mod"><div class="question-oi-cont"><pre>0</pre></div></div>
</div>
</body></html>"#;

    #[test]
    fn test_extract_ids() {
        let extra = parse_problem_page(PAGE);
        assert_eq!(extra.question_id, "10086");
        assert_eq!(extra.tag_id, "2001");
        assert_eq!(extra.sub_tag_id, "3002");
        assert_eq!(extra.done_question_id, "4003");
        assert!(extra.can_submit());
    }

    #[test]
    fn test_content_sections() {
        let extra = parse_problem_page(PAGE);
        assert!(extra.content.starts_with("## 题目描述\n\n"));
        assert!(extra.content.contains("**n**"));
        assert!(extra.content.contains("$n$"));
        assert!(extra.content.contains("## 输入描述\n\n第一行一个整数 n\n\n"));
        assert!(extra.content.contains("## 输出描述\n\n输出答案\n\n"));
    }

    #[test]
    fn test_examples_are_trimmed_and_filtered() {
        let extra = parse_problem_page(PAGE);
        assert_eq!(extra.examples.len(), 2);
        assert_eq!(extra.examples[0].input, "3\n1 2 3");
        assert_eq!(extra.examples[0].output, "6");
        assert_eq!(extra.examples[0].tips.as_deref(), Some("1+2+3=6"));
        assert_eq!(extra.examples[1].tips, None);
    }

    #[test]
    fn test_page_without_markers() {
        let extra = parse_problem_page("<html><body><p>登录后查看</p></body></html>");
        assert_eq!(extra.question_id, "");
        assert!(!extra.can_submit());
        assert!(extra.examples.is_empty());
        assert!(extra.content.contains("## 题目描述"));
    }
}
