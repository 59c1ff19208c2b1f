use mn_core::{DetailFields, NewsRecord, SummaryRecord};
use scraper::Html;
use tracing::debug;

use super::{element_text, StageContext};
use crate::patterns::{Attribution, CompiledPatterns};
use crate::request::ParseOutput;

/// Completes the carried summary with the detail page and applies the
/// keyword filter. Articles that miss the filter are dropped here.
pub fn extract_detail(summary: &SummaryRecord, document: &Html, ctx: &StageContext<'_>) -> ParseOutput {
    let fields = extract_fields(document, ctx.patterns, ctx.config.min_paragraph_len);
    if !ctx.patterns.matches_keywords(&fields.detailed_content) {
        debug!(url = %summary.url, title = %summary.title, "No keyword in article body, dropping");
        return ParseOutput::filtered();
    }
    ParseOutput::with_record(NewsRecord::merge(summary.clone(), fields))
}

/// Pulls breadcrumb tags, attribution and body content out of an article page.
pub fn extract_fields(document: &Html, patterns: &CompiledPatterns, min_paragraph_len: usize) -> DetailFields {
    let mut fields = DetailFields {
        source_tags: source_tags(document, patterns),
        ..Default::default()
    };

    for body in document.select(&patterns.article_body) {
        for span in body.select(&patterns.attribution) {
            if let Some((field, value)) = patterns.match_attribution(&element_text(span)) {
                let slot = match field {
                    Attribution::Source => &mut fields.source,
                    Attribution::Journalist => &mut fields.journalist,
                    Attribution::Editor => &mut fields.editor,
                };
                slot.get_or_insert(value);
            }
        }

        for paragraph in body.select(&patterns.paragraph) {
            let images: Vec<String> = paragraph
                .select(&patterns.paragraph_image)
                .filter_map(|img| img.value().attr("src"))
                .map(|src| src.trim().to_string())
                .collect();
            if !images.is_empty() {
                fields.detailed_pic_urls.extend(images);
                continue;
            }

            let text = element_text(paragraph);
            let text = text.trim();
            if text.chars().count() < min_paragraph_len {
                continue;
            }
            fields.detailed_content.push_str(text);
        }
    }

    fields
}

/// `您现在的位置：首页 > 新民头条 > 新民突发` becomes `新民头条-新民突发`.
///
/// The prefix is matched segment by segment with whitespace ignored, so
/// spacing around the `>` separators does not matter.
fn source_tags(document: &Html, patterns: &CompiledPatterns) -> Option<String> {
    let crumb = element_text(document.select(&patterns.breadcrumb).next()?);
    let mut prefix = crumb_segments(&patterns.breadcrumb_prefix).peekable();
    let tags: Vec<String> = crumb_segments(&crumb)
        .skip_while(|segment| prefix.next_if_eq(segment).is_some())
        .collect();
    (!tags.is_empty()).then(|| tags.join("-"))
}

fn crumb_segments(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split('>')
        .map(|segment| segment.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;
    use crate::patterns::SitePatterns;
    use chrono::NaiveDateTime;
    use mn_core::DATETIME_FORMAT;

    const FILLER: &str = "上海地铁十八号线二期工程今日正式开工建设预计明年底建成通车方便市民出行";

    fn page(body: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body>
               <div class="position">您现在的位置：首页 &gt; <a>新民头条</a> &gt; <a>新民突发</a></div>
               <div class="a_content">{}</div></body></html>"#,
            body
        ))
    }

    fn summary() -> SummaryRecord {
        SummaryRecord {
            url: "http://shanghai.xinmin.cn/tfbd/2024/01/19/1.html".to_string(),
            title: "标题".to_string(),
            datetime: NaiveDateTime::parse_from_str("2024-01-19 23:00", DATETIME_FORMAT).unwrap(),
            summary_pic_url: None,
            summary_content: "摘要".to_string(),
        }
    }

    fn fields(document: &Html) -> DetailFields {
        let patterns = SitePatterns::default().compile().unwrap();
        extract_fields(document, &patterns, 30)
    }

    #[test]
    fn test_source_span_only_sets_source() {
        let fields = fields(&page(r#"<div class="info"><span>来源：新民晚报</span><span>2024-01-19</span></div>"#));
        assert_eq!(fields.source.as_deref(), Some("新民晚报"));
        assert_eq!(fields.journalist, None);
        assert_eq!(fields.editor, None);
    }

    #[test]
    fn test_all_attribution_labels() {
        let fields = fields(&page(
            r#"<span>来源：新民晚报</span><span>记者：张三</span><span>编辑：李四</span>"#,
        ));
        assert_eq!(fields.source.as_deref(), Some("新民晚报"));
        assert_eq!(fields.journalist.as_deref(), Some("张三"));
        assert_eq!(fields.editor.as_deref(), Some("李四"));
    }

    #[test]
    fn test_paragraphs_and_images() {
        let filler = "x".repeat(40);
        let fields = fields(&page(&format!(
            r#"<p>短</p><p>{}</p><p><img src='x.jpg'></p>"#,
            filler
        )));
        assert_eq!(fields.detailed_content, filler);
        assert_eq!(fields.detailed_pic_urls, vec!["x.jpg"]);
    }

    #[test]
    fn test_paragraphs_joined_without_separator() {
        let a = "a".repeat(30);
        let b = "b".repeat(30);
        let fields = fields(&page(&format!("<p>  {}  </p><p>{}</p>", a, b)));
        assert_eq!(fields.detailed_content, format!("{}{}", a, b));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 12 CJK characters, 36 bytes.
        let fields = fields(&page("<p>十二个汉字不够三十个字符</p>"));
        assert!(fields.detailed_content.is_empty());
    }

    #[test]
    fn test_breadcrumb_tags() {
        assert_eq!(fields(&page("")).source_tags.as_deref(), Some("新民头条-新民突发"));
    }

    #[test]
    fn test_breadcrumb_spacing_does_not_leak_prefix() {
        let document = Html::parse_document(
            "<div class=\"position\">您现在的位置：首页&gt;新民头条\n  &gt;　新民突发 </div>",
        );
        assert_eq!(fields(&document).source_tags.as_deref(), Some("新民头条-新民突发"));
    }

    #[test]
    fn test_breadcrumb_without_prefix_keeps_all_segments() {
        let document = Html::parse_document(r#"<div class="position">社会 &gt; 交通</div>"#);
        assert_eq!(fields(&document).source_tags.as_deref(), Some("社会-交通"));
    }

    #[test]
    fn test_missing_breadcrumb_and_body() {
        let fields = fields(&Html::parse_document("<html><body><p>orphan</p></body></html>"));
        assert_eq!(fields, DetailFields::default());
    }

    #[test]
    fn test_keyword_gate() {
        let patterns = SitePatterns::default().compile().unwrap();
        let config = CrawlConfig::default();
        let ctx = StageContext {
            patterns: &patterns,
            config: &config,
            now: NaiveDateTime::parse_from_str("2024-01-20 00:00", DATETIME_FORMAT).unwrap(),
        };

        let relevant = page("<p>The new subway line opens to passengers this weekend in Shanghai.</p>");
        let output = extract_detail(&summary(), &relevant, &ctx);
        let record = output.record.expect("record with keyword is emitted");
        assert!(!output.filtered_out);
        assert_eq!(record.title, "标题");
        assert_eq!(record.source_tags.as_deref(), Some("新民头条-新民突发"));

        let unrelated = page("<p>The new bus line opens to passengers this weekend in Shanghai.</p>");
        let output = extract_detail(&summary(), &unrelated, &ctx);
        assert!(output.record.is_none());
        assert!(output.filtered_out);
    }

    #[test]
    fn test_chinese_keyword() {
        let fields = fields(&page(&format!("<p>{}</p>", FILLER)));
        let patterns = SitePatterns::default().compile().unwrap();
        assert!(patterns.matches_keywords(&fields.detailed_content));
    }
}
