pub mod jsonl;
pub mod memory;

#[cfg(test)]
pub(crate) mod test_utils {
    use chrono::NaiveDateTime;
    use mn_core::NewsRecord;

    pub fn record(url: &str, tags: Option<&str>) -> NewsRecord {
        NewsRecord {
            url: url.to_string(),
            title: "地铁新线".to_string(),
            datetime: NaiveDateTime::parse_from_str("2024-01-19 23:00", mn_core::DATETIME_FORMAT).unwrap(),
            summary_pic_url: None,
            summary_content: "摘要".to_string(),
            source_tags: tags.map(str::to_string),
            source: Some("新民晚报".to_string()),
            journalist: None,
            editor: None,
            detailed_content: "subway".to_string(),
            detailed_pic_urls: vec![],
        }
    }
}
