use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of the listing timestamps, and of `datetime` when serialized.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The half of a record known after the listing page. It rides along with
/// the detail request and is merged once the detail page has been parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub url: String,
    pub title: String,
    #[serde(with = "datetime_format")]
    pub datetime: NaiveDateTime,
    pub summary_pic_url: Option<String>,
    pub summary_content: String,
}

/// Fields extracted from the detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailFields {
    pub source_tags: Option<String>,
    pub source: Option<String>,
    pub journalist: Option<String>,
    pub editor: Option<String>,
    pub detailed_content: String,
    pub detailed_pic_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub url: String,
    pub title: String,
    #[serde(with = "datetime_format")]
    pub datetime: NaiveDateTime,
    pub summary_pic_url: Option<String>,
    pub summary_content: String,
    pub source_tags: Option<String>,
    pub source: Option<String>,
    pub journalist: Option<String>,
    pub editor: Option<String>,
    pub detailed_content: String,
    pub detailed_pic_urls: Vec<String>,
}

impl NewsRecord {
    pub fn merge(summary: SummaryRecord, detail: DetailFields) -> Self {
        Self {
            url: summary.url,
            title: summary.title,
            datetime: summary.datetime,
            summary_pic_url: summary.summary_pic_url,
            summary_content: summary.summary_content,
            source_tags: detail.source_tags,
            source: detail.source,
            journalist: detail.journalist,
            editor: detail.editor,
            detailed_content: detail.detailed_content,
            detailed_pic_urls: detail.detailed_pic_urls,
        }
    }
}

pub mod datetime_format {
    use super::DATETIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(DATETIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> SummaryRecord {
        SummaryRecord {
            url: "http://shanghai.xinmin.cn/tfbd/2024/01/19/1.html".to_string(),
            title: "地铁新线开通".to_string(),
            datetime: NaiveDateTime::parse_from_str("2024-01-19 23:00", DATETIME_FORMAT).unwrap(),
            summary_pic_url: Some("http://img.xinmin.cn/a.jpg".to_string()),
            summary_content: "摘要".to_string(),
        }
    }

    #[test]
    fn test_merge_keeps_both_halves() {
        let detail = DetailFields {
            source: Some("新民晚报".to_string()),
            detailed_content: "正文".to_string(),
            detailed_pic_urls: vec!["x.jpg".to_string()],
            ..Default::default()
        };
        let record = NewsRecord::merge(summary(), detail);
        assert_eq!(record.title, "地铁新线开通");
        assert_eq!(record.source.as_deref(), Some("新民晚报"));
        assert_eq!(record.journalist, None);
        assert_eq!(record.detailed_pic_urls, vec!["x.jpg"]);
    }

    #[test]
    fn test_datetime_serialized_as_minutes() {
        let record = NewsRecord::merge(summary(), DetailFields::default());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["datetime"], "2024-01-19 23:00");

        let back: NewsRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_datetime_rejects_other_formats() {
        let json = serde_json::json!({
            "url": "u", "title": "t", "datetime": "19/01/2024",
            "summary_pic_url": null, "summary_content": ""
        });
        assert!(serde_json::from_value::<SummaryRecord>(json).is_err());
    }
}
