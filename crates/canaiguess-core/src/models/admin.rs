use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player report against an image, awaiting moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub image_id: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub reported_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Image record returned after an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    #[serde(alias = "imageId")]
    pub id: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub fake: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let json = r#"{"id": 3, "imageId": 17, "reason": "Label is wrong", "reportedBy": "carol"}"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.image_id, 17);
        assert_eq!(report.reported_by.as_deref(), Some("carol"));
        assert!(report.created_at.is_none());
    }
}
