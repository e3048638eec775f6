//! File metadata model
//!
//! Collection: files

use chrono::{DateTime, Utc};
use ph_core::traits::Id;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Metadata of a file shared in a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: Id,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Id>,
    pub uploaded_by: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

document!(FileRecord, "files", "File");

impl FileRecord {
    pub fn new(uploaded_by: Id, input: CreateFileRecord) -> Self {
        Self {
            id: ph_core::traits::new_id(),
            name: input.name.trim().to_string(),
            url: input.url,
            project: input.project,
            uploaded_by,
            size: input.size,
            file_type: input.file_type,
            created_at: Utc::now(),
        }
    }
}

/// File metadata payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRecord {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please add a file name"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please add a file URL"))]
    pub url: String,
    #[serde(default)]
    pub project: Option<Id>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(rename = "type", default)]
    pub file_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_requires_name_and_url() {
        let input: CreateFileRecord = serde_json::from_str(r#"{"type": "image/png"}"#).unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("url"));
        assert_eq!(input.file_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_file_name_is_trimmed() {
        let input = CreateFileRecord {
            name: "  spec.pdf ".into(),
            url: "/uploads/spec.pdf".into(),
            ..Default::default()
        };
        let record = FileRecord::new(ph_core::traits::new_id(), input);
        assert_eq!(record.name, "spec.pdf");
    }
}
