use serde::{Deserialize, Serialize};

use crate::domain::{CourseId, ModuleKind};

pub const VIDEOS_ROUTE: &str = "/api/videos";
pub const DOCUMENTS_ROUTE: &str = "/api/documents";

pub fn course_route(course_id: &CourseId) -> String {
    format!("/api/courses/{}", course_id.as_str())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEnvelope {
    pub course: CourseRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub modules: Vec<RemoteModule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteModule {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ModuleKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoUploadResponse {
    #[serde(default)]
    pub video: Option<UploadedVideo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedVideo {
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUploadResponse {
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default)]
    pub lesson_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub modules: Vec<ModulePayload>,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulePayload {
    pub title: String,
    pub order: u32,
    #[serde(rename = "type")]
    pub kind: ModuleKind,
    pub video_url: String,
    pub document_url: String,
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub document_name: String,
    #[serde(default)]
    pub lesson_id: String,
    #[serde(default)]
    pub resource_url: String,
}

impl ModulePayload {
    pub fn new(
        title: impl Into<String>,
        order: u32,
        kind: ModuleKind,
        video_url: impl Into<String>,
        document_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            order,
            kind,
            video_url: video_url.into(),
            document_url: document_url.into(),
            document_type: String::new(),
            document_name: String::new(),
            lesson_id: String::new(),
            resource_url: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_legacy_module_without_type_or_order() {
        let raw = r#"{"course":{"title":"Rust 101","thumbnailUrl":null,
            "modules":[{"title":"Intro","videoUrl":"/api/files/1/video"}]}}"#;
        let envelope: CourseEnvelope = serde_json::from_str(raw).expect("decode");
        let module = &envelope.course.modules[0];
        assert_eq!(module.kind, None);
        assert_eq!(module.order, None);
        assert_eq!(module.video_url.as_deref(), Some("/api/files/1/video"));
        assert_eq!(envelope.course.thumbnail_url, None);
    }

    #[test]
    fn module_payload_uses_backend_field_names() {
        let payload = ModulePayload::new("Intro", 1, ModuleKind::Video, "v1", "");
        let value = serde_json::to_value(&payload).expect("encode");
        assert_eq!(value["type"], "video");
        assert_eq!(value["videoUrl"], "v1");
        assert_eq!(value["documentUrl"], "");
        assert_eq!(value["lessonId"], "");
        assert_eq!(value["resourceUrl"], "");
    }

    #[test]
    fn document_upload_response_reads_lesson_id() {
        let raw = r#"{"success":true,"documentUrl":"/docs/a.pdf","documentType":"pdf",
            "documentName":"a.pdf","lessonId":"lesson-3"}"#;
        let response: DocumentUploadResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(response.lesson_id.as_deref(), Some("lesson-3"));

        let bare: DocumentUploadResponse =
            serde_json::from_str(r#"{"documentUrl":"/docs/b.pdf"}"#).expect("decode");
        assert_eq!(bare.lesson_id, None);
    }

    #[test]
    fn course_route_embeds_id() {
        assert_eq!(course_route(&CourseId::new("abc123")), "/api/courses/abc123");
    }
}
