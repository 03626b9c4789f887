use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::CourseId,
    protocol::{CourseRecord, DocumentUploadResponse, UpdateCourseRequest, UploadedVideo},
};

use crate::asset::LocalAsset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoField {
    Video,
    Thumbnail,
}

impl VideoField {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoField::Video => "video",
            VideoField::Thumbnail => "thumbnail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUpload {
    pub title: String,
    pub field: VideoField,
    pub asset: LocalAsset,
}

#[async_trait]
pub trait CourseBackend: Send + Sync {
    /// `Ok(None)` when the course does not exist.
    async fn fetch_course(&self, course_id: &CourseId) -> Result<Option<CourseRecord>>;
    async fn upload_video(&self, upload: VideoUpload) -> Result<UploadedVideo>;
    async fn upload_document(&self, asset: LocalAsset) -> Result<DocumentUploadResponse>;
    async fn update_course(&self, course_id: &CourseId, request: &UpdateCourseRequest)
        -> Result<()>;
}
