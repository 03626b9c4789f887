use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{CourseId, ModuleKind},
    protocol::{
        CourseRecord, DocumentUploadResponse, RemoteModule, UpdateCourseRequest, UploadedVideo,
    },
};
use tokio::sync::Mutex;

use crate::{
    asset::LocalAsset,
    backend::{CourseBackend, VideoField, VideoUpload},
    error::BackendError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchCourse(String),
    UploadVideo {
        title: String,
        field: VideoField,
        file_name: String,
    },
    UploadDocument {
        file_name: String,
    },
    UpdateCourse(UpdateCourseRequest),
}

/// In-memory backend that records every call in order.
#[derive(Default)]
pub struct RecordingBackend {
    pub course: Option<CourseRecord>,
    pub fetch_error: Option<String>,
    /// Upload labels whose video upload is rejected.
    pub failing_video_titles: Vec<String>,
    /// File names whose document upload is rejected.
    pub failing_documents: Vec<String>,
    pub fail_finalize: bool,
    pub omit_thumbnail_url: bool,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<Call>>,
}

impl RecordingBackend {
    pub fn with_course(course: CourseRecord) -> Self {
        Self {
            course: Some(course),
            ..Self::default()
        }
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn upload_calls(&self) -> Vec<Call> {
        self.calls()
            .await
            .into_iter()
            .filter(|call| matches!(call, Call::UploadVideo { .. } | Call::UploadDocument { .. }))
            .collect()
    }

    pub async fn finalized(&self) -> Vec<UpdateCourseRequest> {
        self.calls()
            .await
            .into_iter()
            .filter_map(|call| match call {
                Call::UpdateCourse(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, call: Call) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().await.push(call);
    }
}

fn rejected(message: &str) -> anyhow::Error {
    BackendError {
        status: 500,
        message: message.to_string(),
    }
    .into()
}

#[async_trait]
impl CourseBackend for RecordingBackend {
    async fn fetch_course(&self, course_id: &CourseId) -> Result<Option<CourseRecord>> {
        self.record(Call::FetchCourse(course_id.as_str().to_string()))
            .await;
        if let Some(err) = &self.fetch_error {
            return Err(anyhow!(err.clone()));
        }
        Ok(self.course.clone())
    }

    async fn upload_video(&self, upload: VideoUpload) -> Result<UploadedVideo> {
        let file_name = upload.asset.file_name.clone();
        self.record(Call::UploadVideo {
            title: upload.title.clone(),
            field: upload.field,
            file_name: file_name.clone(),
        })
        .await;
        if self.failing_video_titles.contains(&upload.title) {
            return Err(rejected("Failed to save video"));
        }
        Ok(UploadedVideo {
            video_url: Some(format!("/api/files/{file_name}/video")),
            thumbnail_url: (!self.omit_thumbnail_url)
                .then(|| format!("/api/files/{file_name}/thumbnail")),
        })
    }

    async fn upload_document(&self, asset: LocalAsset) -> Result<DocumentUploadResponse> {
        self.record(Call::UploadDocument {
            file_name: asset.file_name.clone(),
        })
        .await;
        if self.failing_documents.contains(&asset.file_name) {
            return Err(rejected("Failed to process document upload"));
        }
        Ok(DocumentUploadResponse {
            document_url: Some(format!("/docs/{}", asset.file_name)),
            document_type: Some(asset.mime_type),
            document_name: Some(asset.file_name),
            lesson_id: None,
        })
    }

    async fn update_course(
        &self,
        _course_id: &CourseId,
        request: &UpdateCourseRequest,
    ) -> Result<()> {
        self.record(Call::UpdateCourse(request.clone())).await;
        if self.fail_finalize {
            return Err(rejected("Failed to update course"));
        }
        Ok(())
    }
}

pub fn remote_module(title: &str, kind: ModuleKind, video: &str, document: &str) -> RemoteModule {
    RemoteModule {
        title: title.to_string(),
        kind: Some(kind),
        video_url: Some(video.to_string()),
        document_url: Some(document.to_string()),
        order: None,
    }
}

pub fn course(title: &str, thumbnail: &str, modules: Vec<RemoteModule>) -> CourseRecord {
    CourseRecord {
        title: title.to_string(),
        thumbnail_url: Some(thumbnail.to_string()),
        modules,
    }
}
