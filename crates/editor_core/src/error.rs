use shared::domain::{CourseId, ModuleKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Course not found")]
    NotFound { course_id: CourseId },
    #[error("Failed to load course {course_id}")]
    Failed {
        course_id: CourseId,
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to upload thumbnail")]
    ThumbnailUploadFailed { source: anyhow::Error },
    #[error("Failed to upload {kind} for {title}")]
    ModuleUploadFailed {
        title: String,
        kind: ModuleKind,
        source: anyhow::Error,
    },
    #[error("Failed to update course")]
    FinalizeFailed { source: anyhow::Error },
    #[error("A save is already in progress")]
    AlreadySaving,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status}: {message}")]
pub struct BackendError {
    pub status: u16,
    pub message: String,
}
