use std::fmt;

use futures::{stream, TryStreamExt};
use shared::{
    domain::{CourseId, ModuleKind},
    protocol::{ModulePayload, UpdateCourseRequest},
};
use tracing::{info, warn};

use crate::{
    asset::LocalAsset,
    backend::{CourseBackend, VideoField, VideoUpload},
    error::SaveError,
    store::{CourseDraft, ModuleRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    Idle,
    UploadingThumbnail,
    UploadingModules { position: u32, total: u32 },
    Finalizing,
    Done,
    Failed,
}

impl fmt::Display for SavePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavePhase::Idle => f.write_str("idle"),
            SavePhase::UploadingThumbnail => f.write_str("uploading thumbnail"),
            SavePhase::UploadingModules { position, total } => {
                write!(f, "uploading module {position}/{total}")
            }
            SavePhase::Finalizing => f.write_str("finalizing"),
            SavePhase::Done => f.write_str("done"),
            SavePhase::Failed => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleUpload {
    Media { label: String, asset: LocalAsset },
    Document { asset: LocalAsset },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStep {
    pub position: u32,
    pub title: String,
    pub kind: ModuleKind,
    pub upload: Option<ModuleUpload>,
    pub prior_video_url: String,
    pub prior_document_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStep {
    UploadThumbnail { label: String, asset: LocalAsset },
    Module(ModuleStep),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePlan {
    pub prior_thumbnail_url: String,
    pub steps: Vec<SaveStep>,
}

impl SavePlan {
    pub fn build(draft: &CourseDraft, course_title: &str) -> Self {
        let mut steps = Vec::with_capacity(draft.modules.len() + 1);
        if let Some(asset) = draft.pending_thumbnail_asset() {
            steps.push(SaveStep::UploadThumbnail {
                label: format!("{course_title} - Thumbnail"),
                asset: asset.clone(),
            });
        }
        steps.extend(draft.modules.iter().enumerate().map(|(idx, record)| {
            SaveStep::Module(module_step(idx as u32 + 1, record, course_title))
        }));

        Self {
            prior_thumbnail_url: draft.thumbnail_remote_url().to_string(),
            steps,
        }
    }

    pub fn upload_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| match step {
                SaveStep::UploadThumbnail { .. } => true,
                SaveStep::Module(module) => module.upload.is_some(),
            })
            .count()
    }

    fn module_count(&self) -> u32 {
        self.steps
            .iter()
            .filter(|step| matches!(step, SaveStep::Module(_)))
            .count() as u32
    }
}

fn module_step(position: u32, record: &ModuleRecord, course_title: &str) -> ModuleStep {
    let upload = match record.kind {
        ModuleKind::Video | ModuleKind::Audio => {
            record.media.pending().map(|asset| ModuleUpload::Media {
                label: format!("{course_title} - {}", record.title),
                asset: asset.clone(),
            })
        }
        ModuleKind::Document => record
            .document
            .pending()
            .map(|asset| ModuleUpload::Document {
                asset: asset.clone(),
            }),
    };

    ModuleStep {
        position,
        title: record.title.clone(),
        kind: record.kind,
        upload,
        prior_video_url: record.remote_video_url().unwrap_or_default().to_string(),
        prior_document_url: record.remote_document_url().unwrap_or_default().to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub uploads: usize,
    pub request: UpdateCourseRequest,
}

struct Resolution {
    thumbnail_url: String,
    modules: Vec<ModulePayload>,
    uploads: usize,
}

type ProgressFn<'a> = dyn Fn(SavePhase) + Send + Sync + 'a;

pub struct SaveOrchestrator<'a, B: CourseBackend + ?Sized> {
    backend: &'a B,
    course_id: &'a CourseId,
    progress: Option<&'a ProgressFn<'a>>,
}

impl<'a, B: CourseBackend + ?Sized> SaveOrchestrator<'a, B> {
    pub fn new(backend: &'a B, course_id: &'a CourseId) -> Self {
        Self {
            backend,
            course_id,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a ProgressFn<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn report(&self, phase: SavePhase) {
        if let Some(progress) = self.progress {
            progress(phase);
        }
    }

    pub async fn save(
        &self,
        draft: &CourseDraft,
        course_title: &str,
    ) -> Result<SaveReceipt, SaveError> {
        self.report(SavePhase::Idle);
        let plan = SavePlan::build(draft, course_title);
        match self.execute(plan).await {
            Ok(receipt) => {
                self.report(SavePhase::Done);
                Ok(receipt)
            }
            Err(err) => {
                warn!(course_id = %self.course_id, error = %err, "course save failed");
                self.report(SavePhase::Failed);
                Err(err)
            }
        }
    }

    pub async fn execute(&self, plan: SavePlan) -> Result<SaveReceipt, SaveError> {
        let total = plan.module_count();
        let initial = Resolution {
            thumbnail_url: plan.prior_thumbnail_url,
            modules: Vec::with_capacity(total as usize),
            uploads: 0,
        };

        let resolved = stream::iter(plan.steps.into_iter().map(Ok::<_, SaveError>))
            .try_fold(initial, move |acc, step| self.run_step(acc, step, total))
            .await?;

        self.report(SavePhase::Finalizing);
        let request = UpdateCourseRequest {
            modules: resolved.modules,
            thumbnail_url: resolved.thumbnail_url,
        };
        self.backend
            .update_course(self.course_id, &request)
            .await
            .map_err(|source| SaveError::FinalizeFailed { source })?;
        info!(
            course_id = %self.course_id,
            modules = request.modules.len(),
            uploads = resolved.uploads,
            "course content updated"
        );

        Ok(SaveReceipt {
            uploads: resolved.uploads,
            request,
        })
    }

    async fn run_step(
        &self,
        mut acc: Resolution,
        step: SaveStep,
        total: u32,
    ) -> Result<Resolution, SaveError> {
        match step {
            SaveStep::UploadThumbnail { label, asset } => {
                self.report(SavePhase::UploadingThumbnail);
                let uploaded = self
                    .backend
                    .upload_video(VideoUpload {
                        title: label,
                        field: VideoField::Thumbnail,
                        asset,
                    })
                    .await
                    .map_err(|source| SaveError::ThumbnailUploadFailed { source })?;
                if let Some(url) = uploaded.thumbnail_url.filter(|url| !url.is_empty()) {
                    acc.thumbnail_url = url;
                }
                acc.uploads += 1;
                info!(course_id = %self.course_id, "thumbnail uploaded");
            }
            SaveStep::Module(step) => {
                self.report(SavePhase::UploadingModules {
                    position: step.position,
                    total,
                });
                let ModuleStep {
                    position,
                    title,
                    kind,
                    upload,
                    prior_video_url,
                    prior_document_url,
                } = step;
                let mut video_url = prior_video_url;
                let mut document_url = prior_document_url;

                match upload {
                    Some(ModuleUpload::Media { label, asset }) => {
                        let uploaded = self
                            .backend
                            .upload_video(VideoUpload {
                                title: label,
                                field: VideoField::Video,
                                asset,
                            })
                            .await
                            .map_err(|source| SaveError::ModuleUploadFailed {
                                title: title.clone(),
                                kind,
                                source,
                            })?;
                        video_url = uploaded.video_url.unwrap_or_default();
                        acc.uploads += 1;
                        info!(course_id = %self.course_id, position, %kind, "module media uploaded");
                    }
                    Some(ModuleUpload::Document { asset }) => {
                        let uploaded = self
                            .backend
                            .upload_document(asset)
                            .await
                            .map_err(|source| SaveError::ModuleUploadFailed {
                                title: title.clone(),
                                kind,
                                source,
                            })?;
                        document_url = uploaded.document_url.unwrap_or_default();
                        acc.uploads += 1;
                        info!(course_id = %self.course_id, position, "module document uploaded");
                    }
                    None => {}
                }

                acc.modules.push(ModulePayload::new(
                    title,
                    position,
                    kind,
                    video_url,
                    document_url,
                ));
            }
        }
        Ok(acc)
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
