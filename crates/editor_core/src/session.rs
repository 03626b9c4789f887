use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::domain::CourseId;
use tracing::info;

use crate::{
    backend::CourseBackend,
    error::{LoadError, SaveError},
    orchestrator::{SaveOrchestrator, SavePhase, SaveReceipt},
    store::CourseDraft,
};

pub struct CourseEditor {
    backend: Arc<dyn CourseBackend>,
    course_id: CourseId,
    draft: CourseDraft,
    saving: AtomicBool,
}

struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CourseEditor {
    pub async fn load(
        backend: Arc<dyn CourseBackend>,
        course_id: CourseId,
    ) -> Result<Self, LoadError> {
        let course = backend
            .fetch_course(&course_id)
            .await
            .map_err(|source| LoadError::Failed {
                course_id: course_id.clone(),
                source,
            })?
            .ok_or_else(|| LoadError::NotFound {
                course_id: course_id.clone(),
            })?;

        let draft = CourseDraft::from_course(course);
        info!(
            course_id = %course_id,
            modules = draft.modules.len(),
            "course loaded for editing"
        );
        Ok(Self::from_draft(backend, course_id, draft))
    }

    pub fn from_draft(
        backend: Arc<dyn CourseBackend>,
        course_id: CourseId,
        draft: CourseDraft,
    ) -> Self {
        Self {
            backend,
            course_id,
            draft,
            saving: AtomicBool::new(false),
        }
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn draft(&self) -> &CourseDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut CourseDraft {
        &mut self.draft
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub async fn save(&self) -> Result<SaveReceipt, SaveError> {
        self.save_with_progress(&|_| {}).await
    }

    /// Saves a snapshot of the draft taken now. Only one save may be in
    /// flight; a second call gets [`SaveError::AlreadySaving`].
    pub async fn save_with_progress(
        &self,
        progress: &(dyn Fn(SavePhase) + Send + Sync),
    ) -> Result<SaveReceipt, SaveError> {
        if self
            .saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SaveError::AlreadySaving);
        }
        let _guard = SavingGuard(&self.saving);

        let snapshot = self.draft.clone();
        SaveOrchestrator::new(self.backend.as_ref(), &self.course_id)
            .with_progress(progress)
            .save(&snapshot, &snapshot.title)
            .await
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
