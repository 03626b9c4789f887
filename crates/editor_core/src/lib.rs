pub mod asset;
pub mod backend;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod session;
pub mod store;

pub use asset::{AssetSlot, LocalAsset};
pub use backend::{CourseBackend, VideoField, VideoUpload};
pub use error::{BackendError, LoadError, SaveError};
pub use http::HttpCourseBackend;
pub use orchestrator::{SaveOrchestrator, SavePhase, SavePlan, SaveReceipt};
pub use session::CourseEditor;
pub use store::{AlwaysConfirm, ConfirmRemoval, CourseDraft, ModuleListStore, ModuleRecord};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
