use shared::{
    domain::{LocalModuleId, ModuleKind, SlotKind},
    protocol::{CourseRecord, RemoteModule},
};
use tracing::debug;

use crate::asset::{AssetSlot, LocalAsset};

pub const REMOVE_PROMPT: &str = "Delete this module?";

pub trait ConfirmRemoval {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmRemoval for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct AlwaysConfirm;

impl ConfirmRemoval for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    pub local_id: LocalModuleId,
    pub title: String,
    pub kind: ModuleKind,
    pub order: u32,
    pub media: AssetSlot,
    pub document: AssetSlot,
}

impl ModuleRecord {
    fn new(local_id: LocalModuleId, title: String, kind: ModuleKind, order: u32) -> Self {
        Self {
            local_id,
            title,
            kind,
            order,
            media: AssetSlot::Empty,
            document: AssetSlot::Empty,
        }
    }

    pub fn slot(&self, slot: SlotKind) -> &AssetSlot {
        match slot {
            SlotKind::Media => &self.media,
            SlotKind::Document => &self.document,
        }
    }

    fn slot_mut(&mut self, slot: SlotKind) -> &mut AssetSlot {
        match slot {
            SlotKind::Media => &mut self.media,
            SlotKind::Document => &mut self.document,
        }
    }

    pub fn active_slot(&self) -> &AssetSlot {
        self.slot(self.kind.slot())
    }

    pub fn remote_video_url(&self) -> Option<&str> {
        self.media.remote_url()
    }

    pub fn remote_document_url(&self) -> Option<&str> {
        self.document.remote_url()
    }

    pub fn has_existing_content(&self) -> bool {
        !self.media.is_pending()
            && !self.document.is_pending()
            && (self.remote_video_url().is_some() || self.remote_document_url().is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleListStore {
    records: Vec<ModuleRecord>,
    last_issued_id: u64,
}

impl ModuleListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(remote_modules: Vec<RemoteModule>) -> Self {
        let records: Vec<ModuleRecord> = remote_modules
            .into_iter()
            .enumerate()
            .map(|(idx, remote)| {
                let position = idx as u32 + 1;
                let order = remote.order.filter(|order| *order > 0).unwrap_or(position);
                let mut record = ModuleRecord::new(
                    LocalModuleId(u64::from(position)),
                    remote.title,
                    remote.kind.unwrap_or_default(),
                    order,
                );
                record.media = AssetSlot::from_remote(remote.video_url);
                record.document = AssetSlot::from_remote(remote.document_url);
                record
            })
            .collect();
        let last_issued_id = records.len() as u64;
        Self {
            records,
            last_issued_id,
        }
    }

    /// Appends a video module. Ids are never reused.
    pub fn add(&mut self) -> LocalModuleId {
        let current_max = self
            .records
            .iter()
            .map(|record| record.local_id.0)
            .max()
            .unwrap_or(0);
        let id = LocalModuleId(current_max.max(self.last_issued_id) + 1);
        self.last_issued_id = id.0;

        let count = self.records.len() as u32 + 1;
        self.records.push(ModuleRecord::new(
            id,
            format!("Module {count}"),
            ModuleKind::Video,
            count,
        ));
        debug!(local_id = id.0, count, "module added");
        id
    }

    pub fn remove(&mut self, local_id: LocalModuleId, confirm: &dyn ConfirmRemoval) -> bool {
        let Some(index) = self.position_of(local_id) else {
            return false;
        };
        if !confirm.confirm(REMOVE_PROMPT) {
            debug!(local_id = local_id.0, "module removal declined");
            return false;
        }
        self.records.remove(index);
        debug!(local_id = local_id.0, "module removed");
        true
    }

    pub fn set_title(&mut self, local_id: LocalModuleId, title: impl Into<String>) {
        if let Some(record) = self.get_mut(local_id) {
            record.title = title.into();
        }
    }

    pub fn set_kind(&mut self, local_id: LocalModuleId, kind: ModuleKind) {
        if let Some(record) = self.get_mut(local_id) {
            record.kind = kind;
        }
    }

    pub fn set_pending_asset(
        &mut self,
        local_id: LocalModuleId,
        slot: SlotKind,
        asset: Option<LocalAsset>,
    ) {
        if let Some(record) = self.get_mut(local_id) {
            record.slot_mut(slot).set_pending(asset);
        }
    }

    pub fn get(&self, local_id: LocalModuleId) -> Option<&ModuleRecord> {
        self.records.iter().find(|record| record.local_id == local_id)
    }

    fn get_mut(&mut self, local_id: LocalModuleId) -> Option<&mut ModuleRecord> {
        self.records
            .iter_mut()
            .find(|record| record.local_id == local_id)
    }

    fn position_of(&self, local_id: LocalModuleId) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.local_id == local_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseDraft {
    pub title: String,
    pub thumbnail: AssetSlot,
    pub modules: ModuleListStore,
}

impl CourseDraft {
    pub fn from_course(course: CourseRecord) -> Self {
        Self {
            title: course.title,
            thumbnail: AssetSlot::from_remote(course.thumbnail_url),
            modules: ModuleListStore::load(course.modules),
        }
    }

    pub fn thumbnail_remote_url(&self) -> &str {
        self.thumbnail.remote_url().unwrap_or_default()
    }

    pub fn pending_thumbnail_asset(&self) -> Option<&LocalAsset> {
        self.thumbnail.pending()
    }

    pub fn set_pending_thumbnail(&mut self, asset: Option<LocalAsset>) {
        self.thumbnail.set_pending(asset);
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
