use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(LocalModuleId, u64);
id_newtype!(CourseId, String);

impl Copy for LocalModuleId {}

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    #[default]
    Video,
    Document,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Media,
    Document,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 3] = [ModuleKind::Video, ModuleKind::Document, ModuleKind::Audio];

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::Video => "video",
            ModuleKind::Document => "document",
            ModuleKind::Audio => "audio",
        }
    }

    pub fn slot(self) -> SlotKind {
        match self {
            ModuleKind::Video | ModuleKind::Audio => SlotKind::Media,
            ModuleKind::Document => SlotKind::Document,
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown module kind '{0}' (expected video, document or audio)")]
pub struct ParseModuleKindError(pub String);

impl FromStr for ModuleKind {
    type Err = ParseModuleKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ModuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseModuleKindError(trimmed.to_string()))
    }
}
