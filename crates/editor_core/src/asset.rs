use std::path::Path;

use anyhow::{Context, Result};
use shared::domain::ModuleKind;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "txt", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "csv", "rtf",
];

/// A file picked by the user that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAsset {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl LocalAsset {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_raw()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_accepted_for(&self, kind: ModuleKind) -> bool {
        match kind {
            ModuleKind::Video => self.mime_type.starts_with("video/"),
            ModuleKind::Audio => self.mime_type.starts_with("audio/"),
            ModuleKind::Document => self
                .extension()
                .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext.as_str())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssetSlot {
    #[default]
    Empty,
    Remote(String),
    Pending {
        asset: LocalAsset,
        replaces: Option<String>,
    },
}

impl AssetSlot {
    pub fn from_remote(url: Option<String>) -> Self {
        match url {
            Some(url) if !url.is_empty() => AssetSlot::Remote(url),
            _ => AssetSlot::Empty,
        }
    }

    pub fn pending(&self) -> Option<&LocalAsset> {
        match self {
            AssetSlot::Pending { asset, .. } => Some(asset),
            _ => None,
        }
    }

    pub fn remote_url(&self) -> Option<&str> {
        match self {
            AssetSlot::Remote(url) => Some(url),
            AssetSlot::Pending { replaces, .. } => replaces.as_deref(),
            AssetSlot::Empty => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending().is_some()
    }

    pub fn set_pending(&mut self, asset: Option<LocalAsset>) {
        let remote = self.remote_url().map(str::to_string);
        *self = match asset {
            Some(asset) => AssetSlot::Pending {
                asset,
                replaces: remote,
            },
            None => AssetSlot::from_remote(remote),
        };
    }
}

#[cfg(test)]
#[path = "tests/asset_tests.rs"]
mod tests;
