use std::{
    fmt::Write as _,
    io::{self, BufRead, Write as _},
    path::Path,
};

use anyhow::{anyhow, bail, Context, Result};
use editor_core::{
    AlwaysConfirm, AssetSlot, ConfirmRemoval, CourseDraft, CourseEditor, LocalAsset,
};
use shared::domain::{LocalModuleId, ModuleKind};
use tracing::info;

use crate::EditArgs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: LocalModuleId,
    pub value: String,
}

pub fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{raw}'"))?;
    let id = id
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("module id must be a number, got '{}'", id.trim()))?;
    Ok(Assignment {
        id: LocalModuleId(id),
        value: value.to_string(),
    })
}

pub struct StdinConfirm;

impl ConfirmRemoval for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub async fn apply_edits(
    editor: &mut CourseEditor,
    args: &EditArgs,
    confirm: &dyn ConfirmRemoval,
) -> Result<()> {
    let confirm: &dyn ConfirmRemoval = if args.yes { &AlwaysConfirm } else { confirm };

    if let Some(path) = &args.thumbnail {
        let asset = read_asset(path).await?;
        if !asset.is_image() {
            bail!(
                "'{}' ({}) cannot be used as a thumbnail, pick an image",
                asset.file_name,
                asset.mime_type
            );
        }
        editor.draft_mut().set_pending_thumbnail(Some(asset));
    }

    let draft = editor.draft_mut();
    for _ in 0..args.add {
        let id = draft.modules.add();
        info!(local_id = id.0, "module added");
    }

    for &id in &args.remove {
        if !draft.modules.remove(LocalModuleId(id), confirm) {
            info!(local_id = id, "module kept");
        }
    }

    for edit in &args.title {
        require_module(draft, edit.id)?;
        draft.modules.set_title(edit.id, edit.value.clone());
    }

    for edit in &args.kind {
        require_module(draft, edit.id)?;
        let kind: ModuleKind = edit.value.parse()?;
        draft.modules.set_kind(edit.id, kind);
    }

    for edit in &args.attach {
        let kind = require_module(draft, edit.id)?;
        let asset = read_asset(Path::new(&edit.value)).await?;
        if !asset.is_accepted_for(kind) {
            bail!(
                "'{}' ({}) cannot be attached to a {kind} module",
                asset.file_name,
                asset.mime_type
            );
        }
        draft
            .modules
            .set_pending_asset(edit.id, kind.slot(), Some(asset));
    }

    Ok(())
}

fn require_module(draft: &CourseDraft, id: LocalModuleId) -> Result<ModuleKind> {
    draft
        .modules
        .get(id)
        .map(|record| record.kind)
        .ok_or_else(|| anyhow!("no module with id {id}"))
}

async fn read_asset(path: &Path) -> Result<LocalAsset> {
    LocalAsset::from_path(path)
        .await
        .with_context(|| format!("cannot attach '{}'", path.display()))
}

pub fn format_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

fn describe_slot(slot: &AssetSlot) -> String {
    match slot {
        AssetSlot::Empty => "no file".to_string(),
        AssetSlot::Remote(url) => url.clone(),
        AssetSlot::Pending { asset, .. } => {
            format!("new file {} ({})", asset.file_name, format_size(asset.size_bytes()))
        }
    }
}

pub fn render_course(draft: &CourseDraft) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Course: {}", draft.title);
    let _ = writeln!(out, "Thumbnail: {}", describe_slot(&draft.thumbnail));
    let _ = writeln!(out, "Modules ({}):", draft.modules.len());
    for (idx, record) in draft.modules.iter().enumerate() {
        let marker = if record.has_existing_content() {
            "  [content exists]"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  {:>2}. #{} {:<8} {}: {}{marker}",
            idx + 1,
            record.local_id,
            record.kind,
            record.title,
            describe_slot(record.active_slot()),
        );
    }
    out
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
