use std::{fs, sync::Arc};

use editor_core::HttpCourseBackend;
use shared::{
    domain::CourseId,
    protocol::{CourseRecord, RemoteModule},
};

use super::*;

fn editor_with(modules: Vec<RemoteModule>) -> CourseEditor {
    let backend = HttpCourseBackend::new("http://localhost:5000").expect("backend");
    let draft = CourseDraft::from_course(CourseRecord {
        title: "Rust 101".into(),
        thumbnail_url: Some("/api/files/t0/thumbnail".into()),
        modules,
    });
    CourseEditor::from_draft(Arc::new(backend), CourseId::new("c1"), draft)
}

fn intro() -> RemoteModule {
    RemoteModule {
        title: "Intro".into(),
        kind: Some(ModuleKind::Video),
        video_url: Some("/api/files/v1/video".into()),
        document_url: None,
        order: Some(1),
    }
}

fn assignment(id: u64, value: &str) -> Assignment {
    Assignment {
        id: LocalModuleId(id),
        value: value.to_string(),
    }
}

fn decline(_prompt: &str) -> bool {
    false
}

#[test]
fn parses_id_value_assignments() {
    assert_eq!(
        parse_assignment("2=Ownership & Borrowing"),
        Ok(assignment(2, "Ownership & Borrowing"))
    );
    assert_eq!(parse_assignment(" 3 =a=b"), Ok(assignment(3, "a=b")));
    assert!(parse_assignment("Ownership").is_err());
    assert!(parse_assignment("x=Ownership").is_err());
}

#[test]
fn only_explicit_yes_confirms() {
    assert!(is_yes("y\n"));
    assert!(is_yes(" YES "));
    assert!(!is_yes("\n"));
    assert!(!is_yes("nope"));
}

#[test]
fn formats_sizes_in_megabytes() {
    assert_eq!(format_size(1_572_864), "1.50 MB");
    assert_eq!(format_size(0), "0.00 MB");
}

#[tokio::test]
async fn applies_edits_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let notes = dir.path().join("notes.pdf");
    fs::write(&notes, b"%PDF-1.7").expect("write");

    let mut editor = editor_with(vec![intro()]);
    let args = EditArgs {
        add: 2,
        remove: vec![1],
        title: vec![assignment(2, "Ownership")],
        kind: vec![assignment(3, "document")],
        attach: vec![assignment(3, &notes.to_string_lossy())],
        yes: true,
        ..EditArgs::default()
    };

    apply_edits(&mut editor, &args, &decline).await.expect("edits");

    let records: Vec<_> = editor.draft().modules.iter().collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Ownership");
    assert_eq!(records[1].kind, ModuleKind::Document);
    assert_eq!(
        records[1].document.pending().map(|a| a.file_name.as_str()),
        Some("notes.pdf")
    );
}

#[tokio::test]
async fn declined_removal_keeps_module() {
    let mut editor = editor_with(vec![intro()]);
    let args = EditArgs {
        remove: vec![1],
        ..EditArgs::default()
    };

    apply_edits(&mut editor, &args, &decline).await.expect("edits");
    assert_eq!(editor.draft().modules.len(), 1);
}

#[tokio::test]
async fn rejects_files_outside_the_accept_filter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let notes = dir.path().join("notes.pdf");
    fs::write(&notes, b"%PDF-1.7").expect("write");

    let mut editor = editor_with(vec![intro()]);
    let args = EditArgs {
        attach: vec![assignment(1, &notes.to_string_lossy())],
        ..EditArgs::default()
    };

    let err = apply_edits(&mut editor, &args, &decline)
        .await
        .expect_err("pdf is not a video");
    assert!(err.to_string().contains("cannot be attached to a video module"));
    let record = editor.draft().modules.get(LocalModuleId(1)).expect("module");
    assert!(!record.media.is_pending());
}

#[tokio::test]
async fn thumbnail_must_be_an_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let notes = dir.path().join("notes.pdf");
    let cover = dir.path().join("cover.png");
    fs::write(&notes, b"%PDF-1.7").expect("write");
    fs::write(&cover, b"\x89PNG").expect("write");

    let mut editor = editor_with(vec![intro()]);
    let rejected = EditArgs {
        thumbnail: Some(notes),
        ..EditArgs::default()
    };
    let err = apply_edits(&mut editor, &rejected, &decline)
        .await
        .expect_err("pdf is not an image");
    assert!(err.to_string().contains("cannot be used as a thumbnail"));
    assert!(editor.draft().pending_thumbnail_asset().is_none());

    let accepted = EditArgs {
        thumbnail: Some(cover),
        ..EditArgs::default()
    };
    apply_edits(&mut editor, &accepted, &decline)
        .await
        .expect("png is accepted");
    assert_eq!(
        editor
            .draft()
            .pending_thumbnail_asset()
            .map(|asset| asset.mime_type.as_str()),
        Some("image/png")
    );
}

#[tokio::test]
async fn unknown_module_id_is_reported() {
    let mut editor = editor_with(Vec::new());
    let args = EditArgs {
        title: vec![assignment(9, "Ghost")],
        ..EditArgs::default()
    };

    let err = apply_edits(&mut editor, &args, &decline)
        .await
        .expect_err("no such module");
    assert_eq!(err.to_string(), "no module with id 9");
}

#[test]
fn renders_modules_with_existing_content_marker() {
    let mut editor = editor_with(vec![intro()]);
    editor.draft_mut().modules.add();

    let listing = render_course(editor.draft());

    assert!(listing.starts_with("Course: Rust 101\nThumbnail: /api/files/t0/thumbnail\n"));
    assert!(listing.contains("Modules (2):"));
    assert!(listing.contains("1. #1 video    Intro: /api/files/v1/video  [content exists]"));
    assert!(listing.contains("2. #2 video    Module 2: no file\n"));
}
