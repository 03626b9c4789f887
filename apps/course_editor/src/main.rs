use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use editor_core::{CourseEditor, HttpCourseBackend, LoadError};
use shared::domain::CourseId;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{apply_edits, parse_assignment, render_course, Assignment, StdinConfirm};
use config::{load_settings, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "course_editor", version, about = "Edit a course's thumbnail and modules")]
struct Cli {
    /// Course backend base URL (overrides config file and environment).
    #[arg(long, global = true)]
    backend_url: Option<String>,
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    course_id: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the course thumbnail and module list.
    Show,
    /// Apply edits and save them in one update.
    Edit(EditArgs),
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// New course thumbnail image.
    #[arg(long, value_name = "PATH")]
    pub thumbnail: Option<PathBuf>,
    /// Append this many new video modules.
    #[arg(long, default_value_t = 0)]
    pub add: usize,
    #[arg(long, value_name = "ID")]
    pub remove: Vec<u64>,
    #[arg(long, value_name = "ID=TITLE", value_parser = parse_assignment)]
    pub title: Vec<Assignment>,
    #[arg(long, value_name = "ID=KIND", value_parser = parse_assignment)]
    pub kind: Vec<Assignment>,
    /// Attach a file to the slot of the module's current kind.
    #[arg(long, value_name = "ID=PATH", value_parser = parse_assignment)]
    pub attach: Vec<Assignment>,
    /// Remove modules without asking.
    #[arg(long)]
    pub yes: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli.config, cli.backend_url.as_deref())?;
    let backend = match settings.request_timeout_secs {
        Some(secs) => HttpCourseBackend::with_request_timeout(
            &settings.backend_url,
            Duration::from_secs(secs),
        )?,
        None => HttpCourseBackend::new(&settings.backend_url)?,
    };
    let course_id = CourseId::new(cli.course_id);

    let mut editor = match CourseEditor::load(Arc::new(backend), course_id).await {
        Ok(editor) => editor,
        Err(err @ LoadError::NotFound { .. }) => {
            error!(error = %err, "course lookup failed");
            anyhow::bail!("{err}; pick a course from your uploads list");
        }
        Err(err) => {
            error!(error = ?err, "course load failed");
            return Err(err.into());
        }
    };

    match cli.command {
        Command::Show => {
            print!("{}", render_course(editor.draft()));
        }
        Command::Edit(args) => {
            apply_edits(&mut editor, &args, &StdinConfirm).await?;
            let receipt = editor
                .save_with_progress(&|phase| tracing::info!(%phase, "save progress"))
                .await
                .map_err(|err| {
                    error!(error = ?err, "save failed");
                    anyhow::anyhow!("Error saving changes: {err}")
                })?;
            println!(
                "Course content updated! ({} upload(s), {} module(s))",
                receipt.uploads,
                receipt.request.modules.len()
            );
        }
    }
    Ok(())
}
