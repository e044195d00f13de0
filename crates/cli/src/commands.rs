//! Command-line arguments and command handlers

use anyhow::{bail, Context};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::platform::{CommandLineGate, CommandLineSource, StderrNotifier};
use taskpad_core::grouping::group_by_date;
use taskpad_core::media::MediaImporter;
use taskpad_core::storage::delete_local_file;
use taskpad_core::task::{Attachment, MediaKind, Task, TaskForm, TaskStore};
use taskpad_core::StoreConfig;

#[derive(Debug, Parser)]
#[command(name = "taskpad", version, about = "Local task list with photo and video attachments")]
pub struct Cli {
    /// Directory holding the task collection and media files
    #[arg(long, global = true, value_name = "DIR", env = "TASKPAD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tasks grouped by creation date
    List,
    /// Show a single task
    Show { id: String },
    /// Create a task
    Add(AddArgs),
    /// Edit a task
    Edit(EditArgs),
    /// Delete a task and its attachment
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct MediaArgs {
    /// Attach an image from the given file
    #[arg(long, value_name = "PATH", group = "media")]
    pub image: Option<PathBuf>,

    /// Attach a video from the given file
    #[arg(long, value_name = "PATH", group = "media")]
    pub video: Option<PathBuf>,

    /// Attach a photo taken with a camera and saved at the given path
    #[arg(long, value_name = "PATH", group = "media")]
    pub photo: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaRequest {
    Library(MediaKind),
    Camera,
}

impl MediaArgs {
    fn selection(&self) -> Option<(MediaRequest, PathBuf)> {
        if let Some(path) = &self.image {
            return Some((MediaRequest::Library(MediaKind::Image), path.clone()));
        }
        if let Some(path) = &self.video {
            return Some((MediaRequest::Library(MediaKind::Video), path.clone()));
        }
        self.photo
            .as_ref()
            .map(|path| (MediaRequest::Camera, path.clone()))
    }
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: Option<String>,

    #[command(flatten)]
    pub media: MediaArgs,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,

    /// Remove the attachment and delete its file
    #[arg(long, conflicts_with = "media")]
    pub clear_media: bool,

    #[command(flatten)]
    pub media: MediaArgs,
}

pub async fn list(store: &TaskStore) -> anyhow::Result<()> {
    let tasks = store.list_all().await;
    if tasks.is_empty() {
        println!("No tasks yet. Add one with `taskpad add --title <TITLE>`.");
        return Ok(());
    }

    for group in group_by_date(&tasks, &Local) {
        println!("{}", group.label());
        for task in &group.tasks {
            println!("  {}", summary_line(task));
        }
    }
    Ok(())
}

pub async fn show(store: &TaskStore, id: &str) -> anyhow::Result<()> {
    let Some(task) = store.get(id).await else {
        bail!("Task {} not found", id);
    };

    println!("{}", task.title);
    println!("  id:      {}", task.id);
    if let Some(description) = &task.description {
        println!("  notes:   {}", description);
    }
    if let Some(attachment) = &task.attachment {
        println!("  {}:   {}", attachment.kind, attachment.uri);
    }
    println!("  created: {}", format_millis(task.created_at));
    if let Some(updated_at) = task.updated_at {
        println!("  updated: {}", format_millis(updated_at));
    }
    Ok(())
}

pub async fn add(store: &TaskStore, config: &StoreConfig, args: AddArgs) -> anyhow::Result<()> {
    let mut form = TaskForm {
        title: args.title,
        description: args.description.filter(|d| !d.trim().is_empty()),
        attachment: None,
    };
    form.validate()?;

    form.attachment = import_media(config, &args.media).await?;
    let imported = form.attachment.clone();

    match store.create(form).await {
        Ok(task) => {
            println!("{}", task.id);
            Ok(())
        }
        Err(e) => {
            discard_import(imported.as_ref()).await;
            Err(anyhow::Error::new(e).context("Failed to save task"))
        }
    }
}

pub async fn edit(store: &TaskStore, config: &StoreConfig, args: EditArgs) -> anyhow::Result<()> {
    let Some(existing) = store.get(&args.id).await else {
        bail!("Task {} not found", args.id);
    };

    let mut form = edit_form(&existing, &args);
    form.validate()?;

    let imported = import_media(config, &args.media).await?;
    if let Some(attachment) = &imported {
        form.attachment = Some(attachment.clone());
    }

    match store.update(&args.id, form).await {
        Ok(Some(task)) => {
            println!("{}", summary_line(&task));
            Ok(())
        }
        Ok(None) => {
            discard_import(imported.as_ref()).await;
            bail!("Task {} not found", args.id)
        }
        Err(e) => {
            discard_import(imported.as_ref()).await;
            Err(anyhow::Error::new(e).context("Failed to save task"))
        }
    }
}

pub async fn delete(store: &TaskStore, id: &str) -> anyhow::Result<()> {
    match store.delete(id).await.context("Failed to delete task")? {
        Some(task) => println!("Deleted {}", task.id),
        None => println!("No task with id {}", id),
    }
    Ok(())
}

/// Existing task fields with the command-line overrides applied
fn edit_form(existing: &Task, args: &EditArgs) -> TaskForm {
    let mut form = TaskForm::from(existing);
    if let Some(title) = &args.title {
        form.title = title.clone();
    }
    if args.clear_description {
        form.description = None;
    } else if let Some(description) = &args.description {
        form.description = Some(description.clone()).filter(|d| !d.trim().is_empty());
    }
    if args.clear_media {
        form.attachment = None;
    }
    form
}

async fn import_media(config: &StoreConfig, media: &MediaArgs) -> anyhow::Result<Option<Attachment>> {
    let Some((request, path)) = media.selection() else {
        return Ok(None);
    };

    let importer = MediaImporter::new(
        config,
        Arc::new(CommandLineGate),
        Arc::new(CommandLineSource::new(Some(path))),
        Arc::new(StderrNotifier),
    );
    let attachment = match request {
        MediaRequest::Library(kind) => importer.request_and_pick_from_library(kind).await,
        MediaRequest::Camera => importer.request_and_capture().await,
    }
    .context("Failed to select media")?;

    // The notifier has already told the user why
    match attachment {
        Some(attachment) => Ok(Some(attachment)),
        None => bail!("No media attached"),
    }
}

/// Remove a freshly imported file that never made it into the collection
async fn discard_import(attachment: Option<&Attachment>) {
    if let Some(attachment) = attachment {
        delete_local_file(&attachment.uri).await;
    }
}

fn summary_line(task: &Task) -> String {
    match task.media_kind() {
        Some(kind) => format!("{}  {} [{}]", task.id, task.title, kind),
        None => format!("{}  {}", task.id, task.title),
    }
}

fn format_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}
