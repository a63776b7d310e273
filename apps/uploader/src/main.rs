use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use folio_uploader::api::{HttpRecordsApi, RecordsApi};
use folio_uploader::config::StorageConfig;
use folio_uploader::error::SubmitError;
use folio_uploader::forms::{GalleryForm, ResumeForm};
use folio_uploader::intake::Candidate;
use folio_uploader::orchestrator::Session;
use folio_uploader::storage::S3Store;

#[derive(Parser)]
#[command(name = "uploader", about = "Folio upload client", version)]
struct Cli {
    /// Base URL of the Folio API
    #[arg(long, default_value = "http://localhost:5000/api/v1")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a resume and create an account
    Resume {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Path to the resume PDF
        file: PathBuf,
    },
    /// Upload images and create a gallery
    Gallery {
        #[arg(long)]
        identifier: String,
        #[arg(long)]
        width: String,
        #[arg(long)]
        height: String,
        /// Image files, in display order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Fetch a gallery by identifier
    View { identifier: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api = Arc::new(HttpRecordsApi::new(cli.api_url));

    match cli.command {
        Command::Resume {
            email,
            first_name,
            last_name,
            file,
        } => {
            let mut session = Session::resume(connect_store().await?, api);
            load_files(&mut session, &[file]).await?;
            let form = ResumeForm {
                email,
                first_name,
                last_name,
            };
            let render = spawn_progress_renderer(&session);
            let outcome = session.submit_resume(&form).await;
            render.abort();
            finish(outcome, "Account created successfully")
        }
        Command::Gallery {
            identifier,
            width,
            height,
            files,
        } => {
            let mut session = Session::gallery(connect_store().await?, api);
            load_files(&mut session, &files).await?;
            let form = GalleryForm {
                identifier,
                width,
                height,
            };
            let render = spawn_progress_renderer(&session);
            let outcome = session.submit_gallery(&form).await;
            render.abort();
            finish(outcome, "Gallery created successfully")
        }
        Command::View { identifier } => {
            match api.get_gallery(&identifier).await? {
                Some(gallery) => {
                    info!(
                        "Gallery '{}' ({}x{})",
                        gallery.identifier, gallery.width, gallery.height
                    );
                    for url in &gallery.images {
                        info!("  {url}");
                    }
                }
                None => info!("Gallery not found"),
            }
            Ok(())
        }
    }
}

async fn connect_store() -> Result<Arc<S3Store>> {
    let config = StorageConfig::from_env()?;
    Ok(Arc::new(S3Store::connect(&config).await))
}

async fn load_files(session: &mut Session, paths: &[PathBuf]) -> Result<()> {
    let mut candidates = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        candidates.push(Candidate {
            mime: mime_for(path),
            name,
            bytes: bytes.into(),
        });
    }
    session.intake.accept(candidates);
    if let Some(message) = session.intake.error() {
        warn!("{message}");
    }
    Ok(())
}

fn mime_for(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") => "image/jpg",
        Some("jpeg") => "image/jpeg",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Renders one progress line per file while the submission runs.
fn spawn_progress_renderer(session: &Session) -> tokio::task::JoinHandle<()> {
    let progress = session.progress();
    let names: HashMap<Uuid, String> = session
        .intake
        .pending()
        .iter()
        .map(|f| (f.id, f.name.clone()))
        .collect();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        let mut last: HashMap<Uuid, f64> = HashMap::new();
        loop {
            interval.tick().await;
            for (id, percent) in progress.snapshot() {
                if last.get(&id).copied() != Some(percent) {
                    if let Some(name) = names.get(&id) {
                        info!("{name}: {percent:.0}%");
                    }
                    last.insert(id, percent);
                }
            }
        }
    })
}

fn finish(outcome: Result<(), SubmitError>, success_message: &str) -> Result<()> {
    match outcome {
        Ok(()) => {
            info!("{success_message}");
            Ok(())
        }
        Err(e) => anyhow::bail!("{e}"),
    }
}
