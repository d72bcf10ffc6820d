//! Lessondrive CLI
//!
//! Resolves lesson folders, uploads files into them and downloads content.

mod mime;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::TryStreamExt;
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lessondrive_core::storage::{MemoryDrive, RemoteStorageClient};
use lessondrive_core::{ContentService, ContentSettings, FolderPath, UploadRequest};
use lessondrive_gdrive::{DriveClient, DriveClientConfig};
use lessondrive_shared::{AppConfig, DriveProvider, FileId};

#[derive(Parser)]
#[command(name = "lessondrive")]
#[command(about = "Organise lesson files in a remote drive")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a folder path, creating missing folders
    Resolve {
        /// Slash-separated path, e.g. "Stage A/Math/Ms. Smith/Fractions"
        path: String,
    },
    /// Upload a file into a folder path
    Upload {
        /// Local file to upload
        file: PathBuf,
        /// Slash-separated destination folder path
        #[arg(long)]
        path: String,
        /// MIME type (guessed from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,
    },
    /// Download a file's content
    Fetch {
        /// Remote file ID
        file_id: String,
        /// Local output file
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lessondrive=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;
    let client = build_client(&config.drive.provider)?;
    info!(provider = config.drive.provider.name(), "Drive client configured");

    let service = ContentService::new(client, ContentSettings::from(&config));

    match cli.command {
        Commands::Resolve { path } => {
            let path = FolderPath::parse(&path);
            let folder_id = service.resolve(&path).await?;
            println!("{folder_id}");
        }
        Commands::Upload { file, path, mime } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("file name is not valid UTF-8")?
                .to_string();
            let mime_type = mime.unwrap_or_else(|| mime::guess(&file).to_string());

            let result = service
                .upload_to_path(
                    &FolderPath::parse(&path),
                    UploadRequest::new(bytes, file_name, mime_type),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Fetch { file_id, output } => {
            let mut stream = service.open_stream(&FileId::new(file_id)).await?;
            let mut out = tokio::fs::File::create(&output)
                .await
                .with_context(|| format!("failed to create {}", output.display()))?;

            let mut written: u64 = 0;
            while let Some(chunk) = stream.stream.try_next().await? {
                out.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            out.flush().await?;

            info!(
                bytes = written,
                content_type = %stream.content_type,
                output = %output.display(),
                "Fetched file"
            );
        }
    }

    Ok(())
}

fn build_client(provider: &DriveProvider) -> anyhow::Result<Arc<dyn RemoteStorageClient>> {
    match provider {
        DriveProvider::Google { .. } => {
            let config = DriveClientConfig::try_from(provider)?;
            Ok(Arc::new(DriveClient::new(config)?))
        }
        DriveProvider::Memory => Ok(Arc::new(MemoryDrive::new())),
    }
}
