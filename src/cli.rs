use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::server;
use crate::storage::constants::DEFAULT_BIND_ADDR;
use crate::storage::utils::OutputFormat;
use crate::storage::{FileContent, StorageClient, StorageService};

#[derive(Parser, Debug)]
#[command(
    name = "objtree",
    version,
    about = "Browse and manage a flat object store as a tree of text and binary files"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the storage HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "OBJTREE_BIND", default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,
    },
    /// List one directory level
    Ls {
        /// Directory to list; defaults to the root
        #[arg(default_value = "")]
        path: String,
        /// Skip reading every file to measure its size
        #[arg(long)]
        no_sizes: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print a file's content
    Cat {
        path: String,
        /// Read from the binary partition
        #[arg(short, long)]
        binary: bool,
    },
    /// Create or replace a file with inline content or a local file's bytes
    Put {
        path: String,
        /// Text content, or base64 when --binary is given
        #[arg(required_unless_present = "file")]
        content: Option<String>,
        /// Read the content from a local file instead
        #[arg(long, conflicts_with = "content")]
        file: Option<PathBuf>,
        /// Write to the binary partition
        #[arg(short, long)]
        binary: bool,
    },
    /// Upload a local file, picking its partition automatically
    Upload {
        local_path: PathBuf,
        /// Target directory; defaults to the root
        #[arg(default_value = "")]
        dir: String,
    },
    /// Download a file to the local filesystem
    Get {
        path: String,
        local_path: PathBuf,
        #[arg(short, long)]
        binary: bool,
    },
    /// Delete a file
    Rm {
        path: String,
        #[arg(short, long)]
        binary: bool,
    },
    /// Show a file's derived metadata
    Stat {
        path: String,
        #[arg(short, long)]
        binary: bool,
        #[arg(long)]
        json: bool,
    },
    /// Write the sample data set under data/
    Seed,
}

/// Run one command against the configured store.
pub async fn run(args: Args, client: StorageClient) -> Result<()> {
    log::debug!("Using {:?} storage provider", client.provider());
    let service = StorageService::new(client);

    match args.command {
        Command::Serve { bind } => server::serve(Arc::new(service), bind).await?,
        Command::Ls {
            path,
            no_sizes,
            json,
        } => {
            let listing = service.list(&path, !no_sizes).await?;
            match OutputFormat::from_json_flag(json) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
                OutputFormat::Human => {
                    for folder in &listing.folders {
                        println!("{folder}");
                    }
                    for file in &listing.files {
                        println!("{file}");
                    }
                }
            }
        }
        Command::Cat { path, binary } => {
            let content = service.get_file(&path, binary).await?;
            let mut stdout = io::stdout();
            match content {
                FileContent::Text(file) => stdout.write_all(file.content.as_bytes())?,
                other => stdout.write_all(&other.into_bytes())?,
            }
            stdout.flush()?;
        }
        Command::Put {
            path,
            content,
            file,
            binary,
        } => {
            match (file, content) {
                (Some(local_path), _) => service.put_local(&path, &local_path, binary).await?,
                (None, content) => {
                    let content = content.unwrap_or_default();
                    service.create_or_update(&path, &content, binary).await?
                }
            }
            println!("Stored: {path}");
        }
        Command::Upload { local_path, dir } => {
            let receipt = service.upload_local(&local_path, &dir).await?;
            println!(
                "Upload: {} → {} ({} partition, {} bytes)",
                local_path.display(),
                receipt.path,
                receipt.partition,
                receipt.size
            );
        }
        Command::Get {
            path,
            local_path,
            binary,
        } => {
            service.get_to_file(&path, &local_path, binary).await?;
            println!("Downloaded: {path} → {}", local_path.display());
        }
        Command::Rm { path, binary } => {
            service.delete_file(&path, binary).await?;
            println!("Deleted: {path}");
        }
        Command::Stat { path, binary, json } => {
            let entry = service.stat(&path, binary).await?;
            match OutputFormat::from_json_flag(json) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
                OutputFormat::Human => {
                    println!("path: {}", entry.full_path);
                    println!("partition: {}", entry.partition);
                    println!("size: {}", entry.size_bytes);
                    println!("mime_type: {}", entry.mime_type);
                }
            }
        }
        Command::Seed => {
            let count = service.seed().await?;
            println!("Seeded {count} sample files");
        }
    }

    Ok(())
}
