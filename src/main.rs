//! Export glyph shape dictionaries from a document into a SQLite store.

mod error;

use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use shapex_decode::JsonSource;
use shapex_export::{ExportOptions, export_document};
use shapex_store::{Database, SqliteSink};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shapex", version, about = "Export glyph shape dictionaries into a relational store")]
struct Args {
    /// Source document description (JSON).
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// SQLite database to export into; created if it does not exist.
    #[arg(short, long, value_name = "PATH", default_value = "shapes.db")]
    database: PathBuf,

    /// Document name recorded in the store. Re-running with the same name
    /// reuses the existing document record.
    #[arg(short, long, value_name = "NAME")]
    name: Option<String>,

    /// Document address recorded alongside the name; defaults to FILE.
    #[arg(short, long, value_name = "ADDRESS")]
    address: Option<String>,

    /// First page to export, 1-based inclusive.
    #[arg(long, value_name = "PAGE")]
    from: Option<usize>,

    /// Last page to export, 1-based inclusive.
    #[arg(long, value_name = "PAGE")]
    to: Option<usize>,

    /// Only record page-to-inherited-dictionary links; every inherited
    /// dictionary must already exist in the store.
    #[arg(long)]
    links_only: bool,
}

impl Args {
    fn into_options(self) -> (PathBuf, PathBuf, ExportOptions) {
        let address = self.address.unwrap_or_else(|| self.file.display().to_string());
        let name = self.name.unwrap_or_else(|| {
            self.file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| address.clone())
        });
        let mut options = ExportOptions::new(name, address);
        options.links_only = self.links_only;
        options.from = self.from;
        options.to = self.to;
        (self.file, self.database, options)
    }
}

async fn run(args: Args) -> Result<()> {
    let (file, database, options) = args.into_options();
    let source = JsonSource::open(&file).or_raise(|| ErrorKind::Source)?;
    let database = Database::connect(&database).await.or_raise(|| ErrorKind::Database)?;
    let sink = SqliteSink::from(&database);
    let summary = export_document(&sink, &source, &options)
        .await
        .or_raise(|| ErrorKind::Export)?;
    println!(
        "{}: {} pages ({} skipped), {} shapes, {} blits, {} dictionaries",
        options.document_name,
        summary.pages_processed,
        summary.pages_skipped,
        summary.shapes_stored,
        summary.blits_stored,
        summary.dictionaries_created,
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = ?error, "run aborted");
            eprintln!("shapex: {}", *error);
            ExitCode::FAILURE
        },
    }
}
