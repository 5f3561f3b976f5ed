//! Luna Notes inspector
//!
//! Developer tool for poking at sync artifacts without the app shell:
//! decode a single `.an` container (optionally with a `books.sync`
//! sidecar for titles), or scan a local mirror of a sync tree.
//! Results print as JSON on stdout; diagnostics go to stderr.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use luna_notes::adapter::{MoonReaderAdapter, ReaderAdapter};
use luna_notes::library::LibraryScanner;
use luna_notes::storage::LocalSource;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luna_notes=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(target) = args.next() else {
        bail!("usage: luna-notes <file.an> [books.sync] | luna-notes <sync-root-dir>");
    };

    let path = Path::new(&target);
    if path.is_dir() {
        let scanner = LibraryScanner::new(LocalSource::new(path), "");
        let library = scanner.scan()?;
        println!("{}", serde_json::to_string_pretty(&library)?);
        return Ok(());
    }

    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let adapter = match args.next() {
        Some(sidecar) => {
            let sidecar_bytes = fs::read(&sidecar)
                .with_context(|| format!("failed to read {sidecar}"))?;
            MoonReaderAdapter::from_books_sync(&sidecar_bytes)
        }
        None => MoonReaderAdapter::new(),
    };

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&target);
    let notes = adapter.parse(&bytes, filename)?;

    tracing::info!(file = filename, notes = notes.len(), "decoded");
    println!("{}", serde_json::to_string_pretty(&notes)?);
    Ok(())
}
