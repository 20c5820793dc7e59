//! Sync command - generate the typed registry module

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use color_eyre::eyre::{Result, WrapErr};
use folio_collections::{CodeGenerator, ContentLoader, Manifest, ManifestDiff, write_if_changed};
use folio_core::Config;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use tokio::sync::mpsc;

use super::load_config;

/// Debounce interval for file changes.
const DEBOUNCE_MS: u64 = 200;

/// Outcome of one generation pass.
#[derive(Debug)]
pub struct SyncStats {
    pub collections: usize,
    pub entries: usize,
    /// Whether the output file changed.
    pub written: bool,
    pub duration_ms: u64,
    pub manifest: Manifest,
}

/// Run the sync command once.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<()> {
    tracing::info!(?config_path, "Generating content registry");

    let config = load_config(config_path)?;
    let output = output_path(&config, output);

    let stats = generate(&config, &output)?;
    print_sync_stats(&stats, &output);

    Ok(())
}

/// Run the sync command, regenerating whenever the content directory changes.
pub async fn watch(config_path: &Path, output: Option<&Path>) -> Result<()> {
    tracing::info!(?config_path, "Starting watch mode");

    let config = load_config(config_path)?;
    let output = output_path(&config, output);
    let content_dir = config.content_dir();

    // Initial generation
    let stats = generate(&config, &output)?;
    print_sync_stats(&stats, &output);
    let mut manifest = stats.manifest;

    // Setup file watcher
    let (tx, mut rx) = mpsc::channel::<()>(16);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res
                && matches!(
                    event.kind,
                    EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_))
                        | EventKind::Create(_)
                        | EventKind::Remove(_)
                )
            {
                let _ = tx.blocking_send(());
            }
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    watcher
        .watch(&content_dir, RecursiveMode::Recursive)
        .wrap_err_with(|| format!("Failed to watch {}", content_dir.display()))?;
    tracing::debug!(?content_dir, "Watching content directory");

    println!("  Watching {} for changes", content_dir.display());
    println!("  Press Ctrl+C to stop");
    println!();

    loop {
        tokio::select! {
            event = rx.recv() => {
                if event.is_none() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch mode");
                break;
            }
        }

        // Debounce, then drain any queued events
        tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS)).await;
        while rx.try_recv().is_ok() {}

        let task_config = config.clone();
        let task_output = output.clone();
        let result = tokio::task::spawn_blocking(move || generate(&task_config, &task_output))
            .await
            .wrap_err("Generation task panicked")?;

        match result {
            Ok(stats) => {
                print_manifest_diff(&manifest.diff(&stats.manifest));
                if stats.written {
                    println!(
                        "  ✓ Regenerated {} entries in {}ms",
                        stats.entries, stats.duration_ms
                    );
                }
                manifest = stats.manifest;
            }
            Err(e) => {
                tracing::error!("Regeneration failed: {e:#}");
                eprintln!("  ✗ Regeneration failed: {e:#}");
            }
        }
    }

    Ok(())
}

/// Load, validate and write the registry module.
pub fn generate(config: &Config, output: &Path) -> Result<SyncStats> {
    let start = Instant::now();

    let registry = ContentLoader::new(config.clone())
        .load()
        .wrap_err("Failed to load collections")?;
    let source = CodeGenerator::new(&config.codegen.crate_path)
        .generate(&registry)
        .wrap_err("Failed to generate registry module")?;
    let written = write_if_changed(output, &source)
        .wrap_err_with(|| format!("Failed to write {}", output.display()))?;

    let stats = SyncStats {
        collections: registry.collections().count(),
        entries: registry.len(),
        written,
        duration_ms: start.elapsed().as_millis() as u64,
        manifest: registry.manifest(),
    };
    tracing::debug!(
        collections = stats.collections,
        entries = stats.entries,
        written,
        "Sync completed"
    );

    Ok(stats)
}

fn output_path(config: &Config, output: Option<&Path>) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.codegen_output())
}

/// Print sync statistics in a user-friendly format.
fn print_sync_stats(stats: &SyncStats, output: &Path) {
    println!();
    println!("  Sync Statistics:");
    println!("  ─────────────────────────────────");
    println!("  Collections:  {:>6}", stats.collections);
    println!("  Entries:      {:>6}", stats.entries);
    println!("  Duration:     {:>6}ms", stats.duration_ms);
    println!("  ─────────────────────────────────");
    if stats.written {
        println!("  ✓ Wrote {}", output.display());
    } else {
        println!("  ✓ {} is up to date", output.display());
    }
    println!();
}

fn print_manifest_diff(diff: &ManifestDiff) {
    for entry in &diff.added {
        tracing::info!(collection = %entry.collection, key = %entry.key, "Entry added");
        println!("  + {}:{}", entry.collection, entry.key);
    }
    for entry in &diff.removed {
        tracing::info!(collection = %entry.collection, key = %entry.key, "Entry removed");
        println!("  - {}:{}", entry.collection, entry.key);
    }
}
