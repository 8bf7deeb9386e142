//! Command-line front end.
//!
//! Usage:
//!   `songport sniff <file>...`
//!   `songport import <path>... [--json]`
//!   `songport convert <path>... --out <dir>`

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use songport::formats::{candidates, SniffInput};
use songport::{collect_paths, export, BatchReport, Format, ImportConfig, Importer, InMemoryLibrary, Song};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Import legacy worship song files and export ChordPro
#[derive(Parser, Debug)]
#[command(name = "songport")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the formats worth trying for each file
    Sniff {
        /// Files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Import files, directories and zip archives
    Import {
        /// Inputs; directories are walked
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print the imported songs as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Import inputs and write one ChordPro file per song
    Convert {
        /// Inputs; directories are walked
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output directory
        #[arg(short, long, env = "SONGPORT_OUT")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = ImportConfig::load().context("loading configuration")?;

    match args.command {
        Command::Sniff { files } => sniff(&files, &config),
        Command::Import { paths, json } => {
            let (library, report) = import(&paths, config);
            if json {
                let songs: Vec<&Song> = library.iter().collect();
                println!("{}", serde_json::to_string_pretty(&songs)?);
            } else {
                print_report(&report);
            }
            check(&report)
        }
        Command::Convert { paths, out } => {
            let (library, report) = import(&paths, config);
            let written = convert(&library, &out)?;
            print_report(&report);
            println!("Wrote {written} ChordPro files to {}", out.display());
            check(&report)
        }
    }
}

fn sniff(files: &[PathBuf], config: &ImportConfig) -> Result<()> {
    for path in files {
        let mut prefix = Vec::new();
        fs_err::File::open(path)?
            .take(config.sniff_bytes as u64)
            .read_to_end(&mut prefix)?;
        let name = path.to_string_lossy();
        let formats: Vec<&str> = candidates(&SniffInput::named(&name, &prefix))
            .into_iter()
            .map(Format::name)
            .collect();
        if formats.is_empty() {
            println!("{}: unsupported", path.display());
        } else {
            println!("{}: {}", path.display(), formats.join(", "));
        }
    }
    Ok(())
}

fn import(inputs: &[PathBuf], config: ImportConfig) -> (InMemoryLibrary, BatchReport) {
    let paths: Vec<PathBuf> = inputs.iter().flat_map(|p| collect_paths(p)).collect();
    tracing::info!("Found {} candidate files", paths.len());
    let mut library = InMemoryLibrary::new();
    let report = Importer::new(config).import_batch(&paths, &mut library);
    (library, report)
}

fn convert(library: &InMemoryLibrary, out: &Path) -> Result<usize> {
    fs_err::create_dir_all(out)?;
    let mut used = HashSet::new();
    let mut written = 0;
    for song in library.iter() {
        let stem = unique_stem(&file_stem_for(song), &mut used);
        let path = out.join(format!("{stem}.cho"));
        let bytes = export(song, Format::ChordPro)?;
        fs_err::write(&path, bytes)?;
        written += 1;
    }
    Ok(written)
}

/// File-system safe name from the song title, falling back to the id.
fn file_stem_for(song: &Song) -> String {
    let cleaned: String = song
        .display_title()
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        song.id.to_string()
    } else {
        cleaned.to_string()
    }
}

fn unique_stem(stem: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = stem.to_string();
    let mut n = 2;
    while !used.insert(candidate.to_lowercase()) {
        candidate = format!("{stem} ({n})");
        n += 1;
    }
    candidate
}

fn print_report(report: &BatchReport) {
    println!(
        "Imported {} songs ({} new, {} updated)",
        report.imported(),
        report.created,
        report.updated
    );
    for path in &report.unrecognized {
        println!("  skipped {}: no songs recognized", path.display());
    }
    for (path, warning) in &report.warnings {
        println!("  warning {}: {warning}", path.display());
    }
    for (path, error) in &report.errors {
        println!("  error {}: {error}", path.display());
    }
}

fn check(report: &BatchReport) -> Result<()> {
    if !report.errors.is_empty() {
        bail!("{} files failed to import", report.errors.len());
    }
    Ok(())
}
