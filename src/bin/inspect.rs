//! resbundle-inspect
//!
//! Lists and extracts pak entries, and checks PNGs for the scale fallback
//! marker.

use clap::{Parser, Subcommand};
use resbundle::pack::decode_string;
use resbundle::{png_contains_fallback_marker, DataPack, ResourceId, ScaleFactor, TextEncoding};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "resbundle-inspect")]
#[command(about = "Inspect resource pak files", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the encoding and every entry with its size
    List {
        /// Path to the pak file
        pak: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write one resource to stdout
    Get {
        /// Path to the pak file
        pak: PathBuf,

        /// Resource id
        id: ResourceId,

        /// Decode the resource as text using the pak's encoding
        #[arg(long)]
        string: bool,
    },

    /// Report whether a PNG carries the scale fallback marker
    PngMarker {
        /// Path to the PNG file
        file: PathBuf,
    },
}

#[derive(Serialize)]
struct PakSummary {
    version: u32,
    encoding: &'static str,
    entries: Vec<EntrySummary>,
}

#[derive(Serialize)]
struct EntrySummary {
    id: ResourceId,
    size: usize,
}

fn encoding_name(encoding: TextEncoding) -> &'static str {
    match encoding {
        TextEncoding::Binary => "binary",
        TextEncoding::Utf8 => "utf-8",
        TextEncoding::Utf16 => "utf-16",
    }
}

fn load(path: &Path) -> Result<DataPack, String> {
    DataPack::load_from_path(path, ScaleFactor::None)
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e))
}

fn summarize(pack: &DataPack) -> PakSummary {
    let entries = pack
        .resource_ids()
        .into_iter()
        .map(|id| EntrySummary {
            id,
            size: pack.get(id).map_or(0, |data| data.len()),
        })
        .collect();
    PakSummary {
        version: pack.version(),
        encoding: encoding_name(pack.text_encoding()),
        entries,
    }
}

fn run(args: Args) -> Result<(), String> {
    let mut stdout = std::io::stdout().lock();

    match args.command {
        Command::List { pak, json } => {
            let pack = load(&pak)?;
            let summary = summarize(&pack);
            debug!("{} entries in {}", summary.entries.len(), pak.display());

            if json {
                serde_json::to_writer_pretty(&mut stdout, &summary).map_err(|e| e.to_string())?;
                writeln!(stdout).map_err(|e| e.to_string())?;
            } else {
                writeln!(
                    stdout,
                    "version {}, encoding {}, {} entries",
                    summary.version,
                    summary.encoding,
                    summary.entries.len()
                )
                .map_err(|e| e.to_string())?;
                for entry in &summary.entries {
                    writeln!(stdout, "{:>6} {:>10}", entry.id, entry.size)
                        .map_err(|e| e.to_string())?;
                }
            }
        }
        Command::Get { pak, id, string } => {
            let pack = load(&pak)?;
            let data = pack
                .get(id)
                .ok_or_else(|| format!("Resource {} not found in {}", id, pak.display()))?;

            if string {
                let text = decode_string(&data, pack.text_encoding());
                writeln!(stdout, "{}", text).map_err(|e| e.to_string())?;
            } else {
                stdout.write_all(&data).map_err(|e| e.to_string())?;
            }
        }
        Command::PngMarker { file } => {
            let data = std::fs::read(&file)
                .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
            let present = png_contains_fallback_marker(&data);
            writeln!(
                stdout,
                "{}: fallback marker {}",
                file.display(),
                if present { "present" } else { "absent" }
            )
            .map_err(|e| e.to_string())?;
        }
    }

    stdout.flush().map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
