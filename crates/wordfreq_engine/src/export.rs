use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use serde::Serialize;

use crate::delimited::to_delimited_text;
use crate::persist::{write_atomically, PersistError};
use crate::pipeline::Analysis;
use crate::rank::RankedEntry;

pub const CSV_FILENAME: &str = "histogram-data.csv";
pub const CSV_MIME_TYPE: &str = "text/csv";
pub const MANIFEST_FILENAME: &str = "histogram-data.json";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub csv_filename: String,
    pub manifest_filename: Option<String>,
    /// Recorded in the manifest only.
    pub source_url: Option<String>,
    /// RFC 3339 timestamp recorded in the manifest, supplied by the caller.
    pub generated_utc: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            csv_filename: CSV_FILENAME.to_string(),
            manifest_filename: Some(MANIFEST_FILENAME.to_string()),
            source_url: None,
            generated_utc: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub entry_count: usize,
    pub csv_path: PathBuf,
    pub mime_type: &'static str,
    pub manifest_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("manifest serialization failed: {0}")]
    Manifest(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Manifest<'a> {
    source_url: Option<&'a str>,
    generated_utc: Option<&'a str>,
    csv_file: &'a str,
    mime_type: &'a str,
    total_tokens: u64,
    distinct_tokens: usize,
    entries: &'a [RankedEntry],
}

/// Write the histogram as CSV into `output_dir`, plus an optional JSON manifest.
pub fn write_export(
    output_dir: &Path,
    analysis: &Analysis,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let csv = to_delimited_text(&analysis.histogram);
    let csv_path = write_atomically(output_dir, &options.csv_filename, csv.as_bytes())?;

    let manifest_path = match &options.manifest_filename {
        Some(name) => {
            let manifest = Manifest {
                source_url: options.source_url.as_deref(),
                generated_utc: options.generated_utc.as_deref(),
                csv_file: &options.csv_filename,
                mime_type: CSV_MIME_TYPE,
                total_tokens: analysis.total_tokens,
                distinct_tokens: analysis.distinct_tokens,
                entries: &analysis.histogram,
            };
            let json = serde_json::to_vec_pretty(&manifest)?;
            Some(write_atomically(output_dir, name, &json)?)
        }
        None => None,
    };

    engine_info!(
        "Exported {} entries to {:?}",
        analysis.histogram.len(),
        csv_path
    );

    Ok(ExportSummary {
        entry_count: analysis.histogram.len(),
        csv_path,
        mime_type: CSV_MIME_TYPE,
        manifest_path,
    })
}
