//! # CSV Report
//!
//! Writes the main asset listing and, in file mode, a separate spam listing.
//! Both share the same eight columns and always start with a header row.

use chrono::Local;
use core_logic::models::{Asset, CSV_COLUMNS};
use core_logic::ReportError;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = ".csv";
const DEFAULT_STEM: &str = "wallet_assets";

/// Local time as `YYYYMMDD_HHMMSS`
pub fn generate_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Main and spam file paths for a base path and timestamp.
///
/// `out/report.csv` + `20240101_120000` gives `out/report_20240101_120000.csv`
/// and `out/report_20240101_120000_spam.csv`. Without an extension `.csv` is used.
pub fn generate_filenames(base: &Path, timestamp: &str) -> (PathBuf, PathBuf) {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_STEM.to_string());
    let ext = base
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    let dir = base.parent().unwrap_or_else(|| Path::new(""));

    let main = dir.join(format!("{}_{}{}", stem, timestamp, ext));
    let spam = dir.join(format!("{}_{}_spam{}", stem, timestamp, ext));
    (main, spam)
}

/// Header plus one row per asset, in order
pub fn write_assets<W: Write>(writer: W, assets: &[Asset]) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(CSV_COLUMNS)
        .map_err(|e| ReportError::Csv(e.to_string()))?;
    for asset in assets {
        csv_writer
            .write_record(asset.to_csv_row())
            .map_err(|e| ReportError::Csv(e.to_string()))?;
    }

    csv_writer.flush().map_err(|e| ReportError::Io {
        path: "<report>".to_string(),
        source: e,
    })
}

/// Where the report ended up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrittenReport {
    /// `None` when the listing went to stdout
    pub main: Option<PathBuf>,
    pub spam: Option<PathBuf>,
    /// Spam assets left out because no file was requested
    pub spam_omitted: usize,
}

fn write_file(path: &Path, assets: &[Asset]) -> Result<(), ReportError> {
    let io_err = |source: io::Error| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    write_assets(file, assets)
}

/// Write the report.
///
/// File mode writes the main file always and the spam file only when there
/// is spam. Stdout mode prints the main listing and leaves spam out.
pub fn write_report(
    assets: &[Asset],
    spam_assets: &[Asset],
    output: Option<&Path>,
    timestamp: &str,
) -> Result<WrittenReport, ReportError> {
    match output {
        Some(base) => {
            let (main_path, spam_path) = generate_filenames(base, timestamp);
            write_file(&main_path, assets)?;

            let spam = if spam_assets.is_empty() {
                None
            } else {
                write_file(&spam_path, spam_assets)?;
                Some(spam_path)
            };

            Ok(WrittenReport {
                main: Some(main_path),
                spam,
                spam_omitted: 0,
            })
        }
        None => {
            let stdout = io::stdout();
            write_assets(stdout.lock(), assets)?;
            Ok(WrittenReport {
                main: None,
                spam: None,
                spam_omitted: spam_assets.len(),
            })
        }
    }
}
