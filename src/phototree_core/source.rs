use crate::phototree_core::error::{PhototreeError, Result};
use crate::phototree_core::exif::{capture_time, exiftool_available, modified_time};
use crate::phototree_core::record::{ManifestEntry, Record};
use exiftool::ExifTool;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::cell::RefCell;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

thread_local! {
    static EXIFTOOL: RefCell<Option<ExifTool>> = const { RefCell::new(None) };
}

/// Image file extensions picked up by a directory scan (lowercase).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "tif", "tiff", "bmp", "gif", "png"];

/// Where the records to sort come from.
#[derive(Debug, Clone)]
pub enum RecordSource {
    /// JSON manifest written by the metadata/location step.
    Manifest(PathBuf),
    /// Directory of photos dated from EXIF. No place data.
    Directory(PathBuf),
}

impl RecordSource {
    pub fn load(&self, max_distance_km: Option<u32>) -> Result<Vec<Record>> {
        match self {
            RecordSource::Manifest(path) => load_manifest(path, max_distance_km),
            RecordSource::Directory(dir) => scan_directory(dir),
        }
    }
}

/// Read records from a JSON manifest.
///
/// Cities further than `max_distance_km` from the photo are dropped to the
/// unknown-city sentinel.
pub fn load_manifest(path: &Path, max_distance_km: Option<u32>) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(PhototreeError::PathNotFound(path.to_path_buf()));
    }

    let reader = BufReader::new(fs::File::open(path)?);
    let entries: Vec<ManifestEntry> = serde_json::from_reader(reader)?;
    log::info!("Loaded {} records from {}", entries.len(), path.display());

    Ok(entries
        .into_iter()
        .map(|entry| entry.into_record(max_distance_km))
        .collect())
}

/// Whether a path looks like a photo we know how to sort.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Build records for every image under `dir`.
pub fn scan_directory(dir: &Path) -> Result<Vec<Record>> {
    if !dir.exists() || !dir.is_dir() {
        return Err(PhototreeError::NotADirectory(dir.to_path_buf()));
    }

    log::info!("Scanning {} for photos", dir.display());
    if !exiftool_available() {
        log::warn!("exiftool not found; photos will be dated by modification time");
    }

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_image(p))
        .collect();

    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .map_err(|e| PhototreeError::Argument(e.to_string()))?;
    let bar = ProgressBar::new(files.len() as u64).with_style(bar_style);
    bar.set_message("Reading capture dates");

    let records: Vec<Record> = files
        .par_iter()
        .filter_map(|path| {
            let result = date_file(path);
            bar.inc(1);
            match result {
                Ok(timestamp) => Some(Record::unlocated(path.clone(), timestamp)),
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect();

    bar.finish_with_message("Scan complete");
    log::info!("Found {} photos", records.len());

    Ok(records)
}

/// Date a file with this thread's ExifTool instance, or from its
/// modification time if exiftool cannot be started.
fn date_file(path: &Path) -> Result<time::OffsetDateTime> {
    EXIFTOOL.with(|cell| {
        let mut exiftool_opt = cell.borrow_mut();
        if exiftool_opt.is_none() {
            *exiftool_opt = ExifTool::new().ok();
        }
        match exiftool_opt.as_mut() {
            Some(exiftool) => capture_time(exiftool, path).or_else(|e| {
                log::warn!("Failed to read metadata from {}: {}", path.display(), e);
                modified_time(path)
            }),
            None => {
                log::debug!("ExifTool not available for {}", path.display());
                modified_time(path)
            }
        }
    })
}
