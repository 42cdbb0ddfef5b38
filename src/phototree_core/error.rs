use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhototreeError {
    // Argument errors
    #[error("Unrecognised criterion code(s): {}. Accepted codes are Y, m, d, C and c", .0.join(", "))]
    InvalidCriterion(Vec<String>),

    #[error("Output folder is required when sorting")]
    MissingOutputPath,

    #[error("Distance argument (--distance) is required when sorting or searching by city")]
    MissingDistanceParameter,

    #[error("Argument error: {0}")]
    Argument(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    // Record source errors
    #[error("Invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    InvalidDateFormat(String),

    #[error("Failed to extract metadata from {path}: {reason}")]
    MetadataExtraction { path: PathBuf, reason: String },

    // Distribution errors
    #[error("Distribution incomplete: {} leaves and {} files failed\n{}", .0.failed_leaves.len(), .0.failed_copies.len(), .0)]
    DistributionFailed(DistributionReport),
}

/// A leaf folder that could not be created. None of its files were copied.
#[derive(Debug)]
pub struct LeafFailure {
    pub folder: PathBuf,
    pub files_skipped: usize,
    pub error: std::io::Error,
}

/// A single file that failed to copy into an otherwise healthy leaf.
#[derive(Debug)]
pub struct CopyFailure {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub error: std::io::Error,
}

/// Outcome of the effects phase.
#[derive(Debug, Default)]
pub struct DistributionReport {
    pub leaves_written: usize,
    pub directories_created: usize,
    pub files_copied: usize,
    pub bytes_copied: u64,
    /// Copies that replaced a file copied earlier in the same run.
    pub files_overwritten: usize,
    /// Sources that already sit at their destination and were left alone.
    pub files_in_place: usize,
    pub failed_leaves: Vec<LeafFailure>,
    pub failed_copies: Vec<CopyFailure>,
}

impl DistributionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_clean(&self) -> bool {
        self.failed_leaves.is_empty() && self.failed_copies.is_empty()
    }

    pub fn add_leaf_failure(&mut self, folder: PathBuf, files_skipped: usize, error: std::io::Error) {
        self.failed_leaves.push(LeafFailure {
            folder,
            files_skipped,
            error,
        });
    }

    pub fn add_copy_failure(&mut self, source: PathBuf, destination: PathBuf, error: std::io::Error) {
        self.failed_copies.push(CopyFailure {
            source,
            destination,
            error,
        });
    }

    /// Fold another report (usually a single leaf's) into this one.
    pub fn merge(&mut self, other: DistributionReport) {
        self.leaves_written += other.leaves_written;
        self.directories_created += other.directories_created;
        self.files_copied += other.files_copied;
        self.bytes_copied += other.bytes_copied;
        self.files_overwritten += other.files_overwritten;
        self.files_in_place += other.files_in_place;
        self.failed_leaves.extend(other.failed_leaves);
        self.failed_copies.extend(other.failed_copies);
    }

    /// Turn a report with failures into an error, keeping the report attached.
    pub fn into_result(self) -> Result<DistributionReport> {
        if self.is_clean() {
            Ok(self)
        } else {
            Err(PhototreeError::DistributionFailed(self))
        }
    }
}

impl std::fmt::Display for DistributionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for failure in &self.failed_leaves {
            writeln!(
                f,
                "  leaf {} ({} files skipped): {}",
                failure.folder.display(),
                failure.files_skipped,
                failure.error
            )?;
        }
        for failure in &self.failed_copies {
            writeln!(
                f,
                "  {} -> {}: {}",
                failure.source.display(),
                failure.destination.display(),
                failure.error
            )?;
        }
        Ok(())
    }
}

/// Result type for phototree operations.
pub type Result<T> = std::result::Result<T, PhototreeError>;
