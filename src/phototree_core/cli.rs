use crate::phototree_core::error::{PhototreeError, Result};
use crate::phototree_core::source::RecordSource;
use clap::{Args, Parser, Subcommand, ValueEnum};
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sort photos into folders by date and location")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable file logging to phototree.log
    #[arg(long = "log", global = true)]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug, global = true)]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy photos into a folder tree built from the given criteria.
    ///
    /// Criteria are applied in order, one folder level each: Y (year),
    /// m (month), d (day), C (country), c (city). They may be packed
    /// ("YmC") or given separately ("Y m C"). Only the deepest folders
    /// receive files. Originals are never modified.
    Sort {
        #[command(flatten)]
        plan: PlanArgs,

        /// Show what would be created without copying anything
        #[arg(long)]
        dry_run: bool,

        /// Number of folders to fill in parallel (defaults to CPU count)
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
    },

    /// Print the planned folder layout without touching the filesystem
    Plan {
        #[command(flatten)]
        plan: PlanArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Paths)]
        format: OutputFormat,
    },

    /// Copy every photo taken in a given country or city into one folder
    Find {
        #[command(flatten)]
        input: InputArgs,

        /// Country name to match (case-insensitive)
        #[arg(long, conflicts_with = "city", required_unless_present = "city")]
        country: Option<String>,

        /// City name to match (case-insensitive)
        #[arg(long)]
        city: Option<String>,

        /// Output folder
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Maximum distance in kilometres between a photo and the city
        #[arg(long)]
        distance: Option<u32>,
    },
}

/// Where records are read from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// JSON manifest of photo records with dates and places
    #[arg(long, short = 'm')]
    pub manifest: Option<PathBuf>,

    /// Directory of photos to date from EXIF (no location data)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
}

impl InputArgs {
    pub fn source(&self) -> Result<RecordSource> {
        match (&self.manifest, &self.input) {
            (Some(manifest), _) => Ok(RecordSource::Manifest(manifest.clone())),
            (None, Some(dir)) => Ok(RecordSource::Directory(dir.clone())),
            (None, None) => Err(PhototreeError::Argument(
                "--manifest or --input is required".to_string(),
            )),
        }
    }
}

/// Arguments shared by `sort` and `plan`.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Grouping criteria codes, outermost first (e.g. "YmC" or "Y m C")
    #[arg(required = true, num_args = 1..)]
    pub criteria: Vec<String>,

    #[command(flatten)]
    pub input: InputArgs,

    /// Output folder (root of the sorted tree)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Maximum distance in kilometres between a photo and its city (required for c)
    #[arg(long)]
    pub distance: Option<u32>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One folder per line followed by its files
    Paths,
    /// JSON object of folder -> files
    Json,
    /// Folder and file count table
    Table,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_prefers_manifest() {
        let args = InputArgs {
            manifest: Some(PathBuf::from("records.json")),
            input: None,
        };
        assert!(matches!(args.source(), Ok(RecordSource::Manifest(p)) if p == PathBuf::from("records.json")));
    }

    #[test]
    fn test_source_without_input_is_an_error() {
        let args = InputArgs {
            manifest: None,
            input: None,
        };
        assert!(matches!(args.source(), Err(PhototreeError::Argument(_))));
    }

    #[test]
    fn test_parse_rejects_both_inputs() {
        let parsed = Cli::try_parse_from([
            "phototree", "plan", "Y", "--manifest", "r.json", "--input", "photos", "-o", "out",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from(["phototree", "plan", "Y", "-o", "out"]);
        assert!(parsed.is_err());
    }
}
