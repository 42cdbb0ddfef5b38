pub mod cli;
pub mod criterion;
pub mod distribute;
pub mod error;
pub mod exif;
pub mod find;
pub mod folder_map;
pub mod materialize;
pub mod partition;
pub mod plan;
pub mod record;
pub mod settings;
pub mod source;

pub use cli::{Cli, Commands};
pub use criterion::{Criterion, CriterionValue, parse_criteria};
pub use distribute::{DistributeOptions, distribute};
pub use error::{DistributionReport, PhototreeError};
pub use folder_map::{FolderMap, FolderMapBuilder, flatten};
pub use materialize::ensure_directory;
pub use partition::PartitionNode;
pub use plan::{build_plan, format_plan};
pub use record::{Record, UNKNOWN_CITY, UNKNOWN_COUNTRY};
pub use settings::SortSettings;
pub use source::RecordSource;
