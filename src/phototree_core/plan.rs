use crate::phototree_core::cli::OutputFormat;
use crate::phototree_core::folder_map::{FolderMap, flatten};
use crate::phototree_core::partition::PartitionNode;
use crate::phototree_core::record::Record;
use crate::phototree_core::settings::SortSettings;

/// Partition `records` by the configured criteria and flatten the result.
pub fn build_plan(records: Vec<Record>, settings: &SortSettings) -> FolderMap {
    log::info!(
        "Planning {} records by [{}] under {}",
        records.len(),
        settings
            .criteria
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        settings.output().display()
    );
    if settings.uses_location()
        && !records.is_empty()
        && records.iter().all(|r| !r.has_country() && !r.has_city())
    {
        log::warn!("No record carries location data; all photos will be placed in Unknown_* folders");
    }
    let root = PartitionNode::new(settings.output(), records, settings.criteria.clone());
    flatten(&root)
}

/// Render a plan for display.
pub fn format_plan(map: &FolderMap, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Paths => {
            let mut out = String::new();
            for (folder, files) in map.iter() {
                out.push_str(&format!("{}\n", folder.display()));
                for file in files {
                    out.push_str(&format!("  {}\n", file.display()));
                }
            }
            out.trim_end().to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(map).unwrap_or_else(|_| "{}".to_string()),
        OutputFormat::Table => {
            let width = map
                .folders()
                .map(|f| f.display().to_string().len())
                .max()
                .unwrap_or(6)
                .max(6);
            let mut out = format!("{:<width$}  {:>6}\n", "Folder", "Files", width = width);
            out.push_str(&format!("{}\n", "─".repeat(width + 8)));
            for (folder, files) in map.iter() {
                out.push_str(&format!(
                    "{:<width$}  {:>6}\n",
                    folder.display().to_string(),
                    files.len(),
                    width = width
                ));
            }
            out.push_str(&format!(
                "{} folders, {} files",
                map.len(),
                map.file_count()
            ));
            out
        }
    }
}
