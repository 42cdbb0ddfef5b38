use crate::phototree_core::error::{DistributionReport, PhototreeError, Result};
use crate::phototree_core::folder_map::FolderMap;
use crate::phototree_core::materialize::ensure_directory;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// How the effects phase should run.
#[derive(Debug, Clone, Default)]
pub struct DistributeOptions {
    /// Log what would happen without touching the filesystem.
    pub dry_run: bool,
    /// Worker threads for leaf folders. Defaults to the number of CPUs.
    pub jobs: Option<usize>,
}

/// Create every leaf folder in `map` and copy its files into it.
///
/// Leaves are handled in parallel; within a leaf, files are copied in plan
/// order so a later file with the same name replaces an earlier one. A photo
/// already sitting in its leaf is never copied over.
/// Failures are collected in the report instead of stopping the run. An
/// interrupted run leaves the output partially populated.
pub fn distribute(map: FolderMap, options: &DistributeOptions) -> Result<DistributionReport> {
    for collision in map.collisions() {
        log::warn!(
            "{} sources share the destination {}; only {} will remain",
            collision.sources.len(),
            collision.destination.display(),
            collision
                .sources
                .last()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );
    }

    if options.dry_run {
        println!("\n[DRY RUN] Would create {} folders:", map.len());
        for (folder, files) in map.iter() {
            println!("  {} ({} files)", folder.display(), files.len());
        }
        return Ok(DistributionReport::new());
    }

    let jobs = options.jobs.unwrap_or_else(num_cpus::get).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| PhototreeError::Argument(format!("could not start {} workers: {}", jobs, e)))?;

    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .map_err(|e| PhototreeError::Argument(e.to_string()))?;
    let bar = ProgressBar::new(map.file_count() as u64).with_style(bar_style);
    bar.set_message("Copying files");

    log::info!(
        "Distributing {} files into {} folders using {} workers",
        map.file_count(),
        map.len(),
        jobs
    );

    let leaves: Vec<(PathBuf, Vec<PathBuf>)> = map.into_iter().collect();
    let report = pool.install(|| {
        leaves
            .par_iter()
            .map(|(folder, files)| {
                let report = distribute_leaf(folder, files);
                bar.inc(files.len() as u64);
                report
            })
            .reduce(DistributionReport::new, |mut acc, leaf| {
                acc.merge(leaf);
                acc
            })
    });

    bar.finish_with_message("Copy complete");

    if !report.is_clean() {
        log::error!(
            "{} leaf folders and {} files failed",
            report.failed_leaves.len(),
            report.failed_copies.len()
        );
    }

    Ok(report)
}

/// Materialize one leaf and copy its files. Never touches another leaf.
pub fn distribute_leaf(folder: &Path, files: &[PathBuf]) -> DistributionReport {
    let mut report = DistributionReport::new();

    match ensure_directory(folder) {
        Ok(created) => report.directories_created += created.len(),
        Err(e) => {
            log::error!("Could not create {}: {}", folder.display(), e);
            report.add_leaf_failure(folder.to_path_buf(), files.len(), e);
            return report;
        }
    }

    // Names whose original photo already lives in this leaf
    let originals: HashSet<OsString> = files
        .iter()
        .filter_map(|source| {
            let name = source.file_name()?;
            is_same_file(source, &folder.join(name)).then(|| name.to_os_string())
        })
        .collect();

    let mut written: HashSet<OsString> = HashSet::new();
    for source in files {
        let Some(name) = source.file_name() else {
            log::warn!("Skipping {}: no file name", source.display());
            report.add_copy_failure(
                source.clone(),
                folder.to_path_buf(),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            );
            continue;
        };
        let destination = folder.join(name);

        // Copying a file onto itself truncates it
        if is_same_file(source, &destination) {
            log::debug!("{} is already in place", destination.display());
            written.insert(name.to_os_string());
            report.files_in_place += 1;
            continue;
        }

        if originals.contains(name) {
            if has_same_contents(source, &destination) {
                log::debug!("{} already holds a copy of {}", destination.display(), source.display());
                report.files_in_place += 1;
            } else {
                log::warn!(
                    "Not copying {}: {} is an original photo",
                    source.display(),
                    destination.display()
                );
                report.add_copy_failure(
                    source.clone(),
                    destination,
                    std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "destination is an original photo",
                    ),
                );
            }
            continue;
        }

        match fs::copy(source, &destination) {
            Ok(bytes) => {
                if !written.insert(name.to_os_string()) {
                    log::debug!("{} overwrote an earlier copy", destination.display());
                    report.files_overwritten += 1;
                }
                report.files_copied += 1;
                report.bytes_copied += bytes;
            }
            Err(e) => {
                log::warn!(
                    "Failed to copy {} -> {}: {}",
                    source.display(),
                    destination.display(),
                    e
                );
                report.add_copy_failure(source.clone(), destination, e);
            }
        }
    }

    if report.files_copied + report.files_in_place > 0 {
        report.leaves_written = 1;
    }
    report
}

/// Whether both paths resolve to the same existing file.
fn is_same_file(source: &Path, destination: &Path) -> bool {
    if !destination.exists() {
        return false;
    }
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn has_same_contents(a: &Path, b: &Path) -> bool {
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(ma), Ok(mb)) if ma.len() == mb.len() => {
            matches!((fs::read(a), fs::read(b)), (Ok(x), Ok(y)) if x == y)
        }
        _ => false,
    }
}
