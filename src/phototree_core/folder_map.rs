use crate::phototree_core::partition::PartitionNode;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Leaf directories mapped to the source files that belong in them.
///
/// No key is an ancestor of another key, and every planned file appears
/// under exactly one key.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FolderMap {
    folders: BTreeMap<PathBuf, Vec<PathBuf>>,
}

/// Two or more source files that will be copied to the same destination.
/// Only the last one survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    pub destination: PathBuf,
    pub sources: Vec<PathBuf>,
}

impl FolderMap {
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn get(&self, folder: &Path) -> Option<&[PathBuf]> {
        self.folders.get(folder).map(Vec::as_slice)
    }

    pub fn contains(&self, folder: &Path) -> bool {
        self.folders.contains_key(folder)
    }

    pub fn folders(&self) -> impl Iterator<Item = &Path> {
        self.folders.keys().map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[PathBuf])> {
        self.folders.iter().map(|(k, v)| (k.as_path(), v.as_slice()))
    }

    pub fn file_count(&self) -> usize {
        self.folders.values().map(Vec::len).sum()
    }

    /// Source files whose names clash inside the same leaf.
    pub fn collisions(&self) -> Vec<NameCollision> {
        let mut collisions = Vec::new();
        for (folder, files) in &self.folders {
            let mut by_name: HashMap<OsString, Vec<PathBuf>> = HashMap::new();
            let mut order: Vec<OsString> = Vec::new();
            for file in files {
                let Some(name) = file.file_name() else {
                    continue;
                };
                let entry = by_name.entry(name.to_os_string()).or_insert_with(|| {
                    order.push(name.to_os_string());
                    Vec::new()
                });
                entry.push(file.clone());
            }
            for name in order {
                if let Some(sources) = by_name.remove(&name) {
                    if sources.len() > 1 {
                        collisions.push(NameCollision {
                            destination: folder.join(&name),
                            sources,
                        });
                    }
                }
            }
        }
        collisions
    }
}

impl IntoIterator for FolderMap {
    type Item = (PathBuf, Vec<PathBuf>);
    type IntoIter = std::collections::btree_map::IntoIter<PathBuf, Vec<PathBuf>>;

    fn into_iter(self) -> Self::IntoIter {
        self.folders.into_iter()
    }
}

/// Accumulates the folder map while the partition tree is walked.
#[derive(Debug, Default)]
pub struct FolderMapBuilder {
    folders: BTreeMap<PathBuf, Vec<PathBuf>>,
}

impl FolderMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a folder that has just gained a finer subdivision.
    pub fn evict(&mut self, folder: &Path) {
        if self.folders.remove(folder).is_some() {
            log::trace!("Evicted {} in favour of its subfolders", folder.display());
        }
    }

    /// Register `folder` as holding `files`. A folder already claimed by a
    /// different subtree keeps its files and gains these.
    pub fn claim(&mut self, folder: &Path, files: Vec<PathBuf>) {
        match self.folders.get_mut(folder) {
            Some(existing) => {
                log::warn!(
                    "Folder {} is produced by more than one group; merging {} files into it",
                    folder.display(),
                    files.len()
                );
                existing.extend(files);
            }
            None => {
                self.folders.insert(folder.to_path_buf(), files);
            }
        }
    }

    pub fn build(self) -> FolderMap {
        FolderMap {
            folders: self.folders,
        }
    }
}

/// Walk the partition tree rooted at `root` and collect its leaf folders.
pub fn flatten(root: &PartitionNode) -> FolderMap {
    let mut builder = FolderMapBuilder::new();
    let children = root.children();
    if children.is_empty() {
        builder.claim(root.folder(), root.file_paths());
    } else {
        visit(root.folder(), children, &mut builder);
    }
    let map = builder.build();
    log::debug!(
        "Planned {} leaf folders holding {} files under {}",
        map.len(),
        map.file_count(),
        root.folder().display()
    );
    map
}

fn visit(parent: &Path, children: Vec<PartitionNode>, builder: &mut FolderMapBuilder) {
    for child in children {
        builder.evict(parent);
        builder.claim(child.folder(), child.file_paths());
        let grandchildren = child.children();
        if !grandchildren.is_empty() {
            visit(child.folder(), grandchildren, builder);
        }
    }
}
