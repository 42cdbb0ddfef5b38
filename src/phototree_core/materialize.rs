use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Create `path` and any missing ancestors, parents first.
///
/// Returns the directories that were created, in creation order. Nothing is
/// created if `path` already exists. A directory that appears while we are
/// working (another leaf sharing the ancestor) is accepted.
pub fn ensure_directory(path: &Path) -> io::Result<Vec<PathBuf>> {
    if path.is_dir() {
        return Ok(Vec::new());
    }
    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", path.display()),
        ));
    }

    let mut missing = Vec::new();
    let mut current = Some(path);
    while let Some(dir) = current {
        if dir.as_os_str().is_empty() || dir.exists() {
            break;
        }
        missing.push(dir.to_path_buf());
        current = dir.parent();
    }

    let mut created = Vec::with_capacity(missing.len());
    for dir in missing.into_iter().rev() {
        match fs::create_dir(&dir) {
            Ok(()) => {
                log::debug!("Created directory {}", dir.display());
                created.push(dir);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {
                log::trace!("Directory {} appeared concurrently", dir.display());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_creates_missing_chain_parent_first() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.path().join("a/b/c");

        let created = ensure_directory(&target).unwrap();
        assert_eq!(
            created,
            vec![
                temp.path().join("a"),
                temp.path().join("a/b"),
                temp.path().join("a/b/c"),
            ]
        );
        assert!(target.is_dir());
    }

    #[test]
    fn test_second_call_is_noop() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.path().join("a/b/c");
        ensure_directory(&target).unwrap();
        assert!(ensure_directory(&target).unwrap().is_empty());
    }

    #[test]
    fn test_partial_chain() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("2020").create_dir_all().unwrap();
        let created = ensure_directory(&temp.path().join("2020/Aus/Bri")).unwrap();
        assert_eq!(
            created,
            vec![temp.path().join("2020/Aus"), temp.path().join("2020/Aus/Bri")]
        );
    }

    #[test]
    fn test_concurrent_leaves_share_ancestors() {
        let temp = assert_fs::TempDir::new().unwrap();
        let root = temp.path().join("a/b/c");

        let created: Vec<Vec<PathBuf>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let leaf = root.join(format!("leaf{i}"));
                    scope.spawn(move || ensure_directory(&leaf))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect()
        });

        // Every ancestor is created exactly once across all threads
        let total: usize = created.iter().map(Vec::len).sum();
        assert_eq!(total, 3 + 8);
        for i in 0..8 {
            assert!(root.join(format!("leaf{i}")).is_dir());
        }
    }

    #[test]
    fn test_file_in_the_way() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("2020").touch().unwrap();
        assert!(ensure_directory(temp.child("2020").path()).is_err());
        assert!(ensure_directory(&temp.path().join("2020/Aus")).is_err());
    }
}
