//! Test file discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{NdltError, Result};

/// Recursively collect every file under `root` with the given extension.
///
/// Entries are visited in file-name order so repeated runs list the same
/// files in the same order. A symlink counts when its target is a file;
/// symlinked directories are not descended into.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(NdltError::Validation(format!(
            "Test directory does not exist: {}",
            root.display()
        )));
    }

    let mut tests = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.path().is_file()
            && entry.path().extension().is_some_and(|ext| ext == extension)
        {
            tests.push(entry.into_path());
        }
    }

    Ok(tests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn test_discover_recursive_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "b.ndl");
        touch(root, "a.ndl");
        touch(root, "nested/deeper/c.ndl");
        touch(root, "nested/notes.txt");
        touch(root, "nested/d.ndl.bak");

        let found = discover(root, "ndl").unwrap();
        let relative: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.ndl"),
                PathBuf::from("b.ndl"),
                PathBuf::from("nested/deeper/c.ndl"),
            ]
        );
    }

    #[test]
    fn test_discover_ignores_directories_with_extension() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("fake.ndl")).unwrap();

        let found = discover(temp_dir.path(), "ndl").unwrap();
        assert!(found.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_includes_symlinked_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "a.ndl");
        touch(root, "real.txt");
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("linked.ndl")).unwrap();
        std::os::unix::fs::symlink(root.join("absent"), root.join("dangling.ndl")).unwrap();

        let found = discover(root, "ndl").unwrap();
        assert_eq!(found, vec![root.join("a.ndl"), root.join("linked.ndl")]);
    }

    #[test]
    fn test_discover_missing_root() {
        let result = discover(Path::new("/nonexistent/tests"), "ndl");
        assert!(matches!(result, Err(NdltError::Validation(msg)) if msg.contains("does not exist")));
    }
}
