//! Fixture discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Default extension of fixture files.
pub const DEFAULT_EXTENSION: &str = "sft";

/// Expands `roots` into fixture paths.
///
/// Files are taken as given. Directories are walked recursively for files
/// with `extension`, sorted so runs are deterministic. Roots that do not
/// exist are passed through so the harness reports them as unreadable.
pub fn discover_fixtures<P: AsRef<Path>>(roots: &[P], extension: &str) -> Vec<PathBuf> {
    let mut fixtures = Vec::new();
    for root in roots {
        let root = root.as_ref();
        if root.is_file() || !root.exists() {
            fixtures.push(root.to_path_buf());
            continue;
        }
        let mut found: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && has_extension(e.path(), extension))
            .map(|e| e.path().to_path_buf())
            .collect();
        found.sort();
        fixtures.extend(found);
    }
    fixtures
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn walks_directories_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.sft"), "").unwrap();
        fs::write(dir.path().join("a.sft"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("nested/c.sft"), "").unwrap();

        let found = discover_fixtures(&[dir.path()], DEFAULT_EXTENSION);
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.sft"),
                PathBuf::from("b.sft"),
                PathBuf::from("nested/c.sft")
            ]
        );
    }

    #[test]
    fn explicit_files_are_kept_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("case.txt");
        fs::write(&file, "").unwrap();
        assert_eq!(discover_fixtures(&[&file], DEFAULT_EXTENSION), vec![file]);
    }

    #[test]
    fn missing_roots_are_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent");
        let found = discover_fixtures(&[&absent], DEFAULT_EXTENSION);
        assert_eq!(found, vec![absent]);
    }
}
