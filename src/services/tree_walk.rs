use crate::models::FilterSet;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while enumerating a synchronized tree.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Failed to read directory entry: {0}")]
    Io(#[from] walkdir::Error),

    #[error("Non UTF-8 path under {0}")]
    NonUtf8Path(Utf8PathBuf),
}

/// Recursively collect every content file under `root`.
///
/// Git metadata directories are pruned entirely. A file is kept when its
/// extension is in the filter's allow-list and its full path contains none
/// of the excluded substrings. Directories themselves are never filtered,
/// only recursed into.
///
/// Output order is directory-enumeration order; callers diff with set
/// semantics and must not rely on any particular sort.
pub fn collect_files(root: &Utf8Path, filter: &FilterSet) -> Result<Vec<Utf8PathBuf>, WalkError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && entry.file_name() == ".git"));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = Utf8PathBuf::from_path_buf(entry.into_path())
            .map_err(|_| WalkError::NonUtf8Path(root.to_path_buf()))?;

        let allowed = path
            .extension()
            .is_some_and(|ext| filter.allows_extension(ext));
        if allowed && !filter.excludes(path.as_str()) {
            files.push(path);
        }
    }

    Ok(files)
}
