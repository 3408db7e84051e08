//! Loading archive entries from a directory tree.

use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

use crate::pipeline::ArchiveEntry;

/// Collect every regular file below `root` in a stable order.
///
/// Entry names are paths relative to `root`. Contents are decoded as UTF-8,
/// replacing invalid sequences. Non-record files are kept so the pipeline
/// can count them.
pub fn load_directory(root: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        entries.push(ArchiveEntry::new(
            name,
            String::from_utf8_lossy(&bytes).into_owned(),
        ));
    }

    Ok(entries)
}
