use std::{
    fs,
    path::{Component, Path},
};

use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PackError, Result};
use crate::packaging::FileEntry;

/// Compiles exclude patterns, reporting the first one that fails to parse.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| PackError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// Recursively lists every file under `source_dir` and maps it into the archive under `prefix`.
///
/// Symlinks are followed; a linked file is stored under the link's own path.
///
/// Archive names are `prefix/<path relative to source_dir>` joined with `/`. Files whose
/// relative path matches one of `exclude` are skipped. Entries come back sorted by archive name.
pub fn collect_directory_entries(
    source_dir: &Path,
    prefix: &str,
    exclude: &[Pattern],
) -> Result<Vec<FileEntry>> {
    let mut result = Vec::new();

    for entry in WalkDir::new(source_dir).follow_links(true) {
        let entry = entry.map_err(|source| PackError::Walk {
            path: source_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = relative_archive_path(entry.path(), source_dir);
        if exclude.iter().any(|p| p.matches(&relative)) {
            debug!(path = %entry.path().display(), "excluded");
            continue;
        }

        result.push(FileEntry {
            path: entry.path().to_path_buf(),
            name_in_archive: join_archive_path(prefix, &relative),
        });
    }

    result.sort_by(|a, b| a.name_in_archive.cmp(&b.name_in_archive));
    Ok(result)
}

/// Joins archive path segments with `/`, ignoring empty ones.
pub fn join_archive_path(prefix: &str, rest: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let rest = rest.trim_matches('/');
    match (prefix.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}/{rest}"),
    }
}

fn relative_archive_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Compute total size of all entry sources.
pub fn total_size(entries: &[FileEntry]) -> Result<u64> {
    let mut total: u64 = 0;
    for entry in entries {
        let meta = fs::metadata(&entry.path).map_err(|e| PackError::io(&entry.path, e))?;
        total += meta.len();
    }
    Ok(total)
}

/// Renders a byte count with binary units, one decimal place unless the value is whole.
pub fn encode_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

    let mut size = bytes as f64;
    let mut unit = UNITS[0];
    for &next in &UNITS[1..] {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = next;
    }

    if size.fract() == 0.0 {
        format!("{size:.0} {unit}")
    } else {
        format!("{size:.1} {unit}")
    }
}
