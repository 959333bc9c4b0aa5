use crate::config::Config;
use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// What a scanned file contains: a plain script, or a component wrapping
/// zero or more embedded script blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Script,
    Component,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub kind: SourceKind,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory and file names skipped wholesale during traversal.
    pub ignore_folders: Vec<String>,
    /// Include files ignored by .gitignore.
    pub no_ignore: bool,
}

impl ScanOptions {
    pub fn new(ignore_folders: Vec<String>, no_ignore: bool) -> Self {
        Self {
            ignore_folders,
            no_ignore,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore_folders: Config::get().ignore_folders.clone(),
            no_ignore: false,
        }
    }
}

pub fn source_kind(path: &Path) -> Option<SourceKind> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("js") => Some(SourceKind::Script),
        Some("vue") => Some(SourceKind::Component),
        _ => None,
    }
}

pub fn scan_project(project_root: &Path) -> Result<Vec<ScannedFile>> {
    scan_project_with_options(project_root, &ScanOptions::default())
}

pub fn scan_project_with_options(
    project_root: &Path,
    options: &ScanOptions,
) -> Result<Vec<ScannedFile>> {
    let mut files = Vec::new();
    let mut builder = WalkBuilder::new(project_root);
    if options.no_ignore {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    } else {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }
    let ignored = options.ignore_folders.clone();
    let walker = builder
        .hidden(false)
        .filter_entry(move |entry| {
            let name = entry.file_name().to_string_lossy();
            !ignored.iter().any(|folder| folder.as_str() == name)
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                eprintln!("callmap: walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let kind = match source_kind(path) {
            Some(value) => value,
            None => continue,
        };
        let rel_path = crate::util::normalize_rel_path(project_root, path)?;
        files.push(ScannedFile {
            rel_path,
            abs_path: path.to_path_buf(),
            kind,
        });
    }
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::{SourceKind, source_kind};
    use std::path::Path;

    #[test]
    fn detects_supported_kinds() {
        assert_eq!(source_kind(Path::new("a/b.js")), Some(SourceKind::Script));
        assert_eq!(
            source_kind(Path::new("a/App.vue")),
            Some(SourceKind::Component)
        );
        assert_eq!(source_kind(Path::new("a/b.ts")), None);
        assert_eq!(source_kind(Path::new("a/README.md")), None);
    }
}
