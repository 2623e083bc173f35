//! Collects the source files a run will convert.
//!
//! Targets are files or directories relative to the base directory; a target
//! containing `*` or `?` is expanded as a glob. Ignore entries work the same
//! way: globs are matched against the full path, anything else is a path
//! prefix.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

#[derive(Debug, Default)]
pub struct ScanResult {
    /// Convertible files in path order.
    pub files: BTreeSet<PathBuf>,
    /// Entries that could not be read while walking.
    pub skipped_count: usize,
}

pub struct FileScanner<'a> {
    base_dir: &'a Path,
    extensions: &'a [String],
    ignore_paths: Vec<PathBuf>,
    ignore_globs: Vec<Pattern>,
    verbose: bool,
}

impl<'a> FileScanner<'a> {
    pub fn new(base_dir: &'a Path, extensions: &'a [String], ignores: &[String], verbose: bool) -> Self {
        let mut ignore_paths = Vec::new();
        let mut ignore_globs = Vec::new();
        for ignore in ignores {
            if !is_glob_pattern(ignore) {
                ignore_paths.push(base_dir.join(ignore));
                continue;
            }
            match Pattern::new(ignore) {
                Ok(pattern) => ignore_globs.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            ignore,
                            e
                        );
                    }
                }
            }
        }
        Self {
            base_dir,
            extensions,
            ignore_paths,
            ignore_globs,
            verbose,
        }
    }

    /// Walks every target; an empty target list means the base directory.
    pub fn scan(&self, targets: &[String]) -> ScanResult {
        let mut result = ScanResult::default();
        for root in self.expand_targets(targets) {
            for entry in WalkDir::new(&root).sort_by_file_name() {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        result.skipped_count += 1;
                        self.warn(format_args!("Cannot access path: {}", e));
                        continue;
                    }
                };
                let path = entry.path();
                if self.is_ignored(path) {
                    continue;
                }
                if entry.file_type().is_file() && self.is_convertible_file(path) {
                    result.files.insert(path.to_path_buf());
                }
            }
        }
        tracing::debug!(files = result.files.len(), skipped = result.skipped_count, "scan finished");
        result
    }

    fn expand_targets(&self, targets: &[String]) -> Vec<PathBuf> {
        if targets.is_empty() {
            return vec![self.base_dir.to_path_buf()];
        }

        let mut roots = Vec::new();
        for target in targets {
            if !is_glob_pattern(target) {
                let path = self.base_dir.join(target);
                if path.exists() {
                    roots.push(path);
                } else {
                    self.warn(format_args!("Path does not exist: {}", path.display()));
                }
                continue;
            }

            let pattern = self.base_dir.join(target);
            match glob(&pattern.to_string_lossy()) {
                Ok(entries) => roots.extend(entries.flatten()),
                Err(e) => self.warn(format_args!("Invalid glob pattern '{}': {}", target, e)),
            }
        }
        roots
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.ignore_paths.iter().any(|ignore| path.starts_with(ignore))
            || self.ignore_globs.iter().any(|p| p.matches(&path_str))
    }

    fn is_convertible_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }

    fn warn(&self, message: std::fmt::Arguments<'_>) {
        if self.verbose {
            eprintln!("{} {}", "warning:".bold().yellow(), message);
        }
    }
}
