use crate::app::models::ScanConfig;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::path::{Path, PathBuf};

/// Match count for one `content` pattern.
#[derive(Debug)]
pub struct PatternReport {
    pub pattern: String,
    pub matches: usize,
}

/// Matches the configured content patterns against the files actually on
/// disk. Purely a path-level diagnostic: no file is ever opened.
pub struct PatternChecker {
    root: PathBuf,
    set: GlobSet,
    patterns: Vec<String>,
}

impl PatternChecker {
    pub fn new(root: PathBuf, config: &ScanConfig) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.content {
            // Walked paths are root-relative, so a leading ./ would never match.
            let normalized = pattern.strip_prefix("./").unwrap_or(pattern);
            builder.add(
                Glob::new(normalized).context(format!("Invalid glob pattern: {}", pattern))?,
            );
        }

        Ok(Self {
            root,
            set: builder.build()?,
            patterns: config.content.clone(),
        })
    }

    /// Walk the tree once and count, per pattern, the files whose relative
    /// path it matches. Reports come back in `content` declaration order.
    pub fn check(&self) -> Vec<PatternReport> {
        let mut counts = vec![0usize; self.patterns.len()];

        // Standard ignore walker (handles .gitignore automatically)
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for result in walker {
            match result {
                Ok(entry) => {
                    if let Some(relative) = self.relative_file_path(entry.path()) {
                        for index in self.set.matches(&relative) {
                            counts[index] += 1;
                        }
                    }
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        self.patterns
            .iter()
            .cloned()
            .zip(counts)
            .map(|(pattern, matches)| PatternReport { pattern, matches })
            .collect()
    }

    fn relative_file_path(&self, path: &Path) -> Option<PathBuf> {
        if path == self.root || path.is_dir() {
            return None;
        }

        // .git is never part of the scan scope. The walker allows hidden files
        // (the scanned site may keep an .env or .github), so skip it here.
        if path.components().any(|c| c.as_os_str() == ".git") {
            return None;
        }

        diff_paths(path, &self.root)
    }
}
