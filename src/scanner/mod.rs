use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{Result, SlocScanError};

/// Glob-based exclusion filter for scanned paths.
#[derive(Debug)]
pub struct GlobFilter {
    exclude: GlobSet,
}

impl GlobFilter {
    /// # Errors
    /// Returns [`SlocScanError::InvalidPattern`] for a malformed glob.
    pub fn new(exclude_patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in exclude_patterns {
            let glob = Glob::new(pattern).map_err(|source| SlocScanError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }

        Ok(Self {
            exclude: builder.build().map_err(|source| SlocScanError::InvalidPattern {
                pattern: exclude_patterns.join(", "),
                source,
            })?,
        })
    }

    #[must_use]
    pub fn should_include(&self, path: &Path) -> bool {
        !self.exclude.is_match(path)
    }
}

/// Collects candidate files under the given roots. Walks honor gitignore
/// rules unless disabled; a root that is itself a file is taken as-is.
pub struct DirectoryScanner {
    filter: GlobFilter,
    use_gitignore: bool,
}

impl DirectoryScanner {
    #[must_use]
    pub const fn new(filter: GlobFilter, use_gitignore: bool) -> Self {
        Self {
            filter,
            use_gitignore,
        }
    }

    #[must_use]
    pub fn scan(&self, root: &Path) -> Vec<PathBuf> {
        if root.is_file() {
            if self.filter.should_include(root) {
                return vec![root.to_path_buf()];
            }
            return Vec::new();
        }

        ignore::WalkBuilder::new(root)
            .git_ignore(self.use_gitignore)
            .git_global(self.use_gitignore)
            .git_exclude(self.use_gitignore)
            .require_git(false)
            .hidden(false)
            .parents(false)
            .build()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .filter(|e| self.filter.should_include(e.path()))
            .map(ignore::DirEntry::into_path)
            .collect()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
