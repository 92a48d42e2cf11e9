use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{Result, SlocScanError};

/// Per-file accumulator of classification results.
///
/// Constructed before the scan starts, mutated in place by the engine
/// during one linear pass and handed back to the caller on completion.
/// Never reused across files.
#[derive(Debug, Default, Serialize)]
pub struct FileJob {
    #[serde(skip)]
    pub content: Vec<u8>,
    pub filename: String,
    pub extension: String,
    pub location: PathBuf,
    pub language: String,
    pub possible_languages: Vec<String>,
    /// Raw byte length of the file, before any BOM stripping.
    pub bytes: u64,
    pub lines: u64,
    pub code: u64,
    pub comment: u64,
    pub blank: u64,
    pub complexity: u64,
    pub binary: bool,
    /// Hex content digest, present once a duplicate-detection scan
    /// finishes. Approximate by design: only bytes the engine actually
    /// inspected are fed in, which both sides of a comparison skip
    /// identically.
    pub hash: Option<String>,
    #[serde(skip)]
    digest: Option<Sha256>,
}

impl FileJob {
    /// Reads `path` into a job ready for classification.
    ///
    /// # Errors
    /// Returns [`SlocScanError::FileRead`] when the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read(path).map_err(|source| SlocScanError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            bytes: content.len() as u64,
            content,
            filename,
            extension,
            location: path.to_path_buf(),
            ..Self::default()
        })
    }

    /// Wraps an in-memory code string; `filename` drives language detection.
    #[must_use]
    pub fn from_code(code: &str, filename: &str) -> Self {
        let content = code.as_bytes().to_vec();
        Self {
            bytes: content.len() as u64,
            content,
            filename: filename.to_string(),
            extension: filename
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    pub(crate) fn enable_digest(&mut self) {
        self.digest = Some(Sha256::new());
    }

    #[inline]
    pub(crate) fn feed_digest(&mut self, byte: u8) {
        if let Some(digest) = self.digest.as_mut() {
            digest.update([byte]);
        }
    }

    pub(crate) fn finalize_digest(&mut self) {
        if let Some(digest) = self.digest.take() {
            self.hash = Some(format!("{:x}", digest.finalize()));
        }
    }

    /// Clears all counts; used when classification aborts on binary input.
    pub(crate) fn reset_counts(&mut self) {
        self.lines = 0;
        self.code = 0;
        self.comment = 0;
        self.blank = 0;
        self.complexity = 0;
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
