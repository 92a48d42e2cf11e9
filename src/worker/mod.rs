mod job;
mod state;
pub(crate) mod trie;

pub use job::FileJob;
pub use trie::{TokenKind, TokenMatch, Trie};

use std::path::Path;

use crate::error::Result;
use crate::language::LanguageRegistry;

use state::{
    blank_state, code_state, comment_state, doc_string_state, is_whitespace, reset_state,
    string_state, LineState,
};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Byte-order marks other than UTF-8. Files starting with one of these are
/// probably not ASCII/UTF-8 and may be counted incorrectly; they are only
/// reported, never stripped.
const FOREIGN_BOMS: &[&[u8]] = &[
    &[0xFE, 0xFF],             // UTF-16 BE
    &[0xFF, 0xFE],             // UTF-16 LE
    &[0x00, 0x00, 0xFE, 0xFF], // UTF-32 BE
    &[0xFF, 0xFE, 0x00, 0x00], // UTF-32 LE
    &[0x2B, 0x2F, 0x76, 0x38], // UTF-7
    &[0x2B, 0x2F, 0x76, 0x39], // UTF-7
    &[0x2B, 0x2F, 0x76, 0x2B], // UTF-7
    &[0x2B, 0x2F, 0x76, 0x2F], // UTF-7
    &[0x2B, 0x2F, 0x76, 0x38, 0x2D], // UTF-7
    &[0xF7, 0x64, 0x4C],       // UTF-1
    &[0xDD, 0x73, 0x66, 0x73], // UTF-EBCDIC
    &[0x0E, 0xFE, 0xFF],       // SCSU
    &[0xFB, 0xEE, 0x28],       // BOCU-1
    &[0x84, 0x31, 0x95, 0x33], // GB-18030
];

/// Classifies every physical line of a file as code, comment or blank.
///
/// One worker serves any number of files; each scan is synchronous and
/// single-threaded, so callers parallelize across files, never within one.
/// The per-language matchers are compiled once on first use and shared
/// read-only afterwards, which keeps concurrent first-use races harmless.
pub struct LanguageWorker {
    registry: LanguageRegistry,
    duplicates: bool,
    verbose: bool,
}

impl LanguageWorker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: LanguageRegistry::default(),
            duplicates: false,
            verbose: false,
        }
    }

    #[must_use]
    pub fn with_registry(registry: LanguageRegistry) -> Self {
        Self {
            registry,
            duplicates: false,
            verbose: false,
        }
    }

    /// Enables duplicate detection: every scanned file gets a content hash.
    #[must_use]
    pub const fn with_duplicates(mut self, duplicates: bool) -> Self {
        self.duplicates = duplicates;
        self
    }

    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Full pipeline for a file on disk: read, detect, resolve, count.
    /// `Ok(None)` means the file maps to no registered language.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read.
    pub fn process_file(&self, path: &Path) -> Result<Option<FileJob>> {
        let job = FileJob::from_path(path)?;
        Ok(self.process_job(job))
    }

    /// Full pipeline for an in-memory code string.
    #[must_use]
    pub fn process_code(&self, code: &str, filename: &str) -> Option<FileJob> {
        self.process_job(FileJob::from_code(code, filename))
    }

    /// Detects and resolves the language of `job`, then counts it.
    #[must_use]
    pub fn process_job(&self, mut job: FileJob) -> Option<FileJob> {
        job.possible_languages = self.registry.detect_candidate_languages(&job.filename);
        if job.possible_languages.is_empty()
            && let Some(language) = self.registry.detect_shebang(&job.content)
        {
            job.possible_languages.push(language);
        }
        if job.possible_languages.is_empty() {
            return None;
        }

        let primary = job.possible_languages[0].clone();
        job.language = self
            .registry
            .resolve_language(&primary, &job.possible_languages, &job.content);

        self.count_stats(job)
    }

    /// Runs the line classification engine over a job whose language is
    /// already resolved.
    ///
    /// Returns `None` for an unknown language and for a scan whose cursor
    /// overran the buffer (an unterminated construct at EOF); returns the
    /// job flagged `binary` with zeroed counts when a binary marker is seen
    /// inside the probe window. A zero-length file yields a zeroed job.
    #[must_use]
    pub fn count_stats(&self, mut job: FileJob) -> Option<FileJob> {
        let spec = self.registry.spec_for(&job.language)?;
        let features = spec.features();

        if self.duplicates {
            job.enable_digest();
        }

        self.strip_bom(&mut job);

        if job.content.is_empty() {
            job.finalize_digest();
            return Some(job);
        }

        let len = job.content.len();
        let end_point = len - 1;

        let mut index = 0;
        let mut state = LineState::Blank;
        let mut end_string: Vec<u8> = Vec::new();
        let mut end_comments: Vec<Vec<u8>> = Vec::new();
        let mut ignore_escape = false;

        while index < len {
            // Hot loop: the state dispatch below runs for every
            // non-whitespace byte of every file.
            if !is_whitespace(job.content[index]) {
                match state {
                    LineState::Code => {
                        let t = code_state(
                            &mut job, index, end_point, state, end_string, end_comments, features,
                        );
                        index = t.index;
                        state = t.state;
                        end_string = t.end_string;
                        end_comments = t.end_comments;
                        ignore_escape = t.ignore_escape;
                    }
                    LineState::String => {
                        let (i, s) = string_state(
                            &job.content,
                            index,
                            end_point,
                            &end_string,
                            state,
                            ignore_escape,
                        );
                        index = i;
                        state = s;
                    }
                    LineState::DocString => {
                        let (i, s) =
                            doc_string_state(&job.content, index, end_point, &end_string, state);
                        index = i;
                        state = s;
                    }
                    LineState::MultiComment | LineState::MultiCommentCode => {
                        let t = comment_state(
                            &job.content,
                            index,
                            end_point,
                            state,
                            end_string,
                            end_comments,
                            features,
                        );
                        index = t.index;
                        state = t.state;
                        end_string = t.end_string;
                        end_comments = t.end_comments;
                    }
                    LineState::Blank | LineState::MultiCommentBlank => {
                        let t = blank_state(
                            &mut job, index, state, end_string, end_comments, features,
                        );
                        index = t.index;
                        state = t.state;
                        end_string = t.end_string;
                        end_comments = t.end_comments;
                        ignore_escape = t.ignore_escape;
                    }
                    // The rest of the line is comment by construction.
                    LineState::Comment | LineState::CommentCode => {}
                }
            }

            // An unterminated string or comment can leave the cursor past
            // the end of the buffer; no counts are produced in that case.
            if index >= len {
                return None;
            }

            if job.binary {
                job.reset_counts();
                return Some(job);
            }

            if job.content[index] == b'\n' || index >= end_point {
                job.lines += 1;

                match state {
                    LineState::Code
                    | LineState::String
                    | LineState::CommentCode
                    | LineState::MultiCommentCode => {
                        job.code += 1;
                        state = reset_state(state);
                    }
                    LineState::Comment
                    | LineState::MultiComment
                    | LineState::MultiCommentBlank => {
                        job.comment += 1;
                        state = reset_state(state);
                    }
                    LineState::Blank => {
                        job.blank += 1;
                    }
                    // A doc-string line reads as documentation, and the
                    // string itself continues past the line break.
                    LineState::DocString => {
                        job.comment += 1;
                    }
                }
            }

            index += 1;
        }

        job.finalize_digest();
        Some(job)
    }

    /// Strips a UTF-8 BOM so it is counted as zero bytes. Any other
    /// recognized BOM is reported (when verbose) as a likely mis-detection
    /// but left in place.
    fn strip_bom(&self, job: &mut FileJob) {
        if job.content.starts_with(UTF8_BOM) {
            job.content.drain(..UTF8_BOM.len());
            return;
        }

        if self.verbose {
            for bom in FOREIGN_BOMS {
                if job.content.starts_with(bom) {
                    eprintln!(
                        "BOM found for file {} indicating it is not ASCII/UTF-8 and may be counted incorrectly or ignored as a binary file",
                        job.filename
                    );
                    return;
                }
            }
        }
    }
}

impl Default for LanguageWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
