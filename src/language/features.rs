use crate::worker::trie::{TokenKind, Trie};

use super::registry::LanguageSpec;

/// A quote form registered for a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub start: String,
    pub end: String,
    /// The quoted content counts as comment-like (e.g. Python docstrings).
    pub doc_string: bool,
    /// Backslash escapes are meaningless inside this form (e.g. Go raw
    /// strings, C# verbatim strings).
    pub ignore_escape: bool,
}

impl Quote {
    #[must_use]
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            doc_string: false,
            ignore_escape: false,
        }
    }

    #[must_use]
    pub fn doc_string(start: &str, end: &str) -> Self {
        Self {
            doc_string: true,
            ..Self::new(start, end)
        }
    }

    #[must_use]
    pub fn ignore_escape(start: &str, end: &str) -> Self {
        Self {
            ignore_escape: true,
            ..Self::new(start, end)
        }
    }
}

/// Matcher state compiled once from a [`LanguageSpec`].
///
/// Built lazily on first use and shared read-only across every scan of the
/// same language afterwards (see `LanguageSpec::features`).
pub struct CompiledFeatures {
    /// Every registered token: comment starts, quote opens, keywords.
    pub tokens: Trie,
    /// Multi-line comment opens only, consulted for nesting while already
    /// inside a comment.
    pub multi_line_comments: Trie,
    /// Fast-reject mask: a byte that cannot begin any registered token
    /// fails `byte & mask == byte` and skips the trie lookup entirely.
    pub process_mask: u8,
    pub nested: bool,
    pub quotes: Vec<Quote>,
}

impl CompiledFeatures {
    #[must_use]
    pub fn compile(spec: &LanguageSpec) -> Self {
        let mut tokens = Trie::new();
        let mut multi_line_comments = Trie::new();
        let mut mask = 0u8;

        for marker in &spec.single_line_comments {
            tokens.insert(TokenKind::SingleLineComment, marker.as_bytes(), b"");
            mask = fold_mask(mask, marker.as_bytes());
        }

        for (start, end) in &spec.multi_line_comments {
            tokens.insert(TokenKind::MultiLineComment, start.as_bytes(), end.as_bytes());
            multi_line_comments.insert(
                TokenKind::MultiLineComment,
                start.as_bytes(),
                end.as_bytes(),
            );
            mask = fold_mask(mask, start.as_bytes());
        }

        for quote in &spec.quotes {
            tokens.insert(TokenKind::String, quote.start.as_bytes(), quote.end.as_bytes());
            mask = fold_mask(mask, quote.start.as_bytes());
        }

        for keyword in &spec.complexity_keywords {
            tokens.insert(TokenKind::Complexity, keyword.as_bytes(), b"");
            mask = fold_mask(mask, keyword.as_bytes());
        }

        Self {
            tokens,
            multi_line_comments,
            process_mask: mask,
            nested: spec.nested,
            quotes: spec.quotes.clone(),
        }
    }

    /// Whether the quote form closed by `terminator` is a doc-string.
    #[must_use]
    pub fn is_doc_string(&self, terminator: &[u8]) -> bool {
        self.quotes
            .iter()
            .any(|q| q.doc_string && q.end.as_bytes() == terminator)
    }
}

fn fold_mask(mask: u8, token: &[u8]) -> u8 {
    token.iter().fold(mask, |acc, &b| acc | b)
}

#[cfg(test)]
#[path = "features_tests.rs"]
mod tests;
