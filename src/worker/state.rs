use crate::language::CompiledFeatures;

use super::job::FileJob;
use super::trie::TokenKind;

/// Binary markers past this offset are treated as ordinary data.
pub(crate) const BINARY_CHECK_LIMIT: usize = 10_000;

/// Lexical state of the line currently being scanned.
///
/// `CommentCode` and `MultiCommentCode` remember that code was already seen
/// on the line before the comment opened, so the line still counts as code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Blank,
    Code,
    Comment,
    CommentCode,
    MultiComment,
    MultiCommentCode,
    MultiCommentBlank,
    String,
    DocString,
}

/// Owned data a state handler hands back to the scan loop: where the
/// cursor moved, which state the line is in now, the terminator of the
/// currently open string, and the stack of pending multi-line comment
/// terminators (innermost last).
pub(crate) struct Transition {
    pub index: usize,
    pub state: LineState,
    pub end_string: Vec<u8>,
    pub end_comments: Vec<Vec<u8>>,
    pub ignore_escape: bool,
}

impl Transition {
    fn new(
        index: usize,
        state: LineState,
        end_string: Vec<u8>,
        end_comments: Vec<Vec<u8>>,
        ignore_escape: bool,
    ) -> Self {
        Self {
            index,
            state,
            end_string,
            end_comments,
            ignore_escape,
        }
    }
}

#[inline]
pub(crate) const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// NUL inside the probe window marks the file as binary; later NULs are data.
#[inline]
pub(crate) const fn is_binary_marker(index: usize, byte: u8) -> bool {
    index < BINARY_CHECK_LIMIT && byte == 0
}

#[inline]
const fn should_process(byte: u8, mask: u8) -> bool {
    byte & mask == byte
}

/// Exact byte comparison of `needle` at `index`. A needle that would run
/// into the final byte does not match; the scan loop settles that line via
/// end-of-file accounting instead.
pub(crate) fn check_for_match_single(
    content: &[u8],
    index: usize,
    end_point: usize,
    needle: &[u8],
) -> bool {
    let Some(&first) = needle.first() else {
        return false;
    };
    if content[index] != first {
        return false;
    }

    for (j, &expected) in needle.iter().enumerate() {
        if index + j >= end_point || content[index + j] != expected {
            return false;
        }
    }
    true
}

/// Checks whether the quote opening at `index` is one of the escape-exempt
/// forms (doc-strings and raw/verbatim strings). On a hit the cursor is
/// advanced past the opener so its own bytes cannot close the string.
fn verify_ignore_escape(
    features: &CompiledFeatures,
    content: &[u8],
    mut index: usize,
) -> (usize, bool) {
    let mut ignore_escape = false;

    for quote in &features.quotes {
        if !quote.doc_string && !quote.ignore_escape {
            continue;
        }
        let start = quote.start.as_bytes();
        if content.len() >= index + start.len() && &content[index..index + start.len()] == start {
            ignore_escape = true;
            index += start.len();
        }
    }

    (index, ignore_escape)
}

/// End-of-line state carry-over: an open multi-line comment or string spans
/// the line break, everything else starts the next line blank.
pub(crate) const fn reset_state(state: LineState) -> LineState {
    match state {
        LineState::MultiComment | LineState::MultiCommentCode => LineState::MultiComment,
        LineState::String => LineState::String,
        _ => LineState::Blank,
    }
}

/// Scan forward through ordinary code until a newline, a binary marker or
/// a registered token changes the picture.
///
/// Bytes passing the fast-reject mask are fed to the duplicate-detection
/// digest here; skipped bytes are skipped identically on both sides of any
/// comparison, which is why the digest stays valid for duplicate checks.
pub(crate) fn code_state(
    job: &mut FileJob,
    origin: usize,
    end_point: usize,
    state: LineState,
    end_string: Vec<u8>,
    end_comments: Vec<Vec<u8>>,
    features: &CompiledFeatures,
) -> Transition {
    let mut id = origin;
    while id < end_point {
        let cur = job.content[id];

        if cur == b'\n' {
            return Transition::new(id, state, end_string, end_comments, false);
        }

        if is_binary_marker(id, cur) {
            job.binary = true;
            return Transition::new(id, state, end_string, end_comments, false);
        }

        if should_process(cur, features.process_mask) {
            job.feed_digest(cur);

            if let Some(m) = features.tokens.match_at(&job.content[id..]) {
                match m.kind {
                    TokenKind::String => {
                        let (i, ignore_escape) = verify_ignore_escape(features, &job.content, id);
                        let mut next = state;
                        // A quote right after an escape character does not
                        // open a string (single-backslash lookback only).
                        if i == 0 || job.content[i - 1] != b'\\' {
                            next = if features.is_doc_string(m.terminator) {
                                LineState::DocString
                            } else {
                                LineState::String
                            };
                        }
                        return Transition::new(
                            i,
                            next,
                            m.terminator.to_vec(),
                            end_comments,
                            ignore_escape,
                        );
                    }
                    TokenKind::SingleLineComment => {
                        // Code was already seen on this line; it stays code.
                        return Transition::new(
                            id,
                            LineState::CommentCode,
                            m.terminator.to_vec(),
                            end_comments,
                            false,
                        );
                    }
                    TokenKind::MultiLineComment => {
                        if features.nested || end_comments.is_empty() {
                            let terminator = m.terminator.to_vec();
                            let mut stack = end_comments;
                            stack.push(terminator.clone());
                            return Transition::new(
                                id + m.len - 1,
                                LineState::MultiCommentCode,
                                terminator,
                                stack,
                                false,
                            );
                        }
                    }
                    TokenKind::Complexity => {
                        if id == 0 || is_whitespace(job.content[id - 1]) {
                            job.complexity += 1;
                        }
                    }
                }
            }
        }

        id += 1;
    }

    Transition::new(id, state, end_string, end_comments, false)
}

/// First non-whitespace byte of a line outside any open construct. Same
/// dispatch as [`code_state`], except a plain byte flips the line to code
/// and a single-line comment yields a pure comment line.
pub(crate) fn blank_state(
    job: &mut FileJob,
    index: usize,
    state: LineState,
    end_string: Vec<u8>,
    mut end_comments: Vec<Vec<u8>>,
    features: &CompiledFeatures,
) -> Transition {
    if is_binary_marker(index, job.content[index]) {
        job.binary = true;
        return Transition::new(index, state, end_string, end_comments, false);
    }

    let Some(m) = features.tokens.match_at(&job.content[index..]) else {
        return Transition::new(index, LineState::Code, end_string, end_comments, false);
    };

    match m.kind {
        TokenKind::MultiLineComment => {
            if features.nested || end_comments.is_empty() {
                let terminator = m.terminator.to_vec();
                end_comments.push(terminator.clone());
                return Transition::new(
                    index + m.len - 1,
                    LineState::MultiComment,
                    terminator,
                    end_comments,
                    false,
                );
            }
            Transition::new(index, state, end_string, end_comments, false)
        }
        TokenKind::SingleLineComment => Transition::new(
            index,
            LineState::Comment,
            m.terminator.to_vec(),
            end_comments,
            false,
        ),
        TokenKind::String => {
            let (i, ignore_escape) = verify_ignore_escape(features, &job.content, index);
            let next = if features.is_doc_string(m.terminator) {
                LineState::DocString
            } else {
                LineState::String
            };
            Transition::new(i, next, m.terminator.to_vec(), end_comments, ignore_escape)
        }
        TokenKind::Complexity => {
            if index == 0 || is_whitespace(job.content[index - 1]) {
                job.complexity += 1;
            }
            Transition::new(index, LineState::Code, end_string, end_comments, false)
        }
    }
}

/// Inside a string literal: scan until the newline or the terminator.
/// A terminator preceded by an unescaped backslash stays open, unless this
/// quote form ignores escapes altogether.
pub(crate) fn string_state(
    content: &[u8],
    origin: usize,
    end_point: usize,
    end_string: &[u8],
    state: LineState,
    ignore_escape: bool,
) -> (usize, LineState) {
    let mut id = origin;
    for i in origin..=end_point {
        id = i;

        // Count the line in the current state and resume here afterwards.
        if content[id] == b'\n' {
            return (id, state);
        }

        if (ignore_escape || id == 0 || content[id - 1] != b'\\')
            && check_for_match_single(content, id, end_point, end_string)
        {
            return (id, LineState::Code);
        }
    }

    (id, state)
}

/// Inside a doc-string: like [`string_state`], but the close decides the
/// whole line. Only whitespace between the terminator and the next newline
/// (or the end of the file) keeps the line a comment; anything else makes
/// it code.
pub(crate) fn doc_string_state(
    content: &[u8],
    origin: usize,
    end_point: usize,
    end_string: &[u8],
    state: LineState,
) -> (usize, LineState) {
    let mut id = origin;
    for i in origin..end_point {
        id = i;

        if content[id] == b'\n' {
            return (id, state);
        }

        if (id == 0 || content[id - 1] != b'\\')
            && check_for_match_single(content, id, end_point, end_string)
        {
            for j in (id + end_string.len())..=end_point {
                if content[j] == b'\n' {
                    break;
                }
                if !is_whitespace(content[j]) {
                    return (id, LineState::Code);
                }
            }
            return (id, LineState::Comment);
        }
    }

    (id, state)
}

/// Inside a multi-line comment: look for the innermost terminator first
/// (the cheaper check), then for a nested open when the language allows it.
pub(crate) fn comment_state(
    content: &[u8],
    origin: usize,
    end_point: usize,
    mut state: LineState,
    end_string: Vec<u8>,
    mut end_comments: Vec<Vec<u8>>,
    features: &CompiledFeatures,
) -> Transition {
    let mut id = origin;
    while id < end_point {
        if content[id] == b'\n' {
            return Transition::new(id, state, end_string, end_comments, false);
        }

        if let Some(innermost) = end_comments.last()
            && check_for_match_single(content, id, end_point, innermost)
        {
            let jump = innermost.len();
            end_comments.pop();

            if end_comments.is_empty() {
                // Entering from code (e.g. `x = 1 /* note */`) must keep the
                // line counting as code.
                state = if state == LineState::MultiCommentCode {
                    LineState::Code
                } else {
                    LineState::MultiCommentBlank
                };
            }

            return Transition::new(id + jump - 1, state, end_string, end_comments, false);
        }

        if (features.nested || end_comments.is_empty())
            && let Some(m) = features.multi_line_comments.match_at(&content[id..])
        {
            let terminator = m.terminator.to_vec();
            end_comments.push(terminator.clone());
            return Transition::new(id + m.len - 1, state, terminator, end_comments, false);
        }

        id += 1;
    }

    Transition::new(id, state, end_string, end_comments, false)
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
