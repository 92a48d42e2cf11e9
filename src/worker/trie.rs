/// Category a registered byte sequence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Start of a comment that runs to the end of the line.
    SingleLineComment,
    /// Start of a multi-line comment; carries its terminator.
    MultiLineComment,
    /// Opening quote of a string literal; carries its closing quote.
    String,
    /// Branching keyword counted toward the complexity estimate.
    Complexity,
}

/// Outcome of a successful lookup: which token starts at the probed
/// position, how many bytes it spans and the exact bytes that close it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch<'a> {
    pub kind: TokenKind,
    pub len: usize,
    pub terminator: &'a [u8],
}

struct Node {
    kind: Option<TokenKind>,
    terminator: Vec<u8>,
    children: Box<[Option<Box<Node>>; 256]>,
}

impl Node {
    fn new() -> Self {
        Self {
            kind: None,
            terminator: Vec::new(),
            children: Box::new(std::array::from_fn(|_| None)),
        }
    }
}

/// Multi-pattern byte matcher.
///
/// Registered sequences are exact byte literals, not patterns. Lookup walks
/// the table byte by byte and reports the token the walk ends on, so given
/// the same buffer position it always returns the same answer. The first
/// registration of a sequence wins; later duplicates never displace it.
pub struct Trie {
    root: Node,
}

impl Trie {
    #[must_use]
    pub fn new() -> Self {
        Self { root: Node::new() }
    }

    pub fn insert(&mut self, kind: TokenKind, token: &[u8], terminator: &[u8]) {
        debug_assert!(!token.is_empty(), "cannot register an empty token");

        let mut node = &mut self.root;
        for &byte in token {
            node = node.children[usize::from(byte)].get_or_insert_with(|| Box::new(Node::new()));
        }

        if node.kind.is_none() {
            node.kind = Some(kind);
            node.terminator = terminator.to_vec();
        }
    }

    /// Look up the token starting at the head of `window`.
    ///
    /// The walk consumes bytes while the table has a branch for them and
    /// reports the node it stops on. A walk that diverges mid-token yields
    /// no match even when a shorter registered prefix was passed on the way
    /// down; precedence is fixed by the table alone, never by the caller.
    #[must_use]
    pub fn match_at<'a>(&'a self, window: &[u8]) -> Option<TokenMatch<'a>> {
        let mut node = &self.root;
        let mut depth = 0;

        while depth < window.len() {
            match &node.children[usize::from(window[depth])] {
                Some(child) => {
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }

        node.kind.map(|kind| TokenMatch {
            kind,
            len: depth,
            terminator: &node.terminator,
        })
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "trie_tests.rs"]
mod tests;
