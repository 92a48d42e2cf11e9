use std::collections::HashMap;
use std::sync::OnceLock;

use super::features::{CompiledFeatures, Quote};

/// How much of a file is inspected when disambiguating candidates.
const RESOLVE_CONTENT_LIMIT: usize = 32_768;

/// Per-language lexical facts: comment markers, quote forms and complexity
/// keywords, plus the tables used to map files back to the language.
///
/// A spec is immutable once registered. Its matcher is compiled on first
/// use behind a `OnceLock`, so concurrent scans of the same language never
/// observe a half-built table.
pub struct LanguageSpec {
    pub name: String,
    pub extensions: Vec<String>,
    pub shebangs: Vec<String>,
    pub single_line_comments: Vec<String>,
    pub multi_line_comments: Vec<(String, String)>,
    /// Multi-line comments of this language may nest.
    pub nested: bool,
    pub quotes: Vec<Quote>,
    pub complexity_keywords: Vec<String>,
    /// Content markers scored when several languages share an extension.
    pub markers: Vec<String>,
    compiled: OnceLock<CompiledFeatures>,
}

impl LanguageSpec {
    #[must_use]
    pub fn new(name: &str, extensions: Vec<&str>) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.into_iter().map(String::from).collect(),
            shebangs: Vec::new(),
            single_line_comments: Vec::new(),
            multi_line_comments: Vec::new(),
            nested: false,
            quotes: Vec::new(),
            complexity_keywords: Vec::new(),
            markers: Vec::new(),
            compiled: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn with_line_comments(mut self, markers: Vec<&str>) -> Self {
        self.single_line_comments = markers.into_iter().map(String::from).collect();
        self
    }

    #[must_use]
    pub fn with_block_comments(mut self, pairs: Vec<(&str, &str)>, nested: bool) -> Self {
        self.multi_line_comments = pairs
            .into_iter()
            .map(|(s, e)| (s.to_string(), e.to_string()))
            .collect();
        self.nested = nested;
        self
    }

    #[must_use]
    pub fn with_quotes(mut self, quotes: Vec<Quote>) -> Self {
        self.quotes = quotes;
        self
    }

    #[must_use]
    pub fn with_complexity(mut self, keywords: Vec<&str>) -> Self {
        self.complexity_keywords = keywords.into_iter().map(String::from).collect();
        self
    }

    #[must_use]
    pub fn with_shebangs(mut self, interpreters: Vec<&str>) -> Self {
        self.shebangs = interpreters.into_iter().map(String::from).collect();
        self
    }

    #[must_use]
    pub fn with_markers(mut self, markers: Vec<&str>) -> Self {
        self.markers = markers.into_iter().map(String::from).collect();
        self
    }

    /// Compiled matcher for this language, built on first access.
    pub fn features(&self) -> &CompiledFeatures {
        self.compiled.get_or_init(|| CompiledFeatures::compile(self))
    }
}

pub struct LanguageRegistry {
    languages: Vec<LanguageSpec>,
    /// Extension -> candidate indices, in registration order. Ambiguous
    /// extensions (".h", ".m") map to several candidates.
    extension_map: HashMap<String, Vec<usize>>,
    shebang_map: HashMap<String, usize>,
    name_map: HashMap<String, usize>,
}

impl LanguageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            languages: Vec::new(),
            extension_map: HashMap::new(),
            shebang_map: HashMap::new(),
            name_map: HashMap::new(),
        }
    }

    pub fn register(&mut self, spec: LanguageSpec) {
        let idx = self.languages.len();
        for ext in &spec.extensions {
            self.extension_map.entry(ext.clone()).or_default().push(idx);
        }
        for interpreter in &spec.shebangs {
            self.shebang_map.insert(interpreter.clone(), idx);
        }
        self.name_map.insert(spec.name.clone(), idx);
        self.languages.push(spec);
    }

    #[must_use]
    pub fn spec_for(&self, language: &str) -> Option<&LanguageSpec> {
        self.name_map.get(language).map(|&idx| &self.languages[idx])
    }

    #[must_use]
    pub fn features_for(&self, language: &str) -> Option<&CompiledFeatures> {
        self.spec_for(language).map(LanguageSpec::features)
    }

    #[must_use]
    pub fn all(&self) -> &[LanguageSpec] {
        &self.languages
    }

    /// Candidate languages for a filename, ordered by registration.
    /// Empty when the extension is unknown.
    #[must_use]
    pub fn detect_candidate_languages(&self, filename: &str) -> Vec<String> {
        let Some((_, extension)) = filename.rsplit_once('.') else {
            return Vec::new();
        };

        self.extension_map
            .get(&extension.to_lowercase())
            .map(|indices| {
                indices
                    .iter()
                    .map(|&idx| self.languages[idx].name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Language named by a `#!` interpreter line, for extensionless files.
    /// Understands both direct interpreter paths and `/usr/bin/env` forms.
    #[must_use]
    pub fn detect_shebang(&self, content: &[u8]) -> Option<String> {
        if !content.starts_with(b"#!") {
            return None;
        }

        let first_line = content.split(|&b| b == b'\n').next()?;
        let line = std::str::from_utf8(&first_line[2..]).ok()?;

        let mut parts = line.split_whitespace();
        let command = parts.next()?;
        let mut interpreter = command.rsplit('/').next()?;
        if interpreter == "env" {
            interpreter = parts.next()?;
        }

        self.shebang_map
            .get(interpreter)
            .map(|&idx| self.languages[idx].name.clone())
    }

    /// Disambiguate candidates sharing an extension by scoring each
    /// candidate's content markers. The primary candidate wins ties, so a
    /// file with no recognizable markers keeps the default language.
    #[must_use]
    pub fn resolve_language(&self, primary: &str, candidates: &[String], content: &[u8]) -> String {
        if candidates.len() <= 1 {
            return primary.to_string();
        }

        let window = &content[..content.len().min(RESOLVE_CONTENT_LIMIT)];

        let mut best = primary.to_string();
        let mut best_score = 0usize;
        for candidate in candidates {
            let Some(spec) = self.spec_for(candidate) else {
                continue;
            };

            let score: usize = spec
                .markers
                .iter()
                .map(|marker| count_occurrences(window, marker.as_bytes()))
                .sum();
            if score > best_score {
                best_score = score;
                best = candidate.clone();
            }
        }

        best
    }
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() || haystack.len() < needle.len() {
        return 0;
    }
    haystack
        .windows(needle.len())
        .filter(|window| *window == needle)
        .count()
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        let mut registry = Self::new();

        let c_like_complexity = vec![
            "for ", "if ", "switch ", "while ", "else ", "|| ", "&& ", "!= ", "== ",
        ];
        let c_like_quotes = vec![Quote::new("\"", "\""), Quote::new("'", "'")];

        registry.register(
            LanguageSpec::new("C", vec!["c", "h"])
                .with_line_comments(vec!["//"])
                .with_block_comments(vec![("/*", "*/")], false)
                .with_quotes(c_like_quotes.clone())
                .with_complexity(c_like_complexity.clone()),
        );

        registry.register(
            LanguageSpec::new("C++", vec!["cpp", "hpp", "cc", "cxx", "hxx", "h"])
                .with_line_comments(vec!["//"])
                .with_block_comments(vec![("/*", "*/")], false)
                .with_quotes(c_like_quotes.clone())
                .with_complexity(c_like_complexity.clone())
                .with_markers(vec!["::", "template", "namespace ", "class "]),
        );

        registry.register(
            LanguageSpec::new("Objective-C", vec!["m", "h"])
                .with_line_comments(vec!["//"])
                .with_block_comments(vec![("/*", "*/")], false)
                .with_quotes(c_like_quotes.clone())
                .with_complexity(c_like_complexity.clone())
                .with_markers(vec!["@interface", "@implementation", "#import", "@end"]),
        );

        registry.register(
            LanguageSpec::new("Matlab", vec!["m"])
                .with_line_comments(vec!["%"])
                .with_block_comments(vec![("%{", "%}")], false)
                .with_quotes(vec![Quote::new("\"", "\"")])
                .with_complexity(vec!["if ", "elseif ", "while ", "for ", "switch "])
                .with_markers(vec!["function ", "endfunction", "%{"]),
        );

        registry.register(
            LanguageSpec::new("Rust", vec!["rs"])
                .with_line_comments(vec!["//"])
                .with_block_comments(vec![("/*", "*/")], true)
                .with_quotes(vec![Quote::new("\"", "\"")])
                .with_complexity(vec![
                    "for ", "if ", "match ", "while ", "else ", "|| ", "&& ", "!= ", "== ",
                ]),
        );

        registry.register(
            LanguageSpec::new("Go", vec!["go"])
                .with_line_comments(vec!["//"])
                .with_block_comments(vec![("/*", "*/")], false)
                .with_quotes(vec![
                    Quote::new("\"", "\""),
                    Quote::new("'", "'"),
                    Quote::ignore_escape("`", "`"),
                ])
                .with_complexity(vec![
                    "for ", "if ", "switch ", "case ", "select ", "|| ", "&& ", "!= ", "== ",
                ]),
        );

        registry.register(
            LanguageSpec::new("Python", vec!["py", "pyi"])
                .with_line_comments(vec!["#"])
                .with_quotes(vec![
                    Quote::doc_string("\"\"\"", "\"\"\""),
                    Quote::doc_string("'''", "'''"),
                    Quote::new("\"", "\""),
                    Quote::new("'", "'"),
                ])
                .with_complexity(vec![
                    "for ", "if ", "elif ", "while ", "else ", "or ", "and ", "!= ", "== ",
                ])
                .with_shebangs(vec!["python", "python2", "python3"]),
        );

        registry.register(
            LanguageSpec::new("JavaScript", vec!["js", "mjs", "cjs"])
                .with_line_comments(vec!["//"])
                .with_block_comments(vec![("/*", "*/")], false)
                .with_quotes(vec![
                    Quote::new("\"", "\""),
                    Quote::new("'", "'"),
                    Quote::new("`", "`"),
                ])
                .with_complexity(c_like_complexity.clone())
                .with_shebangs(vec!["node"]),
        );

        registry.register(
            LanguageSpec::new("TypeScript", vec!["ts", "mts", "cts", "tsx"])
                .with_line_comments(vec!["//"])
                .with_block_comments(vec![("/*", "*/")], false)
                .with_quotes(vec![
                    Quote::new("\"", "\""),
                    Quote::new("'", "'"),
                    Quote::new("`", "`"),
                ])
                .with_complexity(c_like_complexity.clone()),
        );

        registry.register(
            LanguageSpec::new("C#", vec!["cs"])
                .with_line_comments(vec!["//"])
                .with_block_comments(vec![("/*", "*/")], false)
                .with_quotes(vec![
                    Quote::ignore_escape("@\"", "\""),
                    Quote::new("\"", "\""),
                    Quote::new("'", "'"),
                ])
                .with_complexity(c_like_complexity.clone()),
        );

        registry.register(
            LanguageSpec::new("Java", vec!["java"])
                .with_line_comments(vec!["//"])
                .with_block_comments(vec![("/*", "*/")], false)
                .with_quotes(c_like_quotes.clone())
                .with_complexity(c_like_complexity.clone()),
        );

        registry.register(
            LanguageSpec::new("Kotlin", vec!["kt", "kts"])
                .with_line_comments(vec!["//"])
                .with_block_comments(vec![("/*", "*/")], true)
                .with_quotes(vec![
                    Quote::doc_string("\"\"\"", "\"\"\""),
                    Quote::new("\"", "\""),
                    Quote::new("'", "'"),
                ])
                .with_complexity(vec![
                    "for ", "if ", "when ", "while ", "else ", "|| ", "&& ", "!= ", "== ",
                ]),
        );

        registry.register(
            LanguageSpec::new("Ruby", vec!["rb"])
                .with_line_comments(vec!["#"])
                .with_block_comments(vec![("=begin", "=end")], false)
                .with_quotes(vec![Quote::new("\"", "\""), Quote::new("'", "'")])
                .with_complexity(vec![
                    "for ", "if ", "elsif ", "unless ", "while ", "else ", "|| ", "&& ", "!= ",
                    "== ",
                ])
                .with_shebangs(vec!["ruby"]),
        );

        registry.register(
            LanguageSpec::new("Shell", vec!["sh", "bash", "zsh"])
                .with_line_comments(vec!["#"])
                .with_quotes(vec![Quote::new("\"", "\""), Quote::new("'", "'")])
                .with_complexity(vec!["if ", "elif ", "while ", "for ", "case "])
                .with_shebangs(vec!["sh", "bash", "zsh", "dash", "ksh"]),
        );

        registry
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
