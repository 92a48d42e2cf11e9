use super::*;

fn worker() -> LanguageWorker {
    LanguageWorker::new()
}

fn counts(job: &FileJob) -> (u64, u64, u64, u64) {
    (job.lines, job.code, job.comment, job.blank)
}

#[test]
fn csharp_regression_fixture() {
    let content = "  // Comment 1\n\
namespace Baz\n\
{\n\
    using System;\n\
\n\
    public class FooClass\n\
    {\n\
        public void Test(string report)\n\
        {\n\
          // Comment 2\n\
          throw new NotImplementedException();\n\
        }\n\
    }\n\
}";

    let mut job = FileJob::from_code(content, "foo.cs");
    job.language = "C#".to_string();
    let job = worker().count_stats(job).unwrap();

    assert_eq!(job.lines, 14);
    assert_eq!(job.code, 11);
    assert_eq!(job.comment, 2);
    assert_eq!(job.blank, 1);
}

#[test]
fn code_before_comment_marker_counts_as_code() {
    let job = worker().process_code("x = 1 // note", "same_line.go").unwrap();
    assert_eq!(counts(&job), (1, 1, 0, 0));
}

#[test]
fn pure_comment_line_counts_as_comment() {
    let job = worker().process_code("// note\nx = 1\n", "lead.go").unwrap();
    assert_eq!(counts(&job), (2, 1, 1, 0));
}

#[test]
fn code_comment_blank_partition() {
    let source = "fn main() {\n    let x = 1;\n\n    x\n}\n";
    let job = worker().process_code(source, "main.rs").unwrap();
    assert_eq!(counts(&job), (5, 4, 0, 1));
}

#[test]
fn token_free_lines_split_into_code_and_blank() {
    let job = worker().process_code("abc\ndef\n\nghi\n", "plain.py").unwrap();
    assert_eq!(counts(&job), (4, 3, 0, 1));
}

#[test]
fn empty_content_yields_zeroed_job() {
    let job = worker().process_code("", "empty.rs").unwrap();
    assert_eq!(counts(&job), (0, 0, 0, 0));
    assert!(!job.binary);
}

#[test]
fn unknown_extension_yields_none() {
    assert!(worker().process_code("hello", "file.xyz").is_none());
}

#[test]
fn unresolved_language_in_count_stats_yields_none() {
    let mut job = FileJob::from_code("x", "x.rs");
    job.language = "Klingon".to_string();
    assert!(worker().count_stats(job).is_none());
}

#[test]
fn multi_line_comment_spans_lines() {
    let source = "/* first\n   second */\ncode();\n";
    let job = worker().process_code(source, "span.c").unwrap();
    assert_eq!(counts(&job), (3, 1, 2, 0));
}

#[test]
fn nested_comments_honored_when_language_nests() {
    // Rust nests block comments: the first */ closes only the inner one.
    let source = "/* a /* b */ c */\nx = 1\n";
    let job = worker().process_code(source, "nest.rs").unwrap();
    assert_eq!(counts(&job), (2, 1, 1, 0));
}

#[test]
fn nested_open_ignored_when_language_does_not_nest() {
    // Go closes at the first */, leaving ` c */` as trailing code.
    let source = "/* a /* b */ c */\nx = 1\n";
    let job = worker().process_code(source, "nest.go").unwrap();
    assert_eq!(counts(&job), (2, 2, 0, 0));
}

#[test]
fn block_comment_after_code_keeps_line_as_code() {
    let job = worker().process_code("x := 1 /* note */\n", "inline.go").unwrap();
    assert_eq!(counts(&job), (1, 1, 0, 0));
}

#[test]
fn doc_string_lines_count_as_comment() {
    let source = "\"\"\"doc\nstill doc\n\"\"\"\nx = 1\n";
    let job = worker().process_code(source, "doc.py").unwrap();
    assert_eq!(counts(&job), (4, 1, 3, 0));
}

#[test]
fn doc_string_close_with_trailing_code_counts_as_code() {
    let source = "\"\"\"doc\nstill doc\n\"\"\" + tail\nx = 1\n";
    let job = worker().process_code(source, "doc.py").unwrap();
    // Lines 1-2 are doc-string; line 3 closes with non-whitespace after
    // the terminator and becomes code, as does line 4.
    assert_eq!(job.lines, 4);
    assert_eq!(job.comment, 2);
    assert_eq!(job.code, 2);
}

#[test]
fn unterminated_string_keeps_spanning_lines() {
    let source = "x = \"abc\nstill in string\n";
    let job = worker().process_code(source, "open.rs").unwrap();
    // Both lines count as code; the string simply never closes.
    assert_eq!(counts(&job), (2, 2, 0, 0));
}

#[test]
fn escaped_quote_does_not_close_string() {
    let source = "s = \"a\\\"b\" // after\n";
    let job = worker().process_code(source, "esc.go").unwrap();
    assert_eq!(counts(&job), (1, 1, 0, 0));
}

#[test]
fn comment_marker_inside_string_is_ignored() {
    let source = "url = \"http://example.com\"\n";
    let job = worker().process_code(source, "url.go").unwrap();
    assert_eq!(counts(&job), (1, 1, 0, 0));
    assert_eq!(job.comment, 0);
}

#[test]
fn verbatim_string_ignores_escapes() {
    // The backslash before the closing quote is not an escape in @"..."
    let source = "var p = @\"C:\\\" + x; // done\n";
    let job = worker().process_code(source, "verbatim.cs").unwrap();
    assert_eq!(counts(&job), (1, 1, 0, 0));
}

#[test]
fn complexity_counts_word_boundary_keywords() {
    let source = "if a {\n}\nfor i := 0; i < n; i++ {\n}\n";
    let job = worker().process_code(source, "loop.go").unwrap();
    assert_eq!(job.complexity, 2);
}

#[test]
fn complexity_ignores_keyword_fragments_inside_identifiers() {
    let source = "modifier := 1\nnotify()\n";
    let job = worker().process_code(source, "frag.go").unwrap();
    assert_eq!(job.complexity, 0);
}

#[test]
fn keyword_at_buffer_start_counts() {
    let job = worker().process_code("if x {\n}\n", "start.go").unwrap();
    assert_eq!(job.complexity, 1);
}

#[test]
fn bom_does_not_change_counts() {
    let plain = "x = 1\nif a {\n}\n";
    let mut bom_bytes = vec![0xEF, 0xBB, 0xBF];
    bom_bytes.extend_from_slice(plain.as_bytes());
    let with_bom = String::from_utf8(bom_bytes).unwrap();

    let a = worker().process_code(plain, "a.rs").unwrap();
    let b = worker().process_code(&with_bom, "b.rs").unwrap();

    assert_eq!(counts(&a), counts(&b));
    assert_eq!(a.complexity, b.complexity);
}

#[test]
fn bom_only_file_counts_nothing() {
    let content = String::from_utf8(vec![0xEF, 0xBB, 0xBF]).unwrap();
    let job = worker().process_code(&content, "bom.rs").unwrap();
    assert_eq!(counts(&job), (0, 0, 0, 0));
}

#[test]
fn nul_byte_flags_binary_and_clears_counts() {
    let job = worker().process_code("abc\0def\n", "blob.c").unwrap();
    assert!(job.binary);
    assert_eq!(counts(&job), (0, 0, 0, 0));
}

#[test]
fn nul_byte_at_line_start_flags_binary() {
    let job = worker().process_code("\0rest\n", "blob.c").unwrap();
    assert!(job.binary);
}

#[test]
fn nul_byte_past_probe_window_is_data() {
    let mut source = "a".repeat(10_001);
    source.push('\0');
    source.push_str("b\n");
    let job = worker().process_code(&source, "long.c").unwrap();
    assert!(!job.binary);
    assert_eq!(job.lines, 1);
}

#[test]
fn overrun_scan_yields_none() {
    // The doc-string opener swallows the final bytes of the buffer, so the
    // cursor lands past the end and no counts are produced.
    assert!(worker().process_code("x = \"\"\"", "trunc.py").is_none());
}

#[test]
fn identical_content_hashes_equal_across_filenames() {
    let worker = LanguageWorker::new().with_duplicates(true);
    let a = worker.process_code("x = 1\ny = 2\n", "a.rs").unwrap();
    let b = worker.process_code("x = 1\ny = 2\n", "b.rs").unwrap();

    assert!(a.hash.is_some());
    assert_eq!(a.hash, b.hash);
}

#[test]
fn bom_stripped_content_hashes_equal() {
    let worker = LanguageWorker::new().with_duplicates(true);
    let plain = "x = 1\n";
    let mut bom_bytes = vec![0xEF, 0xBB, 0xBF];
    bom_bytes.extend_from_slice(plain.as_bytes());
    let with_bom = String::from_utf8(bom_bytes).unwrap();

    let a = worker.process_code(plain, "a.rs").unwrap();
    let b = worker.process_code(&with_bom, "b.rs").unwrap();
    assert_eq!(a.hash, b.hash);
}

#[test]
fn differing_content_hashes_differ() {
    let worker = LanguageWorker::new().with_duplicates(true);
    let a = worker.process_code("x = 1\n", "a.rs").unwrap();
    let b = worker.process_code("x = 2\n", "b.rs").unwrap();
    assert_ne!(a.hash, b.hash);
}

#[test]
fn hash_absent_without_duplicate_mode() {
    let job = worker().process_code("x = 1\n", "a.rs").unwrap();
    assert!(job.hash.is_none());
}

#[test]
fn shebang_names_the_language() {
    let source = "#!/usr/bin/env python3\nif x:\n    pass\n";
    let job = worker().process_code(source, "script").unwrap();
    assert_eq!(job.language, "Python");
    assert_eq!(counts(&job), (3, 2, 1, 0));
    assert_eq!(job.complexity, 1);
}

#[test]
fn direct_interpreter_shebang_names_the_language() {
    let job = worker().process_code("#!/bin/bash\necho hi\n", "run").unwrap();
    assert_eq!(job.language, "Shell");
}

#[test]
fn ambiguous_header_resolves_by_content() {
    let cpp = "#include <vector>\nnamespace foo {\ntemplate <class T> void f();\n}\n";
    let job = worker().process_code(cpp, "foo.h").unwrap();
    assert_eq!(job.language, "C++");

    let plain = "int main() { return 0; }\n";
    let job = worker().process_code(plain, "foo.h").unwrap();
    assert_eq!(job.language, "C");
}

#[test]
fn candidates_recorded_on_job() {
    let job = worker().process_code("int x;\n", "foo.h").unwrap();
    assert_eq!(job.possible_languages, vec!["C", "C++", "Objective-C"]);
}

#[test]
fn crlf_line_endings_count_like_lf() {
    let job = worker().process_code("x = 1\r\n\r\ny = 2\r\n", "crlf.rs").unwrap();
    assert_eq!(counts(&job), (3, 2, 0, 1));
}

#[test]
fn file_without_trailing_newline_counts_last_line() {
    let job = worker().process_code("x = 1\ny = 2", "tail.rs").unwrap();
    assert_eq!(counts(&job), (2, 2, 0, 0));
}
