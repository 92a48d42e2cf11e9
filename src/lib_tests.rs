use super::*;

#[test]
fn exit_codes_are_distinct() {
    assert_eq!(EXIT_SUCCESS, 0);
    assert_eq!(EXIT_RUNTIME_ERROR, 2);
}

#[test]
fn crate_root_exposes_the_worker() {
    let job = LanguageWorker::new()
        .process_code("let x = 1;\n", "lib.rs")
        .unwrap();
    assert_eq!(job.language, "Rust");
    assert_eq!(job.code, 1);
}
