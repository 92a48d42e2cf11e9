pub mod cli;
pub mod error;
pub mod language;
pub mod output;
pub mod scanner;
pub mod worker;

pub use error::{Result, SlocScanError};
pub use worker::{FileJob, LanguageWorker};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_RUNTIME_ERROR: i32 = 2;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
