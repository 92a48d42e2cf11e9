mod features;
mod registry;

pub use features::{CompiledFeatures, Quote};
pub use registry::{LanguageRegistry, LanguageSpec};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
