use std::fmt::Write as _;
use std::path::PathBuf;

use clap::ValueEnum;
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::worker::FileJob;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LanguageTotals {
    pub files: u64,
    pub lines: u64,
    pub code: u64,
    pub comment: u64,
    pub blank: u64,
    pub complexity: u64,
}

impl LanguageTotals {
    fn add(&mut self, job: &FileJob) {
        self.files += 1;
        self.lines += job.lines;
        self.code += job.code;
        self.comment += job.comment;
        self.blank += job.blank;
        self.complexity += job.complexity;
    }
}

/// Aggregated scan results, ordered for stable output: languages by code
/// count descending, then by name.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub languages: IndexMap<String, LanguageTotals>,
    pub total: LanguageTotals,
    pub binary_files: Vec<PathBuf>,
    /// Groups of two or more files with identical content digests.
    pub duplicate_groups: Vec<Vec<PathBuf>>,
}

impl ScanReport {
    #[must_use]
    pub fn from_jobs(jobs: &[FileJob]) -> Self {
        let mut languages: IndexMap<String, LanguageTotals> = IndexMap::new();
        let mut total = LanguageTotals::default();
        let mut binary_files = Vec::new();

        for job in jobs {
            if job.binary {
                binary_files.push(job.location.clone());
                continue;
            }
            languages
                .entry(job.language.clone())
                .or_default()
                .add(job);
            total.add(job);
        }

        languages.sort_by(|name_a, totals_a, name_b, totals_b| {
            totals_b.code.cmp(&totals_a.code).then(name_a.cmp(name_b))
        });
        binary_files.sort();

        Self {
            languages,
            total,
            binary_files,
            duplicate_groups: duplicate_groups(jobs),
        }
    }
}

/// Files whose digests collide, grouped. Binary files carry no digest and
/// never appear here.
fn duplicate_groups(jobs: &[FileJob]) -> Vec<Vec<PathBuf>> {
    let mut by_hash: IndexMap<&str, Vec<PathBuf>> = IndexMap::new();
    for job in jobs {
        if let Some(hash) = job.hash.as_deref() {
            by_hash.entry(hash).or_default().push(job.location.clone());
        }
    }

    let mut groups: Vec<Vec<PathBuf>> = by_hash
        .into_values()
        .filter(|group| group.len() > 1)
        .map(|mut group| {
            group.sort();
            group
        })
        .collect();
    groups.sort();
    groups
}

pub trait ReportFormatter {
    /// # Errors
    /// Returns an error when the report cannot be rendered.
    fn format(&self, report: &ScanReport) -> Result<String>;
}

pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{:<14} {:>6} {:>8} {:>8} {:>8} {:>8} {:>10}",
            "Language", "Files", "Lines", "Code", "Comment", "Blank", "Complexity"
        );

        for (name, totals) in &report.languages {
            let _ = writeln!(
                out,
                "{:<14} {:>6} {:>8} {:>8} {:>8} {:>8} {:>10}",
                name,
                totals.files,
                totals.lines,
                totals.code,
                totals.comment,
                totals.blank,
                totals.complexity
            );
        }

        let _ = writeln!(
            out,
            "{:<14} {:>6} {:>8} {:>8} {:>8} {:>8} {:>10}",
            "Total",
            report.total.files,
            report.total.lines,
            report.total.code,
            report.total.comment,
            report.total.blank,
            report.total.complexity
        );

        if !report.binary_files.is_empty() {
            let _ = writeln!(out, "\nBinary files skipped: {}", report.binary_files.len());
        }

        if !report.duplicate_groups.is_empty() {
            let _ = writeln!(out, "\nDuplicate sets:");
            for group in &report.duplicate_groups {
                let _ = writeln!(out, "  -");
                for path in group {
                    let _ = writeln!(out, "    {}", path.display());
                }
            }
        }

        Ok(out)
    }
}

pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &ScanReport) -> Result<String> {
        let json = serde_json::to_string_pretty(report)?;
        Ok(format!("{json}\n"))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
