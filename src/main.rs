use std::fs;
use std::path::Path;

use clap::Parser;
use rayon::prelude::*;

use sloc_scan::cli::Cli;
use sloc_scan::output::{JsonFormatter, OutputFormat, ReportFormatter, ScanReport, TextFormatter};
use sloc_scan::scanner::{DirectoryScanner, GlobFilter};
use sloc_scan::worker::{FileJob, LanguageWorker};
use sloc_scan::{EXIT_RUNTIME_ERROR, EXIT_SUCCESS};

fn main() {
    let cli = Cli::parse();

    let exit_code = match run(&cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_RUNTIME_ERROR
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> sloc_scan::Result<()> {
    let filter = GlobFilter::new(&cli.exclude)?;
    let scanner = DirectoryScanner::new(filter, !cli.no_gitignore);

    let mut all_files = Vec::new();
    for path in &cli.paths {
        all_files.extend(scanner.scan(path));
    }

    let worker = LanguageWorker::new()
        .with_duplicates(cli.duplicates)
        .with_verbose(cli.verbose > 0);

    // Embarrassingly parallel: each file owns its job and cursor; the only
    // shared state is the read-only registry.
    let jobs: Vec<FileJob> = all_files
        .par_iter()
        .filter_map(|path| classify_file(&worker, path, cli.verbose))
        .collect();

    let report = ScanReport::from_jobs(&jobs);

    let output = match cli.format {
        OutputFormat::Text => TextFormatter.format(&report)?,
        OutputFormat::Json => JsonFormatter.format(&report)?,
    };

    write_output(cli.output.as_deref(), &output, cli.quiet)?;

    Ok(())
}

fn classify_file(worker: &LanguageWorker, path: &Path, verbose: u8) -> Option<FileJob> {
    match worker.process_file(path) {
        Ok(job) => job,
        Err(e) => {
            if verbose > 0 {
                eprintln!("Skipping {}: {e}", path.display());
            }
            None
        }
    }
}

fn write_output(output_path: Option<&Path>, content: &str, quiet: bool) -> sloc_scan::Result<()> {
    if let Some(path) = output_path {
        fs::write(path, content)?;
    } else if !quiet {
        print!("{content}");
    }
    Ok(())
}
