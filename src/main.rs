use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gcide_reader::gcide::batch::expand_paths;
use gcide_reader::gcide::source::parse_encoding;
use gcide_reader::{convert_paths, ConvertOptions, JsonLinesSink};

#[derive(Parser)]
#[command(name = "gcide-reader", about = "Convert GCIDE source files into JSON dictionary entries")]
struct Cli {
    /// Source files, or directories holding CIDE.*.xml files
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Force a text encoding (e.g. utf-8, windows-1252) instead of detecting it
    #[arg(long)]
    encoding: Option<String>,
    /// Number of files converted at once
    #[arg(long)]
    threads: Option<usize>,
    /// Write JSON lines here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Only print the per-file report, no entries
    #[arg(long)]
    summary: bool,
    /// File name prefix used when scanning directories
    #[arg(long, default_value = "CIDE")]
    prefix: String,
    /// File extension used when scanning directories
    #[arg(long, default_value = "xml")]
    extension: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut options = ConvertOptions::default()
        .with_file_filter(cli.prefix.as_str(), cli.extension.as_str())
        .keep_skipped_blocks(false);
    if let Some(threads) = cli.threads {
        options = options.with_threads(threads);
    }
    if let Some(label) = &cli.encoding {
        match parse_encoding(label) {
            Ok(encoding) => options = options.with_encoding(encoding),
            Err(e) => {
                eprintln!("ERROR: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let files = match expand_paths(&cli.paths, &options) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("ERROR: Failed to list source files");
            eprintln!("  {}", e);
            return ExitCode::FAILURE;
        }
    };

    let writer: Box<dyn Write + Send> = if cli.summary {
        Box::new(io::sink())
    } else if let Some(path) = &cli.output {
        match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                eprintln!("ERROR: Cannot create {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        Box::new(io::stdout())
    };

    let sink = JsonLinesSink::new(writer);
    let outcomes = convert_paths(&files, &options, &sink);
    if let Err(e) = sink.into_inner() {
        eprintln!("ERROR: Failed to flush output: {}", e);
        return ExitCode::FAILURE;
    }

    eprintln!("{}", "=".repeat(60));
    let mut failures = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(summary) => eprintln!(
                "  {}: {} entries, {} blocks skipped, {} saved, {} failed",
                outcome.path.display(),
                summary.entries,
                summary.skipped_blocks,
                summary.saved,
                summary.failed
            ),
            Err(e) => {
                failures += 1;
                eprintln!("  {}: FAILED ({})", outcome.path.display(), e);
            }
        }
    }
    eprintln!("{}", "=".repeat(60));
    eprintln!("{} files, {} failed", outcomes.len(), failures);

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
