//! unbind - EPUB to clean HTML converter

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use unbind::{Config, DEFAULT_OUTPUT_DIR, process_epub};

#[derive(Parser)]
#[command(name = "unbind")]
#[command(version, about = "Convert an EPUB into sanitized standalone HTML pages", long_about = None)]
#[command(after_help = "EXAMPLES:
    unbind book.epub                       Write pages to clean_output/
    unbind book.epub -o pages -j 8         Custom output directory, 8 workers
    unbind book.epub --allow p --allow em  Replace the tag allow-list")]
struct Cli {
    /// Input EPUB file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory for the generated pages
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Worker count (defaults to the number of logical CPUs)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Tag to keep during sanitization (repeatable; replaces the default allow-list)
    #[arg(long = "allow", value_name = "TAG")]
    allow: Vec<String>,

    /// Suppress the summary output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unbind=warn".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = Config::new(cli.output);
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers.max(1));
    }
    if !cli.allow.is_empty() {
        config = config.with_allowed_tags(&cli.allow);
    }

    match process_epub(&config, &cli.input) {
        Ok(summary) => {
            if !cli.quiet {
                println!(
                    "{} of {} chapters written to {}",
                    summary.chapters.len(),
                    summary.candidates,
                    config.output_dir.display()
                );
                if summary.dropped > 0 {
                    println!("{} chapters dropped, see warnings", summary.dropped);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
