use clap::{Parser, Subcommand};
use color_eyre::Result;
use log::LevelFilter;
use std::path::PathBuf;

use citygml_prep::export::export_report;
use citygml_prep::inject::inject_attributes;
use citygml_prep::tools::{change_use_type, merge_files};

#[derive(Parser, Debug)]
#[command(name = "citygml-prep")]
#[command(about = "CityGML Prep - prepare building datasets for energy simulation")]
#[command(version)]
struct Args {
    /// Log every injected value
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inject spreadsheet attributes into every GML file of a folder
    Inject {
        /// Folder with GML files and their spreadsheets
        #[arg(default_value = "input")]
        input: PathBuf,

        /// Folder for the completed GML files
        #[arg(default_value = "output")]
        output: PathBuf,

        /// Write a JSON report of every file's outcome
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Strip usage prefixes from bldg:function codes
    UseType {
        #[arg(default_value = "input")]
        input: PathBuf,

        #[arg(default_value = "output")]
        output: PathBuf,
    },

    /// Merge GML files (or the GML files of a folder) into one file
    Merge {
        /// Path of the merged GML file
        output: PathBuf,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match args.command {
        Command::Inject {
            input,
            output,
            report,
        } => {
            let batch = inject_attributes(&input, &output)?;
            if let Some(report_path) = &report {
                export_report(&batch, report_path)?;
                println!("Exported report to JSON: {}", report_path.display());
            }
            if batch.failed_count() > 0 {
                log::warn!("{} of {} files failed.", batch.failed_count(), batch.files.len());
            }
        }
        Command::UseType { input, output } => {
            let written = change_use_type(&input, &output)?;
            println!("Rewrote {written} files into {}", output.display());
        }
        Command::Merge { output, files } => {
            let merged = merge_files(&files, &output)?;
            println!("Merged {merged} GML files into {}", output.display());
        }
    }

    Ok(())
}
