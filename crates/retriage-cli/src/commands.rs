use clap::{Parser, Subcommand, ValueEnum};
use retriage_core::RunMode;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "retriage")]
#[command(about = "Records-retention triage for directory trees", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify every file under a directory tree
    Classify {
        /// Directory to classify; defaults to the configured root paths
        path: Option<PathBuf>,
        /// Full content analysis, or metadata-only aged-file sweep
        #[arg(long, value_enum, default_value = "classification")]
        mode: ModeArg,
        /// Write result rows to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write result rows to a JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Count files per eligibility category without classifying
    Scan {
        /// Directory to scan; defaults to the configured root paths
        path: Option<PathBuf>,
    },
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Classification,
    LastModified,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Classification => RunMode::Classification,
            ModeArg::LastModified => RunMode::LastModified,
        }
    }
}
