use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an MCC tree and dump its node/edge payload as JSON
    Tree {
        /// Stored tree name or path (falls back to the configured default)
        tree_file: Option<String>,

        /// Output file for the payload (stdout when omitted)
        #[arg(short = 'o', long = "output")]
        output_file: Option<String>,
    },

    /// Run the discrete trait analysis and publish its artifacts
    Analyze {
        /// Stored tree name or path (falls back to the configured default)
        tree_file: Option<String>,

        /// Optional BSSVS / Markov jumps table (CSV, TSV or semicolons)
        #[arg(long)]
        support_file: Option<String>,

        /// Number of pathways to highlight; zero or negative keeps all
        #[arg(long, default_value = "10")]
        top_k: i64,

        /// Output file for the analysis result (stdout when omitted)
        #[arg(short = 'o', long = "output")]
        output_file: Option<String>,
    },

    /// Build the best-state migration matrix for a tree
    Matrix {
        /// Stored tree name or path (falls back to the configured default)
        tree_file: Option<String>,

        /// Output file for the matrix (stdout when omitted)
        #[arg(short = 'o', long = "output")]
        output_file: Option<String>,
    },

    /// Analyze two or more trees and rank their divergent migration paths
    Compare {
        /// Stored tree names or paths
        #[arg(required = true, num_args = 2..)]
        tree_files: Vec<String>,

        /// Labels matching the tree files, comma separated
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,

        /// Number of divergent paths to keep; zero or negative keeps all
        #[arg(long, default_value = "10")]
        top_k: i64,

        /// Output file for the comparison (stdout when omitted)
        #[arg(short = 'o', long = "output")]
        output_file: Option<String>,
    },
}
