use clap::Parser;
use phylogeo_tools::{cli, commands};

fn main() {
    let args = cli::Args::parse();

    let result = match args.command {
        cli::Commands::Tree {
            tree_file,
            output_file,
        } => commands::tree::run(tree_file, output_file),
        cli::Commands::Analyze {
            tree_file,
            support_file,
            top_k,
            output_file,
        } => commands::analyze::run(tree_file, support_file, top_k, output_file),
        cli::Commands::Matrix {
            tree_file,
            output_file,
        } => commands::matrix::run(tree_file, output_file),
        cli::Commands::Compare {
            tree_files,
            labels,
            top_k,
            output_file,
        } => commands::compare::run(tree_files, labels, top_k, output_file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
