pub mod cli;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod discrete;
pub mod error;
pub mod export;
pub mod matrix;
pub mod store;
pub mod tree;

// Re-export the core operations
pub use comparison::compare;
pub use discrete::run_discrete_analysis;
pub use error::{Error, Result};
pub use matrix::build_migration_matrix;
pub use tree::parse_tree;
