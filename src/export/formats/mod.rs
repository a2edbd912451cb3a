pub mod geo;
pub mod summary;
pub mod tables;
