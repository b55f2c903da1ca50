pub mod catalog;
pub mod checks;
pub mod config;
pub mod eval;
