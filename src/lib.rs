pub mod baseline;
pub mod cli;
pub mod confidence;
pub mod config;
pub mod correlate;
pub mod diagnostic;
pub mod edit;
pub mod errors;
pub mod output;
pub mod parse;
pub mod plan;
pub mod scan;
pub mod session;
pub mod walk;
