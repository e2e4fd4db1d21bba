pub mod cli;
pub mod logging;
pub mod report;
pub mod request;
pub mod ytd_file;

pub use cli::{Cli, RunOutput, run};
