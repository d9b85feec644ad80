use crate::cli::resolve_target;
use crate::config::resolve::{resolve_config, CliOverrides};
use crate::errors::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show resolved configuration with provenance
    Show {
        /// Working directory (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn run(args: &ConfigArgs) -> Result<()> {
    match &args.action {
        ConfigAction::Show { path } => {
            let (_, working_dir) = resolve_target(path)?;
            let config = resolve_config(&working_dir, &CliOverrides::default())?;
            let mut stdout = std::io::stdout();
            crate::config::show::render_show(&mut stdout, &config)?;
        }
    }
    Ok(())
}
