use anyhow::Result;
use clap::Subcommand;
use tracing::info;

use liftoff_core::AppConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
    /// Print the effective configuration
    Show,
}

pub fn run(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            let path = AppConfig::config_path();
            if path.exists() && !force {
                println!("Config already exists at {}", path.display());
                println!("Use --force to overwrite it with the defaults.");
                return Ok(());
            }
            AppConfig::default().save()?;
            info!(path = %path.display(), "Default config written");
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", AppConfig::config_path().display());
        }
        ConfigAction::Show => {
            let config = AppConfig::load()?;
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}
