pub mod toml_config;

pub use toml_config::ServerConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use crate::utils::error::Result;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "mini-weather")]
#[command(about = "Mini weather database served as tools over stdio")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON on stderr")]
    pub log_json: bool,

    #[arg(long, help = "Start with an empty registry")]
    pub no_default_seeds: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the file named by `--config` (or defaults) and applies the command-line overrides.
    pub fn resolve(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if self.log_json {
            config.logging.json = true;
        }
        if self.no_default_seeds && config.seeds.is_none() {
            config.seeds = Some(Default::default());
        }

        Ok(config)
    }
}
