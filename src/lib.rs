pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LineTransport;
pub use config::ServerConfig;
pub use core::{
    registry::WeatherRegistry,
    server::{McpServer, ServerInfo},
    tools::{ToolOutput, ToolRouter},
};
pub use domain::model::{Ack, CityKey, Temperature};
pub use utils::error::{Result, WeatherError};
