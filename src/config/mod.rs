// Configuration module entry point
// Layers defaults, an optional config file, environment and CLI flags

mod state;
mod types;

use crate::cli::Cli;
use crate::error::StartupError;
use std::net::{IpAddr, SocketAddr};

pub use state::AppState;
pub use types::{AssetsConfig, Config};

pub const DEFAULT_PORT: u16 = 3000;

impl Config {
    /// Load configuration for this process
    ///
    /// Reads the `PORT` environment variable in addition to the sources
    /// described on [`Config::load_from`].
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let port_env = std::env::var("PORT").ok();
        Self::load_from(cli, port_env.as_deref())
    }

    /// Load configuration, lowest precedence first:
    ///
    /// 1. built-in defaults
    /// 2. the optional config file named by `--config`
    /// 3. `SPA__<SECTION>__<KEY>` environment variables
    /// 4. command-line flags
    /// 5. `port_env` (the `PORT` variable), ignored when not a valid port
    pub fn load_from(cli: &Cli, port_env: Option<&str>) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&cli.config).required(false))
            .add_source(
                config::Environment::with_prefix("SPA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("assets.root_document", "index.html")?
            .set_default("assets.immutable_prefix", "/assets/")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "spa-server")?
            .set_override_option("server.host", cli.host.clone())?
            .set_override_option(
                "assets.dir",
                cli.dir.as_ref().map(|d| d.to_string_lossy().into_owned()),
            )?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .set_override_option("server.port", port_env.and_then(parse_port).map(i64::from))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|source| StartupError::Address {
                addr: self.server.host.clone(),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

/// Parse a port number from an environment value
pub fn parse_port(value: &str) -> Option<u16> {
    value.trim().parse().ok()
}
