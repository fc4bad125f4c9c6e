use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the model artifacts
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in KB
    #[serde(default = "default_max_body_size_kb")]
    pub max_body_size_kb: usize,

    /// Enable CORS for all origins
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log filter directive, e.g. `info` or `fertirec=debug,tower_http=info`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `json` or `pretty`
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Keep serving (health only) when the artifacts fail to load
    #[serde(default)]
    pub allow_degraded_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            model_path: default_model_path(),
            timeout_secs: default_timeout_secs(),
            max_body_size_kb: default_max_body_size_kb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            metrics_enabled: default_true(),
            allow_degraded_start: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config files and environment variables.
    ///
    /// Sources, lowest precedence first: built-in defaults, an optional
    /// `fertirec.{toml,yaml,json}` file, `FERTIREC__*` variables, and finally
    /// the plain `MODEL_PATH` and `PORT` variables.
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::from_sources(
            config::Environment::with_prefix("FERTIREC"),
            std::env::var("MODEL_PATH").ok(),
            std::env::var("PORT").ok(),
        )?;
        config.validate()?;
        Ok(config)
    }

    fn from_sources(
        env: config::Environment,
        model_path: Option<String>,
        port: Option<String>,
    ) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("fertirec").required(false))
            // Override with environment variables
            .add_source(env.separator("__").try_parsing(true))
            .set_override_option("model_path", model_path)?
            .set_override_option("port", port)?
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be non-zero");
        }
        if self.model_path.as_os_str().is_empty() {
            anyhow::bail!("model_path must not be empty");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be at least 1");
        }
        if self.max_body_size_kb == 0 {
            anyhow::bail!("max_body_size_kb must be at least 1");
        }
        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            anyhow::bail!("log_format must be `json` or `pretty`, got `{}`", self.log_format);
        }
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_kb * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_model_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_kb() -> usize {
    64
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}
