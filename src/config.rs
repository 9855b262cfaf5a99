use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Canned greeting shown on mount and after every reset.
pub const DEFAULT_GREETING: &str = "Greetings! I am your Tennis Guru. I specialize in helping you improve your mental game on the court. How can I help you today?";

/// Reply substituted for the bot's answer on any delivery failure.
pub const DEFAULT_FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again.";

/// Config file picked up from the working directory when none is given.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the chat service
    #[arg(long, env = "CHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "CHAT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Static asset path of the bot avatar image
    #[arg(long, env = "CHAT_AVATAR_PATH")]
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub content: ContentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub chat_path: String,
    pub reset_path: String,
    pub request_timeout_secs: u64,
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    pub greeting: String,
    pub fallback_reply: String,
    #[serde(default)]
    pub avatar_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("service.base_url", "http://127.0.0.1:5000")?
            .set_default("service.chat_path", "/chat")?
            .set_default("service.reset_path", "/new-chat")?
            .set_default("service.request_timeout_secs", 30)?
            .set_default("content.greeting", DEFAULT_GREETING)?
            .set_default("content.fallback_reply", DEFAULT_FALLBACK_REPLY)?;

        // 2. Config file: explicit path must exist, ./config.yaml is optional
        if let Some(path) = cli.config.as_deref() {
            builder = builder.add_source(File::new(path, FileFormat::Yaml));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::new(CWD_CONFIG_FILE, FileFormat::Yaml));
        }

        // 3. Environment variables (prefixed with CHAT_), e.g. CHAT_SERVICE__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix("CHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their env aliases) win over everything
        if let Some(url) = cli.base_url {
            builder = builder.set_override("service.base_url", url)?;
        }
        if let Some(secs) = cli.timeout_secs {
            builder = builder.set_override("service.request_timeout_secs", secs)?;
        }
        if let Some(avatar) = cli.avatar {
            builder = builder.set_override("content.avatar_path", avatar)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}
