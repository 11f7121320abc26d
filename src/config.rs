use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::channels::ChannelDirectory;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub telegram: TelegramConfig,
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    #[serde(default = "default_send_rate")]
    pub send_rate_per_sec: f64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: default_api_base(),
            poll_timeout_secs: default_poll_timeout(),
            send_rate_per_sec: default_send_rate(),
        }
    }
}

/// Chat ids of the four watched channels.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelsConfig {
    pub target: i64,
    pub pips: i64,
    pub forex: i64,
    pub crypto: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    pub auth_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            auth_token: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// Post a notice to the target channel when a watched channel sends a non-signal.
    #[serde(default = "default_true")]
    pub notify_ignored: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            notify_ignored: true,
        }
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_send_rate() -> f64 {
    1.0
}

fn default_port() -> u16 {
    3000
}

fn default_true() -> bool {
    true
}

/// Flat variable names used by older deployments, mapped onto settings keys.
const LEGACY_ENV: [(&str, &str); 6] = [
    ("TELEGRAM_BOT_TOKEN", "telegram.bot_token"),
    ("TELEGRAM_TARGET_CHANNEL", "channels.target"),
    ("TELEGRAM_CHANNEL_PIPS", "channels.pips"),
    ("TELEGRAM_CHANNEL_FOREX", "channels.forex"),
    ("TELEGRAM_CHANNEL_BTC", "channels.crypto"),
    ("PORT", "api.port"),
];

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 1. Project config, config/relay.{toml,json}
            .add_source(File::with_name("config/relay").required(false))
            // 2. Local overrides, not checked in
            .add_source(File::with_name("config/local").required(false))
            // 3. e.g. RELAY_CHANNELS__PIPS, RELAY_API__AUTH_TOKEN
            .add_source(
                Environment::with_prefix("RELAY")
                    .prefix_separator("_")
                    .separator("__"),
            );

        // 4. Legacy names win over everything else
        for (var, key) in LEGACY_ENV {
            builder = builder.set_override_option(key, env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn channel_directory(&self) -> ChannelDirectory {
        ChannelDirectory::new(
            self.channels.target,
            self.channels.pips,
            self.channels.forex,
            self.channels.crypto,
        )
    }
}
