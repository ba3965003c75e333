//! gotify-bark binary entry point.
//!
//! Usage:
//! ```bash
//! gotify-bark --host https://gotify.example.com --token CLIENT_TOKEN \
//!     --target https://api.day.app/DEVICE_KEY
//! gotify-bark --config relay.toml
//! gotify-bark --help
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use bark_crypto::AesKey;
use gotify_bark_relay::{ConfigError, Relay, RelayConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Forward Gotify notifications to a Bark server.
#[derive(Parser, Debug)]
#[command(name = "gotify-bark")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Gotify server host (e.g., http://localhost:8080)
    #[arg(long)]
    host: Option<String>,

    /// Gotify client token
    #[arg(long)]
    token: Option<String>,

    /// Bark URL to forward messages to
    #[arg(long)]
    target: Option<String>,

    /// Icon URL for notifications
    #[arg(long)]
    icon: Option<String>,

    /// AES key for Bark encryption (16, 24 or 32 bytes)
    #[arg(long)]
    aes_key: Option<String>,

    /// AES IV for Bark encryption (16 bytes, random per message if omitted)
    #[arg(long)]
    aes_iv: Option<String>,

    /// Basic auth username for the Bark server
    #[arg(long)]
    bark_user: Option<String>,

    /// Basic auth password for the Bark server
    #[arg(long)]
    bark_password: Option<String>,

    /// Verify the Gotify server's TLS certificate
    #[arg(long)]
    verify_tls: bool,

    /// Seconds to wait before reconnecting to Gotify
    #[arg(long)]
    reconnect_delay: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Merge the config file (if any) with flags and validate.
    fn load_config(&self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RelayConfig::from_file(path)?,
            None => RelayConfig::default(),
        };

        override_string(&mut config.gotify.host, &self.host);
        override_string(&mut config.gotify.token, &self.token);
        override_string(&mut config.bark.target, &self.target);
        override_string(&mut config.bark.icon, &self.icon);
        override_option(&mut config.bark.aes_key, &self.aes_key);
        override_option(&mut config.bark.aes_iv, &self.aes_iv);
        override_option(&mut config.bark.user, &self.bark_user);
        override_option(&mut config.bark.password, &self.bark_password);
        if self.verify_tls {
            config.gotify.tls_verify = true;
        }
        if let Some(secs) = self.reconnect_delay {
            config.reconnect.delay_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

fn override_string(field: &mut String, flag: &Option<String>) {
    if let Some(value) = flag {
        *field = value.clone();
    }
}

fn override_option(field: &mut Option<String>, flag: &Option<String>) {
    if flag.is_some() {
        *field = flag.clone();
    }
}

/// Length of the configured AES key, if one is set and AES cannot use it.
fn invalid_key_length(config: &RelayConfig) -> Option<usize> {
    let key = AesKey::new(config.bark.aes_key()?);
    (!key.is_valid_length()).then(|| key.len())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            println!();
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    };

    if !config.gotify.tls_verify {
        tracing::warn!(
            "TLS certificate verification is disabled for the Gotify stream (use --verify-tls to enable)"
        );
    }
    if let Some(len) = invalid_key_length(&config) {
        tracing::warn!(
            "AES key is {} bytes; expected 16, 24 or 32. Every message will fail to encrypt",
            len
        );
    }

    let relay = Relay::from_config(&config).context("Failed to set up relay")?;

    tokio::select! {
        _ = relay.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
