//! mail-notification - SMTP 邮件通知管理工具

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notify_bootstrap::{build_notifier, init_runtime};
use notify_config::{ConfigKey, RuntimeConfig};
use secrecy::ExposeSecret;

/// Manage the SMTP relay used for mail notifications
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing default.toml
    #[arg(long, default_value = "config")]
    config_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current SMTP settings
    Show,
    /// Validate and store a single SMTP setting
    Set {
        /// One of: host, port, encryption, username, password, sender
        key: ConfigKey,
        value: String,
    },
    /// Send a test message through the configured relay
    Test {
        /// Recipient of the test message
        email: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = RuntimeConfig::load(&cli.config_dir)
        .with_context(|| format!("Failed to load runtime configuration from {}", cli.config_dir))?;
    init_runtime(&config);

    let mut notifier = build_notifier(&config);

    match cli.command {
        Command::Show => {
            let password_set = !notifier.password().expose_secret().is_empty();
            println!("host       = {}", notifier.host());
            println!("port       = {}", notifier.port());
            println!("encryption = {}", notifier.encryption().label());
            println!("username   = {}", notifier.username());
            println!("password   = {}", if password_set { "********" } else { "" });
            println!("sender     = {}", notifier.sender());
        }
        Command::Set { key, value } => {
            notifier
                .store_mut()
                .set_field(key, &value)
                .with_context(|| format!("Failed to set {}", key))?;
            println!("{} updated", key);
        }
        Command::Test { email } => {
            notifier
                .test_relay(email.as_str())
                .with_context(|| format!("Test message to {} failed", email))?;
            println!("Test message sent to {}", email);
        }
    }

    Ok(())
}
