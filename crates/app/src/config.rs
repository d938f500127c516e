//! Configuration
//!
//! Settings come from CLI flags with environment fallbacks; a `.env` file is loaded first when
//! present.

use std::path::PathBuf;

use clap::Args;
use zeroize::Zeroizing;

use crate::domain::payments::PayPalConfig;

/// Default shop backend address.
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

/// Default PayPal REST endpoint (sandbox).
pub const DEFAULT_PAYPAL_API_URL: &str = "https://api-m.sandbox.paypal.com";

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Shop backend and cart storage settings.
#[derive(Debug, Clone, Args)]
pub struct ShopConfig {
    /// Base URL of the shop backend (without the `/api` suffix)
    #[arg(long, env = "NUTRICART_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Directory holding the persisted cart
    #[arg(long, env = "NUTRICART_CART_PATH", default_value = ".nutricart", global = true)]
    pub cart_path: PathBuf,
}

/// PayPal REST credentials. PayPal checkout is unavailable without them.
#[derive(Debug, Clone, Args)]
pub struct PayPalArgs {
    /// PayPal REST API base URL
    #[arg(long, env = "PAYPAL_API_URL", default_value = DEFAULT_PAYPAL_API_URL, global = true)]
    pub paypal_api_url: String,

    /// PayPal client id
    #[arg(long, env = "PAYPAL_CLIENT_ID", global = true)]
    pub paypal_client_id: Option<String>,

    /// PayPal client secret
    #[arg(long, env = "PAYPAL_CLIENT_SECRET", hide_env_values = true, global = true)]
    pub paypal_client_secret: Option<String>,
}

impl PayPalArgs {
    /// PayPal configuration, when both credentials are present.
    #[must_use]
    pub fn config(&self) -> Option<PayPalConfig> {
        match (&self.paypal_client_id, &self.paypal_client_secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Some(PayPalConfig {
                    api_url: self.paypal_api_url.clone(),
                    client_id: client_id.clone(),
                    client_secret: Zeroizing::new(client_secret.clone()),
                })
            }
            _ => None,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Shop backend and storage settings.
    #[command(flatten)]
    pub shop: ShopConfig,

    /// PayPal settings.
    #[command(flatten)]
    pub paypal: PayPalArgs,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Load `.env` into the process environment, ignoring a missing file.
pub fn load_dotenv() {
    _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: AppConfig,
    }

    #[test]
    fn defaults_apply_without_flags() {
        let cli = TestCli::parse_from(["nutricart"]);

        assert_eq!(cli.config.shop.api_url, DEFAULT_API_URL);
        assert_eq!(cli.config.paypal.paypal_api_url, DEFAULT_PAYPAL_API_URL);
        assert_eq!(cli.config.logging.log_format, LogFormat::Compact);
    }

    #[test]
    fn paypal_requires_both_credentials() {
        let only_id = TestCli::parse_from(["nutricart", "--paypal-client-id", "id"]);

        assert!(only_id.config.paypal.config().is_none());

        let both = TestCli::parse_from([
            "nutricart",
            "--paypal-client-id",
            "id",
            "--paypal-client-secret",
            "secret",
        ]);

        let config = both.config.paypal.config();

        assert_eq!(config.map(|config| config.client_id), Some("id".to_string()));
    }
}
