pub mod toml_config;

pub use toml_config::{BookingConfig, DEFAULT_ENDPOINT};

#[cfg(feature = "cli")]
use crate::core::FormField;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "lezzet-booking")]
#[command(about = "Send a table reservation request to the Lezzet Durağı booking endpoint")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override booking endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    /// 1-6 or 7+
    #[arg(long, default_value = "")]
    pub guests: String,

    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    pub date: String,

    /// One of the reservation time slots, e.g. 19:00
    #[arg(long, default_value = "")]
    pub time: String,

    /// Client-side request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Retries for connection-level failures only
    #[arg(long)]
    pub retry_attempts: Option<u32>,

    /// Send a per-attempt request id under this header name
    #[arg(long)]
    pub idempotency_header: Option<String>,

    /// Skip the required-field and option checks before sending
    #[arg(long)]
    pub skip_checks: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON logs")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 讀取設定檔（若有）並套用命令列覆蓋
    pub fn resolve(&self) -> Result<BookingConfig> {
        let mut config = match &self.config {
            Some(path) => BookingConfig::from_file(path)?,
            None => BookingConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.booking.endpoint = endpoint.clone();
        }
        if self.timeout_seconds.is_some() {
            config.booking.timeout_seconds = self.timeout_seconds;
        }
        if self.retry_attempts.is_some() {
            config.booking.retry_attempts = self.retry_attempts;
        }
        if self.idempotency_header.is_some() {
            config.booking.idempotency_header = self.idempotency_header.clone();
        }

        Ok(config)
    }

    /// 命令列上輸入的欄位，依序當作使用者輸入事件
    pub fn field_inputs(&self) -> [(FormField, &str); 5] {
        [
            (FormField::Name, self.name.as_str()),
            (FormField::Phone, self.phone.as_str()),
            (FormField::Guests, self.guests.as_str()),
            (FormField::Date, self.date.as_str()),
            (FormField::Time, self.time.as_str()),
        ]
    }
}
