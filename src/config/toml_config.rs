use crate::core::{ConfigProvider, StatusMessages};
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str =
    "https://randevu.app.n8n.cloud/webhook/778293ad-6324-4218-92e6-e01708d654bb";

const MAX_RETRY_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default)]
    pub booking: EndpointConfig,
    #[serde(default)]
    pub messages: StatusMessages,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// 未設定時使用 HTTP 客戶端預設值
    pub timeout_seconds: Option<u64>,
    /// 只針對連線層失敗重試，伺服器拒絕永遠不重試
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    /// 例如 "Idempotency-Key"；同一次送出的所有重試共用一個 UUID
    pub idempotency_header: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: None,
            retry_attempts: None,
            retry_delay_ms: None,
            idempotency_header: None,
        }
    }
}

impl BookingConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BookingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BookingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BOOKING_WEBHOOK})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BookingError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("booking.endpoint", &self.booking.endpoint)?;

        if let Some(timeout) = self.booking.timeout_seconds {
            validation::validate_range("booking.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(attempts) = self.booking.retry_attempts {
            validation::validate_range("booking.retry_attempts", attempts, 0, MAX_RETRY_ATTEMPTS)?;
        }
        if let Some(header) = &self.booking.idempotency_header {
            validation::validate_header_name("booking.idempotency_header", header)?;
        }

        validation::validate_non_empty_string("messages.success", &self.messages.success)?;
        validation::validate_non_empty_string("messages.rejected", &self.messages.rejected)?;
        validation::validate_non_empty_string(
            "messages.transport_failure",
            &self.messages.transport_failure,
        )?;

        Ok(())
    }
}

impl ConfigProvider for BookingConfig {
    fn endpoint(&self) -> &str {
        &self.booking.endpoint
    }

    fn timeout(&self) -> Option<Duration> {
        self.booking.timeout_seconds.map(Duration::from_secs)
    }

    fn retry_attempts(&self) -> u32 {
        self.booking.retry_attempts.unwrap_or(0)
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.booking.retry_delay_ms.unwrap_or(500))
    }

    fn idempotency_header(&self) -> Option<&str> {
        self.booking.idempotency_header.as_deref()
    }

    fn messages(&self) -> StatusMessages {
        self.messages.clone()
    }
}

impl Validate for BookingConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_plain_webhook_behaviour() {
        let config = BookingConfig::from_toml_str("").unwrap();

        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.retry_attempts(), 0);
        assert_eq!(config.idempotency_header(), None);
        assert_eq!(config.messages(), StatusMessages::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[booking]
endpoint = "https://booking.example.com/hook"
timeout_seconds = 10
retry_attempts = 2
retry_delay_ms = 250
idempotency_header = "Idempotency-Key"

[messages]
success = "Booked!"
"#;

        let config = BookingConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.endpoint(), "https://booking.example.com/hook");
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.retry_attempts(), 2);
        assert_eq!(config.retry_delay(), Duration::from_millis(250));
        assert_eq!(config.idempotency_header(), Some("Idempotency-Key"));
        assert_eq!(config.messages().success, "Booked!");
        // 未填的訊息保留預設值
        assert_eq!(config.messages().rejected, StatusMessages::default().rejected);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LEZZET_TEST_WEBHOOK", "https://test.booking.com/hook");

        let toml_content = r#"
[booking]
endpoint = "${LEZZET_TEST_WEBHOOK}"
"#;

        let config = BookingConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.booking.endpoint, "https://test.booking.com/hook");

        std::env::remove_var("LEZZET_TEST_WEBHOOK");
    }

    #[test]
    fn test_config_validation() {
        let invalid = [
            "[booking]\nendpoint = \"invalid-url\"\n",
            "[booking]\nretry_attempts = 50\n",
            "[booking]\ntimeout_seconds = 0\n",
            "[booking]\nidempotency_header = \"bad header\"\n",
            "[messages]\nrejected = \"   \"\n",
        ];

        for toml_content in invalid {
            let config = BookingConfig::from_toml_str(toml_content).unwrap();
            assert!(config.validate().is_err(), "{}", toml_content);
        }
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[booking]
endpoint = "https://api.example.com/reservations"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = BookingConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.endpoint(), "https://api.example.com/reservations");
    }
}
