use crate::core::{BookingGateway, ConfigProvider, ReservationDraft, SubmitOutcome};
use reqwest::Client;
use std::time::Duration;
use uuid::Uuid;

/// 以 HTTP POST 把訂位 JSON 送到 webhook
pub struct WebhookGateway {
    client: Client,
    endpoint: String,
    timeout: Option<Duration>,
    retry_attempts: u32,
    retry_delay: Duration,
    idempotency_header: Option<String>,
}

impl WebhookGateway {
    /// 無逾時、無重試、無額外標頭
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout: None,
            retry_attempts: 0,
            retry_delay: Duration::ZERO,
            idempotency_header: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint().to_string(),
            timeout: config.timeout(),
            retry_attempts: config.retry_attempts(),
            retry_delay: config.retry_delay(),
            idempotency_header: config.idempotency_header().map(str::to_string),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(&self, payload: &ReservationDraft, request_id: Option<&str>) -> SubmitOutcome {
        // .json() 會帶上 Content-Type: application/json
        let mut request = self.client.post(&self.endpoint).json(payload);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if let (Some(header), Some(id)) = (&self.idempotency_header, request_id) {
            request = request.header(header.as_str(), id);
        }

        tracing::debug!("Making booking request to: {}", self.endpoint);

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!("Booking response status: {}", status);
                if status.is_success() {
                    SubmitOutcome::Accepted
                } else {
                    SubmitOutcome::Rejected {
                        status: status.as_u16(),
                    }
                }
            }
            Err(e) => SubmitOutcome::TransportFailed {
                reason: e.to_string(),
            },
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(1u32 << attempt.min(16))
    }
}

#[async_trait::async_trait]
impl BookingGateway for WebhookGateway {
    async fn submit(&self, payload: &ReservationDraft) -> SubmitOutcome {
        // 同一次送出的所有重試共用一個 id，讓後端可以去重
        let request_id = self
            .idempotency_header
            .as_ref()
            .map(|_| Uuid::new_v4().to_string());

        let mut attempt = 0;
        loop {
            let outcome = self.send_once(payload, request_id.as_deref()).await;
            match outcome {
                SubmitOutcome::TransportFailed { ref reason } if attempt < self.retry_attempts => {
                    let delay = self.backoff(attempt);
                    attempt += 1;
                    tracing::warn!(
                        "🔄 Booking request failed ({}), retry {}/{} in {:?}",
                        reason,
                        attempt,
                        self.retry_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// 記下每個請求的 Idempotency-Key，然後不回應直接關閉連線
    async fn closing_server() -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let keys = Arc::new(Mutex::new(Vec::new()));

        let recorded = keys.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 16 * 1024];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let key = request
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("idempotency-key"))
                    .map(|(_, value)| value.trim().to_string())
                    .unwrap_or_default();
                recorded.lock().unwrap().push(key);
            }
        });

        (format!("http://{}/webhook", addr), keys)
    }

    fn retrying_gateway(endpoint: String) -> WebhookGateway {
        let mut gateway = WebhookGateway::new(endpoint);
        gateway.retry_attempts = 2;
        gateway.retry_delay = Duration::from_millis(1);
        gateway.idempotency_header = Some("Idempotency-Key".to_string());
        gateway
    }

    #[tokio::test]
    async fn test_retries_reuse_one_idempotency_key_per_submit() {
        let (endpoint, keys) = closing_server().await;
        let gateway = retrying_gateway(endpoint);

        let first = gateway.submit(&ReservationDraft::default()).await;
        assert!(matches!(first, SubmitOutcome::TransportFailed { .. }));
        let first_keys = std::mem::take(&mut *keys.lock().unwrap());

        let second = gateway.submit(&ReservationDraft::default()).await;
        assert!(matches!(second, SubmitOutcome::TransportFailed { .. }));
        let second_keys = keys.lock().unwrap().clone();

        // 一次原始請求加兩次重試
        assert_eq!(first_keys.len(), 3);
        assert_eq!(second_keys.len(), 3);
        assert!(Uuid::parse_str(&first_keys[0]).is_ok());
        assert!(first_keys.iter().all(|k| *k == first_keys[0]));
        assert!(second_keys.iter().all(|k| *k == second_keys[0]));
        assert_ne!(first_keys[0], second_keys[0]);
    }

    #[tokio::test]
    async fn test_no_idempotency_header_by_default() {
        let (endpoint, keys) = closing_server().await;
        let gateway = WebhookGateway::new(endpoint);

        gateway.submit(&ReservationDraft::default()).await;
        assert_eq!(keys.lock().unwrap().clone(), vec![String::new()]);
    }

    #[test]
    fn test_backoff_doubles() {
        let mut gateway = WebhookGateway::new("http://localhost");
        gateway.retry_delay = Duration::from_millis(100);

        assert_eq!(gateway.backoff(0), Duration::from_millis(100));
        assert_eq!(gateway.backoff(1), Duration::from_millis(200));
        assert_eq!(gateway.backoff(3), Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_failure() {
        // 保留埠 9 沒有服務監聽
        let gateway = WebhookGateway::new("http://127.0.0.1:9/webhook");
        let outcome = gateway.submit(&ReservationDraft::default()).await;
        assert!(matches!(outcome, SubmitOutcome::TransportFailed { .. }));
    }
}
