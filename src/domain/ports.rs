use crate::domain::model::ReservationDraft;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// 一次送出的三種結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 端點回傳 2xx
    Accepted,
    /// 端點有回應但不是成功狀態碼
    Rejected { status: u16 },
    /// 請求沒有完成（DNS、逾時、連線被拒…）
    TransportFailed { reason: String },
}

#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn submit(&self, payload: &ReservationDraft) -> SubmitOutcome;
}

#[async_trait]
impl<T: BookingGateway + ?Sized> BookingGateway for Arc<T> {
    async fn submit(&self, payload: &ReservationDraft) -> SubmitOutcome {
        (**self).submit(payload).await
    }
}

/// 各結果對應的使用者訊息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusMessages {
    pub success: String,
    pub rejected: String,
    pub transport_failure: String,
}

impl Default for StatusMessages {
    fn default() -> Self {
        Self {
            success: "Rezervasyonunuz başarıyla alındı! En kısa sürede sizinle iletişime geçeceğiz."
                .to_string(),
            rejected: "Bir hata oluştu. Lütfen daha sonra tekrar deneyiniz.".to_string(),
            transport_failure: "Bağlantı hatası. Lütfen telefon numaranızdan bizi arayınız."
                .to_string(),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn timeout(&self) -> Option<Duration>;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn idempotency_header(&self) -> Option<&str>;
    fn messages(&self) -> StatusMessages;
}
