use crate::core::{BookingGateway, ReservationDraft, StatusMessages, SubmissionStatus, SubmitOutcome};
use std::sync::Arc;
use tokio::sync::watch;

/// 呼叫 submit 之後的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// 已有請求進行中，這次呼叫被忽略
    Ignored,
    /// 請求已完成，附上最後狀態
    Settled(SubmissionStatus),
}

/// 一次進行中的嘗試。沒有經過 `finish` 就被丟棄（future 被取消、閘道 panic）時，
/// 狀態改為連線失敗訊息，讓流程可以再次送出；表單不受影響。
#[must_use = "dropping the guard ends the attempt as a transport failure"]
pub struct InFlightGuard {
    status: Arc<watch::Sender<SubmissionStatus>>,
    abandoned_message: String,
    armed: bool,
}

impl InFlightGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!("⚠️ Reservation attempt abandoned before the booking endpoint answered");
        let message = std::mem::take(&mut self.abandoned_message);
        self.status.send_if_modified(|status| {
            if status.is_in_flight() {
                *status = SubmissionStatus::Failed(message);
                true
            } else {
                false
            }
        });
    }
}

/// 送出控制器：擁有唯一的狀態值，並保證同時最多只有一個請求
pub struct SubmissionController<G: BookingGateway> {
    gateway: G,
    messages: StatusMessages,
    status: Arc<watch::Sender<SubmissionStatus>>,
}

impl<G: BookingGateway> SubmissionController<G> {
    pub fn new(gateway: G, messages: StatusMessages) -> Self {
        let (status, _) = watch::channel(SubmissionStatus::Idle);
        Self {
            gateway,
            messages,
            status: Arc::new(status),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status.borrow().clone()
    }

    /// 畫面層用來接收每一次狀態變化
    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    /// 進入 InFlight；若已經在 InFlight 則回傳 None 且不做任何事
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        // 舊的成功/失敗訊息在新的嘗試開始時清掉
        let started = self.status.send_if_modified(|status| {
            if status.is_in_flight() {
                false
            } else {
                *status = SubmissionStatus::InFlight;
                true
            }
        });

        if !started {
            tracing::debug!("Submit ignored: a reservation request is already in flight");
            return None;
        }
        Some(InFlightGuard {
            status: Arc::clone(&self.status),
            abandoned_message: self.messages.transport_failure.clone(),
            armed: true,
        })
    }

    /// 送出一次請求，不會失敗，所有錯誤都轉成 SubmitOutcome
    pub async fn call(&self, payload: &ReservationDraft) -> SubmitOutcome {
        tracing::info!(
            "📨 Sending reservation request (guests: {}, date: {}, time: {})",
            payload.guest_count,
            payload.date,
            payload.time
        );
        let outcome = self.gateway.submit(payload).await;

        match &outcome {
            SubmitOutcome::Accepted => tracing::info!("✅ Reservation accepted by booking endpoint"),
            SubmitOutcome::Rejected { status } => {
                tracing::warn!("⚠️ Booking endpoint rejected reservation with status {}", status)
            }
            SubmitOutcome::TransportFailed { reason } => {
                tracing::error!("❌ Reservation request could not be completed: {}", reason)
            }
        }
        outcome
    }

    /// 把結果對應到狀態並通知觀察者，控制器隨後可接受新的嘗試
    pub fn finish(&self, guard: InFlightGuard, outcome: &SubmitOutcome) -> SubmissionStatus {
        guard.disarm();
        let status = match outcome {
            SubmitOutcome::Accepted => SubmissionStatus::Succeeded(self.messages.success.clone()),
            SubmitOutcome::Rejected { .. } => SubmissionStatus::Failed(self.messages.rejected.clone()),
            SubmitOutcome::TransportFailed { .. } => {
                SubmissionStatus::Failed(self.messages.transport_failure.clone())
            }
        };
        self.status.send_replace(status.clone());
        status
    }

    /// 完整的一次送出：守門、呼叫、對應結果
    pub async fn submit(&self, draft: ReservationDraft) -> SubmitAttempt {
        let Some(guard) = self.try_begin() else {
            return SubmitAttempt::Ignored;
        };
        let outcome = self.call(&draft).await;
        SubmitAttempt::Settled(self.finish(guard, &outcome))
    }

    /// 關掉成功/失敗橫幅；進行中時不做事
    pub fn dismiss(&self) {
        self.status.send_if_modified(|status| match status {
            SubmissionStatus::Succeeded(_) | SubmissionStatus::Failed(_) => {
                *status = SubmissionStatus::Idle;
                true
            }
            _ => false,
        });
    }
}
