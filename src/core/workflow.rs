use crate::core::controller::{InFlightGuard, SubmissionController, SubmitAttempt};
use crate::core::form::FormState;
use crate::core::{
    BookingGateway, FormField, ReservationDraft, StatusMessages, SubmissionStatus, SubmitOutcome,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// 畫面層一次讀到的表單與狀態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowView {
    pub draft: ReservationDraft,
    pub status: SubmissionStatus,
}

impl WorkflowView {
    /// 送出按鈕在 InFlight 時要停用
    pub fn submit_enabled(&self) -> bool {
        !self.status.is_in_flight()
    }
}

/// 訂位流程：一個實例擁有一份表單和一個送出控制器
pub struct ReservationWorkflow<G: BookingGateway> {
    form: Mutex<FormState>,
    controller: SubmissionController<G>,
}

impl<G: BookingGateway> ReservationWorkflow<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_messages(gateway, StatusMessages::default())
    }

    pub fn with_messages(gateway: G, messages: StatusMessages) -> Self {
        Self {
            form: Mutex::new(FormState::new()),
            controller: SubmissionController::new(gateway, messages),
        }
    }

    // 鎖從不跨 await 持有；中毒時照樣取回內容
    fn form(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_field(&self, field: FormField, value: impl Into<String>) -> ReservationDraft {
        self.form().set_field(field, value).clone()
    }

    pub fn reset(&self) -> ReservationDraft {
        self.form().reset().clone()
    }

    pub fn draft(&self) -> ReservationDraft {
        self.form().snapshot()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.controller.status()
    }

    pub fn view(&self) -> WorkflowView {
        let form = self.form();
        WorkflowView {
            draft: form.snapshot(),
            status: self.controller.status(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.controller.subscribe()
    }

    pub fn dismiss(&self) {
        self.controller.dismiss();
    }

    // 同步進入 InFlight 並取得表單快照
    fn start(&self) -> Option<(InFlightGuard, ReservationDraft)> {
        let form = self.form();
        let guard = self.controller.try_begin()?;
        Some((guard, form.snapshot()))
    }

    // guard 若在 await 中被丟棄，狀態轉為 Failed，表單保持原樣
    async fn complete(&self, guard: InFlightGuard, snapshot: ReservationDraft) -> SubmissionStatus {
        let outcome = self.controller.call(&snapshot).await;

        // 成功時清空表單與發佈 Succeeded 在同一個鎖內完成
        let mut form = self.form();
        if outcome == SubmitOutcome::Accepted {
            form.reset();
        }
        self.controller.finish(guard, &outcome)
    }

    /// 送出目前的表單並等待結果
    pub async fn submit(&self) -> SubmitAttempt {
        match self.start() {
            Some((guard, snapshot)) => SubmitAttempt::Settled(self.complete(guard, snapshot).await),
            None => SubmitAttempt::Ignored,
        }
    }
}

impl<G: BookingGateway + 'static> ReservationWorkflow<G> {
    /// 立即回傳（狀態已是 InFlight），請求在背景完成；進行中時回傳 None
    pub fn dispatch(self: &Arc<Self>) -> Option<JoinHandle<SubmissionStatus>> {
        let (guard, snapshot) = self.start()?;
        let workflow = Arc::clone(self);
        Some(tokio::spawn(async move { workflow.complete(guard, snapshot).await }))
    }
}
