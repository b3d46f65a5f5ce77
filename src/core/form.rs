use crate::core::{FormField, ReservationDraft};

/// 表單狀態管理，只接受使用者輸入，不做任何驗證
#[derive(Debug, Clone, Default)]
pub struct FormState {
    draft: ReservationDraft,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &ReservationDraft {
        &self.draft
    }

    /// 只替換指定欄位，其他欄位保持不變
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> &ReservationDraft {
        let value = value.into();
        tracing::trace!("Form field '{}' changed ({} chars)", field, value.chars().count());
        *self.draft.slot_mut(field) = value;
        &self.draft
    }

    pub fn reset(&mut self) -> &ReservationDraft {
        self.draft = ReservationDraft::default();
        &self.draft
    }

    /// 送出時帶走的快照，之後的編輯不會影響進行中的請求
    pub fn snapshot(&self) -> ReservationDraft {
        self.draft.clone()
    }
}
