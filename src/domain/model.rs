use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 表單上的五個欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Phone,
    Guests,
    Date,
    Time,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Phone,
        FormField::Guests,
        FormField::Date,
        FormField::Time,
    ];

    /// 送出 JSON 時使用的 key
    pub fn wire_name(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Phone => "phone",
            FormField::Guests => "guests",
            FormField::Date => "date",
            FormField::Time => "time",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(FormField::Name),
            "phone" => Ok(FormField::Phone),
            "guests" | "guestCount" => Ok(FormField::Guests),
            "date" => Ok(FormField::Date),
            "time" => Ok(FormField::Time),
            other => Err(format!("unknown form field: {}", other)),
        }
    }
}

/// 尚未送出的訂位資料，所有欄位預設為空字串。
/// 序列化後即為送往訂位端點的 JSON，欄位值原樣帶出。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub name: String,
    pub phone: String,
    #[serde(rename = "guests")]
    pub guest_count: String,
    pub date: String,
    pub time: String,
}

impl ReservationDraft {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Phone => &self.phone,
            FormField::Guests => &self.guest_count,
            FormField::Date => &self.date,
            FormField::Time => &self.time,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Phone => &mut self.phone,
            FormField::Guests => &mut self.guest_count,
            FormField::Date => &mut self.date,
            FormField::Time => &mut self.time,
        }
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// 每個欄位都有值時才可送出（由畫面層負責檢查）
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_empty())
            .collect()
    }
}

/// 可選的人數
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestCount {
    Exact(u8),
    SevenOrMore,
}

impl GuestCount {
    pub const OPTIONS: [&'static str; 7] = ["1", "2", "3", "4", "5", "6", "7+"];
}

impl FromStr for GuestCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7+" => Ok(GuestCount::SevenOrMore),
            _ => match s.parse::<u8>() {
                Ok(n @ 1..=6) => Ok(GuestCount::Exact(n)),
                _ => Err(format!(
                    "guest count must be one of {}",
                    GuestCount::OPTIONS.join(", ")
                )),
            },
        }
    }
}

/// 可訂位的時段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot(&'static str);

impl TimeSlot {
    pub const ALL: [TimeSlot; 10] = [
        TimeSlot("11:00"),
        TimeSlot("12:00"),
        TimeSlot("13:00"),
        TimeSlot("14:00"),
        TimeSlot("15:00"),
        TimeSlot("18:00"),
        TimeSlot("19:00"),
        TimeSlot("20:00"),
        TimeSlot("21:00"),
        TimeSlot("22:00"),
    ];
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::ALL
            .iter()
            .copied()
            .find(|slot| slot.0 == s)
            .ok_or_else(|| {
                let options: Vec<&str> = TimeSlot::ALL.iter().map(|t| t.0).collect();
                format!("time must be one of {}", options.join(", "))
            })
    }
}

/// 目前的送出狀態，同一時間只會有一個
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            SubmissionStatus::Idle => StatusKind::Idle,
            SubmissionStatus::InFlight => StatusKind::InFlight,
            SubmissionStatus::Succeeded(_) => StatusKind::Succeeded,
            SubmissionStatus::Failed(_) => StatusKind::Failed,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionStatus::InFlight)
    }

    /// 要顯示在橫幅上的訊息
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Succeeded(msg) | SubmissionStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
