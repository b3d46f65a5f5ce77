use crate::domain::model::{FormField, GuestCount, ReservationDraft, TimeSlot};
use crate::utils::error::{BookingError, Result};
use chrono::NaiveDate;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(BookingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// HTTP 標頭名稱只能是 token 字元
pub fn validate_header_name(field_name: &str, value: &str) -> Result<()> {
    let valid = !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if !valid {
        return Err(BookingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Not a valid HTTP header name".to_string(),
        });
    }
    Ok(())
}

/// 畫面層在送出前呼叫：必填欄位與選項檢查。控制器本身不會呼叫這裡。
pub fn validate_draft_fields(draft: &ReservationDraft) -> Result<()> {
    if let Some(field) = draft.missing_fields().first() {
        return Err(BookingError::FieldValidationError {
            field: field.to_string(),
            reason: "required".to_string(),
        });
    }

    let field_error = |field: FormField, reason: String| BookingError::FieldValidationError {
        field: field.to_string(),
        reason,
    };

    draft
        .guest_count
        .parse::<GuestCount>()
        .map_err(|e| field_error(FormField::Guests, e))?;
    draft
        .time
        .parse::<TimeSlot>()
        .map_err(|e| field_error(FormField::Time, e))?;
    NaiveDate::parse_from_str(&draft.date, "%Y-%m-%d").map_err(|e| {
        field_error(FormField::Date, format!("expected YYYY-MM-DD: {}", e))
    })?;

    Ok(())
}
