use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A scheduled reminder for the back-office staff. `time` is a wall-clock
/// HH:MM string alongside the date, as entered by the user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reminder {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: chrono::DateTime<chrono::Utc>,
    pub time: String,
    pub category: String,
    pub priority: String,
    pub notes: String,
    pub created_by: Uuid,
    pub notified_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReminderCategory {
    #[serde(rename = "Property Showing")]
    PropertyShowing,
    #[serde(rename = "Client Follow-up")]
    ClientFollowUp,
    #[serde(rename = "Meeting")]
    Meeting,
    #[serde(rename = "Deadline")]
    Deadline,
    #[serde(rename = "Others")]
    Others,
}

impl ReminderCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderCategory::PropertyShowing => "Property Showing",
            ReminderCategory::ClientFollowUp => "Client Follow-up",
            ReminderCategory::Meeting => "Meeting",
            ReminderCategory::Deadline => "Deadline",
            ReminderCategory::Others => "Others",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReminderPriority {
    Low,
    Medium,
    High,
}

impl ReminderPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderPriority::Low => "low",
            ReminderPriority::Medium => "medium",
            ReminderPriority::High => "high",
        }
    }
}

/// Accepts H:MM or HH:MM, 24-hour clock.
pub fn validate_time(value: &str) -> Result<(), ValidationError> {
    let Some((hours, minutes)) = value.split_once(':') else {
        return Err(ValidationError::new("time_format"));
    };
    let hours_ok = matches!(hours.parse::<u8>(), Ok(h) if h <= 23 && !hours.is_empty() && hours.len() <= 2);
    let minutes_ok = matches!(minutes.parse::<u8>(), Ok(m) if m <= 59 && minutes.len() == 2);
    if hours_ok && minutes_ok {
        Ok(())
    } else {
        Err(ValidationError::new("time_format"))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReminderDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "Description must be between 1 and 1000 characters"))]
    pub description: String,
    pub date: chrono::DateTime<chrono::Utc>,
    #[validate(custom(function = "validate_time", message = "Time must be HH:MM"))]
    pub time: String,
    pub category: ReminderCategory,
    pub priority: Option<ReminderPriority>,
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReminderDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "Description must be between 1 and 1000 characters"))]
    pub description: Option<String>,
    pub date: Option<chrono::DateTime<chrono::Utc>>,
    #[validate(custom(function = "validate_time", message = "Time must be HH:MM"))]
    pub time: Option<String>,
    pub category: Option<ReminderCategory>,
    pub priority: Option<ReminderPriority>,
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_validation() {
        assert!(validate_time("09:30").is_ok());
        assert!(validate_time("9:05").is_ok());
        assert!(validate_time("23:59").is_ok());
        assert!(validate_time("24:00").is_err());
        assert!(validate_time("12:60").is_err());
        assert!(validate_time("12:5").is_err());
        assert!(validate_time("noon").is_err());
    }

    #[test]
    fn test_category_wire_names() {
        let cat: ReminderCategory = serde_json::from_str("\"Client Follow-up\"").unwrap();
        assert_eq!(cat, ReminderCategory::ClientFollowUp);
        assert_eq!(
            serde_json::to_string(&ReminderCategory::PropertyShowing).unwrap(),
            "\"Property Showing\""
        );
    }
}
