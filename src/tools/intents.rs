use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::outcome::ToolOutcome;
use super::schema::DEFAULT_MEETING_MINUTES;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MeetingIntent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_name: Option<String>,
    pub attendee_email: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
}

fn default_duration() -> u32 {
    DEFAULT_MEETING_MINUTES
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmailIntent {
    pub recipient_email: String,
    pub subject: String,
    pub message: String,
}

/// Check the arguments against the typed intent, then echo them back as
/// given. Keys in `defaults` are filled in only when absent.
fn extracted<T>(args: &Value, defaults: &[(&str, Value)]) -> ToolOutcome
where
    T: DeserializeOwned,
{
    if let Err(e) = serde_json::from_value::<T>(args.clone()) {
        return ToolOutcome::failure(format!("Invalid intent arguments: {}", e));
    }

    let mut data = args.clone();
    if let Value::Object(fields) = &mut data {
        for (key, value) in defaults {
            fields
                .entry(key.to_string())
                .or_insert_with(|| value.clone());
        }
    }

    ToolOutcome::Success(json!({
        "status": "extracted",
        "data": data,
    }))
}

/// Echo the meeting details back so the model can decide whether to book.
pub fn handle_extract_meeting_intent(args: &Value) -> ToolOutcome {
    extracted::<MeetingIntent>(args, &[("duration_minutes", json!(DEFAULT_MEETING_MINUTES))])
}

pub fn handle_extract_email_intent(args: &Value) -> ToolOutcome {
    extracted::<EmailIntent>(args, &[])
}
